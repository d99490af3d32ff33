//! Texture writer
//!
//! Textures are written as encoded image files. The bytes come from the
//! texture itself when it carries them, otherwise from the source file the
//! asset library names. A [`TextureProcessor`] gets the last word on what is
//! written.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use void_asset::{AssetLibrary, ResourceHandle, Texture};

use crate::container;
use crate::dependency::Dependency;
use crate::error::{SerializeError, SerializeResult};
use crate::options::{ImageFormat, Options, WriterOptions};
use crate::record::{ResourceId, ResourceKind};
use crate::writer::{default_filename, AssetWriter};

/// Magic number of standalone texture files
pub const TEXTURE_MAGIC_NUMBER: u32 = container::magic_number(b'T');

/// Turns source image bytes into written image bytes
pub trait TextureProcessor {
    fn process(&self, source: &[u8], writer_options: &WriterOptions) -> SerializeResult<Vec<u8>>;
}

/// Default processor backed by the `image` crate
///
/// Bytes pass through untouched unless the options ask for another image
/// format or the texture has to be resized: down to the max resolution,
/// and to a power of two when mipmaps are generated.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageTextureProcessor;

impl ImageTextureProcessor {
    /// Size the texture is written at
    pub fn target_size(width: u32, height: u32, writer_options: &WriterOptions) -> (u32, u32) {
        let max = writer_options.texture_max_resolution();
        let upscale = writer_options.upscale_texture_when_processed_for_mipmapping();

        let fit = |size: u32, max: u32| {
            let max = max.max(1);
            let size = size.clamp(1, max);
            if !writer_options.generate_mipmaps() || size.is_power_of_two() {
                return size;
            }

            let next = size.next_power_of_two();
            if upscale && next <= max {
                next
            } else {
                next / 2
            }
        };

        (fit(width, max.x), fit(height, max.y))
    }

    fn encode(image: &DynamicImage, format: image::ImageFormat) -> SerializeResult<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        if format == image::ImageFormat::Jpeg {
            // no alpha channel in JPEG
            DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut bytes, format)?;
        } else {
            image.write_to(&mut bytes, format)?;
        }
        Ok(bytes.into_inner())
    }
}

impl TextureProcessor for ImageTextureProcessor {
    fn process(&self, source: &[u8], writer_options: &WriterOptions) -> SerializeResult<Vec<u8>> {
        let format = writer_options.image_format();

        let image = match image::load_from_memory(source) {
            Ok(image) => image,
            Err(e) if format == ImageFormat::Source => {
                log::warn!("Texture could not be inspected, writing it unchanged: {}", e);
                return Ok(source.to_vec());
            }
            Err(e) => return Err(e.into()),
        };

        let size = (image.width(), image.height());
        let target = Self::target_size(size.0, size.1, writer_options);
        if target == size && format == ImageFormat::Source {
            return Ok(source.to_vec());
        }

        let image = if target != size {
            log::debug!(
                "Resizing texture from {}x{} to {}x{}",
                size.0,
                size.1,
                target.0,
                target.1
            );
            image.resize_exact(target.0, target.1, image::imageops::FilterType::Lanczos3)
        } else {
            image
        };

        let output_format = match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Source => match image::guess_format(source) {
                Ok(image::ImageFormat::Jpeg) => image::ImageFormat::Jpeg,
                _ => image::ImageFormat::Png,
            },
        };
        Self::encode(&image, output_format)
    }
}

/// Writes a texture's encoded image
pub struct TextureWriter<P: TextureProcessor = ImageTextureProcessor> {
    texture: ResourceHandle<Texture>,
    processor: P,
}

impl TextureWriter {
    /// Create a texture writer using the default processor
    pub fn new(texture: ResourceHandle<Texture>) -> Self {
        Self {
            texture,
            processor: ImageTextureProcessor,
        }
    }
}

impl<P: TextureProcessor> TextureWriter<P> {
    /// Create a texture writer with a custom processor
    pub fn with_processor(texture: ResourceHandle<Texture>, processor: P) -> Self {
        Self { texture, processor }
    }

    /// Encoded bytes before processing
    pub fn source(&self, library: &AssetLibrary, options: &Options) -> SerializeResult<Vec<u8>> {
        if !self.texture.data.is_empty() {
            return Ok(self.texture.data.clone());
        }

        let name = library
            .texture_name(&self.texture)
            .ok_or(SerializeError::MissingSource(ResourceKind::Texture))?;
        let path = options.asset_path(name);
        std::fs::read(&path).map_err(|e| SerializeError::io(path, e))
    }
}

impl<P: TextureProcessor> AssetWriter for TextureWriter<P> {
    type Resource = Texture;

    fn resource(&self) -> &ResourceHandle<Texture> {
        &self.texture
    }

    fn magic_number(&self) -> u32 {
        TEXTURE_MAGIC_NUMBER
    }

    fn embed(
        &self,
        library: &AssetLibrary,
        options: &Options,
        _dependency: &mut Dependency,
        writer_options: &WriterOptions,
    ) -> SerializeResult<Vec<u8>> {
        let source = self.source(library, options)?;
        self.processor.process(&source, writer_options)
    }

    /// External textures are plain image files
    fn external_data(&self, data: Vec<u8>) -> SerializeResult<Vec<u8>> {
        Ok(data)
    }

    /// The extension follows the image format written
    fn filename(&self, library: &AssetLibrary, id: ResourceId, writer_options: &WriterOptions) -> String {
        let name = library
            .texture_name(&self.texture)
            .map(str::to_string)
            .unwrap_or_else(|| default_filename(ResourceKind::Texture, id));

        let extension = match writer_options.image_format() {
            ImageFormat::Source => return name,
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        };
        Path::new(&name).with_extension(extension).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec2;
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_target_size() {
        let mut writer_options = WriterOptions::new();
        writer_options.set_texture_max_resolution(UVec2::new(256, 256));
        assert_eq!(ImageTextureProcessor::target_size(300, 100, &writer_options), (256, 100));

        writer_options.set_generate_mipmaps(true);
        assert_eq!(ImageTextureProcessor::target_size(300, 100, &writer_options), (256, 64));

        writer_options.set_upscale_texture_when_processed_for_mipmapping(true);
        assert_eq!(ImageTextureProcessor::target_size(300, 100, &writer_options), (256, 128));
        assert_eq!(ImageTextureProcessor::target_size(64, 64, &writer_options), (64, 64));
    }

    #[test]
    fn test_passthrough() {
        let writer_options = WriterOptions::new();
        let source = png(4, 4);
        assert_eq!(ImageTextureProcessor.process(&source, &writer_options).unwrap(), source);

        // undecodable bytes pass through when no conversion is asked for
        let raw = b"not an image".to_vec();
        assert_eq!(ImageTextureProcessor.process(&raw, &writer_options).unwrap(), raw);
    }

    #[test]
    fn test_resize_for_mipmaps() {
        let mut writer_options = WriterOptions::new();
        writer_options
            .set_generate_mipmaps(true)
            .set_upscale_texture_when_processed_for_mipmapping(true);

        let processed = ImageTextureProcessor.process(&png(3, 5), &writer_options).unwrap();
        let image = image::load_from_memory(&processed).unwrap();
        assert_eq!((image.width(), image.height()), (4, 8));
    }

    #[test]
    fn test_convert_to_jpeg() {
        let mut writer_options = WriterOptions::new();
        writer_options.set_image_format(ImageFormat::Jpeg);

        let processed = ImageTextureProcessor.process(&png(8, 8), &writer_options).unwrap();
        assert_eq!(image::guess_format(&processed).unwrap(), image::ImageFormat::Jpeg);

        let raw = b"not an image".to_vec();
        assert!(ImageTextureProcessor.process(&raw, &writer_options).is_err());
    }

    #[test]
    fn test_source_from_library_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("brick.png"), b"brick").unwrap();

        let mut library = AssetLibrary::new();
        let texture = library.add("brick.png", Texture::new(1, 1));
        let options = Options::new().with_asset_root(dir.path());

        let writer = TextureWriter::new(texture);
        assert_eq!(writer.source(&library, &options).unwrap(), b"brick");

        let orphan = TextureWriter::new(ResourceHandle::new(Texture::new(1, 1)));
        assert!(matches!(
            orphan.source(&library, &options),
            Err(SerializeError::MissingSource(ResourceKind::Texture))
        ));
    }

    #[test]
    fn test_converted_texture_is_named_after_its_format() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures")).unwrap();
        std::fs::write(dir.path().join("textures/brick.png"), png(4, 4)).unwrap();

        let mut library = AssetLibrary::new();
        let texture = library.add("textures/brick.png", Texture::new(4, 4));
        let options = Options::new()
            .with_asset_root(dir.path())
            .with_output_root(dir.path().join("out"));
        let mut writer_options = WriterOptions::new();
        writer_options.set_image_format(ImageFormat::Jpeg);

        let record = TextureWriter::new(texture)
            .dependency_record(
                ResourceId(1),
                &library,
                &options,
                &mut Dependency::new(),
                &writer_options,
                false,
            )
            .unwrap();

        assert_eq!(record.payload.filename(), Some("textures/brick.jpg"));
        let written = std::fs::read(dir.path().join("out/textures/brick.jpg")).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), image::ImageFormat::Jpeg);
        assert!(!dir.path().join("out/textures/brick.png").exists());

        // unconverted textures keep the library name
        writer_options.set_image_format(ImageFormat::Source);
        let orphan = TextureWriter::new(ResourceHandle::new(Texture::new(1, 1)));
        assert_eq!(orphan.filename(&library, ResourceId(2), &writer_options), "texture2.texture");
    }
}
