//! Writer configuration
//!
//! `WriterOptions` carries the embedding policy and texture processing
//! choices of one writer invocation. `Options` describes where sources are
//! read from and where external files are written.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use glam::UVec2;

use crate::error::{SerializeError, SerializeResult};
use crate::record::ResourceKind;

/// Which resource kinds are embedded instead of written to external files
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EmbedMode(pub u32);

impl EmbedMode {
    pub const NONE: Self = Self(0);
    pub const GEOMETRY: Self = Self(1 << 0);
    pub const MATERIAL: Self = Self(1 << 1);
    pub const TEXTURE: Self = Self(1 << 2);
    pub const ALL: Self = Self(Self::GEOMETRY.0 | Self::MATERIAL.0 | Self::TEXTURE.0);

    /// Check whether every bit of `other` is set
    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether any bit of `other` is set
    pub fn intersects(&self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Check whether every kind is embedded
    pub fn is_all(&self) -> bool {
        self.contains(Self::ALL)
    }

    /// Whether resources of `kind` are embedded
    ///
    /// Effects (and their includes) have no bit of their own and are only
    /// embedded when everything is.
    pub fn embeds(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Geometry => self.intersects(Self::GEOMETRY),
            ResourceKind::Material => self.intersects(Self::MATERIAL),
            ResourceKind::Texture => self.intersects(Self::TEXTURE),
            ResourceKind::Effect | ResourceKind::SubScene => self.is_all(),
        }
    }
}

impl core::ops::BitOr for EmbedMode {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for EmbedMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Output image encoding for processed textures
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Keep the source file's encoding
    #[default]
    Source,
    Png,
    Jpeg,
}

/// GPU texture formats a scene is prepared for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgb8,
    Rgba8,
    Rgb8Etc1,
    Rgba8Etc2,
    RgbaDxt5,
    RgbaPvrtc4,
}

/// Mipmap minification filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MipFilter {
    None,
    Nearest,
    #[default]
    Linear,
}

/// Rewrites the name of an externally written asset before it is recorded
pub type UriFunction = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Options for one writer invocation
#[derive(Clone)]
pub struct WriterOptions {
    add_bounding_boxes: bool,
    embed_mode: EmbedMode,
    output_asset_uri_function: UriFunction,
    image_format: ImageFormat,
    texture_formats: Vec<TextureFormat>,
    compress_texture: bool,
    generate_mipmaps: bool,
    upscale_texture_when_processed_for_mipmapping: bool,
    texture_max_resolution: UVec2,
    mip_filter: MipFilter,
    optimize_for_normal_mapping: bool,
}

impl WriterOptions {
    /// Largest texture size accepted without resizing
    pub const DEFAULT_TEXTURE_MAX_RESOLUTION: UVec2 = UVec2::new(2048, 2048);

    /// Create options with default values
    pub fn new() -> Self {
        Self {
            add_bounding_boxes: false,
            embed_mode: EmbedMode::ALL,
            output_asset_uri_function: Arc::new(|uri: &str| uri.to_string()),
            image_format: ImageFormat::Source,
            texture_formats: Vec::new(),
            compress_texture: false,
            generate_mipmaps: false,
            upscale_texture_when_processed_for_mipmapping: false,
            texture_max_resolution: Self::DEFAULT_TEXTURE_MAX_RESOLUTION,
            mip_filter: MipFilter::Linear,
            optimize_for_normal_mapping: false,
        }
    }

    /// Copy every field of `other` into a new, independent instance
    pub fn create_from(other: &WriterOptions) -> Self {
        other.clone()
    }

    pub fn add_bounding_boxes(&self) -> bool {
        self.add_bounding_boxes
    }

    pub fn set_add_bounding_boxes(&mut self, value: bool) -> &mut Self {
        self.add_bounding_boxes = value;
        self
    }

    pub fn embed_mode(&self) -> EmbedMode {
        self.embed_mode
    }

    pub fn set_embed_mode(&mut self, value: EmbedMode) -> &mut Self {
        self.embed_mode = value;
        self
    }

    pub fn output_asset_uri_function(&self) -> &UriFunction {
        &self.output_asset_uri_function
    }

    pub fn set_output_asset_uri_function<F>(&mut self, func: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.output_asset_uri_function = Arc::new(func);
        self
    }

    /// Apply the URI function to an external asset name
    pub fn output_asset_uri(&self, uri: &str) -> String {
        (self.output_asset_uri_function)(uri)
    }

    pub fn image_format(&self) -> ImageFormat {
        self.image_format
    }

    pub fn set_image_format(&mut self, value: ImageFormat) -> &mut Self {
        self.image_format = value;
        self
    }

    pub fn texture_formats(&self) -> &[TextureFormat] {
        &self.texture_formats
    }

    pub fn register_texture_format(&mut self, format: TextureFormat) -> &mut Self {
        if !self.texture_formats.contains(&format) {
            self.texture_formats.push(format);
        }
        self
    }

    pub fn compress_texture(&self) -> bool {
        self.compress_texture
    }

    pub fn set_compress_texture(&mut self, value: bool) -> &mut Self {
        self.compress_texture = value;
        self
    }

    pub fn generate_mipmaps(&self) -> bool {
        self.generate_mipmaps
    }

    pub fn set_generate_mipmaps(&mut self, value: bool) -> &mut Self {
        self.generate_mipmaps = value;
        self
    }

    pub fn upscale_texture_when_processed_for_mipmapping(&self) -> bool {
        self.upscale_texture_when_processed_for_mipmapping
    }

    pub fn set_upscale_texture_when_processed_for_mipmapping(&mut self, value: bool) -> &mut Self {
        self.upscale_texture_when_processed_for_mipmapping = value;
        self
    }

    pub fn texture_max_resolution(&self) -> UVec2 {
        self.texture_max_resolution
    }

    pub fn set_texture_max_resolution(&mut self, value: UVec2) -> &mut Self {
        self.texture_max_resolution = value;
        self
    }

    pub fn mip_filter(&self) -> MipFilter {
        self.mip_filter
    }

    pub fn set_mip_filter(&mut self, value: MipFilter) -> &mut Self {
        self.mip_filter = value;
        self
    }

    pub fn optimize_for_normal_mapping(&self) -> bool {
        self.optimize_for_normal_mapping
    }

    pub fn set_optimize_for_normal_mapping(&mut self, value: bool) -> &mut Self {
        self.optimize_for_normal_mapping = value;
        self
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WriterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterOptions")
            .field("add_bounding_boxes", &self.add_bounding_boxes)
            .field("embed_mode", &self.embed_mode)
            .field("image_format", &self.image_format)
            .field("texture_formats", &self.texture_formats)
            .field("compress_texture", &self.compress_texture)
            .field("generate_mipmaps", &self.generate_mipmaps)
            .field(
                "upscale_texture_when_processed_for_mipmapping",
                &self.upscale_texture_when_processed_for_mipmapping,
            )
            .field("texture_max_resolution", &self.texture_max_resolution)
            .field("mip_filter", &self.mip_filter)
            .field("optimize_for_normal_mapping", &self.optimize_for_normal_mapping)
            .finish()
    }
}

/// Extension that marks a string literal in effect source as an include
pub const DEFAULT_INCLUDE_MARKER: &str = ".glsl";

/// Where a pass reads sources from and writes external files to
#[derive(Clone, Debug)]
pub struct Options {
    asset_root: PathBuf,
    output_root: PathBuf,
    include_root: PathBuf,
    include_marker: String,
    embed_all: bool,
}

impl Options {
    /// Read and write relative to the current directory
    pub fn new() -> Self {
        Self {
            asset_root: PathBuf::new(),
            output_root: PathBuf::new(),
            include_root: PathBuf::from("effect"),
            include_marker: DEFAULT_INCLUDE_MARKER.to_string(),
            embed_all: false,
        }
    }

    pub fn with_asset_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_root = path.into();
        self
    }

    pub fn with_output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = path.into();
        self
    }

    pub fn with_include_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_root = path.into();
        self
    }

    pub fn with_include_marker(mut self, marker: impl Into<String>) -> Self {
        self.include_marker = marker.into();
        self
    }

    pub fn with_embed_all(mut self, value: bool) -> Self {
        self.embed_all = value;
        self
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn include_root(&self) -> &Path {
        &self.include_root
    }

    pub fn include_marker(&self) -> &str {
        &self.include_marker
    }

    /// Force every resource to be embedded, whatever the writer options say
    pub fn embed_all(&self) -> bool {
        self.embed_all
    }

    /// Embed mode actually applied to a pass
    pub fn effective_embed_mode(&self, writer_options: &WriterOptions) -> EmbedMode {
        if self.embed_all {
            EmbedMode::ALL
        } else {
            writer_options.embed_mode()
        }
    }

    /// Path of a source asset
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.asset_root.join(name)
    }

    /// Path of a written external file
    ///
    /// `name` must stay under the output root: absolute names and `..`
    /// components are rejected.
    pub fn output_path(&self, name: &str) -> SerializeResult<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || !contained {
            return Err(SerializeError::InvalidOutputName(name.to_string()));
        }
        Ok(self.output_root.join(relative))
    }

    /// Path of an effect include
    pub fn include_path(&self, name: &str) -> PathBuf {
        self.asset_root.join(&self.include_root).join(name)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
