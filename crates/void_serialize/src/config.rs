//! Writer options parser - TOML to WriterOptions conversion
//!
//! # Options Format
//!
//! ```toml
//! embed_mode = ["texture", "material"]   # or "all" / "none"
//! image_format = "png"                   # "source" | "png" | "jpeg"
//! texture_formats = ["rgba8", "rgb8"]
//! compress_texture = false
//! generate_mipmaps = true
//! upscale_texture_when_processed_for_mipmapping = true
//! texture_max_resolution = [2048, 2048]
//! mip_filter = "linear"                  # "none" | "nearest" | "linear"
//! optimize_for_normal_mapping = false
//! add_bounding_boxes = true
//! output_asset_uri_prefix = "assets/"
//! ```
//!
//! Every key is optional; missing keys keep the `WriterOptions` defaults.

use std::path::Path;

use glam::UVec2;
use serde::Deserialize;

use crate::error::{SerializeError, SerializeResult};
use crate::options::{EmbedMode, ImageFormat, MipFilter, TextureFormat, WriterOptions};

/// Raw TOML value of `embed_mode`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbedModeToml {
    Keyword(String),
    Kinds(Vec<String>),
}

/// Raw TOML structure of a writer options file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WriterOptionsToml {
    embed_mode: Option<EmbedModeToml>,
    image_format: Option<String>,
    texture_formats: Vec<String>,
    compress_texture: Option<bool>,
    generate_mipmaps: Option<bool>,
    upscale_texture_when_processed_for_mipmapping: Option<bool>,
    texture_max_resolution: Option<[u32; 2]>,
    mip_filter: Option<String>,
    optimize_for_normal_mapping: Option<bool>,
    add_bounding_boxes: Option<bool>,
    output_asset_uri_prefix: Option<String>,
}

fn invalid(key: &'static str, value: &str) -> SerializeError {
    SerializeError::InvalidOption {
        key,
        value: value.to_string(),
    }
}

fn parse_embed_kind(s: &str) -> SerializeResult<EmbedMode> {
    match s {
        "none" => Ok(EmbedMode::NONE),
        "geometry" => Ok(EmbedMode::GEOMETRY),
        "material" => Ok(EmbedMode::MATERIAL),
        "texture" => Ok(EmbedMode::TEXTURE),
        "all" => Ok(EmbedMode::ALL),
        _ => Err(invalid("embed_mode", s)),
    }
}

fn parse_embed_mode(raw: &EmbedModeToml) -> SerializeResult<EmbedMode> {
    match raw {
        EmbedModeToml::Keyword(keyword) => parse_embed_kind(keyword),
        EmbedModeToml::Kinds(kinds) => kinds
            .iter()
            .try_fold(EmbedMode::NONE, |mode, kind| Ok(mode | parse_embed_kind(kind)?)),
    }
}

fn parse_image_format(s: &str) -> SerializeResult<ImageFormat> {
    match s {
        "source" => Ok(ImageFormat::Source),
        "png" => Ok(ImageFormat::Png),
        "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
        _ => Err(invalid("image_format", s)),
    }
}

fn parse_texture_format(s: &str) -> SerializeResult<TextureFormat> {
    match s {
        "rgb8" => Ok(TextureFormat::Rgb8),
        "rgba8" => Ok(TextureFormat::Rgba8),
        "rgb8-etc1" => Ok(TextureFormat::Rgb8Etc1),
        "rgba8-etc2" => Ok(TextureFormat::Rgba8Etc2),
        "rgba-dxt5" => Ok(TextureFormat::RgbaDxt5),
        "rgba-pvrtc4" => Ok(TextureFormat::RgbaPvrtc4),
        _ => Err(invalid("texture_formats", s)),
    }
}

fn parse_mip_filter(s: &str) -> SerializeResult<MipFilter> {
    match s {
        "none" => Ok(MipFilter::None),
        "nearest" => Ok(MipFilter::Nearest),
        "linear" => Ok(MipFilter::Linear),
        _ => Err(invalid("mip_filter", s)),
    }
}

/// Parse writer options from TOML content
pub fn parse_writer_options(content: &str) -> SerializeResult<WriterOptions> {
    let raw: WriterOptionsToml = toml::from_str(content)?;
    let mut options = WriterOptions::new();

    if let Some(embed_mode) = &raw.embed_mode {
        options.set_embed_mode(parse_embed_mode(embed_mode)?);
    }
    if let Some(image_format) = &raw.image_format {
        options.set_image_format(parse_image_format(image_format)?);
    }
    for format in &raw.texture_formats {
        options.register_texture_format(parse_texture_format(format)?);
    }
    if let Some(value) = raw.compress_texture {
        options.set_compress_texture(value);
    }
    if let Some(value) = raw.generate_mipmaps {
        options.set_generate_mipmaps(value);
    }
    if let Some(value) = raw.upscale_texture_when_processed_for_mipmapping {
        options.set_upscale_texture_when_processed_for_mipmapping(value);
    }
    if let Some([width, height]) = raw.texture_max_resolution {
        options.set_texture_max_resolution(UVec2::new(width, height));
    }
    if let Some(mip_filter) = &raw.mip_filter {
        options.set_mip_filter(parse_mip_filter(mip_filter)?);
    }
    if let Some(value) = raw.optimize_for_normal_mapping {
        options.set_optimize_for_normal_mapping(value);
    }
    if let Some(value) = raw.add_bounding_boxes {
        options.set_add_bounding_boxes(value);
    }
    if let Some(prefix) = raw.output_asset_uri_prefix {
        options.set_output_asset_uri_function(move |uri| format!("{prefix}{uri}"));
    }

    Ok(options)
}

/// Load writer options from a TOML file
pub fn load_writer_options(path: impl AsRef<Path>) -> SerializeResult<WriterOptions> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| SerializeError::io(path, e))?;
    parse_writer_options(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_options() {
        let toml = r#"
embed_mode = ["texture", "material"]
image_format = "png"
texture_formats = ["rgba8", "rgb8"]
generate_mipmaps = true
upscale_texture_when_processed_for_mipmapping = true
texture_max_resolution = [512, 256]
mip_filter = "nearest"
add_bounding_boxes = true
output_asset_uri_prefix = "assets/"
"#;

        let options = parse_writer_options(toml).unwrap();
        assert_eq!(options.embed_mode(), EmbedMode::TEXTURE | EmbedMode::MATERIAL);
        assert_eq!(options.image_format(), ImageFormat::Png);
        assert_eq!(
            options.texture_formats(),
            &[TextureFormat::Rgba8, TextureFormat::Rgb8]
        );
        assert!(options.generate_mipmaps());
        assert!(options.upscale_texture_when_processed_for_mipmapping());
        assert_eq!(options.texture_max_resolution(), UVec2::new(512, 256));
        assert_eq!(options.mip_filter(), MipFilter::Nearest);
        assert!(options.add_bounding_boxes());
        assert!(!options.compress_texture());
        assert_eq!(options.output_asset_uri("wall.material"), "assets/wall.material");
    }

    #[test]
    fn test_empty_keeps_defaults() {
        let options = parse_writer_options("").unwrap();
        assert_eq!(options.embed_mode(), EmbedMode::ALL);
        assert_eq!(
            options.texture_max_resolution(),
            WriterOptions::DEFAULT_TEXTURE_MAX_RESOLUTION
        );
        assert_eq!(options.output_asset_uri("a.png"), "a.png");
    }

    #[test]
    fn test_embed_mode_keyword() {
        let options = parse_writer_options(r#"embed_mode = "none""#).unwrap();
        assert_eq!(options.embed_mode(), EmbedMode::NONE);
    }

    #[test]
    fn test_invalid_keyword() {
        let result = parse_writer_options(r#"mip_filter = "cubic""#);
        assert!(matches!(
            result,
            Err(SerializeError::InvalidOption { key: "mip_filter", .. })
        ));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = parse_writer_options("embed = 3");
        assert!(matches!(result, Err(SerializeError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.toml");
        std::fs::write(&path, "compress_texture = true\n").unwrap();

        let options = load_writer_options(&path).unwrap();
        assert!(options.compress_texture());
    }
}
