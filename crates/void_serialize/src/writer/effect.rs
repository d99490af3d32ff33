//! Effect writer
//!
//! Effects are written as their source text. Include files named in the
//! source are registered with the pass and written as records of their own.

use void_asset::{AssetLibrary, Effect, ResourceHandle};

use crate::container;
use crate::dependency::Dependency;
use crate::error::{SerializeError, SerializeResult};
use crate::include::parse_includes;
use crate::options::{Options, WriterOptions};
use crate::record::{DependencyRecord, RecordPayload, ResourceId, ResourceKind};
use crate::writer::{write_external, AssetWriter};

/// Magic number of standalone effect files
pub const EFFECT_MAGIC_NUMBER: u32 = container::magic_number(b'E');

/// Writes effect source and registers its includes
pub struct EffectWriter {
    effect: ResourceHandle<Effect>,
}

impl EffectWriter {
    /// Create a new effect writer
    pub fn new(effect: ResourceHandle<Effect>) -> Self {
        Self { effect }
    }

    /// Effect source, inline or from the file the library names
    pub fn source(&self, library: &AssetLibrary, options: &Options) -> SerializeResult<String> {
        if !self.effect.source.is_empty() {
            return Ok(self.effect.source.clone());
        }

        let name = library
            .effect_name(&self.effect)
            .ok_or(SerializeError::MissingSource(ResourceKind::Effect))?;
        let path = options.asset_path(name);
        let bytes = std::fs::read(&path).map_err(|e| SerializeError::io(path, e))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Register every include named in `source`
    pub fn register_includes(source: &str, options: &Options, dependency: &mut Dependency) -> Vec<ResourceId> {
        parse_includes(source, options.include_marker())
            .iter()
            .map(|path| {
                log::debug!("Found effect include {}", path);
                dependency.register_include(path)
            })
            .collect()
    }

    /// Write one include file as a record
    ///
    /// Includes of the include are registered and picked up by the pass.
    pub fn include_record(
        path: &str,
        id: ResourceId,
        options: &Options,
        dependency: &mut Dependency,
        writer_options: &WriterOptions,
        embed: bool,
    ) -> SerializeResult<DependencyRecord> {
        let file = options.include_path(path);
        let bytes = std::fs::read(&file).map_err(|e| SerializeError::io(file, e))?;
        let source = String::from_utf8(bytes)?;
        Self::register_includes(&source, options, dependency);

        let payload = if embed {
            RecordPayload::Embedded(source.into_bytes())
        } else {
            RecordPayload::External(write_external(path, source.as_bytes(), options, writer_options)?)
        };
        DependencyRecord::new(ResourceKind::Effect, id, payload)
    }
}

impl AssetWriter for EffectWriter {
    type Resource = Effect;

    fn resource(&self) -> &ResourceHandle<Effect> {
        &self.effect
    }

    fn magic_number(&self) -> u32 {
        EFFECT_MAGIC_NUMBER
    }

    fn embed(
        &self,
        library: &AssetLibrary,
        options: &Options,
        dependency: &mut Dependency,
        _writer_options: &WriterOptions,
    ) -> SerializeResult<Vec<u8>> {
        let source = self.source(library, options)?;
        Self::register_includes(&source, options, dependency);
        Ok(source.into_bytes())
    }

    fn external_data(&self, data: Vec<u8>) -> SerializeResult<Vec<u8>> {
        Ok(data)
    }
}
