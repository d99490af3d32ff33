//! Resource writers
//!
//! A writer turns one resource into bytes ([`AssetWriter::embed`]),
//! registering whatever the resource references with the pass's
//! [`Dependency`]. Depending on the embed mode the bytes end up inline in a
//! dependency record or in an external file the record names.

mod effect;
mod geometry;
mod material;
mod texture;

pub use effect::EffectWriter;
pub use geometry::{GeometryPayload, GeometryWriter};
pub use material::MaterialWriter;
pub use texture::{ImageTextureProcessor, TextureProcessor, TextureWriter};

use std::path::Path;

use void_asset::{AssetLibrary, ResourceHandle};

use crate::codec::TypeCodec;
use crate::container;
use crate::dependency::{Dependable, Dependency};
use crate::error::{SerializeError, SerializeResult};
use crate::options::{Options, WriterOptions};
use crate::record::{DependencyRecord, RecordPayload, ResourceId, ResourceKind};

/// File name used for a resource the library has no name for
pub fn default_filename(kind: ResourceKind, id: ResourceId) -> String {
    format!("{}{}.{}", kind.name(), id.raw(), kind.name())
}

/// Write an external asset under the output root and return its recorded URI
pub fn write_external(
    name: &str,
    bytes: &[u8],
    options: &Options,
    writer_options: &WriterOptions,
) -> SerializeResult<String> {
    let path = options.output_path(name)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SerializeError::io(parent, e))?;
    }
    std::fs::write(&path, bytes).map_err(|e| SerializeError::io(&path, e))?;

    log::debug!("Wrote external asset {}", path.display());
    Ok(writer_options.output_asset_uri(name))
}

/// Serializes one resource kind
pub trait AssetWriter {
    type Resource: Dependable;

    /// The resource being written
    fn resource(&self) -> &ResourceHandle<Self::Resource>;

    /// Magic number of files this writer produces
    fn magic_number(&self) -> u32;

    /// Encode the resource, registering its dependencies
    fn embed(
        &self,
        library: &AssetLibrary,
        options: &Options,
        dependency: &mut Dependency,
        writer_options: &WriterOptions,
    ) -> SerializeResult<Vec<u8>>;

    /// Content of the external file for embedded bytes `data`
    ///
    /// A container with an empty dependency table: ids inside `data` refer
    /// to the pass that wrote the file.
    fn external_data(&self, data: Vec<u8>) -> SerializeResult<Vec<u8>> {
        container::pack(self.magic_number(), &[], &data)
    }

    /// Name of the external file
    fn filename(&self, library: &AssetLibrary, id: ResourceId, _writer_options: &WriterOptions) -> String {
        library
            .name(self.resource())
            .map(str::to_string)
            .unwrap_or_else(|| default_filename(<Self::Resource as Dependable>::KIND, id))
    }

    /// Encode the resource into a record, inline or as an external file
    fn dependency_record(
        &self,
        id: ResourceId,
        library: &AssetLibrary,
        options: &Options,
        dependency: &mut Dependency,
        writer_options: &WriterOptions,
        embed: bool,
    ) -> SerializeResult<DependencyRecord> {
        let data = self.embed(library, options, dependency, writer_options)?;

        let payload = if embed {
            RecordPayload::Embedded(data)
        } else {
            let name = self.filename(library, id, writer_options);
            let bytes = self.external_data(data)?;
            RecordPayload::External(write_external(&name, &bytes, options, writer_options)?)
        };

        DependencyRecord::new(<Self::Resource as Dependable>::KIND, id, payload)
    }

    /// Write the resource and everything it depends on to `path`
    ///
    /// `codec` encodes the materials the pass writes. A material writer
    /// encodes its own material with the codec it was built with.
    fn write(
        &self,
        path: impl AsRef<Path>,
        library: &AssetLibrary,
        options: &Options,
        writer_options: &WriterOptions,
        codec: &TypeCodec,
    ) -> SerializeResult<()>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let mut dependency = Dependency::new();

        let data = self.embed(library, options, &mut dependency, writer_options)?;
        let serialized = dependency.serialize(library, options, writer_options, codec);
        for failure in &serialized.failures {
            log::warn!(
                "{} {} left out of {}: {}",
                failure.kind.name(),
                failure.id,
                path.display(),
                failure.error
            );
        }

        let bytes = container::pack(self.magic_number(), &serialized.records, &data)?;
        std::fs::write(path, bytes).map_err(|e| SerializeError::io(path, e))?;

        log::info!(
            "Wrote {} with {} dependencies",
            path.display(),
            serialized.records.len()
        );
        Ok(())
    }
}
