//! Dependency reader - reverses a serialization pass
//!
//! Records are decoded in wire order and registered with the pass's
//! [`Dependency`] under their ids. A material may sample a texture whose
//! record has not been read yet; those references are kept on a patch list
//! and resolved once every record has been read.

use std::path::Path;

use void_asset::{Effect, Material, ResourceHandle, Texture};

use crate::codec::TypeCodec;
use crate::container;
use crate::dependency::Dependency;
use crate::error::{SerializeError, SerializeResult};
use crate::options::Options;
use crate::record::{DependencyRecord, RecordPayload, ResourceId, ResourceKind};
use crate::value::{MaterialPayload, TypedValue};
use crate::writer::GeometryPayload;

/// A record that could not be read
#[derive(Debug)]
pub struct ReadFailure {
    /// Wire kind of the record
    pub kind: i16,
    pub id: ResourceId,
    pub error: SerializeError,
}

/// A texture sampler whose texture was never read
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub material: ResourceId,
    pub property: String,
    pub texture: ResourceId,
}

/// Outcome of reading a record sequence
#[derive(Debug, Default)]
pub struct ReadReport {
    /// Records decoded and registered
    pub loaded: usize,
    /// References resolved from the patch list
    pub patched: usize,
    /// References still unresolved after the last record
    pub dropped: Vec<UnresolvedReference>,
    pub failures: Vec<ReadFailure>,
}

impl ReadReport {
    /// Check that every record was read and every reference resolved
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.dropped.is_empty()
    }
}

/// A decoded material waiting for texture references
struct PendingMaterial {
    id: ResourceId,
    material: Material,
    references: Vec<(String, ResourceId)>,
}

/// Decode an image into a texture, keeping its encoded bytes
pub fn decode_texture(bytes: Vec<u8>) -> Texture {
    match image::load_from_memory(&bytes) {
        Ok(image) => Texture::with_data(image.width(), image.height(), bytes),
        Err(e) => {
            log::warn!("Texture could not be inspected: {}", e);
            Texture::with_data(0, 0, bytes)
        }
    }
}

/// Reads dependency records back into resources
pub struct DependencyReader<'a> {
    options: &'a Options,
    codec: &'a TypeCodec,
}

impl<'a> DependencyReader<'a> {
    /// Create a new reader
    ///
    /// External payloads are resolved against `options.asset_root()`.
    pub fn new(options: &'a Options, codec: &'a TypeCodec) -> Self {
        Self { options, codec }
    }

    /// Read every record, registering the decoded resources with `dependency`
    pub fn read(&self, records: &[DependencyRecord], dependency: &mut Dependency) -> ReadReport {
        let mut report = ReadReport::default();
        let mut pending = Vec::new();

        for record in records {
            let id = record.resource_id();
            match self.read_record(record, dependency, &mut pending) {
                Ok(()) => report.loaded += 1,
                Err(error) => {
                    log::warn!("Failed to read record {} (kind {}): {}", id, record.kind, error);
                    report.failures.push(ReadFailure {
                        kind: record.kind,
                        id,
                        error,
                    });
                }
            }
        }

        for PendingMaterial {
            id,
            mut material,
            references,
        } in pending
        {
            for (property, texture_id) in references {
                match dependency.texture_reference(texture_id) {
                    Some(texture) => {
                        material.set(property, texture);
                        report.patched += 1;
                    }
                    None => {
                        log::warn!(
                            "Dropping property {} of material {}: texture {} was never read",
                            property,
                            id,
                            texture_id
                        );
                        report.dropped.push(UnresolvedReference {
                            material: id,
                            property,
                            texture: texture_id,
                        });
                    }
                }
            }
            dependency.register_reference(id, ResourceHandle::new(material));
        }

        log::info!(
            "Read {} of {} dependencies ({} patched, {} dropped)",
            report.loaded,
            records.len(),
            report.patched,
            report.dropped.len()
        );
        report
    }

    /// Unpack a container and read its records
    ///
    /// Returns the container's data along with the report.
    pub fn read_container(&self, bytes: &[u8], dependency: &mut Dependency) -> SerializeResult<(Vec<u8>, ReadReport)> {
        let container = container::unpack(bytes)?;
        let report = self.read(&container.records, dependency);
        Ok((container.data, report))
    }

    /// Read a file written by [`AssetWriter::write`](crate::writer::AssetWriter::write)
    pub fn read_file(&self, path: impl AsRef<Path>, dependency: &mut Dependency) -> SerializeResult<(Vec<u8>, ReadReport)> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SerializeError::io(path, e))?;
        self.read_container(&bytes, dependency)
    }

    /// Decode a material payload
    ///
    /// Texture samplers that `dependency` can already resolve are set on the
    /// material; the others are returned as `(property, texture id)` pairs.
    pub fn decode_material(
        &self,
        bytes: &[u8],
        dependency: &Dependency,
    ) -> SerializeResult<(Material, Vec<(String, ResourceId)>)> {
        let (complex, basic): MaterialPayload = bincode::deserialize(bytes)?;
        let mut material = Material::new();
        let mut unresolved = Vec::new();

        for property in complex.iter().chain(basic.iter()) {
            let typed = match self.codec.decode(property.value_type, &property.value) {
                Ok(typed) => typed,
                Err(e) => {
                    log::warn!("Property {} can't be read: {}", property.name, e);
                    continue;
                }
            };

            if let TypedValue::TextureId(raw) = typed {
                let texture_id = ResourceId(raw);
                match dependency.texture_reference(texture_id) {
                    Some(texture) => {
                        material.set(property.name.as_str(), texture);
                    }
                    None => unresolved.push((property.name.clone(), texture_id)),
                }
            } else if let Some(value) = typed.into_value() {
                material.set(property.name.as_str(), value);
            }
        }

        Ok((material, unresolved))
    }

    fn payload(&self, record: &DependencyRecord, framed: bool) -> SerializeResult<Vec<u8>> {
        match &record.payload {
            RecordPayload::Embedded(bytes) => Ok(bytes.clone()),
            RecordPayload::External(name) => {
                let path = self.options.asset_path(name);
                let bytes = std::fs::read(&path).map_err(|e| SerializeError::io(path, e))?;
                if framed {
                    Ok(container::unpack(&bytes)?.data)
                } else {
                    Ok(bytes)
                }
            }
        }
    }

    fn read_record(
        &self,
        record: &DependencyRecord,
        dependency: &mut Dependency,
        pending: &mut Vec<PendingMaterial>,
    ) -> SerializeResult<()> {
        let id = record.resource_id();

        match record.resource_kind()? {
            ResourceKind::Texture => {
                let texture = decode_texture(self.payload(record, false)?);
                dependency.register_reference(id, ResourceHandle::new(texture));
            }
            ResourceKind::Effect => {
                let source = String::from_utf8(self.payload(record, false)?)?;
                dependency.register_reference(id, ResourceHandle::new(Effect::new(source)));
            }
            ResourceKind::Geometry => {
                let geometry = GeometryPayload::decode(&self.payload(record, true)?)?.into_geometry();
                dependency.register_reference(id, ResourceHandle::new(geometry));
            }
            ResourceKind::Material => {
                let (material, references) = self.decode_material(&self.payload(record, true)?, dependency)?;
                if references.is_empty() {
                    dependency.register_reference(id, ResourceHandle::new(material));
                } else {
                    pending.push(PendingMaterial {
                        id,
                        material,
                        references,
                    });
                }
            }
            ResourceKind::SubScene => return Err(SerializeError::UnknownKind(record.kind)),
        }

        Ok(())
    }
}
