//! Geometry writer

use serde::{Deserialize, Serialize};

use void_asset::{AssetLibrary, Bounds, Geometry, ResourceHandle, VertexAttribute};

use crate::container;
use crate::dependency::Dependency;
use crate::error::SerializeResult;
use crate::options::{Options, WriterOptions};
use crate::writer::AssetWriter;

/// Magic number of standalone geometry files
pub const GEOMETRY_MAGIC_NUMBER: u32 = container::magic_number(b'G');

/// Borrowed form written by [`GeometryWriter`]
#[derive(Serialize)]
struct GeometryPayloadRef<'a> {
    attributes: &'a [VertexAttribute],
    indices: &'a [u32],
    bounds: Option<Bounds>,
}

/// Decoded geometry payload
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GeometryPayload {
    pub attributes: Vec<VertexAttribute>,
    pub indices: Vec<u32>,
    pub bounds: Option<Bounds>,
}

impl GeometryPayload {
    /// Decode a payload written by [`GeometryWriter`]
    pub fn decode(bytes: &[u8]) -> SerializeResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Build the geometry, dropping the bounds
    pub fn into_geometry(self) -> Geometry {
        Geometry {
            attributes: self.attributes,
            indices: self.indices,
        }
    }
}

/// Writes vertex attributes and indices
pub struct GeometryWriter {
    geometry: ResourceHandle<Geometry>,
}

impl GeometryWriter {
    /// Create a new geometry writer
    pub fn new(geometry: ResourceHandle<Geometry>) -> Self {
        Self { geometry }
    }
}

impl AssetWriter for GeometryWriter {
    type Resource = Geometry;

    fn resource(&self) -> &ResourceHandle<Geometry> {
        &self.geometry
    }

    fn magic_number(&self) -> u32 {
        GEOMETRY_MAGIC_NUMBER
    }

    fn embed(
        &self,
        _library: &AssetLibrary,
        _options: &Options,
        _dependency: &mut Dependency,
        writer_options: &WriterOptions,
    ) -> SerializeResult<Vec<u8>> {
        let bounds = if writer_options.add_bounding_boxes() {
            self.geometry.bounds()
        } else {
            None
        };

        let payload = GeometryPayloadRef {
            attributes: &self.geometry.attributes,
            indices: &self.geometry.indices,
            bounds,
        };
        Ok(bincode::serialize(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_asset::POSITION_ATTRIBUTE;

    fn triangle() -> ResourceHandle<Geometry> {
        ResourceHandle::new(
            Geometry::new()
                .with_attribute(VertexAttribute::new(
                    POSITION_ATTRIBUTE,
                    3,
                    vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 0.0],
                ))
                .with_indices(vec![0, 1, 2]),
        )
    }

    fn embed(writer_options: &WriterOptions) -> GeometryPayload {
        let bytes = GeometryWriter::new(triangle())
            .embed(
                &AssetLibrary::new(),
                &Options::new(),
                &mut Dependency::new(),
                writer_options,
            )
            .unwrap();
        GeometryPayload::decode(&bytes).unwrap()
    }

    #[test]
    fn test_payload_without_bounds() {
        let payload = embed(&WriterOptions::new());
        assert!(payload.bounds.is_none());
        assert_eq!(payload.indices, vec![0, 1, 2]);
        assert_eq!(payload.into_geometry(), *triangle());
    }

    #[test]
    fn test_payload_with_bounds() {
        let mut writer_options = WriterOptions::new();
        writer_options.set_add_bounding_boxes(true);

        let bounds = embed(&writer_options).bounds.unwrap();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 2.0, 0.0]);
    }
}
