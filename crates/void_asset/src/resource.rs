//! Shareable scene resources
//!
//! These are the resource kinds a scene references by identity: geometries,
//! materials, textures, effects and sub-scene nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::handle::ResourceHandle;
use crate::value::Value;

/// Name of the vertex attribute holding positions
pub const POSITION_ATTRIBUTE: &str = "position";

/// A single named vertex attribute stream
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// Attribute name (e.g. "position", "normal", "uv")
    pub name: String,
    /// Float components per vertex
    pub components: u8,
    /// Tightly packed component data
    pub data: Vec<f32>,
}

impl VertexAttribute {
    /// Create a new attribute stream
    pub fn new(name: impl Into<String>, components: u8, data: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            components,
            data,
        }
    }

    /// Number of vertices in this stream
    pub fn vertex_count(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.data.len() / self.components as usize
        }
    }
}

/// Axis-aligned bounds of a geometry
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Indexed triangle geometry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Vertex attribute streams
    pub attributes: Vec<VertexAttribute>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Create an empty geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute stream
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set the index buffer
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Compute the bounds of the position stream
    ///
    /// Returns `None` without a 3-component position stream or vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        let positions = self.attribute(POSITION_ATTRIBUTE)?;
        if positions.components != 3 || positions.data.len() < 3 {
            return None;
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for vertex in positions.data.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex[axis]);
                max[axis] = max[axis].max(vertex[axis]);
            }
        }

        Some(Bounds { min, max })
    }
}

/// A material: an ordered bag of named properties
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    values: BTreeMap<String, Value>,
}

impl Material {
    /// Create an empty material
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value with the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Builder-style `set`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Get a property
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove a property
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Check whether a property exists
    pub fn has_property(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate properties in name order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Textures referenced by this material
    pub fn textures(&self) -> impl Iterator<Item = &ResourceHandle<Texture>> {
        self.values.values().filter_map(Value::as_texture)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A texture
///
/// `data` holds the encoded image file (PNG, JPEG, ...) when the texture
/// was reconstructed from a scene; file-backed textures may leave it empty
/// and let the asset library name their source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Texture {
    /// Create a texture description without pixel data
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: Vec::new(),
        }
    }

    /// Create a texture carrying its encoded bytes
    pub fn with_data(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

/// A rendering effect (or one of its shader includes)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Effect {
    /// Effect source text
    pub source: String,
}

impl Effect {
    /// Create an effect from its source
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// A scene node referenced as a sub-scene
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub name: String,
    pub children: Vec<ResourceHandle<Node>>,
}

impl Node {
    /// Create a leaf node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Add a child node
    pub fn with_child(mut self, child: ResourceHandle<Node>) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_bounds() {
        let geometry = Geometry::new().with_attribute(VertexAttribute::new(
            POSITION_ATTRIBUTE,
            3,
            vec![0.0, 1.0, -2.0, 4.0, -1.0, 2.0],
        ));

        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds.min, [0.0, -1.0, -2.0]);
        assert_eq!(bounds.max, [4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_geometry_without_positions_has_no_bounds() {
        let geometry = Geometry::new()
            .with_attribute(VertexAttribute::new("uv", 2, vec![0.0, 1.0]));
        assert!(geometry.bounds().is_none());
    }

    #[test]
    fn test_material_properties() {
        let texture = ResourceHandle::new(Texture::new(2, 2));
        let mut material = Material::new()
            .with("diffuseColor", glam::Vec4::new(1.0, 0.0, 0.0, 1.0))
            .with("diffuseMap", texture.clone());

        assert_eq!(material.len(), 2);
        assert!(material.has_property("diffuseMap"));
        assert_eq!(material.textures().count(), 1);

        material.set("diffuseColor", 0.5f32);
        assert_eq!(material.get("diffuseColor"), Some(&Value::Float(0.5)));

        let names: Vec<_> = material.values().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["diffuseColor", "diffuseMap"]);
    }
}
