//! Material writer
//!
//! Every property the codec can encode becomes a [`SerializedProperty`].
//! Properties that carry a dependency id (texture samplers) go to the
//! complex list, the rest to the basic list. Anything else is skipped.

use void_asset::{AssetLibrary, Material, ResourceHandle};

use crate::codec::TypeCodec;
use crate::container;
use crate::dependency::Dependency;
use crate::error::SerializeResult;
use crate::options::{Options, WriterOptions};
use crate::value::{MaterialPayload, SerializedProperty, TypedValue};
use crate::writer::AssetWriter;

/// Magic number of standalone material files
pub const MATERIAL_MAGIC_NUMBER: u32 = container::magic_number(b'M');

/// Writes material properties through a [`TypeCodec`]
pub struct MaterialWriter<'a> {
    material: ResourceHandle<Material>,
    codec: &'a TypeCodec,
}

impl<'a> MaterialWriter<'a> {
    /// Create a new material writer
    pub fn new(material: ResourceHandle<Material>, codec: &'a TypeCodec) -> Self {
        Self { material, codec }
    }

    /// Encode the properties, registering sampled textures first
    pub fn properties(&self, dependency: &mut Dependency) -> MaterialPayload {
        let mut complex: Vec<SerializedProperty> = Vec::new();
        let mut basic: Vec<SerializedProperty> = Vec::new();

        for (name, value) in self.material.values() {
            let typed = TypedValue::from_value(value, |texture| dependency.register_dependency(texture).raw());
            let Some(typed) = typed else {
                log::debug!("Property {} ({}) can't be serialized", name, value.type_name());
                continue;
            };

            let value_type = typed.value_type();
            let encoded = match self.codec.encode(&typed) {
                Ok(encoded) => encoded,
                Err(e) => {
                    log::debug!("Property {} can't be serialized: {}", name, e);
                    continue;
                }
            };

            let target = if value_type.is_complex() {
                &mut complex
            } else {
                &mut basic
            };
            if target.iter().any(|property| property.name == name) {
                continue;
            }
            target.push(SerializedProperty {
                name: name.to_string(),
                value_type,
                value: encoded,
            });
        }

        (complex, basic)
    }
}

impl AssetWriter for MaterialWriter<'_> {
    type Resource = Material;

    fn resource(&self) -> &ResourceHandle<Material> {
        &self.material
    }

    fn magic_number(&self) -> u32 {
        MATERIAL_MAGIC_NUMBER
    }

    fn embed(
        &self,
        _library: &AssetLibrary,
        _options: &Options,
        dependency: &mut Dependency,
        _writer_options: &WriterOptions,
    ) -> SerializeResult<Vec<u8>> {
        let payload = self.properties(dependency);
        Ok(bincode::serialize(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResourceId;
    use crate::value::{SerializedValue, ValueType};
    use glam::Vec4;
    use void_asset::{BlendingMode, Texture, Value};

    #[test]
    fn test_properties_split() {
        let texture = ResourceHandle::new(Texture::new(2, 2));
        let material = ResourceHandle::new(
            Material::new()
                .with("diffuseColor", Vec4::new(1.0, 0.5, 0.25, 1.0))
                .with("diffuseMap", texture.clone())
                .with("blending", BlendingMode::Additive)
                .with("shininess", 12.0f32),
        );

        let codec = TypeCodec::new();
        let mut dependency = Dependency::new();
        let (complex, basic) = MaterialWriter::new(material, &codec).properties(&mut dependency);

        assert_eq!(dependency.dependency_id(&texture), Some(ResourceId::FIRST));
        assert_eq!(complex.len(), 1);
        assert_eq!(complex[0].name, "diffuseMap");
        assert_eq!(complex[0].value_type, ValueType::TextureId);
        assert_eq!(complex[0].value, SerializedValue::from_flags(1));

        let names: Vec<_> = basic.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["blending", "diffuseColor", "shininess"]);
        assert_eq!(basic[0].value.payload, "+");
        assert_eq!(basic[1].value, SerializedValue::new(0b111, "1 0.5 0.25"));
    }

    #[test]
    fn test_unencodable_properties_are_skipped() {
        let material = ResourceHandle::new(
            Material::new()
                .with("weights", Value::FloatArray(vec![0.5, 0.5]))
                .with("precise", Value::Double(0.1))
                .with("zFunc", "less"),
        );

        let mut codec = TypeCodec::new();
        codec.unregister(ValueType::String);
        let (complex, basic) = MaterialWriter::new(material, &codec).properties(&mut Dependency::new());

        assert!(complex.is_empty());
        assert!(basic.is_empty());
    }

    #[test]
    fn test_embed_decodes_as_payload() {
        let material = ResourceHandle::new(Material::new().with("priority", 3u32));
        let codec = TypeCodec::new();

        let bytes = MaterialWriter::new(material, &codec)
            .embed(
                &AssetLibrary::new(),
                &Options::new(),
                &mut Dependency::new(),
                &WriterOptions::new(),
            )
            .unwrap();
        let (complex, basic): MaterialPayload = bincode::deserialize(&bytes).unwrap();

        assert!(complex.is_empty());
        assert_eq!(basic[0].value, SerializedValue::from_flags(3));
    }
}
