//! Write-then-read tests
//!
//! Scenes written by a pass (or a standalone writer) are read back with a
//! fresh `Dependency` and compared against the originals.

use glam::{Mat4, Vec3};
use void_asset::prelude::*;
use void_asset::POSITION_ATTRIBUTE;
use void_serialize::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_external_scene_reads_back() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    let out = dir.path().join("out");
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(assets.join("brick.png"), b"brick texels").unwrap();

    let mut library = AssetLibrary::new();
    let brick = library.add("brick.png", Texture::new(8, 8));
    let quad = library.add(
        "quad.geometry",
        Geometry::new()
            .with_attribute(VertexAttribute::new(
                POSITION_ATTRIBUTE,
                3,
                vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            ))
            .with_indices(vec![0, 1, 2]),
    );
    let wall = library.add(
        "wall.material",
        Material::new()
            .with("diffuseMap", brick)
            .with("blending", BlendingMode::Alpha)
            .with("triangleCulling", TriangleCulling::Front)
            .with("transform", Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)))
            .with("priority", -3i16)
            .with("technique", "default")
            .with("unsupported", 0.25f64),
    );

    let mut writer_options = WriterOptions::new();
    writer_options.set_embed_mode(EmbedMode::NONE);
    let write_options = Options::new().with_asset_root(&assets).with_output_root(&out);

    let mut writing = Dependency::new();
    let geometry_id = writing.register_dependency(&quad);
    let material_id = writing.register_dependency(&wall);
    let codec = TypeCodec::new();
    let serialized = writing.serialize(&library, &write_options, &writer_options, &codec);
    assert!(serialized.is_complete());
    assert!(serialized.records.iter().all(|r| !r.payload.is_embedded()));

    // external files are looked up where the writer put them
    let read_options = Options::new().with_asset_root(&out);
    let mut reading = Dependency::new();
    let report = DependencyReader::new(&read_options, &codec).read(&serialized.records, &mut reading);
    assert!(report.is_complete());
    assert_eq!(report.loaded, 3);

    let geometry = reading.geometry_reference(geometry_id).unwrap();
    assert_eq!(*geometry, *quad);

    let material = reading.material_reference(material_id).unwrap();
    assert_eq!(material.get("blending"), Some(&Value::Blending(BlendingMode::Alpha)));
    assert_eq!(
        material.get("triangleCulling"),
        Some(&Value::Culling(TriangleCulling::Front))
    );
    assert_eq!(material.get("transform"), wall.get("transform"));
    assert_eq!(material.get("priority"), Some(&Value::Short(-3)));
    assert_eq!(material.get("technique"), Some(&Value::String("default".into())));
    assert!(!material.has_property("unsupported"));

    let texture = material.get("diffuseMap").and_then(Value::as_texture).unwrap();
    assert_eq!(texture.data, b"brick texels");
}

#[test]
fn test_standalone_material_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wall.scene");

    let brick = ResourceHandle::new(Texture::with_data(2, 2, b"inline texels".to_vec()));
    let wall = ResourceHandle::new(
        Material::new()
            .with("diffuseMap", brick)
            .with("shininess", 32.0f32),
    );

    let options = Options::new().with_asset_root(dir.path()).with_output_root(dir.path());
    let codec = TypeCodec::new();
    MaterialWriter::new(wall, &codec)
        .write(&path, &AssetLibrary::new(), &options, &WriterOptions::new(), &codec)
        .unwrap();

    let reader = DependencyReader::new(&options, &codec);
    let mut dependency = Dependency::new();
    let (data, report) = reader.read_file(&path, &mut dependency).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.loaded, 1);

    let (material, unresolved) = reader.decode_material(&data, &dependency).unwrap();
    assert!(unresolved.is_empty());
    assert_eq!(material.get("shininess"), Some(&Value::Float(32.0)));

    let texture = material.get("diffuseMap").and_then(Value::as_texture).unwrap();
    assert_eq!(texture.data, b"inline texels");
}

#[test]
fn test_standalone_effect_with_includes() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("effect")).unwrap();
    std::fs::write(dir.path().join("effect/skin.glsl"), "vec4 skin();").unwrap();
    std::fs::write(dir.path().join("phong.effect"), r#"{ "vertex": "skin.glsl" }"#).unwrap();

    let mut library = AssetLibrary::new();
    let phong = library.add("phong.effect", Effect::default());
    let options = Options::new().with_asset_root(dir.path()).with_output_root(dir.path());
    let path = dir.path().join("phong.scene");

    let codec = TypeCodec::new();
    EffectWriter::new(phong)
        .write(&path, &library, &options, &WriterOptions::new(), &codec)
        .unwrap();

    let mut dependency = Dependency::new();
    let (data, report) = DependencyReader::new(&options, &codec)
        .read_file(&path, &mut dependency)
        .unwrap();

    assert_eq!(String::from_utf8(data).unwrap(), r#"{ "vertex": "skin.glsl" }"#);
    assert!(report.is_complete());
    let include = dependency.effect_reference(ResourceId::FIRST).unwrap();
    assert_eq!(include.source, "vec4 skin();");
}

#[test]
fn test_standalone_write_uses_given_codec() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wall.scene");
    let wall = ResourceHandle::new(
        Material::new()
            .with("shininess", 32.0f32)
            .with("technique", "default"),
    );

    let mut codec = TypeCodec::new();
    codec.unregister(ValueType::Float);
    let options = Options::new().with_asset_root(dir.path()).with_output_root(dir.path());
    MaterialWriter::new(wall, &codec)
        .write(&path, &AssetLibrary::new(), &options, &WriterOptions::new(), &codec)
        .unwrap();

    let standard = TypeCodec::new();
    let reader = DependencyReader::new(&options, &standard);
    let mut dependency = Dependency::new();
    let (data, _) = reader.read_file(&path, &mut dependency).unwrap();
    let (material, _) = reader.decode_material(&data, &dependency).unwrap();

    assert!(!material.has_property("shininess"));
    assert_eq!(material.get("technique"), Some(&Value::String("default".into())));
}
