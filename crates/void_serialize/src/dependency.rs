//! Dependency registry
//!
//! One `Dependency` lives for exactly one serialization (or
//! deserialization) pass. It hands out ids from a single counter shared by
//! every resource kind, so records can appear in any order and still be
//! matched unambiguously, and it keeps both directions of the mapping:
//!
//! - forward tables: resource identity -> id, filled while writing
//! - reverse tables: id -> resource, filled while reading
//!
//! [`Dependency::serialize`] turns the forward tables into the ordered
//! record sequence of a scene.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use void_asset::{AssetLibrary, Effect, Geometry, LibraryAsset, Material, Node, ResourceHandle, Texture};

use crate::codec::TypeCodec;
use crate::error::SerializeError;
use crate::options::{Options, WriterOptions};
use crate::record::{DependencyRecord, ResourceId, ResourceKind};
use crate::writer::{AssetWriter, EffectWriter, GeometryWriter, MaterialWriter, TextureWriter};

/// Forward and reverse tables of one resource kind
pub struct DependencyTable<T> {
    forward: HashMap<ResourceHandle<T>, ResourceId>,
    reverse: HashMap<ResourceId, ResourceHandle<T>>,
}

impl<T> DependencyTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Number of registered dependencies
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Check if no dependency is registered
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl<T> Default for DependencyTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource kinds the registry tracks
pub trait Dependable: LibraryAsset {
    /// Kind written in dependency records
    const KIND: ResourceKind;

    fn table(dependency: &Dependency) -> &DependencyTable<Self>;
    fn table_mut(dependency: &mut Dependency) -> &mut DependencyTable<Self>;
}

macro_rules! dependable {
    ($($ty:ty => $kind:ident, $field:ident),* $(,)?) => {
        $(
            impl Dependable for $ty {
                const KIND: ResourceKind = ResourceKind::$kind;

                fn table(dependency: &Dependency) -> &DependencyTable<Self> {
                    &dependency.$field
                }

                fn table_mut(dependency: &mut Dependency) -> &mut DependencyTable<Self> {
                    &mut dependency.$field
                }
            }
        )*
    };
}

dependable! {
    Geometry => Geometry, geometries,
    Material => Material, materials,
    Texture => Texture, textures,
    Effect => Effect, effects,
    Node => SubScene, subscenes,
}

/// A resource that could not be written
#[derive(Debug)]
pub struct WriteFailure {
    pub kind: ResourceKind,
    pub id: ResourceId,
    pub error: SerializeError,
}

/// Output of a dependency pass
#[derive(Debug, Default)]
pub struct SerializedDependencies {
    /// Records in wire order
    pub records: Vec<DependencyRecord>,
    /// Resources left out of `records`
    pub failures: Vec<WriteFailure>,
}

impl SerializedDependencies {
    /// Check if every registered resource was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-pass dependency registry
pub struct Dependency {
    current_id: ResourceId,
    geometries: DependencyTable<Geometry>,
    materials: DependencyTable<Material>,
    textures: DependencyTable<Texture>,
    effects: DependencyTable<Effect>,
    subscenes: DependencyTable<Node>,
    includes: BTreeMap<String, ResourceId>,
}

impl Dependency {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            current_id: ResourceId::FIRST,
            geometries: DependencyTable::new(),
            materials: DependencyTable::new(),
            textures: DependencyTable::new(),
            effects: DependencyTable::new(),
            subscenes: DependencyTable::new(),
            includes: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self) -> ResourceId {
        let id = self.current_id;
        self.current_id = id.next();
        id
    }

    /// Id the next registration will receive
    pub fn next_id(&self) -> ResourceId {
        self.current_id
    }

    /// Get the id of a resource, registering it on first sight
    pub fn register_dependency<T: Dependable>(&mut self, resource: &ResourceHandle<T>) -> ResourceId {
        if let Some(id) = T::table(self).forward.get(resource) {
            return *id;
        }

        let id = self.allocate_id();
        T::table_mut(self).forward.insert(resource.clone(), id);
        id
    }

    /// Check whether a resource has been registered
    pub fn has_dependency<T: Dependable>(&self, resource: &ResourceHandle<T>) -> bool {
        T::table(self).forward.contains_key(resource)
    }

    /// Get the id of a registered resource
    pub fn dependency_id<T: Dependable>(&self, resource: &ResourceHandle<T>) -> Option<ResourceId> {
        T::table(self).forward.get(resource).copied()
    }

    /// Record the resource a read id stands for
    pub fn register_reference<T: Dependable>(&mut self, id: ResourceId, resource: ResourceHandle<T>) {
        T::table_mut(self).reverse.insert(id, resource);
    }

    /// Resource registered under a read id
    pub fn reference<T: Dependable>(&self, id: ResourceId) -> Option<ResourceHandle<T>> {
        T::table(self).reverse.get(&id).cloned()
    }

    pub fn geometry_reference(&self, id: ResourceId) -> Option<ResourceHandle<Geometry>> {
        self.reference(id)
    }

    pub fn material_reference(&self, id: ResourceId) -> Option<ResourceHandle<Material>> {
        self.reference(id)
    }

    pub fn texture_reference(&self, id: ResourceId) -> Option<ResourceHandle<Texture>> {
        self.reference(id)
    }

    pub fn effect_reference(&self, id: ResourceId) -> Option<ResourceHandle<Effect>> {
        self.reference(id)
    }

    pub fn subscene_reference(&self, id: ResourceId) -> Option<ResourceHandle<Node>> {
        self.reference(id)
    }

    /// Registered resources of one kind, in registration order
    pub fn dependencies<T: Dependable>(&self) -> Vec<(ResourceId, ResourceHandle<T>)> {
        let mut dependencies: Vec<_> = T::table(self)
            .forward
            .iter()
            .map(|(resource, id)| (*id, resource.clone()))
            .collect();
        dependencies.sort_by_key(|(id, _)| *id);
        dependencies
    }

    /// Get the id of an effect include, registering it on first sight
    pub fn register_include(&mut self, path: &str) -> ResourceId {
        if let Some(id) = self.includes.get(path) {
            return *id;
        }

        let id = self.allocate_id();
        self.includes.insert(path.to_string(), id);
        id
    }

    /// Registered include paths, in registration order
    pub fn include_dependencies(&self) -> Vec<(ResourceId, String)> {
        let mut includes: Vec<_> = self
            .includes
            .iter()
            .map(|(path, id)| (*id, path.clone()))
            .collect();
        includes.sort_by_key(|(id, _)| *id);
        includes
    }

    /// Write every registered dependency and return the records in wire order
    ///
    /// Geometries and materials are appended; textures and effects are
    /// inserted at the front, so they come before the materials that sample
    /// them. Each effect's includes are inserted before the effect itself,
    /// leaving the effect record ahead of its includes. A resource that fails
    /// is reported in `failures` and leaves the other records untouched.
    pub fn serialize(
        &mut self,
        library: &AssetLibrary,
        options: &Options,
        writer_options: &WriterOptions,
        codec: &TypeCodec,
    ) -> SerializedDependencies {
        let embed_mode = options.effective_embed_mode(writer_options);
        let mut pass = Pass::default();

        for (id, geometry) in self.dependencies::<Geometry>() {
            let writer = GeometryWriter::new(geometry);
            let embed = embed_mode.embeds(ResourceKind::Geometry);
            let result = writer.dependency_record(id, library, options, self, writer_options, embed);
            pass.push_back(ResourceKind::Geometry, id, result);
        }

        // materials may register textures, so they go before the texture pass
        for (id, material) in self.dependencies::<Material>() {
            let writer = MaterialWriter::new(material, codec);
            let embed = embed_mode.embeds(ResourceKind::Material);
            let result = writer.dependency_record(id, library, options, self, writer_options, embed);
            pass.push_back(ResourceKind::Material, id, result);
        }

        for (id, texture) in self.dependencies::<Texture>() {
            let writer = TextureWriter::new(texture);
            let embed = embed_mode.embeds(ResourceKind::Texture);
            let result = writer.dependency_record(id, library, options, self, writer_options, embed);
            pass.push_front(ResourceKind::Texture, id, result);
        }

        let embed_effects = embed_mode.embeds(ResourceKind::Effect);
        for (id, effect) in self.dependencies::<Effect>() {
            let writer = EffectWriter::new(effect);
            let result = writer.dependency_record(id, library, options, self, writer_options, embed_effects);
            self.serialize_includes(&mut pass, options, writer_options, embed_effects);
            pass.push_front(ResourceKind::Effect, id, result);
        }
        // includes registered before the pass, by a root effect
        self.serialize_includes(&mut pass, options, writer_options, embed_effects);

        let serialized = pass.finish();
        log::info!(
            "Serialized {} dependencies ({} failed)",
            serialized.records.len(),
            serialized.failures.len()
        );
        serialized
    }

    fn serialize_includes(
        &mut self,
        pass: &mut Pass,
        options: &Options,
        writer_options: &WriterOptions,
        embed: bool,
    ) {
        loop {
            let pending: Vec<_> = self
                .include_dependencies()
                .into_iter()
                .filter(|(id, _)| !pass.written_includes.contains(id))
                .collect();
            if pending.is_empty() {
                break;
            }

            for (id, path) in pending {
                pass.written_includes.insert(id);
                let result = EffectWriter::include_record(&path, id, options, self, writer_options, embed);
                pass.push_front(ResourceKind::Effect, id, result);
            }
        }
    }
}

impl Default for Dependency {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dependency")
            .field("next_id", &self.current_id)
            .field("geometries", &self.geometries.len())
            .field("materials", &self.materials.len())
            .field("textures", &self.textures.len())
            .field("effects", &self.effects.len())
            .field("subscenes", &self.subscenes.len())
            .field("includes", &self.includes.len())
            .finish()
    }
}

#[derive(Default)]
struct Pass {
    records: VecDeque<DependencyRecord>,
    failures: Vec<WriteFailure>,
    written_includes: HashSet<ResourceId>,
}

impl Pass {
    fn push_back(&mut self, kind: ResourceKind, id: ResourceId, result: Result<DependencyRecord, SerializeError>) {
        if let Some(record) = self.check(kind, id, result) {
            self.records.push_back(record);
        }
    }

    fn push_front(&mut self, kind: ResourceKind, id: ResourceId, result: Result<DependencyRecord, SerializeError>) {
        if let Some(record) = self.check(kind, id, result) {
            self.records.push_front(record);
        }
    }

    fn check(
        &mut self,
        kind: ResourceKind,
        id: ResourceId,
        result: Result<DependencyRecord, SerializeError>,
    ) -> Option<DependencyRecord> {
        match result {
            Ok(record) => Some(record),
            Err(error) => {
                log::warn!("Failed to write {} {}: {}", kind.name(), id, error);
                self.failures.push(WriteFailure { kind, id, error });
                None
            }
        }
    }

    fn finish(self) -> SerializedDependencies {
        SerializedDependencies {
            records: self.records.into(),
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut dependency = Dependency::new();
        let texture = ResourceHandle::new(Texture::new(4, 4));

        let first = dependency.register_dependency(&texture);
        let second = dependency.register_dependency(&texture.clone());

        assert_eq!(first, ResourceId::FIRST);
        assert_eq!(first, second);
        assert!(dependency.has_dependency(&texture));
        assert_eq!(dependency.next_id(), ResourceId(2));
    }

    #[test]
    fn test_ids_are_shared_across_kinds() {
        let mut dependency = Dependency::new();
        let geometry = ResourceHandle::new(Geometry::new());
        let material = ResourceHandle::new(Material::new());
        let texture = ResourceHandle::new(Texture::new(1, 1));

        let g = dependency.register_dependency(&geometry);
        let include = dependency.register_include("light.glsl");
        let m = dependency.register_dependency(&material);
        let t = dependency.register_dependency(&texture);

        assert_eq!(
            [g, include, m, t],
            [ResourceId(1), ResourceId(2), ResourceId(3), ResourceId(4)]
        );
        assert_eq!(dependency.register_include("light.glsl"), include);
    }

    #[test]
    fn test_equal_values_are_distinct_resources() {
        let mut dependency = Dependency::new();
        let a = ResourceHandle::new(Texture::new(1, 1));
        let b = ResourceHandle::new(Texture::new(1, 1));

        assert_ne!(dependency.register_dependency(&a), dependency.register_dependency(&b));
        assert!(!dependency.has_dependency(&ResourceHandle::new(Texture::new(1, 1))));
    }

    #[test]
    fn test_dependencies_in_registration_order() {
        let mut dependency = Dependency::new();
        let textures: Vec<_> = (0..5).map(|i| ResourceHandle::new(Texture::new(i, i))).collect();
        for texture in &textures {
            dependency.register_dependency(texture);
        }

        let listed = dependency.dependencies::<Texture>();
        assert_eq!(listed.len(), 5);
        for (i, (id, texture)) in listed.iter().enumerate() {
            assert_eq!(*id, ResourceId(i as u32 + 1));
            assert!(texture.same(&textures[i]));
        }
    }

    #[test]
    fn test_references() {
        let mut dependency = Dependency::new();
        let effect = ResourceHandle::new(Effect::new("void main() {}"));

        dependency.register_reference(ResourceId(7), effect.clone());

        assert!(dependency.effect_reference(ResourceId(7)).unwrap().same(&effect));
        assert!(dependency.effect_reference(ResourceId(8)).is_none());
        assert!(dependency.texture_reference(ResourceId(7)).is_none());
        assert!(dependency.subscene_reference(ResourceId(7)).is_none());
    }

    #[test]
    fn test_empty_pass() {
        let mut dependency = Dependency::new();
        let serialized = dependency.serialize(
            &AssetLibrary::new(),
            &Options::new(),
            &WriterOptions::new(),
            &TypeCodec::new(),
        );
        assert!(serialized.records.is_empty());
        assert!(serialized.is_complete());
    }
}
