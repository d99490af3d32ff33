//! Asset Library - Named storage for shared resources
//!
//! The library owns every resource a scene may reference and gives each a
//! name. Writers use the names to pick output file names and to locate the
//! source files of textures and effects.

use std::collections::{BTreeMap, HashMap};

use crate::handle::ResourceHandle;
use crate::resource::{Effect, Geometry, Material, Node, Texture};

/// Name-indexed storage for one resource kind
pub struct NamedStorage<T> {
    by_name: BTreeMap<String, ResourceHandle<T>>,
    names: HashMap<ResourceHandle<T>, String>,
}

impl<T> NamedStorage<T> {
    /// Create empty storage
    pub fn new() -> Self {
        Self {
            by_name: BTreeMap::new(),
            names: HashMap::new(),
        }
    }

    /// Store a handle under a name
    ///
    /// A name stored twice points to the latest handle; the previous handle
    /// loses that name.
    pub fn insert(&mut self, name: impl Into<String>, handle: ResourceHandle<T>) {
        let name = name.into();
        if let Some(previous) = self.by_name.insert(name.clone(), handle.clone()) {
            self.names.remove(&previous);
        }
        self.names.insert(handle, name);
    }

    /// Look up a handle by name
    pub fn get(&self, name: &str) -> Option<&ResourceHandle<T>> {
        self.by_name.get(name)
    }

    /// Name of a stored handle
    pub fn name_of(&self, handle: &ResourceHandle<T>) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    /// Number of stored resources
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<T> Default for NamedStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource types the library can store
pub trait LibraryAsset: Sized + 'static {
    fn storage(library: &AssetLibrary) -> &NamedStorage<Self>;
    fn storage_mut(library: &mut AssetLibrary) -> &mut NamedStorage<Self>;
}

macro_rules! library_asset {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl LibraryAsset for $ty {
                fn storage(library: &AssetLibrary) -> &NamedStorage<Self> {
                    &library.$field
                }

                fn storage_mut(library: &mut AssetLibrary) -> &mut NamedStorage<Self> {
                    &mut library.$field
                }
            }
        )*
    };
}

library_asset! {
    Geometry => geometries,
    Material => materials,
    Texture => textures,
    Effect => effects,
    Node => nodes,
}

/// Storage for all named resources of a scene
#[derive(Default)]
pub struct AssetLibrary {
    geometries: NamedStorage<Geometry>,
    materials: NamedStorage<Material>,
    textures: NamedStorage<Texture>,
    effects: NamedStorage<Effect>,
    nodes: NamedStorage<Node>,
}

impl AssetLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new resource and return its handle
    pub fn add<T: LibraryAsset>(&mut self, name: impl Into<String>, resource: T) -> ResourceHandle<T> {
        let handle = ResourceHandle::new(resource);
        self.insert(name, handle.clone());
        handle
    }

    /// Store an existing handle under a name
    pub fn insert<T: LibraryAsset>(&mut self, name: impl Into<String>, handle: ResourceHandle<T>) {
        T::storage_mut(self).insert(name, handle);
    }

    /// Look up a resource by name
    pub fn get<T: LibraryAsset>(&self, name: &str) -> Option<&ResourceHandle<T>> {
        T::storage(self).get(name)
    }

    /// Name of a resource
    pub fn name<T: LibraryAsset>(&self, handle: &ResourceHandle<T>) -> Option<&str> {
        T::storage(self).name_of(handle)
    }

    /// Storage for one resource kind
    pub fn storage<T: LibraryAsset>(&self) -> &NamedStorage<T> {
        T::storage(self)
    }

    pub fn geometry(&self, name: &str) -> Option<&ResourceHandle<Geometry>> {
        self.geometries.get(name)
    }

    pub fn material(&self, name: &str) -> Option<&ResourceHandle<Material>> {
        self.materials.get(name)
    }

    pub fn texture(&self, name: &str) -> Option<&ResourceHandle<Texture>> {
        self.textures.get(name)
    }

    pub fn effect(&self, name: &str) -> Option<&ResourceHandle<Effect>> {
        self.effects.get(name)
    }

    pub fn node(&self, name: &str) -> Option<&ResourceHandle<Node>> {
        self.nodes.get(name)
    }

    pub fn geometry_name(&self, geometry: &ResourceHandle<Geometry>) -> Option<&str> {
        self.geometries.name_of(geometry)
    }

    pub fn material_name(&self, material: &ResourceHandle<Material>) -> Option<&str> {
        self.materials.name_of(material)
    }

    pub fn texture_name(&self, texture: &ResourceHandle<Texture>) -> Option<&str> {
        self.textures.name_of(texture)
    }

    pub fn effect_name(&self, effect: &ResourceHandle<Effect>) -> Option<&str> {
        self.effects.name_of(effect)
    }

    pub fn node_name(&self, node: &ResourceHandle<Node>) -> Option<&str> {
        self.nodes.name_of(node)
    }
}

impl core::fmt::Debug for AssetLibrary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AssetLibrary")
            .field("geometries", &self.geometries.len())
            .field("materials", &self.materials.len())
            .field("textures", &self.textures.len())
            .field("effects", &self.effects.len())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut library = AssetLibrary::new();
        let texture = library.add("textures/brick.png", Texture::new(8, 8));

        assert_eq!(library.texture("textures/brick.png"), Some(&texture));
        assert_eq!(library.texture_name(&texture), Some("textures/brick.png"));
        assert!(library.texture("missing.png").is_none());
    }

    #[test]
    fn test_name_is_per_identity() {
        let mut library = AssetLibrary::new();
        let a = library.add("a", Material::new());
        let b = ResourceHandle::new(Material::new());

        assert_eq!(library.material_name(&a), Some("a"));
        assert_eq!(library.material_name(&b), None);
    }

    #[test]
    fn test_rename_replaces_previous_handle() {
        let mut library = AssetLibrary::new();
        let first = library.add("effect.effect", Effect::new("{}"));
        let second = library.add("effect.effect", Effect::new("{ }"));

        assert_eq!(library.effect_name(&first), None);
        assert_eq!(library.effect_name(&second), Some("effect.effect"));
        assert_eq!(library.storage::<Effect>().len(), 1);
    }

    #[test]
    fn test_generic_lookup() {
        fn name_of<T: LibraryAsset>(library: &AssetLibrary, handle: &ResourceHandle<T>) -> Option<String> {
            library.name(handle).map(str::to_string)
        }

        let mut library = AssetLibrary::new();
        let cube = library.add("cube.geometry", Geometry::new());

        assert_eq!(name_of(&library, &cube), Some("cube.geometry".to_string()));
        assert_eq!(library.get::<Geometry>("cube.geometry"), Some(&cube));
        assert!(library.get::<Texture>("cube.geometry").is_none());
    }
}
