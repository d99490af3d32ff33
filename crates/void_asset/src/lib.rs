//! # void_asset - Shared Scene Resources
//!
//! The resources a scene references by identity and the library that owns
//! them:
//! - Identity-compared handles (`ResourceHandle`)
//! - Geometries, materials, textures, effects and sub-scene nodes
//! - Dynamically typed material properties (`Value`)
//! - A named `AssetLibrary`
//!
//! ## Example
//!
//! ```ignore
//! use void_asset::prelude::*;
//!
//! let mut library = AssetLibrary::new();
//! let brick = library.add("textures/brick.png", Texture::new(512, 512));
//!
//! let material = Material::new()
//!     .with("diffuseMap", brick)
//!     .with("blending", BlendingMode::Alpha);
//! library.add("wall", material);
//! ```

pub mod handle;
pub mod resource;
pub mod storage;
pub mod value;

pub use handle::ResourceHandle;
pub use resource::{Bounds, Effect, Geometry, Material, Node, Texture, VertexAttribute, POSITION_ATTRIBUTE};
pub use storage::{AssetLibrary, LibraryAsset, NamedStorage};
pub use value::{BlendingMode, TriangleCulling, Value};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::handle::ResourceHandle;
    pub use crate::resource::{Effect, Geometry, Material, Node, Texture, VertexAttribute};
    pub use crate::storage::AssetLibrary;
    pub use crate::value::{BlendingMode, TriangleCulling, Value};
}
