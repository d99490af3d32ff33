//! # void_serialize - Scene Dependency Serialization
//!
//! Persists the shared resources of a scene to a compact binary format and
//! reads them back:
//! - A per-session `TypeCodec` turning typed property values into
//!   `(flags, payload)` pairs
//! - A `Dependency` registry assigning every shared resource one id
//! - Resource writers deciding between inline bytes and external files
//! - `WriterOptions` describing the embedding and texture policy
//!
//! ## Example
//!
//! ```ignore
//! use void_serialize::prelude::*;
//!
//! let mut dependency = Dependency::new();
//! dependency.register_dependency(&material);
//!
//! let mut writer_options = WriterOptions::new();
//! writer_options.set_embed_mode(EmbedMode::TEXTURE);
//!
//! let serialized = dependency.serialize(&library, &options, &writer_options, &TypeCodec::new());
//! for failure in &serialized.failures {
//!     log::warn!("{:?}", failure);
//! }
//! ```

pub mod codec;
pub mod config;
pub mod container;
pub mod dependency;
pub mod error;
pub mod include;
pub mod options;
pub mod reader;
pub mod record;
pub mod value;
pub mod writer;

pub use codec::TypeCodec;
pub use config::{load_writer_options, parse_writer_options};
pub use container::{Container, SCENE_MAGIC_NUMBER};
pub use dependency::{Dependable, Dependency, SerializedDependencies, WriteFailure};
pub use error::{CodecError, SerializeError, SerializeResult};
pub use include::parse_includes;
pub use options::{EmbedMode, ImageFormat, MipFilter, Options, TextureFormat, WriterOptions};
pub use reader::{DependencyReader, ReadFailure, ReadReport, UnresolvedReference};
pub use record::{DependencyRecord, RecordPayload, ResourceId, ResourceKind};
pub use value::{SerializedProperty, SerializedValue, TypedValue, ValueType};
pub use writer::{AssetWriter, EffectWriter, GeometryWriter, MaterialWriter, TextureWriter};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::codec::TypeCodec;
    pub use crate::dependency::Dependency;
    pub use crate::error::{SerializeError, SerializeResult};
    pub use crate::options::{EmbedMode, Options, WriterOptions};
    pub use crate::reader::DependencyReader;
    pub use crate::record::{DependencyRecord, RecordPayload, ResourceId, ResourceKind};
    pub use crate::writer::{AssetWriter, EffectWriter, GeometryWriter, MaterialWriter, TextureWriter};
}
