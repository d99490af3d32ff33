//! Type codec - per-session registry of value encoders and decoders
//!
//! Each writer or reader owns its own `TypeCodec`. Supporting a new value
//! type means registering one encoder and the matching decoder; nothing else
//! has to change.

pub mod deserializer;
pub mod serializer;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::CodecError;
use crate::value::{SerializedValue, TypedValue, ValueType};

/// Encoder: returns `None` when handed a value of another type
pub type EncodeFn = Box<dyn Fn(&TypedValue) -> Option<SerializedValue> + Send + Sync>;

/// Decoder
pub type DecodeFn = Box<dyn Fn(&SerializedValue) -> Result<TypedValue, CodecError> + Send + Sync>;

struct CodecEntry {
    encode: EncodeFn,
    decode: DecodeFn,
}

/// Registry mapping value types to their wire encoders and decoders
pub struct TypeCodec {
    entries: BTreeMap<ValueType, CodecEntry>,
}

macro_rules! register_standard {
    ($codec:ident, $($ty:ident => |$v:ident| $encode:expr, $decode:path;)*) => {
        $(
            $codec.register(
                ValueType::$ty,
                |value| match value {
                    TypedValue::$ty($v) => Some($encode),
                    _ => None,
                },
                $decode,
            );
        )*
    };
}

impl TypeCodec {
    /// Create a codec with no registered types
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Create a codec with every standard type registered
    pub fn new() -> Self {
        use deserializer::*;
        use serializer::*;

        let mut codec = Self::empty();
        register_standard! { codec,
            UInt => |v| serialize_uint(*v), deserialize_uint;
            UShort => |v| serialize_ushort(*v), deserialize_ushort;
            UByte => |v| serialize_ubyte(*v), deserialize_ubyte;
            Int => |v| serialize_int(*v), deserialize_int;
            Short => |v| serialize_short(*v), deserialize_short;
            Byte => |v| serialize_byte(*v), deserialize_byte;
            Float => |v| serialize_float(*v), deserialize_float;
            Bool => |v| serialize_bool(*v), deserialize_bool;
            Blending => |v| serialize_blending(*v), deserialize_blending;
            Culling => |v| serialize_culling(*v), deserialize_culling;
            Vec2 => |v| serialize_vector2(*v), deserialize_vector2;
            Vec3 => |v| serialize_vector3(*v), deserialize_vector3;
            Vec4 => |v| serialize_vector4(*v), deserialize_vector4;
            Mat4 => |v| serialize_matrix4x4(*v), deserialize_matrix4x4;
            TextureId => |v| serialize_texture_id(*v), deserialize_texture_id;
            String => |v| serialize_string(v), deserialize_string;
        }
        codec
    }

    /// Register (or replace) the codec for a value type
    pub fn register<E, D>(&mut self, value_type: ValueType, encode: E, decode: D) -> &mut Self
    where
        E: Fn(&TypedValue) -> Option<SerializedValue> + Send + Sync + 'static,
        D: Fn(&SerializedValue) -> Result<TypedValue, CodecError> + Send + Sync + 'static,
    {
        self.entries.insert(
            value_type,
            CodecEntry {
                encode: Box::new(encode),
                decode: Box::new(decode),
            },
        );
        self
    }

    /// Remove the codec for a value type
    pub fn unregister(&mut self, value_type: ValueType) -> bool {
        self.entries.remove(&value_type).is_some()
    }

    /// Check if a value type can be encoded
    pub fn contains(&self, value_type: ValueType) -> bool {
        self.entries.contains_key(&value_type)
    }

    /// Encode a value with the codec registered for its type
    pub fn encode(&self, value: &TypedValue) -> Result<SerializedValue, CodecError> {
        let value_type = value.value_type();
        self.entries
            .get(&value_type)
            .and_then(|entry| (entry.encode)(value))
            .ok_or(CodecError::Unregistered(value_type))
    }

    /// Decode a value of the given type
    pub fn decode(&self, value_type: ValueType, value: &SerializedValue) -> Result<TypedValue, CodecError> {
        let entry = self
            .entries
            .get(&value_type)
            .ok_or(CodecError::Unregistered(value_type))?;
        (entry.decode)(value)
    }

    /// Registered types in dispatch priority order
    pub fn value_types(&self) -> impl Iterator<Item = ValueType> + '_ {
        ValueType::PRIORITY
            .into_iter()
            .filter(|value_type| self.entries.contains_key(value_type))
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCodec")
            .field("types", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
