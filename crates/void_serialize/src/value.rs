//! Typed property values and their wire form
//!
//! `TypedValue` is the closed set of values the scene format can encode.
//! Every variant has exactly one wire encoding: a `(flags, payload)` pair
//! produced and consumed by the [`TypeCodec`](crate::codec::TypeCodec).

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use void_asset::{BlendingMode, ResourceHandle, Texture, TriangleCulling, Value};

/// Wire tag of a typed value
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ValueType {
    UInt = 0,
    UShort = 1,
    UByte = 2,
    Int = 3,
    Short = 4,
    Byte = 5,
    Float = 6,
    Bool = 7,
    Blending = 8,
    Culling = 9,
    Vec2 = 10,
    Vec3 = 11,
    Vec4 = 12,
    Mat4 = 13,
    TextureId = 14,
    String = 15,
}

impl ValueType {
    /// Order in which property types are tried when encoding
    pub const PRIORITY: [ValueType; 16] = [
        ValueType::UInt,
        ValueType::UShort,
        ValueType::UByte,
        ValueType::Int,
        ValueType::Short,
        ValueType::Byte,
        ValueType::Float,
        ValueType::Bool,
        ValueType::Blending,
        ValueType::Culling,
        ValueType::Vec2,
        ValueType::Vec3,
        ValueType::Vec4,
        ValueType::Mat4,
        ValueType::TextureId,
        ValueType::String,
    ];

    /// Whether values of this type carry a dependency id
    pub fn is_complex(self) -> bool {
        matches!(self, ValueType::TextureId)
    }
}

/// A value in its encodable form
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    UInt(u32),
    UShort(u16),
    UByte(u8),
    Int(i32),
    Short(i16),
    Byte(i8),
    Float(f32),
    Bool(bool),
    Blending(BlendingMode),
    Culling(TriangleCulling),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    /// Id of the texture a sampler is bound to
    TextureId(u32),
    String(String),
}

impl TypedValue {
    /// Wire tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::UInt(_) => ValueType::UInt,
            TypedValue::UShort(_) => ValueType::UShort,
            TypedValue::UByte(_) => ValueType::UByte,
            TypedValue::Int(_) => ValueType::Int,
            TypedValue::Short(_) => ValueType::Short,
            TypedValue::Byte(_) => ValueType::Byte,
            TypedValue::Float(_) => ValueType::Float,
            TypedValue::Bool(_) => ValueType::Bool,
            TypedValue::Blending(_) => ValueType::Blending,
            TypedValue::Culling(_) => ValueType::Culling,
            TypedValue::Vec2(_) => ValueType::Vec2,
            TypedValue::Vec3(_) => ValueType::Vec3,
            TypedValue::Vec4(_) => ValueType::Vec4,
            TypedValue::Mat4(_) => ValueType::Mat4,
            TypedValue::TextureId(_) => ValueType::TextureId,
            TypedValue::String(_) => ValueType::String,
        }
    }

    /// Convert a material property into its encodable form
    ///
    /// Arms follow [`ValueType::PRIORITY`]. Texture samplers are turned into
    /// ids by `texture_id`, which runs before the value exists so that the
    /// referenced texture is registered first. Values the format has no
    /// encoding for return `None`.
    pub fn from_value<F>(value: &Value, texture_id: F) -> Option<TypedValue>
    where
        F: FnOnce(&ResourceHandle<Texture>) -> u32,
    {
        let typed = match value {
            Value::UInt(v) => TypedValue::UInt(*v),
            Value::UShort(v) => TypedValue::UShort(*v),
            Value::UByte(v) => TypedValue::UByte(*v),
            Value::Int(v) => TypedValue::Int(*v),
            Value::Short(v) => TypedValue::Short(*v),
            Value::Byte(v) => TypedValue::Byte(*v),
            Value::Float(v) => TypedValue::Float(*v),
            Value::Bool(v) => TypedValue::Bool(*v),
            Value::Blending(v) => TypedValue::Blending(*v),
            Value::Culling(v) => TypedValue::Culling(*v),
            Value::Vec2(v) => TypedValue::Vec2(*v),
            Value::Vec3(v) => TypedValue::Vec3(*v),
            Value::Vec4(v) => TypedValue::Vec4(*v),
            Value::Mat4(v) => TypedValue::Mat4(*v),
            Value::Texture(texture) => TypedValue::TextureId(texture_id(texture)),
            Value::String(v) => TypedValue::String(v.clone()),
            Value::Double(_) | Value::Long(_) | Value::FloatArray(_) => return None,
        };
        Some(typed)
    }

    /// Convert back into a material property
    ///
    /// Texture ids cannot be turned into values without a registry; they
    /// return `None` and are resolved by the reader.
    pub fn into_value(self) -> Option<Value> {
        let value = match self {
            TypedValue::UInt(v) => Value::UInt(v),
            TypedValue::UShort(v) => Value::UShort(v),
            TypedValue::UByte(v) => Value::UByte(v),
            TypedValue::Int(v) => Value::Int(v),
            TypedValue::Short(v) => Value::Short(v),
            TypedValue::Byte(v) => Value::Byte(v),
            TypedValue::Float(v) => Value::Float(v),
            TypedValue::Bool(v) => Value::Bool(v),
            TypedValue::Blending(v) => Value::Blending(v),
            TypedValue::Culling(v) => Value::Culling(v),
            TypedValue::Vec2(v) => Value::Vec2(v),
            TypedValue::Vec3(v) => Value::Vec3(v),
            TypedValue::Vec4(v) => Value::Vec4(v),
            TypedValue::Mat4(v) => Value::Mat4(v),
            TypedValue::TextureId(_) => return None,
            TypedValue::String(v) => Value::String(v),
        };
        Some(value)
    }
}

/// Wire form of a single value
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedValue {
    pub flags: u32,
    pub payload: String,
}

impl SerializedValue {
    pub fn new(flags: u32, payload: impl Into<String>) -> Self {
        Self {
            flags,
            payload: payload.into(),
        }
    }

    /// A value carried entirely in its flags
    pub fn from_flags(flags: u32) -> Self {
        Self {
            flags,
            payload: String::new(),
        }
    }
}

/// A named, typed property in wire form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedProperty {
    pub name: String,
    pub value_type: ValueType,
    pub value: SerializedValue,
}

/// Material payload: dependency-carrying properties, then inline ones
pub type MaterialPayload = (Vec<SerializedProperty>, Vec<SerializedProperty>);
