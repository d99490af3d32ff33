//! Material property values
//!
//! A material is a bag of named, dynamically typed values. `Value` covers
//! everything a material may hold, including kinds of data the scene
//! format has no encoding for.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::handle::ResourceHandle;
use crate::resource::Texture;

/// Blending mode applied when drawing a surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendingMode {
    /// Opaque, no blending
    #[default]
    Default,
    /// Source alpha over destination
    Alpha,
    /// Source added to destination
    Additive,
}

/// Which triangle faces are culled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriangleCulling {
    /// Nothing is culled
    #[default]
    None,
    /// Back faces are culled
    Back,
    /// Front faces are culled
    Front,
    /// Both faces are culled
    Both,
}

/// A dynamically typed material property
#[derive(Clone, Debug)]
pub enum Value {
    UInt(u32),
    Int(i32),
    UShort(u16),
    Short(i16),
    UByte(u8),
    Byte(i8),
    Float(f32),
    Bool(bool),
    Blending(BlendingMode),
    Culling(TriangleCulling),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    /// Sampler bound to a shared texture
    Texture(ResourceHandle<Texture>),
    String(String),
    Double(f64),
    Long(i64),
    FloatArray(Vec<f32>),
}

impl Value {
    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::UInt(_) => "u32",
            Value::Int(_) => "i32",
            Value::UShort(_) => "u16",
            Value::Short(_) => "i16",
            Value::UByte(_) => "u8",
            Value::Byte(_) => "i8",
            Value::Float(_) => "f32",
            Value::Bool(_) => "bool",
            Value::Blending(_) => "BlendingMode",
            Value::Culling(_) => "TriangleCulling",
            Value::Vec2(_) => "Vec2",
            Value::Vec3(_) => "Vec3",
            Value::Vec4(_) => "Vec4",
            Value::Mat4(_) => "Mat4",
            Value::Texture(_) => "Texture",
            Value::String(_) => "String",
            Value::Double(_) => "f64",
            Value::Long(_) => "i64",
            Value::FloatArray(_) => "[f32]",
        }
    }

    /// Texture bound by this value, if any
    pub fn as_texture(&self) -> Option<&ResourceHandle<Texture>> {
        match self {
            Value::Texture(texture) => Some(texture),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UShort(a), Value::UShort(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::UByte(a), Value::UByte(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Blending(a), Value::Blending(b)) => a == b,
            (Value::Culling(a), Value::Culling(b)) => a == b,
            (Value::Vec2(a), Value::Vec2(b)) => a == b,
            (Value::Vec3(a), Value::Vec3(b)) => a == b,
            (Value::Vec4(a), Value::Vec4(b)) => a == b,
            (Value::Mat4(a), Value::Mat4(b)) => a == b,
            (Value::Texture(a), Value::Texture(b)) => a.same(b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::FloatArray(a), Value::FloatArray(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_value! {
    u32 => UInt,
    i32 => Int,
    u16 => UShort,
    i16 => Short,
    u8 => UByte,
    i8 => Byte,
    f32 => Float,
    bool => Bool,
    BlendingMode => Blending,
    TriangleCulling => Culling,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat4 => Mat4,
    ResourceHandle<Texture> => Texture,
    String => String,
    f64 => Double,
    i64 => Long,
    Vec<f32> => FloatArray,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
