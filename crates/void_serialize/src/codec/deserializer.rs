//! Value decoders
//!
//! Inverse of [`serializer`](super::serializer). Enum codes never fail:
//! unknown codes fall through to the default mode.

use glam::{Mat4, Vec2, Vec3, Vec4};

use void_asset::{BlendingMode, TriangleCulling};

use super::serializer::{MAT4_DEFAULTS, TEXTURE_ID_MASK, VEC2_DEFAULTS, VEC3_DEFAULTS, VEC4_DEFAULTS};
use crate::error::CodecError;
use crate::value::{SerializedValue, TypedValue, ValueType};

/// Read the flagged components from the payload, defaulting the rest
pub fn deserialize_components<const N: usize>(
    value: &SerializedValue,
    defaults: [f32; N],
) -> Result<[f32; N], CodecError> {
    let mut components = defaults;
    let mut tokens = value.payload.split_whitespace();

    for (index, component) in components.iter_mut().enumerate() {
        if value.flags & (1u32 << index) == 0 {
            continue;
        }

        let token = tokens.next().ok_or(CodecError::MissingComponent { index })?;
        *component = token.parse().map_err(|_| CodecError::InvalidComponent {
            index,
            token: token.to_string(),
        })?;
    }

    Ok(components)
}

fn narrow<T: TryFrom<u32>>(value_type: ValueType, value: u32) -> Result<T, CodecError> {
    T::try_from(value).map_err(|_| CodecError::OutOfRange { value_type, value })
}

pub fn deserialize_uint(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    Ok(TypedValue::UInt(value.flags))
}

pub fn deserialize_ushort(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    narrow(ValueType::UShort, value.flags).map(TypedValue::UShort)
}

pub fn deserialize_ubyte(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    narrow(ValueType::UByte, value.flags).map(TypedValue::UByte)
}

pub fn deserialize_int(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    Ok(TypedValue::Int(value.flags as i32))
}

pub fn deserialize_short(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    narrow::<u16>(ValueType::Short, value.flags).map(|v| TypedValue::Short(v as i16))
}

pub fn deserialize_byte(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    narrow::<u8>(ValueType::Byte, value.flags).map(|v| TypedValue::Byte(v as i8))
}

pub fn deserialize_float(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    Ok(TypedValue::Float(f32::from_bits(value.flags)))
}

pub fn deserialize_bool(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    match value.flags {
        0 => Ok(TypedValue::Bool(false)),
        1 => Ok(TypedValue::Bool(true)),
        other => Err(CodecError::OutOfRange {
            value_type: ValueType::Bool,
            value: other,
        }),
    }
}

pub fn deserialize_vector2(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    deserialize_components(value, VEC2_DEFAULTS).map(|c| TypedValue::Vec2(Vec2::from_array(c)))
}

pub fn deserialize_vector3(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    deserialize_components(value, VEC3_DEFAULTS).map(|c| TypedValue::Vec3(Vec3::from_array(c)))
}

pub fn deserialize_vector4(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    deserialize_components(value, VEC4_DEFAULTS).map(|c| TypedValue::Vec4(Vec4::from_array(c)))
}

pub fn deserialize_matrix4x4(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    deserialize_components(value, MAT4_DEFAULTS)
        .map(|c| TypedValue::Mat4(Mat4::from_cols_array(&c)))
}

pub fn deserialize_blending(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    let mode = if value.payload == "+" {
        BlendingMode::Additive
    } else if value.payload == "a" {
        BlendingMode::Alpha
    } else {
        BlendingMode::Default
    };
    Ok(TypedValue::Blending(mode))
}

pub fn deserialize_culling(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    let culling = if value.payload == "b" {
        TriangleCulling::Back
    } else if value.payload == "u" {
        TriangleCulling::Both
    } else if value.payload == "f" {
        TriangleCulling::Front
    } else {
        TriangleCulling::None
    };
    Ok(TypedValue::Culling(culling))
}

pub fn deserialize_texture_id(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    Ok(TypedValue::TextureId(value.flags & TEXTURE_ID_MASK))
}

pub fn deserialize_string(value: &SerializedValue) -> Result<TypedValue, CodecError> {
    Ok(TypedValue::String(value.payload.clone()))
}
