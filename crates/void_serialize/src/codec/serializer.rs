//! Value encoders
//!
//! Integers, booleans and floats live in the flags word. Vectors and
//! matrices use the flags as a presence mask over a whitespace-separated
//! token stream in the payload: only components that differ from their
//! default are written.

use glam::{Mat4, Vec2, Vec3, Vec4};

use void_asset::{BlendingMode, TriangleCulling};

use crate::value::SerializedValue;

/// Bits of a texture id kept on the wire; the rest are reserved
pub const TEXTURE_ID_MASK: u32 = 0x00FF_FFFF;

/// Defaults of absent `Vec2` components
pub const VEC2_DEFAULTS: [f32; 2] = [0.0, 0.0];
/// Defaults of absent `Vec3` components
pub const VEC3_DEFAULTS: [f32; 3] = [0.0, 0.0, 0.0];
/// Defaults of absent `Vec4` components
pub const VEC4_DEFAULTS: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Defaults of absent matrix components, column-major identity
pub const MAT4_DEFAULTS: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

/// Write the non-default components and flag them
pub fn serialize_components(components: &[f32], defaults: &[f32]) -> SerializedValue {
    debug_assert_eq!(components.len(), defaults.len());

    let mut flags = 0u32;
    let mut tokens = Vec::with_capacity(components.len());

    for (i, (value, default)) in components.iter().zip(defaults).enumerate() {
        // bitwise so that -0.0 and NaN payloads survive
        if value.to_bits() != default.to_bits() {
            flags |= 1 << i;
            tokens.push(value.to_string());
        }
    }

    SerializedValue::new(flags, tokens.join(" "))
}

pub fn serialize_uint(value: u32) -> SerializedValue {
    SerializedValue::from_flags(value)
}

pub fn serialize_ushort(value: u16) -> SerializedValue {
    SerializedValue::from_flags(value as u32)
}

pub fn serialize_ubyte(value: u8) -> SerializedValue {
    SerializedValue::from_flags(value as u32)
}

pub fn serialize_int(value: i32) -> SerializedValue {
    SerializedValue::from_flags(value as u32)
}

pub fn serialize_short(value: i16) -> SerializedValue {
    SerializedValue::from_flags(value as u16 as u32)
}

pub fn serialize_byte(value: i8) -> SerializedValue {
    SerializedValue::from_flags(value as u8 as u32)
}

pub fn serialize_float(value: f32) -> SerializedValue {
    SerializedValue::from_flags(value.to_bits())
}

pub fn serialize_bool(value: bool) -> SerializedValue {
    SerializedValue::from_flags(value as u32)
}

pub fn serialize_vector2(value: Vec2) -> SerializedValue {
    serialize_components(&value.to_array(), &VEC2_DEFAULTS)
}

pub fn serialize_vector3(value: Vec3) -> SerializedValue {
    serialize_components(&value.to_array(), &VEC3_DEFAULTS)
}

pub fn serialize_vector4(value: Vec4) -> SerializedValue {
    serialize_components(&value.to_array(), &VEC4_DEFAULTS)
}

pub fn serialize_matrix4x4(value: Mat4) -> SerializedValue {
    serialize_components(&value.to_cols_array(), &MAT4_DEFAULTS)
}

pub fn serialize_blending(mode: BlendingMode) -> SerializedValue {
    let code = match mode {
        BlendingMode::Additive => "+",
        BlendingMode::Alpha => "a",
        BlendingMode::Default => "",
    };
    SerializedValue::new(0, code)
}

pub fn serialize_culling(culling: TriangleCulling) -> SerializedValue {
    let code = match culling {
        TriangleCulling::Back => "b",
        TriangleCulling::Both => "u",
        TriangleCulling::Front => "f",
        TriangleCulling::None => "n",
    };
    SerializedValue::new(0, code)
}

pub fn serialize_texture_id(id: u32) -> SerializedValue {
    SerializedValue::from_flags(id & TEXTURE_ID_MASK)
}

pub fn serialize_string(value: &str) -> SerializedValue {
    SerializedValue::new(0, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_writes_only_non_defaults() {
        let value = serialize_vector3(Vec3::new(1.0, 0.0, 3.5));
        assert_eq!(value.flags, 0b101);
        assert_eq!(value.payload, "1 3.5");
    }

    #[test]
    fn test_vector4_alpha_default() {
        let value = serialize_vector4(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(value.flags, 0);
        assert!(value.payload.is_empty());

        let value = serialize_vector4(Vec4::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(value.flags, 0b1000);
        assert_eq!(value.payload, "0");
    }

    #[test]
    fn test_identity_matrix_is_empty() {
        let value = serialize_matrix4x4(Mat4::IDENTITY);
        assert_eq!(value.flags, 0);
        assert!(value.payload.is_empty());

        let value = serialize_matrix4x4(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(value.flags, 1 << 12);
        assert_eq!(value.payload, "2");
    }

    #[test]
    fn test_signed_integers_use_low_bits() {
        assert_eq!(serialize_short(-1).flags, 0xFFFF);
        assert_eq!(serialize_byte(-1).flags, 0xFF);
        assert_eq!(serialize_int(-1).flags, u32::MAX);
    }

    #[test]
    fn test_texture_id_masks_reserved_bits() {
        assert_eq!(serialize_texture_id(0x7F00_0003).flags, 3);
    }
}
