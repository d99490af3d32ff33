//! Dependency records - the `(kind, id, payload)` table of a scene

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SerializeError, SerializeResult};

/// Identifier of a resource within one serialization pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// First id handed out by a fresh registry
    pub const FIRST: Self = Self(1);

    /// Create a new resource id
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// The id after this one
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Resource kinds tracked by the dependency registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ResourceKind {
    Geometry = 0,
    Material = 1,
    Texture = 2,
    Effect = 3,
    SubScene = 4,
}

impl ResourceKind {
    /// Wire value of this kind
    pub fn to_wire(self) -> i16 {
        self as i16
    }

    /// Parse a wire value
    pub fn from_wire(kind: i16) -> SerializeResult<Self> {
        match kind {
            0 => Ok(Self::Geometry),
            1 => Ok(Self::Material),
            2 => Ok(Self::Texture),
            3 => Ok(Self::Effect),
            4 => Ok(Self::SubScene),
            other => Err(SerializeError::UnknownKind(other)),
        }
    }

    /// Lowercase name, used for default file names
    pub fn name(self) -> &'static str {
        match self {
            Self::Geometry => "geometry",
            Self::Material => "material",
            Self::Texture => "texture",
            Self::Effect => "effect",
            Self::SubScene => "scene",
        }
    }
}

/// Content of a dependency record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordPayload {
    /// The resource's bytes, inline
    Embedded(Vec<u8>),
    /// Name of the external file holding the resource
    External(String),
}

impl RecordPayload {
    /// Check if the payload is inline
    pub fn is_embedded(&self) -> bool {
        matches!(self, RecordPayload::Embedded(_))
    }

    /// Inline bytes, if embedded
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            RecordPayload::Embedded(bytes) => Some(bytes),
            RecordPayload::External(_) => None,
        }
    }

    /// External file name, if external
    pub fn filename(&self) -> Option<&str> {
        match self {
            RecordPayload::Embedded(_) => None,
            RecordPayload::External(name) => Some(name),
        }
    }
}

/// One entry of a serialized dependency table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub kind: i16,
    pub id: i16,
    pub payload: RecordPayload,
}

impl DependencyRecord {
    /// Build a record, checking that the id fits the wire format
    pub fn new(kind: ResourceKind, id: ResourceId, payload: RecordPayload) -> SerializeResult<Self> {
        let wire_id = i16::try_from(id.raw()).map_err(|_| SerializeError::IdOutOfRange(id))?;
        Ok(Self {
            kind: kind.to_wire(),
            id: wire_id,
            payload,
        })
    }

    /// Decoded resource kind
    pub fn resource_kind(&self) -> SerializeResult<ResourceKind> {
        ResourceKind::from_wire(self.kind)
    }

    /// Decoded resource id
    ///
    /// Negative wire ids are reinterpreted as their unsigned 16-bit value.
    pub fn resource_id(&self) -> ResourceId {
        ResourceId(self.id as u16 as u32)
    }
}
