//! Container framing
//!
//! Every file a writer produces has the same layout:
//!
//! ```text
//! +--------------------+------------------------+-------------+
//! | header (14 bytes)  | dependency records     | data        |
//! | magic, version,    | bincode Vec<Record>    | writer      |
//! | sizes              |                        | payload     |
//! +--------------------+------------------------+-------------+
//! ```
//!
//! The magic number's upper three bytes identify the format family, the low
//! byte the writer that produced the file.

use serde::{Deserialize, Serialize};

use crate::error::{SerializeError, SerializeResult};
use crate::record::DependencyRecord;

/// Format family magic; writers OR their tag into the low byte
pub const SCENE_MAGIC_NUMBER: u32 = 0x564F_4900;

/// Mask selecting the family part of a magic number
pub const MAGIC_FAMILY_MASK: u32 = 0xFFFF_FF00;

/// Major format version; readers reject newer majors
pub const VERSION_MAJOR: u8 = 0;

/// Minor format version
pub const VERSION_MINOR: u8 = 4;

/// Encoded header size (bincode fixed-width integers)
pub const HEADER_SIZE: usize = 14;

/// Build a writer magic number from its tag byte
pub const fn magic_number(tag: u8) -> u32 {
    SCENE_MAGIC_NUMBER | tag as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct ContainerHeader {
    magic: u32,
    version: u16,
    dependencies_size: u32,
    data_size: u32,
}

/// An unpacked container
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub magic: u32,
    pub version: (u8, u8),
    pub records: Vec<DependencyRecord>,
    pub data: Vec<u8>,
}

impl Container {
    /// Writer tag (low byte of the magic number)
    pub fn tag(&self) -> u8 {
        (self.magic & 0xFF) as u8
    }
}

fn size_u32(size: usize) -> SerializeResult<u32> {
    u32::try_from(size).map_err(|_| SerializeError::Truncated {
        expected: u32::MAX as usize,
        found: size,
    })
}

/// Frame a record table and a data blob
pub fn pack(magic: u32, records: &[DependencyRecord], data: &[u8]) -> SerializeResult<Vec<u8>> {
    let dependencies = bincode::serialize(records)?;

    let header = ContainerHeader {
        magic,
        version: u16::from_be_bytes([VERSION_MAJOR, VERSION_MINOR]),
        dependencies_size: size_u32(dependencies.len())?,
        data_size: size_u32(data.len())?,
    };

    let mut output = bincode::serialize(&header)?;
    debug_assert_eq!(output.len(), HEADER_SIZE);
    output.reserve(dependencies.len() + data.len());
    output.extend_from_slice(&dependencies);
    output.extend_from_slice(data);
    Ok(output)
}

/// Split a container back into its records and data
pub fn unpack(bytes: &[u8]) -> SerializeResult<Container> {
    if bytes.len() < HEADER_SIZE {
        return Err(SerializeError::Truncated {
            expected: HEADER_SIZE,
            found: bytes.len(),
        });
    }

    let header: ContainerHeader = bincode::deserialize(&bytes[..HEADER_SIZE])?;

    if header.magic & MAGIC_FAMILY_MASK != SCENE_MAGIC_NUMBER {
        return Err(SerializeError::InvalidMagic(header.magic));
    }

    let [major, minor] = header.version.to_be_bytes();
    if major > VERSION_MAJOR {
        return Err(SerializeError::UnsupportedVersion(major, minor));
    }

    let dependencies_end = HEADER_SIZE + header.dependencies_size as usize;
    let data_end = dependencies_end + header.data_size as usize;
    if bytes.len() < data_end {
        return Err(SerializeError::Truncated {
            expected: data_end,
            found: bytes.len(),
        });
    }

    let records = bincode::deserialize(&bytes[HEADER_SIZE..dependencies_end])?;

    Ok(Container {
        magic: header.magic,
        version: (major, minor),
        records,
        data: bytes[dependencies_end..data_end].to_vec(),
    })
}
