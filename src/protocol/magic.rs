//! Operation tags
//!
//! Every request starts with a 2-byte "magic" identifying the operation.

use crate::error::ClientError;

/// Operation tags understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Magic {
    /// Store, overwriting any existing value
    Put = 0xC810,

    /// Store only if the key is absent
    PutKeep = 0xC811,

    /// Store without waiting for a reply
    PutNr = 0xC818,

    /// Delete a key
    Out = 0xC820,

    /// Fetch a value
    Get = 0xC830,
}

impl Magic {
    pub const ALL: [Magic; 5] = [
        Magic::Put,
        Magic::PutKeep,
        Magic::PutNr,
        Magic::Out,
        Magic::Get,
    ];

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Number of u32 length fields that follow the tag.
    ///
    /// Each length describes one blob, in the same order.
    pub fn length_fields(self) -> usize {
        match self {
            Magic::Put | Magic::PutKeep | Magic::PutNr => 2,
            Magic::Out | Magic::Get => 1,
        }
    }

    /// Whether the server answers this request at all
    pub fn expects_reply(self) -> bool {
        !matches!(self, Magic::PutNr)
    }

    pub fn name(self) -> &'static str {
        match self {
            Magic::Put => "put",
            Magic::PutKeep => "putkeep",
            Magic::PutNr => "putnr",
            Magic::Out => "out",
            Magic::Get => "get",
        }
    }
}

impl TryFrom<u16> for Magic {
    type Error = ClientError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Magic::ALL
            .into_iter()
            .find(|magic| magic.as_u16() == value)
            .ok_or_else(|| ClientError::Protocol(format!("Unknown magic: 0x{:04x}", value)))
    }
}

impl From<Magic> for u16 {
    fn from(magic: Magic) -> u16 {
        magic.as_u16()
    }
}
