//! Request definitions
//!
//! A request is serialized as the tag, then every appended integer, then
//! every appended blob:
//!
//! ```text
//! ┌──────────┬──────────────────────┬──────────────────────────┐
//! │ Magic(2) │ u32 * n (append ord) │ blob * m (append order)  │
//! └──────────┴──────────────────────┴──────────────────────────┘
//! ```
//!
//! Integers and blobs live in two separate sequences; they are never
//! interleaved per field.

use std::borrow::Cow;
use std::io::{self, Write};

use bytes::{BufMut, BytesMut};

use super::count::CountingWriter;
use super::Magic;
use crate::error::{ClientError, Result};

/// Size of the tag on the wire
pub const MAGIC_SIZE: usize = 2;

/// A request ready to be written to a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    magic: Magic,

    /// Big-endian u32s in append order
    integers: BytesMut,

    /// Raw payloads in append order
    blobs: Vec<Cow<'a, [u8]>>,
}

impl<'a> Request<'a> {
    /// Empty request for the given operation
    pub fn new(magic: Magic) -> Self {
        Self {
            magic,
            integers: BytesMut::new(),
            blobs: Vec::new(),
        }
    }

    /// `[magic][klen][vlen][key][value]`, shared by the store operations
    pub fn key_value(magic: Magic, key: &'a [u8], value: &'a [u8]) -> Result<Self> {
        let mut req = Self::new(magic);
        req.add_u32(wire_len(key.len(), "key")?);
        req.add_u32(wire_len(value.len(), "value")?);
        req.add_binary(key);
        req.add_binary(value);
        Ok(req)
    }

    /// `[magic][klen][key]`, shared by fetch and delete
    pub fn key_only(magic: Magic, key: &'a [u8]) -> Result<Self> {
        let mut req = Self::new(magic);
        req.add_u32(wire_len(key.len(), "key")?);
        req.add_binary(key);
        Ok(req)
    }

    pub fn set_magic(&mut self, magic: Magic) {
        self.magic = magic;
    }

    pub fn magic(&self) -> Magic {
        self.magic
    }

    /// Append a 4-byte big-endian integer
    pub fn add_u32(&mut self, value: u32) {
        self.integers.put_u32(value);
    }

    /// Append a raw blob
    pub fn add_binary(&mut self, data: impl Into<Cow<'a, [u8]>>) {
        self.blobs.push(data.into());
    }

    /// Appended integers, in order
    pub fn integers(&self) -> impl Iterator<Item = u32> + '_ {
        self.integers
            .chunks_exact(4)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }

    /// Appended blobs, in order
    pub fn blobs(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.blobs.iter().map(|blob| blob.as_ref())
    }

    /// Total bytes this request occupies on the wire
    pub fn encoded_len(&self) -> usize {
        MAGIC_SIZE + self.integers.len() + self.blobs.iter().map(|b| b.len()).sum::<usize>()
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.magic.as_u16().to_be_bytes());
        buf.extend_from_slice(&self.integers);
        for blob in &self.blobs {
            buf.extend_from_slice(blob);
        }
        buf
    }

    /// Write the request and return the number of bytes accepted.
    ///
    /// A failure keeps the underlying `io::ErrorKind` so timeouts remain
    /// recognizable, and names the field that could not be written along
    /// with how many bytes had been accepted by then.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<u64> {
        let mut w = CountingWriter::new(out);

        if let Err(e) = w.write_all(&self.magic.as_u16().to_be_bytes()) {
            return Err(annotate(e, "write magic", w.count()).into());
        }
        if let Err(e) = w.write_all(&self.integers) {
            return Err(annotate(e, "write integers", w.count()).into());
        }
        for (index, blob) in self.blobs.iter().enumerate() {
            if let Err(e) = w.write_all(blob) {
                let what = format!("write blob #{}", index);
                return Err(annotate(e, &what, w.count()).into());
            }
        }
        if let Err(e) = w.flush() {
            return Err(annotate(e, "flush", w.count()).into());
        }

        Ok(w.count())
    }

    /// Detach from borrowed buffers
    pub fn into_owned(self) -> Request<'static> {
        Request {
            magic: self.magic,
            integers: self.integers,
            blobs: self
                .blobs
                .into_iter()
                .map(|blob| Cow::Owned(blob.into_owned()))
                .collect(),
        }
    }
}

fn annotate(err: io::Error, what: &str, written: u64) -> io::Error {
    io::Error::new(
        err.kind(),
        format!("{} error after {} bytes: {}", what, written, err),
    )
}

/// Length as it travels on the wire; anything past `u32::MAX` is refused
pub(crate) fn wire_len(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        ClientError::Protocol(format!(
            "{} too large: {} bytes (max {})",
            what,
            len,
            u32::MAX
        ))
    })
}
