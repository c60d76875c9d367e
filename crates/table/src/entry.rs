//! Table entries and their record encoding.
//!
//! Every record is a fixed 9-byte header followed by a payload,
//! little-endian:
//! ```text
//! Bytes 0-3: alias (u32)
//! Byte 4:    kind (u8)
//! Bytes 5-8: payload length (u32)
//! Bytes 9..: payload
//! ```

use crate::alias::Alias;
use crate::error::LoadError;
use crate::opkind::OpKind;

/// Size of a record header in bytes.
pub const RECORD_HEADER_LEN: usize = 9;

/// Tag byte identifying how a record's payload is interpreted.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    IntConstant = 0x01,
    StringConstant = 0x02,
    OpCode = 0x03,
    CallbackRef = 0x04,
}

impl EntryKind {
    /// Decode a kind byte. `None` for anything outside the four kinds.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(EntryKind::IntConstant),
            0x02 => Some(EntryKind::StringConstant),
            0x03 => Some(EntryKind::OpCode),
            0x04 => Some(EntryKind::CallbackRef),
            _ => None,
        }
    }

    /// Short name used in disassembly and type-mismatch messages.
    pub fn name(self) -> &'static str {
        match self {
            EntryKind::IntConstant => "INT",
            EntryKind::StringConstant => "STR",
            EntryKind::OpCode => "OP",
            EntryKind::CallbackRef => "CALLBACK",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One named entry in a declarative table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    IntConstant(i64),
    StringConstant(String),
    OpCode(OpKind),
    /// Symbolic name of a native callback registered at startup.
    CallbackRef(String),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::IntConstant(_) => EntryKind::IntConstant,
            Entry::StringConstant(_) => EntryKind::StringConstant,
            Entry::OpCode(_) => EntryKind::OpCode,
            Entry::CallbackRef(_) => EntryKind::CallbackRef,
        }
    }

    /// Append this entry as one record to `out`.
    pub fn encode_into(&self, alias: Alias, out: &mut Vec<u8>) {
        let payload: Vec<u8> = match self {
            Entry::IntConstant(v) => v.to_le_bytes().to_vec(),
            Entry::StringConstant(s) | Entry::CallbackRef(s) => s.as_bytes().to_vec(),
            Entry::OpCode(op) => vec![*op as u8],
        };
        out.extend_from_slice(&alias.raw().to_le_bytes());
        out.push(self.kind() as u8);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
    }

    /// Decode the record starting at `offset`.
    ///
    /// Returns the alias, the entry, and the offset of the next record.
    pub fn decode_at(bytes: &[u8], offset: usize) -> Result<(Alias, Entry, usize), LoadError> {
        let header = bytes
            .get(offset..offset + RECORD_HEADER_LEN)
            .ok_or(LoadError::Truncated { offset })?;
        let alias = Alias(u32::from_le_bytes([header[0], header[1], header[2], header[3]]));
        let kind_byte = header[4];
        let len = u32::from_le_bytes([header[5], header[6], header[7], header[8]]) as usize;

        let kind = EntryKind::from_byte(kind_byte).ok_or(LoadError::InvalidKind {
            offset: offset + 4,
            kind: kind_byte,
        })?;

        let start = offset + RECORD_HEADER_LEN;
        let end = start
            .checked_add(len)
            .ok_or(LoadError::Truncated { offset })?;
        let payload = bytes.get(start..end).ok_or(LoadError::Truncated { offset })?;

        let entry = match kind {
            EntryKind::IntConstant => {
                let arr: [u8; 8] =
                    payload
                        .try_into()
                        .map_err(|_| LoadError::BadPayloadLength {
                            alias,
                            expected: 8,
                            found: payload.len(),
                        })?;
                Entry::IntConstant(i64::from_le_bytes(arr))
            }
            EntryKind::StringConstant => Entry::StringConstant(decode_text(alias, payload)?),
            EntryKind::CallbackRef => Entry::CallbackRef(decode_text(alias, payload)?),
            EntryKind::OpCode => match payload {
                [byte] => Entry::OpCode(OpKind::try_from(*byte)?),
                _ => {
                    return Err(LoadError::BadPayloadLength {
                        alias,
                        expected: 1,
                        found: payload.len(),
                    })
                }
            },
        };

        Ok((alias, entry, end))
    }
}

fn decode_text(alias: Alias, payload: &[u8]) -> Result<String, LoadError> {
    std::str::from_utf8(payload)
        .map(str::to_owned)
        .map_err(|_| LoadError::InvalidUtf8 { alias })
}
