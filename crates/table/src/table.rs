//! The declarative table: an immutable alias → entry mapping.
//!
//! A table blob is a raw concatenation of records (see [`crate::entry`])
//! with no header. Record order carries no meaning.

use std::collections::HashMap;

use crate::alias::Alias;
use crate::entry::Entry;
use crate::error::{LoadError, UnknownAlias};
use crate::opkind::OpKind;

/// An immutable collection of named entries, loaded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    entries: HashMap<Alias, Entry>,
}

impl Table {
    /// Decode a table blob.
    ///
    /// Fails on an empty blob, on any malformed record, and on a
    /// repeated alias. Loading has no side effects.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut entries = HashMap::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let (alias, entry, next) = Entry::decode_at(bytes, offset)?;
            if entries.insert(alias, entry).is_some() {
                return Err(LoadError::DuplicateAlias(alias));
            }
            offset = next;
        }

        Ok(Self { entries })
    }

    /// Resolve an alias to its entry.
    pub fn lookup(&self, alias: Alias) -> Result<&Entry, UnknownAlias> {
        self.entries.get(&alias).ok_or(UnknownAlias(alias))
    }

    pub fn contains(&self, alias: Alias) -> bool {
        self.entries.contains_key(&alias)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries. Only possible for a
    /// table built in memory; `load` rejects empty blobs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by alias.
    pub fn iter(&self) -> impl Iterator<Item = (Alias, &Entry)> {
        let mut sorted: Vec<(Alias, &Entry)> =
            self.entries.iter().map(|(a, e)| (*a, e)).collect();
        sorted.sort_by_key(|(a, _)| *a);
        sorted.into_iter()
    }

    /// Encode the table to its blob form, records sorted by alias.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (alias, entry) in self.iter() {
            entry.encode_into(alias, &mut bytes);
        }
        bytes
    }

    /// Hex blake3 digest of the encoded blob.
    ///
    /// Identifies a generated table in logs and tooling output. Two
    /// tables with the same entries share a fingerprint regardless of
    /// the record order they were loaded from.
    pub fn fingerprint(&self) -> String {
        blake3::hash(&self.encode()).to_hex().to_string()
    }
}

/// Assembles a table in memory, for generators and tests.
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: HashMap<Alias, Entry>,
    duplicate: Option<Alias>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A repeated alias is reported by [`build`](Self::build).
    pub fn entry(mut self, alias: impl Into<Alias>, entry: Entry) -> Self {
        let alias = alias.into();
        if self.entries.insert(alias, entry).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(alias);
        }
        self
    }

    pub fn int(self, alias: impl Into<Alias>, value: i64) -> Self {
        self.entry(alias, Entry::IntConstant(value))
    }

    pub fn string(self, alias: impl Into<Alias>, value: impl Into<String>) -> Self {
        self.entry(alias, Entry::StringConstant(value.into()))
    }

    pub fn opcode(self, alias: impl Into<Alias>, op: OpKind) -> Self {
        self.entry(alias, Entry::OpCode(op))
    }

    pub fn callback(self, alias: impl Into<Alias>, name: impl Into<String>) -> Self {
        self.entry(alias, Entry::CallbackRef(name.into()))
    }

    pub fn build(self) -> Result<Table, LoadError> {
        match self.duplicate {
            Some(alias) => Err(LoadError::DuplicateAlias(alias)),
            None => Ok(Table {
                entries: self.entries,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        TableBuilder::new()
            .int(0u32, 0)
            .int(1u32, 1)
            .string(2u32, "hello")
            .opcode(3u32, OpKind::Add)
            .callback(4u32, "checkout")
            .build()
            .unwrap()
    }

    #[test]
    fn empty_blob_is_rejected() {
        assert_eq!(Table::load(&[]), Err(LoadError::Empty));
    }

    #[test]
    fn encode_then_load() {
        let table = sample();
        let loaded = Table::load(&table.encode()).unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.len(), 5);
    }

    #[test]
    fn lookup_present_and_absent() {
        let table = sample();
        assert_eq!(table.lookup(Alias(1)), Ok(&Entry::IntConstant(1)));
        assert_eq!(table.lookup(Alias(99)), Err(UnknownAlias(Alias(99))));
        assert!(table.contains(Alias(4)));
        assert!(!table.contains(Alias(5)));
    }

    #[test]
    fn duplicate_alias_in_blob() {
        let mut bytes = Vec::new();
        Entry::IntConstant(1).encode_into(Alias(7), &mut bytes);
        Entry::IntConstant(2).encode_into(Alias(7), &mut bytes);
        assert_eq!(
            Table::load(&bytes),
            Err(LoadError::DuplicateAlias(Alias(7)))
        );
    }

    #[test]
    fn duplicate_alias_in_builder() {
        let result = TableBuilder::new().int(1u32, 1).int(1u32, 2).build();
        assert_eq!(result, Err(LoadError::DuplicateAlias(Alias(1))));
    }

    #[test]
    fn trailing_garbage_is_truncated() {
        let mut bytes = sample().encode();
        let end = bytes.len();
        bytes.extend_from_slice(&[0x01, 0x02]);
        assert_eq!(
            Table::load(&bytes),
            Err(LoadError::Truncated { offset: end })
        );
    }

    #[test]
    fn record_order_is_irrelevant() {
        let mut forward = Vec::new();
        Entry::IntConstant(10).encode_into(Alias(1), &mut forward);
        Entry::IntConstant(20).encode_into(Alias(2), &mut forward);
        let mut reverse = Vec::new();
        Entry::IntConstant(20).encode_into(Alias(2), &mut reverse);
        Entry::IntConstant(10).encode_into(Alias(1), &mut reverse);

        let a = Table::load(&forward).unwrap();
        let b = Table::load(&reverse).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn iter_is_sorted() {
        let aliases: Vec<u32> = sample().iter().map(|(a, _)| a.raw()).collect();
        assert_eq!(aliases, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn fingerprint_is_hex_digest() {
        let fp = sample().fingerprint();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(fp, TableBuilder::new().int(0u32, 0).build().unwrap().fingerprint());
    }
}
