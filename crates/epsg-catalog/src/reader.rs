//! Big-endian record reader shared by every catalog table.
//!
//! Tables have no header and no record count: a table ends when the input
//! is exhausted exactly at a record boundary. Running out of input inside a
//! record is a [`CatalogError::Truncated`] error.

use crate::error::{CatalogError, Result};
use bytes::{Buf, Bytes};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::warn;

pub struct RecordReader {
    table: String,
    data: Bytes,
    replaced_strings: usize,
}

impl RecordReader {
    pub fn new(table: impl Into<String>, data: Bytes) -> Self {
        Self {
            table: table.into(),
            data,
            replaced_strings: 0,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// True once every byte has been consumed. Checked before each record.
    pub fn is_at_end(&self) -> bool {
        !self.data.has_remaining()
    }

    fn ensure(&self, len: usize) -> Result<()> {
        if self.data.remaining() < len {
            Err(CatalogError::Truncated {
                table: self.table.clone(),
            })
        } else {
            Ok(())
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data.get_u8())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.data.get_i16())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.data.get_i32())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(self.data.get_f64())
    }

    /// A single byte; only `1` is true.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? == 1)
    }

    /// One byte interpreted as a character (axis abbreviations).
    pub fn read_char(&mut self) -> Result<char> {
        Ok(char::from(self.read_u8()?))
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        self.data.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Strings so far that held invalid UTF-8.
    pub fn replaced_strings(&self) -> usize {
        self.replaced_strings
    }

    /// Length-prefixed UTF-8. A negative length is `None`, zero is `""`, and
    /// the text stops at the first NUL byte. Invalid sequences become U+FFFD.
    pub fn read_string(&mut self) -> Result<Option<String>> {
        let len = self.read_i32()?;
        if len < 0 {
            return Ok(None);
        }
        let len = len as usize;
        self.ensure(len)?;
        let raw = self.data.split_to(len);
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let text = match String::from_utf8_lossy(&raw[..end]) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => {
                self.replaced_strings += 1;
                warn!(table = %self.table, text = %text, "Invalid UTF-8 in catalog string, replaced");
                text
            }
        };
        Ok(Some(text))
    }

    /// Like [`read_string`](Self::read_string) but absent text reads as empty.
    pub fn read_text(&mut self) -> Result<String> {
        Ok(self.read_string()?.unwrap_or_default())
    }

    /// An id referencing an already-decoded table. Zero means no reference;
    /// any other id must be present in `table`.
    pub fn read_ref<V: Clone>(
        &mut self,
        field: &'static str,
        table: &HashMap<i32, V>,
    ) -> Result<Option<V>> {
        let id = self.read_i32()?;
        self.resolve(field, id, table)
    }

    pub fn resolve<V: Clone>(
        &self,
        field: &'static str,
        id: i32,
        table: &HashMap<i32, V>,
    ) -> Result<Option<V>> {
        if id == 0 {
            return Ok(None);
        }
        table
            .get(&id)
            .cloned()
            .map(Some)
            .ok_or_else(|| CatalogError::unresolved(&self.table, field, id))
    }
}
