//! Big-endian record writer, the mirror of the catalog's record reader.

/// Accumulates the bytes of one headerless table.
///
/// Every method appends one field and returns `&mut Self`, so a record reads
/// as one chain:
///
/// ```
/// use test_utils::TableWriter;
///
/// let mut table = TableWriter::new();
/// table.i32(9001).string("metre").f64(1.0).bool(false);
/// assert_eq!(table.len(), 4 + 4 + 5 + 8 + 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableWriter {
    buf: Vec<u8>,
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn i16(&mut self, value: i16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn f64(&mut self, value: f64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(u8::from(value))
    }

    /// Single-byte character.
    pub fn char(&mut self, value: char) -> &mut Self {
        self.u8(value as u8)
    }

    /// Length-prefixed UTF-8 string.
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.i32(value.len() as i32);
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// `None` is written as a negative length.
    pub fn opt_string(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(s) => self.string(s),
            None => self.i32(-1),
        }
    }

    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop the last `count` bytes, leaving a partial record behind.
    pub fn truncate_by(&mut self, count: usize) -> &mut Self {
        let len = self.buf.len().saturating_sub(count);
        self.buf.truncate(len);
        self
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
