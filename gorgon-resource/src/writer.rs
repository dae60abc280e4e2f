//! Chunk stream writer
//!
//! Produces the same framing [`ChunkReader`](crate::ChunkReader) consumes.
//! Chunk sizes are backpatched when a chunk is closed, so nested chunks can
//! be written without knowing their length up front.

use crate::gid::Gid;
use crate::guid::Guid;
use crate::{CURRENT_VERSION, SIGNATURE};

/// Position of an open chunk's size field
#[derive(Debug, Clone, Copy)]
#[must_use = "an open chunk must be closed with ChunkWriter::end"]
pub struct ChunkMark {
    size_offset: usize,
}

/// In-memory little-endian chunk writer
#[derive(Debug, Default)]
pub struct ChunkWriter {
    buf: Vec<u8>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a container: signature, version and file type
    pub fn container(file_type: Gid) -> Self {
        Self::with_version(CURRENT_VERSION, file_type)
    }

    pub fn with_version(version: u32, file_type: Gid) -> Self {
        let mut w = Self::new();
        w.write_bytes(SIGNATURE);
        w.write_u32(version);
        w.write_gid(file_type);
        w
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_gid(&mut self, gid: Gid) {
        self.write_u32(gid.0);
    }

    pub fn write_guid(&mut self, guid: Guid) {
        self.write_bytes(guid.as_bytes());
    }

    pub fn write_long_guid(&mut self, guid: Guid) {
        self.write_bytes(&guid.to_long());
    }

    /// Length-prefixed text
    pub fn write_string(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.write_bytes(value.as_bytes());
    }

    /// Open a chunk; its size is filled in by [`end`](Self::end)
    pub fn begin(&mut self, gid: Gid) -> ChunkMark {
        self.write_gid(gid);
        let size_offset = self.buf.len();
        self.write_u32(0);
        ChunkMark { size_offset }
    }

    pub fn end(&mut self, mark: ChunkMark) {
        let size = (self.buf.len() - mark.size_offset - 4) as u32;
        self.buf[mark.size_offset..mark.size_offset + 4].copy_from_slice(&size.to_le_bytes());
    }

    /// Write a whole chunk whose payload is produced by `body`
    pub fn chunk(&mut self, gid: Gid, body: impl FnOnce(&mut Self)) {
        let mark = self.begin(gid);
        body(self);
        self.end(mark);
    }

    /// Short identifier chunk
    pub fn guid_chunk(&mut self, guid: Guid) {
        self.chunk(Gid::SGUID, |w| w.write_guid(guid));
    }

    /// Name chunk, text filling the whole payload
    pub fn name_chunk(&mut self, name: &str) {
        self.chunk(Gid::NAME, |w| w.write_bytes(name.as_bytes()));
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let w = ChunkWriter::container(Gid(0x1234));
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..6], b"GORGON");
        assert_eq!(&bytes[6..10], &CURRENT_VERSION.to_le_bytes());
        assert_eq!(&bytes[10..14], &0x1234u32.to_le_bytes());
    }

    #[test]
    fn test_nested_sizes_are_backpatched() {
        let mut w = ChunkWriter::new();
        let outer = w.begin(Gid::FOLDER);
        w.chunk(Gid::DATA_INT, |w| w.write_i32(5));
        w.end(outer);
        let bytes = w.into_bytes();

        assert_eq!(bytes.len(), 8 + 8 + 4);
        assert_eq!(&bytes[4..8], &12u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &4u32.to_le_bytes());
    }
}
