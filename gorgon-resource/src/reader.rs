//! Chunk stream reader
//!
//! Every chunk is framed as `tag: i32, size: i32, payload: [u8; size]`,
//! little-endian. Container chunks nest further chunks inside their payload;
//! parsers loop over sub-chunks until the position reaches the parent's end
//! boundary and skip whatever they do not recognise.
//!
//! All reads are bounds checked against the stream length up front, so a
//! chunk that claims more bytes than the stream holds fails with
//! [`Error::Truncated`] instead of a short read.

use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::gid::Gid;
use crate::guid::{Guid, LONG_GUID_SIZE, SHORT_GUID_SIZE};

/// Size of a chunk header (tag + size)
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// Seekable byte source
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Header of a single chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub gid: Gid,
    /// Declared payload size in bytes
    pub size: u32,
    /// Absolute offset of the first payload byte
    pub offset: u64,
}

impl ChunkHeader {
    /// Absolute offset one past the last payload byte
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.size)
    }
}

/// Little-endian reader over a seekable stream with chunk boundary tracking
pub struct ChunkReader<'a> {
    inner: Box<dyn ReadSeek + 'a>,
    position: u64,
    len: u64,
}

impl<'a> ChunkReader<'a> {
    /// Wrap a stream, starting at its current position
    pub fn new<R: ReadSeek + 'a>(mut inner: R) -> Result<Self> {
        let position = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(position))?;
        Ok(Self {
            inner: Box::new(inner),
            position,
            len,
        })
    }

    /// Current absolute position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total stream length
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left before the end of the stream
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    /// Bytes left before `end`, zero once it has been reached
    pub fn remaining_until(&self, end: u64) -> u64 {
        end.saturating_sub(self.position)
    }

    fn ensure(&self, need: u64) -> Result<()> {
        if need > self.remaining() {
            return Err(Error::Truncated {
                offset: self.position,
                need,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    /// Fill `buf` from the stream
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure(buf.len() as u64)?;
        self.inner.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_gid(&mut self) -> Result<Gid> {
        self.read_u32().map(Gid)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure(len as u64)?;
        let mut buf = vec![0u8; len];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Length-prefixed text: `u32` byte count followed by the bytes
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()?;
        self.read_fixed_string(len as usize)
    }

    /// Text occupying exactly `len` bytes; invalid UTF-8 is replaced
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    pub fn read_guid(&mut self) -> Result<Guid> {
        self.read_array::<SHORT_GUID_SIZE>().map(Guid::from_bytes)
    }

    pub fn read_long_guid(&mut self) -> Result<Guid> {
        self.read_array::<LONG_GUID_SIZE>().map(Guid::from_long)
    }

    /// Read an identifier whose width is inferred from the available size
    pub fn read_guid_sized(&mut self, size: u32) -> Result<Guid> {
        if size as usize >= LONG_GUID_SIZE {
            self.read_long_guid()
        } else {
            self.read_guid()
        }
    }

    /// Read a chunk header and check its payload fits in the stream
    pub fn read_chunk_header(&mut self) -> Result<ChunkHeader> {
        let gid = self.read_gid()?;
        let size = self.read_u32()?;
        let header = ChunkHeader {
            gid,
            size,
            offset: self.position,
        };
        self.ensure(u64::from(size))?;
        Ok(header)
    }

    /// Read a sub-chunk header that must end at or before `end`
    pub fn read_chunk_header_within(&mut self, end: u64) -> Result<ChunkHeader> {
        if self.position + CHUNK_HEADER_SIZE > end {
            return Err(Error::ChunkOverrun {
                gid: Gid::NONE,
                offset: self.position,
                end,
            });
        }
        let header = self.read_chunk_header()?;
        if header.end() > end {
            return Err(Error::ChunkOverrun {
                gid: header.gid,
                offset: header.offset,
                end,
            });
        }
        Ok(header)
    }

    /// End boundary of a payload of `size` bytes starting here
    pub fn chunk_end(&self, size: u32) -> Result<u64> {
        self.ensure(u64::from(size))?;
        Ok(self.position + u64::from(size))
    }

    /// Skip `len` bytes
    pub fn skip(&mut self, len: u64) -> Result<()> {
        self.ensure(len)?;
        if len > 0 {
            self.inner.seek(SeekFrom::Current(len as i64))?;
            self.position += len;
        }
        Ok(())
    }

    /// Move forward to `end`, failing if the position is already past it
    pub fn skip_to(&mut self, end: u64) -> Result<()> {
        if self.position > end {
            return Err(Error::ChunkOverrun {
                gid: Gid::NONE,
                offset: self.position,
                end,
            });
        }
        self.skip(end - self.position)
    }

    /// Leave a chunk: skip whatever its handler did not consume
    pub fn finish_chunk(&mut self, chunk: &ChunkHeader) -> Result<()> {
        if self.position > chunk.end() {
            return Err(Error::ChunkOverrun {
                gid: chunk.gid,
                offset: chunk.offset,
                end: chunk.end(),
            });
        }
        self.skip_to(chunk.end())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::writer::ChunkWriter;

    fn reader(bytes: Vec<u8>) -> ChunkReader<'static> {
        ChunkReader::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_scalars_are_little_endian() {
        let mut r = reader(vec![
            0x01, 0x02, 0x03, 0x04, // u32
            0xFF, 0xFF, 0xFF, 0xFF, // i32
            0x00, 0x00, 0x80, 0x3F, // f32 1.0
            0x34, 0x12, // u16
        ]);
        assert_eq!(r.read_u32().unwrap(), 0x0403_0201);
        assert_eq!(r.read_i32().unwrap(), -1);
        assert_eq!(r.read_f32().unwrap(), 1.0);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_length_prefixed_string() {
        let mut w = ChunkWriter::new();
        w.write_string("hello");
        let mut r = reader(w.into_bytes());
        assert_eq!(r.read_string().unwrap(), "hello");
        assert_eq!(r.position(), 9);
    }

    #[test]
    fn test_read_past_end_is_truncated() {
        let mut r = reader(vec![1, 2]);
        match r.read_u32() {
            Err(Error::Truncated { offset, need, have }) => {
                assert_eq!((offset, need, have), (0, 4, 2));
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn test_chunk_larger_than_stream_is_truncated() {
        let mut w = ChunkWriter::new();
        w.write_gid(Gid::TEXT);
        w.write_u32(100);
        w.write_bytes(&[0; 10]);
        let mut r = reader(w.into_bytes());
        assert!(matches!(r.read_chunk_header(), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_finish_chunk_skips_unread_payload() {
        let mut w = ChunkWriter::new();
        w.chunk(Gid::DATA_INT, |w| {
            w.write_i32(7);
            w.write_i32(8);
        });
        w.write_i32(99);
        let mut r = reader(w.into_bytes());

        let chunk = r.read_chunk_header().unwrap();
        assert_eq!(chunk.gid, Gid::DATA_INT);
        assert_eq!(chunk.size, 8);
        assert_eq!(r.read_i32().unwrap(), 7);
        r.finish_chunk(&chunk).unwrap();
        assert_eq!(r.position(), chunk.end());
        assert_eq!(r.read_i32().unwrap(), 99);
    }

    #[test]
    fn test_sub_chunk_must_stay_inside_parent() {
        let mut w = ChunkWriter::new();
        // Parent claims 12 bytes, child claims 8 bytes of payload: 16 total
        w.write_gid(Gid::FOLDER);
        w.write_u32(12);
        w.write_gid(Gid::TEXT);
        w.write_u32(8);
        w.write_bytes(&[0; 8]);
        let mut r = reader(w.into_bytes());

        let parent = r.read_chunk_header().unwrap();
        let err = r.read_chunk_header_within(parent.end()).unwrap_err();
        assert!(matches!(err, Error::ChunkOverrun { gid: Gid::TEXT, .. }));
    }

    #[test]
    fn test_guid_widths() {
        let guid = Guid::from_u64(0x0102_0304_0506_0708);
        let mut w = ChunkWriter::new();
        w.write_guid(guid);
        w.write_long_guid(guid);
        let mut r = reader(w.into_bytes());
        assert_eq!(r.read_guid_sized(8).unwrap(), guid);
        assert_eq!(r.read_guid_sized(16).unwrap(), guid);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_skip_to_behind_position_fails() {
        let mut r = reader(vec![0; 8]);
        r.skip(6).unwrap();
        assert!(r.skip_to(4).is_err());
        r.skip_to(8).unwrap();
        assert_eq!(r.remaining(), 0);
    }
}
