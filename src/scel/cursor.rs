// Little-endian cursor over a seekable SCEL byte source.
//
// Reads fixed-width integers and length-prefixed UTF-16LE strings.  A
// short u16 read yields 0 instead of an error: the phrase table loop uses
// that soft zero to detect the end of the source.  Every other short read
// is a `DecodeError::Truncated`.

use std::io::{self, Read, Seek, SeekFrom};

use super::error::DecodeError;

/// Positioned reader used by the SCEL decoder.
#[derive(Debug)]
pub struct BinaryCursor<R> {
    inner: R,
}

impl<R: Read + Seek> BinaryCursor<R> {
    /// Wrap a byte source. The cursor starts wherever `inner` is positioned.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read a little-endian `u16`, or 0 if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let mut buf = [0u8; 2];
        if self.fill(&mut buf)? < buf.len() {
            return Ok(0);
        }
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a string stored as a `u16` byte length followed by UTF-16LE units.
    ///
    /// Each unit becomes one `char`; surrogate pairs are not combined, and a
    /// unit in the surrogate range decodes to U+FFFD. An odd byte length is
    /// floored to a whole number of units.
    pub fn read_utf16_string(&mut self) -> Result<String, DecodeError> {
        let units = usize::from(self.read_u16()? / 2);
        let mut raw = vec![0u8; units * 2];
        self.read_exact(&mut raw)?;
        Ok(raw
            .chunks_exact(2)
            .map(|pair| unit_to_char(u16::from_le_bytes([pair[0], pair[1]])))
            .collect())
    }

    /// Move to an absolute offset. Offsets past the end are accepted; the
    /// next mandatory read reports the truncation.
    pub fn seek(&mut self, offset: u64) -> Result<(), DecodeError> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Current absolute offset.
    pub fn tell(&mut self) -> Result<u64, DecodeError> {
        Ok(self.inner.stream_position()?)
    }

    /// Move by `delta` bytes relative to the current offset.
    pub fn skip(&mut self, delta: i64) -> Result<(), DecodeError> {
        if delta < 0 {
            self.inner.seek(SeekFrom::Current(delta))?;
            return Ok(());
        }

        // Forward skips are consumed rather than seeked so that buffered
        // sources keep their buffer.
        let wanted = delta as u64;
        let consumed = io::copy(&mut (&mut self.inner).take(wanted), &mut io::sink())?;
        if consumed < wanted {
            self.inner.seek(SeekFrom::Current((wanted - consumed) as i64))?;
        }
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        let available = self.fill(buf)?;
        if available < buf.len() {
            let end = self.inner.stream_position()?;
            return Err(DecodeError::Truncated {
                offset: end - available as u64,
                needed: buf.len(),
                available,
            });
        }
        Ok(())
    }

    /// Read until `buf` is full or the source is exhausted.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, DecodeError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

#[inline]
fn unit_to_char(unit: u16) -> char {
    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
