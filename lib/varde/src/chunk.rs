use crate::constants::BOUNDARY_SCAN_BYTES;
use anyhow::Result;
use memchr::memchr;
use std::io::Read;

/// Sequentially partitions a byte stream into line-aligned chunks of roughly
/// `target_bytes` each. The boundary of every chunk is pushed forward to the
/// next newline (inclusive), so no record ever straddles two chunks; the final
/// chunk is whatever remains and need not end with a newline. Concatenating
/// all chunks reproduces the stream byte for byte.
pub struct ChunkSource<R> {
    reader: R,
    target_bytes: usize,
    // Bytes read past the last emitted newline, prepended to the next chunk.
    carry: Vec<u8>,
    eof: bool,
}

impl<R: Read> ChunkSource<R> {
    pub fn new(reader: R, target_bytes: usize) -> Self {
        Self { reader, target_bytes: target_bytes.max(1), carry: Vec::new(), eof: false }
    }

    /// Produces the next chunk, or `None` once the stream is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if self.eof && self.carry.is_empty() {
            return Ok(None);
        }
        let mut chunk = std::mem::take(&mut self.carry);

        // Fill the fixed-size block.
        if !self.eof && chunk.len() < self.target_bytes {
            let mut filled = chunk.len();
            chunk.resize(self.target_bytes, 0);
            while filled < chunk.len() {
                let n = self.reader.read(&mut chunk[filled..])?;
                if n == 0 {
                    self.eof = true;
                    break;
                }
                filled += n;
            }
            chunk.truncate(filled);
        }

        // Realign: extend forward to the next newline in one buffered scan,
        // carrying anything read past it into the next chunk.
        if !self.eof && chunk.last() != Some(&b'\n') {
            let mut buf = [0u8; BOUNDARY_SCAN_BYTES];
            loop {
                let n = self.reader.read(&mut buf)?;
                if n == 0 {
                    self.eof = true;
                    break;
                }
                match memchr(b'\n', &buf[..n]) {
                    Some(pos) => {
                        chunk.extend_from_slice(&buf[..=pos]);
                        self.carry.extend_from_slice(&buf[pos + 1..n]);
                        break;
                    }
                    None => chunk.extend_from_slice(&buf[..n]),
                }
            }
        }

        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}
