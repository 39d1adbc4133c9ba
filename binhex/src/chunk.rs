//! Input parsing: layouts into address-tagged chunks, chunks into records

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;

use crate::error::{EncodeError, Result};
use crate::layout::Layout;
use crate::record::{Record, RECORD_DATA_MAX};

/// A contiguous run of data bytes loaded at `origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub origin: u16,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(origin: u16, data: Vec<u8>) -> Self {
        Self { origin, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Split into records of at most 16 bytes
    pub fn records(&self) -> Records<'_> {
        Records::new(self.origin, &self.data)
    }

    /// True when the chunk's addresses run past `$FFFF` and wrap to `$0000`
    pub fn wraps(&self) -> bool {
        self.origin as usize + self.data.len() > 0x1_0000
    }
}

/// Iterator over the records of one chunk. The address counter
/// advances by each record's byte count, modulo 65536.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    address: u16,
    rest: &'a [u8],
}

impl<'a> Records<'a> {
    pub fn new(origin: u16, data: &'a [u8]) -> Self {
        Self { address: origin, rest: data }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let count = self.rest.len().min(RECORD_DATA_MAX);
        let (data, rest) = self.rest.split_at(count);
        let record = Record::new(self.address, data)?;
        self.address = self.address.wrapping_add(count as u16);
        self.rest = rest;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.len().div_ceil(RECORD_DATA_MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Records<'_> {}

/// Reads chunks from an input stream according to a [`Layout`].
///
/// `OriginPrefixed` and `Raw` yield exactly one chunk holding the rest of
/// the input. `ChunkTable` yields one chunk per origin/length/data triple
/// until no complete origin word is left.
pub struct ChunkReader<R> {
    layout: Layout,
    input: R,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(layout: Layout, input: R) -> Self {
        Self {
            layout,
            input,
            done: false,
        }
    }

    fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        let origin = if self.layout.has_origin() {
            match read_origin(&mut self.input)? {
                Some(origin) => origin,
                None => {
                    debug!("no complete origin word left, end of input");
                    self.done = true;
                    return Ok(None);
                }
            }
        } else {
            0
        };

        let chunk = match self.layout {
            Layout::OriginPrefixed | Layout::Raw => {
                self.done = true;
                let mut data = Vec::new();
                self.input.read_to_end(&mut data)?;
                Chunk::new(origin, data)
            }
            Layout::ChunkTable => {
                let expected = match self.input.read_u16::<LittleEndian>() {
                    Ok(len) => len,
                    Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                        return Err(EncodeError::MissingLength { origin });
                    }
                    Err(err) => return Err(err.into()),
                };
                let mut data = Vec::with_capacity(expected as usize);
                (&mut self.input)
                    .take(u64::from(expected))
                    .read_to_end(&mut data)?;
                if data.len() != expected as usize {
                    return Err(EncodeError::TruncatedChunk {
                        origin,
                        expected,
                        found: data.len(),
                    });
                }
                Chunk::new(origin, data)
            }
        };

        debug!("chunk at ${:04X}: {} bytes", chunk.origin, chunk.len());
        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_chunk();
        if next.is_err() {
            self.done = true;
        }
        next.transpose()
    }
}

/// Read a little-endian origin word. Running out of input anywhere inside
/// the word, including after a single stray byte, is a clean end.
fn read_origin<R: Read>(input: &mut R) -> io::Result<Option<u16>> {
    match input.read_u16::<LittleEndian>() {
        Ok(word) => Ok(Some(word)),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(err) => Err(err),
    }
}
