//! Hex record rendering and checksums

use std::fmt::{self, Write as _};
use std::io::{self, Write};

/// Maximum number of data bytes carried by one record
pub const RECORD_DATA_MAX: usize = 16;

/// End-of-data record, written once at the end of every output
pub const TERMINATOR: &str = ":00000001FF";

pub const LINE_END: &str = "\r\n";

/// One data record: up to 16 bytes at a 16-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    address: u16,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    /// `None` when `data` is longer than [`RECORD_DATA_MAX`].
    pub fn new(address: u16, data: &'a [u8]) -> Option<Self> {
        if data.len() > RECORD_DATA_MAX {
            return None;
        }
        Some(Self { address, data })
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn byte_count(&self) -> u8 {
        self.data.len() as u8
    }

    /// Two's complement of the byte sum of count, address and data.
    /// The type field is always `00` and adds nothing.
    pub fn checksum(&self) -> u8 {
        let [hi, lo] = self.address.to_be_bytes();
        let sum = self
            .data
            .iter()
            .fold(self.byte_count().wrapping_add(hi).wrapping_add(lo), |acc, &b| {
                acc.wrapping_add(b)
            });
        sum.wrapping_neg()
    }

    /// Write the record followed by CR LF
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut line = String::with_capacity(11 + self.data.len() * 2 + LINE_END.len());
        // Writing into a String cannot fail
        let _ = write!(line, "{self}");
        line.push_str(LINE_END);
        out.write_all(line.as_bytes())
    }
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{:02X}{:04X}00", self.byte_count(), self.address)?;
        for b in self.data {
            write!(f, "{:02X}", b)?;
        }
        write!(f, "{:02X}", self.checksum())
    }
}

pub fn write_terminator<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(TERMINATOR.as_bytes())?;
    out.write_all(LINE_END.as_bytes())
}
