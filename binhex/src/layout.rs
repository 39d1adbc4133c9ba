//! Input layout selection

use std::fmt;
use std::str::FromStr;

use crate::error::EncodeError;

/// How the input byte stream is split into address-tagged chunks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Origin word (lsb, msb) followed by data to end of input.
    OriginPrefixed,
    /// Repeated origin word, length word and `length` data bytes.
    ChunkTable,
    /// Data only, origin fixed at `$0000`.
    Raw,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::OriginPrefixed, Layout::ChunkTable, Layout::Raw];

    /// Numeric tag used on the command line
    pub fn tag(self) -> u8 {
        match self {
            Layout::OriginPrefixed => 1,
            Layout::ChunkTable => 2,
            Layout::Raw => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, EncodeError> {
        match tag {
            1 => Ok(Layout::OriginPrefixed),
            2 => Ok(Layout::ChunkTable),
            3 => Ok(Layout::Raw),
            other => Err(EncodeError::InvalidLayout(other.to_string())),
        }
    }

    /// Whether the input starts with an origin word
    pub fn has_origin(self) -> bool {
        !matches!(self, Layout::Raw)
    }
}

impl FromStr for Layout {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let tag = trimmed
            .parse::<u8>()
            .map_err(|_| EncodeError::InvalidLayout(trimmed.to_string()))?;
        Self::from_tag(tag)
    }
}

impl TryFrom<u8> for Layout {
    type Error = EncodeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_tag(tag)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::OriginPrefixed => "origin-prefixed",
            Layout::ChunkTable => "chunk table",
            Layout::Raw => "raw",
        };
        write!(f, "{} ({})", name, self.tag())
    }
}
