//! Encoder driving layout parsing and record emission

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::chunk::ChunkReader;
use crate::error::{EncodeError, Result};
use crate::layout::Layout;
use crate::record::write_terminator;

/// Counts gathered during one encode pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub chunks: usize,
    /// Data records only, the terminator is not counted
    pub records: usize,
    pub data_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HexEncoder {
    cancel: Option<Arc<AtomicBool>>,
}

impl HexEncoder {
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Stop encoding with [`EncodeError::Cancelled`] once `flag` is set.
    /// The flag is polled before every record; a cancelled run never
    /// writes the terminator.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    // ===== Public API =====

    /// Encode the whole of `input` and write the records to `output`.
    ///
    /// Each record is handed to `output` with a single `write_all`, so wrap
    /// unbuffered sinks such as files in a `BufWriter`.
    pub fn encode<R: Read, W: Write>(
        &self,
        layout: Layout,
        input: R,
        mut output: W,
    ) -> Result<EncodeSummary> {
        let mut summary = EncodeSummary::default();

        for chunk in ChunkReader::new(layout, input) {
            let chunk = chunk?;
            summary.chunks += 1;
            if chunk.wraps() {
                warn!(
                    "chunk at ${:04X} ({} bytes) wraps past $FFFF",
                    chunk.origin,
                    chunk.len()
                );
            }
            for record in chunk.records() {
                self.check_cancelled()?;
                record.write_to(&mut output)?;
                summary.records += 1;
                summary.data_bytes += record.data().len();
            }
        }

        self.check_cancelled()?;
        write_terminator(&mut output)?;
        output.flush()?;

        info!(
            "{}: {} chunks, {} records, {} data bytes",
            layout, summary.chunks, summary.records, summary.data_bytes
        );
        Ok(summary)
    }

    /// Encode an in-memory image into hex record text.
    pub fn encode_bytes(&self, layout: Layout, input: &[u8]) -> Result<String> {
        let mut out = Vec::with_capacity(input.len() * 3 + 16);
        self.encode(layout, input, &mut out)?;
        // Records are pure ASCII
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(EncodeError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Encode with a default [`HexEncoder`].
pub fn encode<R: Read, W: Write>(layout: Layout, input: R, output: W) -> Result<EncodeSummary> {
    HexEncoder::new().encode(layout, input, output)
}

pub fn encode_bytes(layout: Layout, input: &[u8]) -> Result<String> {
    HexEncoder::new().encode_bytes(layout, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_raw_three_bytes() {
        let text = encode_bytes(Layout::Raw, &[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(text, ":03000000010203F7\r\n:00000001FF\r\n");
    }

    #[test]
    fn test_origin_prefixed_two_bytes() {
        let text = encode_bytes(Layout::OriginPrefixed, &[0x00, 0x10, 0xAA, 0xBB]).unwrap();
        assert_eq!(text, ":02100000AABB89\r\n:00000001FF\r\n");
    }

    #[test]
    fn test_empty_input_only_terminator() {
        for layout in Layout::ALL {
            let text = encode_bytes(layout, &[]).unwrap();
            assert_eq!(text, ":00000001FF\r\n", "layout {layout}");
        }
    }

    #[test]
    fn test_seventeen_bytes_split() {
        let data: Vec<u8> = (1..=17).collect();
        let text = encode_bytes(Layout::Raw, &data).unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(":100000000102"));
        assert!(lines[1].starts_with(":0100100011"));
        assert_eq!(lines[2], ":00000001FF");
    }

    #[test]
    fn test_chunk_table_skips_empty_chunks() {
        let input = [
            0x00, 0x20, 0x00, 0x00, // $2000: empty
            0x00, 0x30, 0x01, 0x00, 0x55, // $3000: 1 byte
        ];
        let text = encode_bytes(Layout::ChunkTable, &input).unwrap();
        assert_eq!(text, ":01300000557A\r\n:00000001FF\r\n");
    }

    #[test]
    fn test_summary_counts() {
        let mut input = vec![0x00, 0x20, 0x20, 0x00];
        input.extend(0..0x20u8);
        input.extend([0x00, 0x40, 0x03, 0x00, 1, 2, 3]);

        let mut out = Vec::new();
        let summary = encode(Layout::ChunkTable, &input[..], &mut out).unwrap();
        assert_eq!(
            summary,
            EncodeSummary {
                chunks: 2,
                records: 3,
                data_bytes: 0x23,
            }
        );
    }

    #[test]
    fn test_cancel_before_start() {
        let flag = Arc::new(AtomicBool::new(true));
        let encoder = HexEncoder::new().with_cancel_flag(flag);
        let mut out = Vec::new();
        let err = encoder.encode(Layout::Raw, &[1u8, 2, 3][..], &mut out).unwrap_err();
        assert!(matches!(err, EncodeError::Cancelled));
        assert!(!String::from_utf8_lossy(&out).contains(":00000001FF"));
    }

    /// Sink that raises the cancel flag once the first record lands
    struct CancellingWriter {
        written: Vec<u8>,
        flag: Arc<AtomicBool>,
    }

    impl Write for CancellingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            self.flag.store(true, Ordering::Relaxed);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_cancel_between_records() {
        let flag = Arc::new(AtomicBool::new(false));
        let encoder = HexEncoder::new().with_cancel_flag(flag.clone());
        let mut sink = CancellingWriter {
            written: Vec::new(),
            flag,
        };
        let data: Vec<u8> = (0..40).collect();

        let err = encoder.encode(Layout::Raw, &data[..], &mut sink).unwrap_err();
        assert!(matches!(err, EncodeError::Cancelled));

        let text = String::from_utf8_lossy(&sink.written);
        assert_eq!(text.matches("\r\n").count(), 1);
        assert!(text.starts_with(":10000000000102"));
        assert!(!text.contains(":00000001FF"));
    }

    #[test]
    fn test_unset_cancel_flag_is_ignored() {
        let flag = Arc::new(AtomicBool::new(false));
        let encoder = HexEncoder::new().with_cancel_flag(flag.clone());
        let text = encoder.encode_bytes(Layout::Raw, &[0x01, 0x02, 0x03]).unwrap();
        assert!(text.ends_with(":00000001FF\r\n"));
        assert!(!flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_truncated_chunk_writes_no_terminator() {
        let mut out = Vec::new();
        let err = encode(Layout::ChunkTable, &[0x00, 0x20, 0x08, 0x00, 0x01][..], &mut out)
            .unwrap_err();
        assert!(matches!(err, EncodeError::TruncatedChunk { .. }));
        assert!(!String::from_utf8_lossy(&out).contains(":00000001FF"));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_read_error_is_io() {
        for layout in Layout::ALL {
            let err = encode(layout, FailingReader, Vec::new()).unwrap_err();
            assert!(matches!(err, EncodeError::Io(ref e) if e.kind() == io::ErrorKind::PermissionDenied));
        }
    }
}
