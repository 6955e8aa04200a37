//! Raw datagram capture.
//!
//! Writes one line per datagram, before any decoding:
//!
//! ```text
//! [1718035200123] Opcode: 101 | Length: 44 bytes | Hex: 00 65 00 00 ...
//! ```
//!
//! Used to chase wire-format drift against what the sender actually put on
//! the network. Write failures are logged and never stop ingestion.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tacfeed_protocol::OPCODE_OFFSET;
use tracing::{info, warn};

use crate::TacfeedError;

/// An open capture file.
pub struct RawCapture {
    path: PathBuf,
    out: LineWriter<File>,
    failed: bool,
}

impl RawCapture {
    /// Creates `path`, truncating anything left from a previous run.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TacfeedError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| TacfeedError::Capture {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "raw capture started");
        Ok(Self {
            path,
            out: LineWriter::new(file),
            failed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one datagram. Only the first failure in a row is logged.
    pub fn record(&mut self, datagram: &[u8]) {
        let line = format_line(unix_millis(), datagram);
        match self.out.write_all(line.as_bytes()) {
            Ok(()) => self.failed = false,
            Err(e) => {
                if !self.failed {
                    warn!(path = %self.path.display(), error = %e, "raw capture write failed");
                }
                self.failed = true;
            }
        }
    }
}

/// Upper-case hex bytes separated by single spaces.
pub(crate) fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02X}");
    }
    out
}

fn format_line(unix_ms: u128, datagram: &[u8]) -> String {
    let opcode = match datagram.get(OPCODE_OFFSET) {
        Some(code) => code.to_string(),
        None => "?".to_string(),
    };
    format!(
        "[{unix_ms}] Opcode: {opcode} | Length: {} bytes | Hex: {}\n",
        datagram.len(),
        hex(datagram)
    )
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tacfeed-{}-{name}.log", std::process::id()))
    }

    #[test]
    fn test_hex_upper_case_space_separated() {
        assert_eq!(hex(&[0x00, 0x65, 0xAB]), "00 65 AB");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_format_line_layout() {
        let line = format_line(42, &[0x00, 0x66, 0x01]);
        assert_eq!(line, "[42] Opcode: 102 | Length: 3 bytes | Hex: 00 66 01\n");
    }

    #[test]
    fn test_format_line_without_opcode_byte() {
        let line = format_line(1, &[0x07]);
        assert_eq!(line, "[1] Opcode: ? | Length: 1 bytes | Hex: 07\n");
    }

    #[test]
    fn test_create_truncates_previous_capture() {
        let path = temp_path("truncate");
        std::fs::write(&path, "left over\n").unwrap();

        let mut capture = RawCapture::create(&path).unwrap();
        capture.record(&[0x00, 0x65]);
        drop(capture);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("left over"));
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with("Opcode: 101 | Length: 2 bytes | Hex: 00 65\n"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let path = temp_path("missing-dir").join("raw.log");
        let err = RawCapture::create(&path).err().unwrap();
        assert!(matches!(err, TacfeedError::Capture { .. }));
    }
}
