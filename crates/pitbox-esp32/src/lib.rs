//! ESP32 tap-harness serial link for pitbox
//!
//! The tap harness piggybacks on the bike's original coolant-temperature
//! sensor and tacho line and answers `READ\n` requests over USB serial with
//! one line of `RPM:<int>,TEMP:<float>`. This crate owns the raw device
//! I/O; framing and interpretation live in the core crate.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{debug, trace};

/// The request line the tap firmware answers to.
const REQUEST: &[u8] = b"READ\n";

/// A blocking request/response link to the tap harness.
///
/// The device node is opened as a plain file; the port itself is expected
/// to be configured beforehand (`stty -F /dev/ttyUSB0 115200 raw`). The
/// firmware answers every request, so reads are plain blocking line reads.
#[derive(Debug)]
pub struct SerialLink {
    device: String,
    reader: BufReader<File>,
    writer: File,
}

impl SerialLink {
    /// Open the tap device at the given path.
    ///
    /// Read and write sides get their own descriptors so the read buffer
    /// never interferes with request writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let writer = OpenOptions::new().append(true).open(path)?;
        let reader = BufReader::new(File::open(path)?);

        debug!("opened tap device {}", path.display());
        Ok(Self {
            device: path.display().to_string(),
            reader,
            writer,
        })
    }

    /// The device path this link was opened on.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Send one `READ` request and return the response line, trimmed of
    /// the line terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the device reaches EOF
    /// before answering.
    pub fn request(&mut self) -> std::io::Result<String> {
        self.writer.write_all(REQUEST)?;
        self.writer.flush()?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "tap device closed the line",
            ));
        }

        let line = line.trim_end_matches(['\r', '\n']).to_string();
        trace!(device = %self.device, response = %line, "tap round trip");
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_device(tag: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pitbox_esp32_{tag}_{}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_open_missing_device_fails() {
        let result = SerialLink::open("/nonexistent/ttyUSB99");
        assert!(result.is_err());
    }

    #[test]
    fn test_request_round_trip() {
        // A seeded regular file stands in for the device: the reader
        // consumes the canned response while the request is appended.
        let path = seeded_device("roundtrip", "RPM:5500,TEMP:85.5\n");

        let mut link = SerialLink::open(&path).unwrap();
        let line = link.request().unwrap();
        assert_eq!(line, "RPM:5500,TEMP:85.5");

        // The request actually went out on the line.
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("READ\n"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_request_strips_crlf() {
        let path = seeded_device("crlf", "RPM:1200,TEMP:40.0\r\n");

        let mut link = SerialLink::open(&path).unwrap();
        assert_eq!(link.request().unwrap(), "RPM:1200,TEMP:40.0");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_sequential_requests_read_sequential_lines() {
        let path = seeded_device("seq", "RPM:1000,TEMP:50.0\nRPM:2000,TEMP:55.0\n");

        let mut link = SerialLink::open(&path).unwrap();
        assert_eq!(link.request().unwrap(), "RPM:1000,TEMP:50.0");
        assert_eq!(link.request().unwrap(), "RPM:2000,TEMP:55.0");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_device_reports_path() {
        let path = seeded_device("name", "x\n");

        let link = SerialLink::open(&path).unwrap();
        assert_eq!(link.device(), path.display().to_string());

        let _ = std::fs::remove_file(&path);
    }
}
