//! Line sources feeding the ingest loop.
//!
//! The [`LineSource`] trait abstracts over the serial port and any other
//! byte stream (a capture file, an in-memory buffer in tests), so the
//! ingest loop can be exercised without hardware.

use std::io::{self, BufRead};

use crate::error::{Error, Result};

/// A source of newline-terminated text lines.
pub trait LineSource {
    /// Read the next complete line, without its terminator.
    ///
    /// Returns `Ok(None)` when no complete line arrived within the source's
    /// read timeout; the caller should simply try again. Returns
    /// [`Error::EndOfStream`] once the source is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Human-readable description used in logs.
    fn describe(&self) -> String;
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn read_line(&mut self) -> Result<Option<String>> {
        (**self).read_line()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Pull one line out of `reader`, keeping partial data in `pending`
/// across timeouts.
///
/// Bytes are decoded as UTF-8; invalid sequences are replaced rather than
/// failing the whole line.
pub(crate) fn next_line<R: BufRead + ?Sized>(
    reader: &mut R,
    pending: &mut Vec<u8>,
) -> Result<Option<String>> {
    match reader.read_until(b'\n', pending) {
        Ok(0) if pending.is_empty() => Err(Error::EndOfStream),
        // read_until stops only at the terminator or at EOF, so either way
        // `pending` now holds a whole line
        Ok(_) => Ok(Some(take_line(pending))),
        Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
            Ok(None)
        }
        Err(e) => Err(Error::Io(e)),
    }
}

fn take_line(pending: &mut Vec<u8>) -> String {
    let bytes = std::mem::take(pending);
    let text = String::from_utf8_lossy(&bytes);
    text.trim_end_matches(['\r', '\n']).to_string()
}

/// A [`LineSource`] over any buffered reader.
///
/// Used to replay captured serial output from a file and in tests.
pub struct ReaderSource<R> {
    reader: R,
    pending: Vec<u8>,
    label: String,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self::with_label(reader, "reader")
    }

    /// Wrap a reader with a label for log messages.
    pub fn with_label(reader: R, label: impl Into<String>) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            label: label.into(),
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        next_line(&mut self.reader, &mut self.pending)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn test_reader_source_lines() {
        let mut source = ReaderSource::new(Cursor::new("a: 1 2 3 4\r\nb: 5 6 7 8\nlast"));

        assert_eq!(source.read_line().unwrap().as_deref(), Some("a: 1 2 3 4"));
        assert_eq!(source.read_line().unwrap().as_deref(), Some("b: 5 6 7 8"));
        assert_eq!(source.read_line().unwrap().as_deref(), Some("last"));
        assert!(matches!(source.read_line(), Err(Error::EndOfStream)));
    }

    #[test]
    fn test_reader_source_empty() {
        let mut source = ReaderSource::new(Cursor::new(""));
        assert!(matches!(source.read_line(), Err(Error::EndOfStream)));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut source = ReaderSource::new(Cursor::new(b"x: \xff 1 2 3\n".to_vec()));
        let line = source.read_line().unwrap().unwrap();
        assert!(line.starts_with("x: "));
        assert!(line.contains('\u{FFFD}'));
    }

    /// Yields its chunks one `read` at a time, timing out between them,
    /// like a serial port with a short read timeout.
    struct Chunked {
        chunks: Vec<&'static [u8]>,
        timed_out: bool,
    }

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.timed_out && !self.chunks.is_empty() {
                self.timed_out = true;
                return Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"));
            }
            self.timed_out = false;
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0);
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_partial_line_survives_timeouts() {
        let reader = io::BufReader::new(Chunked {
            chunks: vec![b"Reading: 18 ", b"55.2 23.1 1.8\n"],
            timed_out: false,
        });
        let mut source = ReaderSource::new(reader);

        let mut lines = Vec::new();
        loop {
            match source.read_line() {
                Ok(Some(line)) => lines.push(line),
                Ok(None) => continue,
                Err(Error::EndOfStream) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(lines, vec!["Reading: 18 55.2 23.1 1.8".to_string()]);
    }
}
