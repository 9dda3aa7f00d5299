//! Byte sinks and sources wired into a run
//!
//! The engine's only observable side effect is a sequence of [`OutputSink::emit`]
//! calls, one per executed `.`, delivered synchronously and in program order.
//! Input for `,` is pulled on demand from an optional [`InputSource`].

use std::fmt;
use std::io::{self, Read, Write};

/// Failure reported by an output sink. Aborts the run immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        SinkError {
            message: message.into(),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SinkError {}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        SinkError::new(err.to_string())
    }
}

/// Receives one byte per executed `.` instruction
pub trait OutputSink {
    fn emit(&mut self, byte: u8) -> Result<(), SinkError>;
}

impl<F> OutputSink for F
where
    F: FnMut(u8) -> Result<(), SinkError>,
{
    fn emit(&mut self, byte: u8) -> Result<(), SinkError> {
        self(byte)
    }
}

/// Sink that forwards every byte to an [`io::Write`], flushing after each one
/// so output appears as the program produces it.
pub struct WriteSink<W: Write> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        WriteSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriteSink<W> {
    fn emit(&mut self, byte: u8) -> Result<(), SinkError> {
        self.writer.write_all(&[byte])?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Supplies bytes for `,`. Returning `None` signals exhaustion.
pub trait InputSource {
    fn next_byte(&mut self) -> Option<u8>;
}

/// Input drawn from an in-memory byte buffer
#[derive(Debug, Clone, Default)]
pub struct ByteInput {
    bytes: Vec<u8>,
    position: usize,
}

impl ByteInput {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        ByteInput {
            bytes: bytes.into(),
            position: 0,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &[u8] {
        &self.bytes[self.position..]
    }
}

impl InputSource for ByteInput {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.position).copied()?;
        self.position += 1;
        Some(byte)
    }
}

/// Input read one byte at a time from an [`io::Read`].
///
/// End of stream and read errors both count as exhaustion; `Interrupted`
/// reads are retried.
pub struct ReaderInput<R: Read> {
    reader: R,
}

impl<R: Read> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        ReaderInput { reader }
    }
}

impl<R: Read> InputSource for ReaderInput<R> {
    fn next_byte(&mut self) -> Option<u8> {
        let mut buffer = [0u8; 1];
        loop {
            match self.reader.read(&mut buffer) {
                Ok(0) => return None,
                Ok(_) => return Some(buffer[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_sink() {
        let mut seen = Vec::new();
        let mut sink = |b: u8| -> Result<(), SinkError> {
            seen.push(b);
            Ok(())
        };
        sink.emit(1).unwrap();
        sink.emit(2).unwrap();
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_write_sink_forwards_bytes() {
        let mut sink = WriteSink::new(Vec::new());
        sink.emit(b'h').unwrap();
        sink.emit(b'i').unwrap();
        assert_eq!(sink.into_inner(), b"hi".to_vec());
    }

    #[test]
    fn test_byte_input_exhausts() {
        let mut input = ByteInput::new(b"ab".to_vec());
        assert_eq!(input.next_byte(), Some(b'a'));
        assert_eq!(input.remaining(), b"b");
        assert_eq!(input.next_byte(), Some(b'b'));
        assert_eq!(input.next_byte(), None);
        assert_eq!(input.next_byte(), None);
    }

    #[test]
    fn test_reader_input_reads_stream() {
        let mut input = ReaderInput::new(&b"xy"[..]);
        assert_eq!(input.next_byte(), Some(b'x'));
        assert_eq!(input.next_byte(), Some(b'y'));
        assert_eq!(input.next_byte(), None);
    }
}
