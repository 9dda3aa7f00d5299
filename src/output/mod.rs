// Output accumulation and display decoding

use crate::interpreter::io::{OutputSink, SinkError};

/// How emitted bytes are turned into display text.
///
/// Decoding is a host concern: the engine only ever emits raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoding {
    /// Each byte is its own code point (U+0000..=U+00FF). Multi-byte UTF-8
    /// output shows up as several Latin-1 characters.
    #[default]
    CodePoints,
    /// Bytes are UTF-8; invalid sequences become U+FFFD.
    Utf8Lossy,
}

impl Decoding {
    pub fn toggle(self) -> Self {
        match self {
            Decoding::CodePoints => Decoding::Utf8Lossy,
            Decoding::Utf8Lossy => Decoding::CodePoints,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decoding::CodePoints => "code points",
            Decoding::Utf8Lossy => "utf-8",
        }
    }
}

/// Decode `bytes` into text under `decoding`.
pub fn decode(bytes: &[u8], decoding: Decoding) -> String {
    match decoding {
        Decoding::CodePoints => bytes.iter().map(|&b| char::from(b)).collect(),
        Decoding::Utf8Lossy => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Accumulates emitted bytes for later display.
///
/// Line boundaries are indexed as bytes arrive, so a display only decodes the
/// lines it shows. With a retention limit the oldest whole lines are dropped
/// once the buffer holds twice the limit.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
    /// Offset of the first byte of every line; always starts with 0
    line_starts: Vec<usize>,
    limit: Option<usize>,
    discarded: u64,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer {
            bytes: Vec::new(),
            line_starts: vec![0],
            limit: None,
            discarded: 0,
        }
    }

    /// Buffer that keeps roughly the last `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        OutputBuffer {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    pub fn push(&mut self, byte: u8) {
        self.append(byte);
        self.trim();
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.append(byte);
        }
        self.trim();
    }

    fn append(&mut self, byte: u8) {
        self.bytes.push(byte);
        if byte == b'\n' {
            self.line_starts.push(self.bytes.len());
        }
    }

    /// Drop leading lines once the retention limit is exceeded twice over.
    fn trim(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.bytes.len() <= limit * 2 {
            return;
        }

        let wanted = self.bytes.len() - limit;
        let first_kept = self.line_starts.partition_point(|&start| start < wanted);
        // A single line longer than the limit is cut mid-line
        let cut = self.line_starts.get(first_kept).copied().unwrap_or(wanted);

        self.bytes.drain(..cut);
        self.discarded += cut as u64;
        self.line_starts.retain(|&start| start >= cut);
        for start in &mut self.line_starts {
            *start -= cut;
        }
        if self.line_starts.first() != Some(&0) {
            self.line_starts.insert(0, 0);
        }
    }

    /// Bytes currently retained
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Every byte ever pushed, including those trimmed away
    pub fn total_len(&self) -> u64 {
        self.discarded + self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.line_starts.clear();
        self.line_starts.push(0);
        self.discarded = 0;
    }

    pub fn text(&self, decoding: Decoding) -> String {
        decode(&self.bytes, decoding)
    }

    /// Number of display lines. A trailing newline does not open an empty line.
    pub fn line_count(&self) -> usize {
        let count = self.line_starts.len();
        if self.line_starts[count - 1] == self.bytes.len() {
            count - 1
        } else {
            count
        }
    }

    /// Decode line `index` without its newline.
    pub fn line(&self, index: usize, decoding: Decoding) -> Option<String> {
        if index >= self.line_count() {
            return None;
        }
        let start = self.line_starts[index];
        let end = match self.line_starts.get(index + 1) {
            Some(&next) => next - 1,
            None => self.bytes.len(),
        };
        Some(decode(&self.bytes[start..end], decoding))
    }

    /// Decode at most `count` lines starting at line `first`.
    pub fn window(&self, first: usize, count: usize, decoding: Decoding) -> Vec<String> {
        (first..first.saturating_add(count))
            .map_while(|index| self.line(index, decoding))
            .collect()
    }

    /// Get all output as display lines
    pub fn lines(&self, decoding: Decoding) -> Vec<String> {
        self.window(0, self.line_count(), decoding)
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, byte: u8) -> Result<(), SinkError> {
        self.push(byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_point_decoding_maps_each_byte() {
        assert_eq!(decode(&[72, 105], Decoding::CodePoints), "Hi");
        // "é" in UTF-8 is two bytes, each shown as its own character
        assert_eq!(decode(&[0xC3, 0xA9], Decoding::CodePoints), "Ã©");
        assert_eq!(decode(&[0xC3, 0xA9], Decoding::Utf8Lossy), "é");
    }

    #[test]
    fn test_lossy_decoding_replaces_invalid_bytes() {
        assert_eq!(decode(&[0xFF, b'a'], Decoding::Utf8Lossy), "\u{FFFD}a");
    }

    #[test]
    fn test_lines_split_on_newline() {
        let mut buffer = OutputBuffer::new();
        for &b in b"one\ntwo\n" {
            buffer.emit(b).unwrap();
        }
        assert_eq!(buffer.lines(Decoding::CodePoints), vec!["one", "two"]);
        buffer.clear();
        assert!(buffer.lines(Decoding::CodePoints).is_empty());
    }

    #[test]
    fn test_window_decodes_only_requested_lines() {
        let mut buffer = OutputBuffer::new();
        buffer.extend(b"a\nbb\n\nccc");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.window(1, 2, Decoding::CodePoints), vec!["bb", ""]);
        assert_eq!(buffer.window(3, 10, Decoding::CodePoints), vec!["ccc"]);
        assert!(buffer.window(7, 2, Decoding::CodePoints).is_empty());
        assert_eq!(buffer.line(0, Decoding::CodePoints).as_deref(), Some("a"));
    }

    #[test]
    fn test_limit_drops_oldest_whole_lines() {
        let mut buffer = OutputBuffer::with_limit(8);
        for _ in 0..10 {
            buffer.extend(b"1234\n");
        }
        assert_eq!(buffer.total_len(), 50);
        assert!(buffer.bytes().len() <= 16);
        assert!(buffer.bytes().starts_with(b"1234\n"));
        assert!(buffer
            .lines(Decoding::CodePoints)
            .iter()
            .all(|line| line == "1234"));
    }

    #[test]
    fn test_limit_cuts_a_single_long_line() {
        let mut buffer = OutputBuffer::with_limit(4);
        buffer.extend(&[b'x'; 100]);
        assert_eq!(buffer.total_len(), 100);
        assert!(buffer.bytes().len() <= 8);
        assert_eq!(buffer.line_count(), 1);
    }
}
