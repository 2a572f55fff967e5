//! Incremental newline framing for chunked byte streams.
//!
//! Serial reads hand back whatever happens to be buffered, so sentence
//! boundaries land anywhere relative to read boundaries. The framer
//! accumulates chunks and yields complete lines as they form, carrying the
//! unterminated tail until the rest of the line arrives.

/// Splits an incoming byte stream into newline-terminated lines.
///
/// The concatenation of yielded lines plus the pending tail always equals the
/// concatenation of fed chunks, no matter where the chunk boundaries fall.
/// State is per connection; a new stream gets a new framer.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns an iterator over the complete lines now
    /// buffered. Each line excludes its terminating `\n`; bytes after the
    /// last newline stay pending for the next feed.
    ///
    /// Dropping the iterator early leaves the remaining complete lines
    /// buffered. They are yielded by the next call, never twice.
    pub fn feed(&mut self, chunk: &[u8]) -> Lines<'_> {
        self.pending.extend_from_slice(chunk);
        Lines { framer: self }
    }

    /// The unterminated tail currently buffered.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}

/// Iterator over complete lines, returned by [`LineFramer::feed`].
///
/// The wire is ASCII; any invalid UTF-8 on a line becomes replacement
/// characters and the line then fails sentence classification downstream.
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let nl = self.framer.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.framer.pending.drain(..=nl).collect();
        line.pop();
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(framer: &mut LineFramer, chunk: &[u8]) -> Vec<String> {
        framer.feed(chunk).collect()
    }

    #[test]
    fn test_single_chunk_multiple_lines() {
        let mut framer = LineFramer::new();
        let lines = collect(&mut framer, b"imu;1;2\ngpsrmc;3\n");
        assert_eq!(lines, vec!["imu;1;2", "gpsrmc;3"]);
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn test_tail_carries_across_feeds() {
        let mut framer = LineFramer::new();
        assert!(collect(&mut framer, b"imu;1").is_empty());
        assert_eq!(framer.pending(), b"imu;1");
        let lines = collect(&mut framer, b";2\nrest");
        assert_eq!(lines, vec!["imu;1;2"]);
        assert_eq!(framer.pending(), b"rest");
    }

    #[test]
    fn test_boundary_exactly_on_newline() {
        let mut framer = LineFramer::new();
        assert!(collect(&mut framer, b"abc").is_empty());
        assert_eq!(collect(&mut framer, b"\n"), vec!["abc"]);
        assert_eq!(collect(&mut framer, b"\ndef\n"), vec!["", "def"]);
    }

    #[test]
    fn test_no_newline_is_all_tail() {
        let mut framer = LineFramer::new();
        assert!(collect(&mut framer, b"no newline here").is_empty());
        assert_eq!(framer.pending(), b"no newline here");
    }

    #[test]
    fn test_empty_feed_is_a_no_op() {
        let mut framer = LineFramer::new();
        framer.feed(b"partial");
        assert!(collect(&mut framer, b"").is_empty());
        assert_eq!(framer.pending(), b"partial");
    }

    #[test]
    fn test_chunk_boundaries_do_not_change_lines() {
        let stream = b"imu;100;1;2;3;4;5;6\ngpsrmc;1;2;3\n\nimu;7\ntrailing";
        let mut reference = LineFramer::new();
        let expected: Vec<String> = reference.feed(stream).collect();

        for width in 1..=stream.len() {
            let mut framer = LineFramer::new();
            let mut lines = Vec::new();
            for chunk in stream.chunks(width) {
                lines.extend(framer.feed(chunk));
            }
            assert_eq!(lines, expected, "chunk width {}", width);
            assert_eq!(framer.pending(), reference.pending());
        }
    }

    #[test]
    fn test_dropped_iterator_resumes_without_loss() {
        let mut framer = LineFramer::new();
        let first = framer.feed(b"one\ntwo\nthree\n").next();
        assert_eq!(first.as_deref(), Some("one"));
        let rest: Vec<String> = framer.feed(b"").collect();
        assert_eq!(rest, vec!["two", "three"]);
    }

    #[test]
    fn test_invalid_utf8_becomes_replacement() {
        let mut framer = LineFramer::new();
        let lines = collect(&mut framer, b"ok\n\xff\xfe\n");
        assert_eq!(lines[0], "ok");
        assert_eq!(lines[1], "\u{fffd}\u{fffd}");
    }
}
