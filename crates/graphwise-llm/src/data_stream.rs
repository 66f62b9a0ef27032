//! Text data-stream line protocol.
//!
//! A summary stream is UTF-8, newline-delimited. Each line starts with a
//! part discriminator followed by `:` and a JSON value. Text deltas use the
//! `0` discriminator with a JSON string literal:
//!
//! ```text
//! 0:"Stoicism is "
//! 0:"a school of \"practical\" philosophy.\n"
//! d:{"finishReason":"stop"}
//! ```
//!
//! Only `0:` lines carry summary text. Every other discriminator is
//! ignored by the decoder.

use futures::{Stream, StreamExt};
use thiserror::Error;

use crate::buffer_utils::CircularLineBuffer;

pub const TEXT_PART_PREFIX: &str = "0:";
pub const FINISH_PART_PREFIX: &str = "d:";

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("text part is not a quoted literal: {0}")]
    MissingQuotes(String),

    #[error("invalid string literal: {0}")]
    InvalidLiteral(String),

    #[error("invalid UTF-8 in stream line: {0}")]
    InvalidUtf8(String),
}

/// Encode one text delta as a `0:` line (terminated by `\n`)
pub fn encode_text_part(text: &str) -> String {
    // A String always serializes to a JSON literal
    let literal = serde_json::Value::String(text.to_string()).to_string();
    format!("{}{}\n", TEXT_PART_PREFIX, literal)
}

/// Encode the closing `d:` line
pub fn encode_finish_part(finish_reason: Option<&str>) -> String {
    let body = serde_json::json!({ "finishReason": finish_reason.unwrap_or("stop") });
    format!("{}{}\n", FINISH_PART_PREFIX, body)
}

/// Decode a single complete line.
///
/// Returns `None` for lines that are not text parts.
pub fn decode_text_part(line: &str) -> Option<Result<String, DecodeError>> {
    let literal = line.trim().strip_prefix(TEXT_PART_PREFIX)?;

    if literal.len() < 2 || !literal.starts_with('"') || !literal.ends_with('"') {
        return Some(Err(DecodeError::MissingQuotes(literal.to_string())));
    }

    Some(
        serde_json::from_str::<String>(literal)
            .map_err(|e| DecodeError::InvalidLiteral(e.to_string())),
    )
}

/// Incremental decoder for a summary stream.
///
/// Feed raw network chunks in arrival order; each byte must be fed exactly
/// once. Only `\n`-terminated lines are decoded, the tail of a chunk is
/// carried over to the next call. The accumulated text only grows.
pub struct SummaryDecoder {
    buffer: CircularLineBuffer,
    text: String,
    skipped: usize,
}

impl SummaryDecoder {
    pub fn new() -> Self {
        Self {
            buffer: CircularLineBuffer::with_capacity(4096),
            text: String::new(),
            skipped: 0,
        }
    }

    /// Consume a chunk and return the text deltas it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend(chunk);

        let mut deltas = Vec::new();
        while let Some(line_result) = self.buffer.next_line() {
            let decoded = match line_result {
                Ok(line) => decode_text_part(&line),
                Err(e) => Some(Err(DecodeError::InvalidUtf8(e.to_string()))),
            };

            match decoded {
                Some(Ok(delta)) => {
                    self.text.push_str(&delta);
                    deltas.push(delta);
                }
                Some(Err(e)) => {
                    self.skipped += 1;
                    tracing::warn!(error = %e, "Skipping malformed summary line");
                }
                None => {}
            }
        }

        deltas
    }

    /// Summary text decoded so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of malformed lines that were dropped
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Bytes of an unterminated line waiting for the next chunk
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// End of stream: any unterminated remainder is discarded
    pub fn finish(mut self) -> String {
        if !self.buffer.is_empty() {
            tracing::debug!(bytes = self.buffer.len(), "Discarding unterminated summary tail");
            self.buffer.clear();
        }
        self.text
    }
}

impl Default for SummaryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive a byte stream through a [`SummaryDecoder`], calling `on_delta`
/// for each newly decoded fragment. Returns the full summary once the
/// stream completes, or the first transport error.
pub async fn decode_summary_stream<S, B, E, F>(stream: S, mut on_delta: F) -> Result<String, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    F: FnMut(&str),
{
    let mut decoder = SummaryDecoder::new();
    let mut stream = Box::pin(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for delta in decoder.feed(chunk.as_ref()) {
            on_delta(&delta);
        }
    }

    Ok(decoder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_part() {
        assert_eq!(decode_text_part(r#"0:"abc""#), Some(Ok("abc".to_string())));
    }

    #[test]
    fn test_decode_newline_escape() {
        assert_eq!(
            decode_text_part(r#"0:"line1\nline2""#),
            Some(Ok("line1\nline2".to_string()))
        );
    }

    #[test]
    fn test_decode_quote_escape() {
        assert_eq!(
            decode_text_part(r#"0:"say \"hi\"""#),
            Some(Ok("say \"hi\"".to_string()))
        );
    }

    #[test]
    fn test_other_discriminators_ignored() {
        assert_eq!(decode_text_part(r#"d:{"finishReason":"stop"}"#), None);
        assert_eq!(decode_text_part(r#"e:{"x":1}"#), None);
        assert_eq!(decode_text_part(""), None);
    }

    #[test]
    fn test_unquoted_part_is_error() {
        assert!(matches!(
            decode_text_part("0:abc"),
            Some(Err(DecodeError::MissingQuotes(_)))
        ));
        assert!(matches!(
            decode_text_part(r#"0:""#),
            Some(Err(DecodeError::MissingQuotes(_)))
        ));
    }

    #[test]
    fn test_encode_then_decode_line() {
        let line = encode_text_part("a \"b\"\nc");
        assert!(line.ends_with('\n'));
        assert_eq!(decode_text_part(line.trim_end()), Some(Ok("a \"b\"\nc".to_string())));
    }

    #[test]
    fn test_finish_part_shape() {
        assert_eq!(encode_finish_part(None), "d:{\"finishReason\":\"stop\"}\n");
    }

    #[test]
    fn test_decoder_every_split_point() {
        let stream = b"0:\"ab\"\n0:\"cd\"\n";

        for split in 0..=stream.len() {
            let mut decoder = SummaryDecoder::new();
            decoder.feed(&stream[..split]);
            decoder.feed(&stream[split..]);
            assert_eq!(decoder.finish(), "abcd", "split at {}", split);
        }
    }

    #[test]
    fn test_decoder_three_way_splits() {
        let stream = b"0:\"ab\"\n0:\"cd\"\n";

        for first in 0..=stream.len() {
            for second in first..=stream.len() {
                let mut decoder = SummaryDecoder::new();
                decoder.feed(&stream[..first]);
                decoder.feed(&stream[first..second]);
                decoder.feed(&stream[second..]);
                assert_eq!(decoder.text(), "abcd");
            }
        }
    }

    #[test]
    fn test_decoder_skips_malformed_and_continues() {
        let mut decoder = SummaryDecoder::new();
        let deltas = decoder.feed(b"0:\"one \"\n0:broken\nf:{\"messageId\":\"x\"}\n0:\"two\"\n");

        assert_eq!(deltas, vec!["one ".to_string(), "two".to_string()]);
        assert_eq!(decoder.skipped_lines(), 1);
        assert_eq!(decoder.text(), "one two");
    }

    #[test]
    fn test_decoder_discards_unterminated_tail() {
        let mut decoder = SummaryDecoder::new();
        decoder.feed(b"0:\"done\"\n0:\"dangl");

        assert_eq!(decoder.pending_bytes(), 8);
        assert_eq!(decoder.finish(), "done");
    }

    #[tokio::test]
    async fn test_decode_summary_stream_reports_deltas() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(b"0:\"Sto".to_vec()),
            Ok(b"icism\"\n0:\" is\"\nd:{}\n".to_vec()),
        ];

        let mut seen = Vec::new();
        let text = decode_summary_stream(futures::stream::iter(chunks), |d| seen.push(d.to_string()))
            .await
            .unwrap();

        assert_eq!(text, "Stoicism is");
        assert_eq!(seen, vec!["Stoicism".to_string(), " is".to_string()]);
    }

    #[tokio::test]
    async fn test_decode_summary_stream_propagates_transport_error() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![
            Ok(b"0:\"partial\"\n".to_vec()),
            Err("connection reset".to_string()),
        ];

        let result = decode_summary_stream(futures::stream::iter(chunks), |_| {}).await;
        assert_eq!(result, Err("connection reset".to_string()));
    }
}
