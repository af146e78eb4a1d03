//! Incremental server-sent-events parser
//!
//! Feed raw network chunks in, get complete events out. The buffer is kept
//! as bytes because chunk boundaries can fall inside a multi-byte UTF-8
//! sequence (alert payloads carry Korean text).

/// One dispatched SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub name: String,
    pub data: String,
}

/// Stateful parser accumulating partial frames across chunks
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event_name: Option<String>,
    data_lines: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(event) = self.handle_line(line) {
                events.push(event);
            }
        }
        events
    }

    fn handle_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            // blank line dispatches the accumulated frame
            if self.event_name.is_none() && self.data_lines.is_empty() {
                return None;
            }
            let name = self
                .event_name
                .take()
                .unwrap_or_else(|| "message".to_string());
            let data = std::mem::take(&mut self.data_lines).join("\n");
            return Some(SseEvent { name, data });
        }

        if line.starts_with(':') {
            return None; // comment / keep-alive
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event_name = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            _ => {} // id/retry and unknown fields are ignored
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_event() {
        let mut parser = SseParser::new();
        let events = parser.push(b"event: heartbeat\ndata: {}\n\n");
        assert_eq!(
            events,
            vec![SseEvent {
                name: "heartbeat".to_string(),
                data: "{}".to_string(),
            }]
        );
    }

    #[test]
    fn joins_multiline_data() {
        let mut parser = SseParser::new();
        let events = parser.push(b"data: first\ndata: second\n\n");
        assert_eq!(events[0].name, "message");
        assert_eq!(events[0].data, "first\nsecond");
    }

    #[test]
    fn survives_chunk_split_inside_multibyte_char() {
        let frame = "event: exchange-rate-update\ndata: {\"msg\":\"환율\"}\n\n".as_bytes();
        let mut parser = SseParser::new();
        // split in the middle of the second Korean character
        let cut = frame.len() - 8;
        assert!(parser.push(&frame[..cut]).is_empty());
        let events = parser.push(&frame[cut..]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"msg\":\"환율\"}");
    }

    #[test]
    fn skips_comments_and_crlf() {
        let mut parser = SseParser::new();
        let events = parser.push(b": keep-alive\r\nevent: connected\r\ndata: ok\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "connected");
        assert_eq!(events[0].data, "ok");
    }

    #[test]
    fn accumulates_across_pushes() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"event: conn").is_empty());
        assert!(parser.push(b"ected\ndata: hi\n").is_empty());
        let events = parser.push(b"\n");
        assert_eq!(events[0].name, "connected");
    }
}
