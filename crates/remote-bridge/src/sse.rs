//! Incremental server-sent events parser.
//!
//! Bytes arrive in arbitrary chunks; lines are only decoded once complete,
//! so multi-byte characters split across chunks survive.

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field, `message` when absent.
    pub event: String,
    /// `data:` lines joined with `\n`.
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id and retry carry nothing the database stream uses
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() && event.is_none() {
            return None;
        }

        Some(SseEvent {
            event: event.unwrap_or_else(|| "message".to_string()),
            data: std::mem::take(&mut self.data).join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_database_put_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(
            b"event: put\ndata: {\"path\":\"/\",\"data\":{\"action\":\"play\"}}\n\n",
        );

        assert_eq!(
            events,
            vec![SseEvent {
                event: "put".into(),
                data: r#"{"path":"/","data":{"action":"play"}}"#.into(),
            }]
        );
    }

    #[test]
    fn events_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"event: keep-al").is_empty());
        assert!(parser.feed(b"ive\ndata: nu").is_empty());
        let events = parser.feed(b"ll\n\nevent: patch\r\ndata: {}\r\n\r\n");

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "keep-alive");
        assert_eq!(events[0].data, "null");
        assert_eq!(events[1].event, "patch");
        assert_eq!(events[1].data, "{}");
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        let mut parser = SseParser::new();
        let bytes = "data: caf\u{e9}\n\n".as_bytes();
        let split = bytes.len() - 3;

        assert!(parser.feed(&bytes[..split]).is_empty());
        let events = parser.feed(&bytes[split..]);
        assert_eq!(events[0].data, "caf\u{e9}");
    }

    #[test]
    fn comments_and_unknown_fields_are_ignored() {
        let mut parser = SseParser::new();
        let events = parser.feed(b": heartbeat\nid: 7\nretry: 100\ndata: a\ndata: b\n\n\n");

        assert_eq!(
            events,
            vec![SseEvent {
                event: "message".into(),
                data: "a\nb".into(),
            }]
        );
    }
}
