//! SSE block parsing logic
//!
//! Turns one complete event block (the text between two blank-line
//! separators) into at most one typed event.

use crate::sse::events::{SseLine, SseParseError, StreamEvent};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    match line.split_once(':') {
        Some((name, value)) => {
            // One optional space after the colon belongs to the framing
            let value = value.strip_prefix(' ').unwrap_or(value).to_string();
            if name == "data" {
                SseLine::Data(value)
            } else {
                SseLine::Field {
                    name: name.to_string(),
                    value,
                }
            }
        }
        None => SseLine::Field {
            name: line.to_string(),
            value: String::new(),
        },
    }
}

/// Collect the `data:` values of a block, joined with newlines.
///
/// Returns `None` when the block carries no `data:` line at all. Comments,
/// blank lines and other labels (`event:`, `id:`, `retry:`) are skipped.
pub fn extract_block_data(block: &str) -> Option<String> {
    let mut data_lines: Vec<String> = Vec::new();

    for line in block.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let SseLine::Data(data) = parse_sse_line(line) {
            data_lines.push(data);
        }
    }

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

/// Parse a joined data payload into a typed event
pub fn parse_event(data: &str) -> Result<StreamEvent, SseParseError> {
    serde_json::from_str(data).map_err(|e| SseParseError::InvalidJson {
        reason: e.to_string(),
    })
}

/// Parse a complete event block.
///
/// Returns:
/// - `Ok(Some(event))` - The block carried a valid event
/// - `Ok(None)` - The block had no data (comment-only, keep-alive, empty)
/// - `Err(error)` - The data did not parse as an event
pub fn parse_block(block: &str) -> Result<Option<StreamEvent>, SseParseError> {
    match extract_block_data(block) {
        Some(data) => parse_event(&data).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::events::FinalPayload;

    // Tests for parse_sse_line

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
    }

    #[test]
    fn test_parse_comment_line() {
        assert_eq!(
            parse_sse_line(": keep-alive"),
            SseLine::Comment("keep-alive".to_string())
        );
        assert_eq!(parse_sse_line(":"), SseLine::Comment(String::new()));
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line(r#"data: {"type":"delta"}"#),
            SseLine::Data(r#"{"type":"delta"}"#.to_string())
        );
        assert_eq!(
            parse_sse_line(r#"data:{"x":1}"#),
            SseLine::Data(r#"{"x":1}"#.to_string())
        );
        // Only the first space is framing
        assert_eq!(parse_sse_line("data:  x"), SseLine::Data(" x".to_string()));
    }

    #[test]
    fn test_parse_other_fields() {
        assert_eq!(
            parse_sse_line("event: delta"),
            SseLine::Field {
                name: "event".to_string(),
                value: "delta".to_string()
            }
        );
        assert_eq!(
            parse_sse_line("retry:3000"),
            SseLine::Field {
                name: "retry".to_string(),
                value: "3000".to_string()
            }
        );
        assert_eq!(
            parse_sse_line("orphan"),
            SseLine::Field {
                name: "orphan".to_string(),
                value: String::new()
            }
        );
    }

    // Tests for extract_block_data

    #[test]
    fn test_extract_joins_multiple_data_lines() {
        let block = "data: {\"a\":1\ndata: }";
        assert_eq!(extract_block_data(block), Some("{\"a\":1\n}".to_string()));
    }

    #[test]
    fn test_extract_skips_comments_and_fields() {
        let block = ": ping\nevent: delta\nid: 7\ndata: {\"type\":\"delta\",\"content\":\"x\"}";
        assert_eq!(
            extract_block_data(block),
            Some("{\"type\":\"delta\",\"content\":\"x\"}".to_string())
        );
    }

    #[test]
    fn test_extract_without_data() {
        assert_eq!(extract_block_data(": comment only"), None);
        assert_eq!(extract_block_data("event: delta\nid: 1"), None);
        assert_eq!(extract_block_data(""), None);
    }

    #[test]
    fn test_extract_empty_data_line_counts() {
        assert_eq!(extract_block_data("data:"), Some(String::new()));
    }

    // Tests for parse_block

    #[test]
    fn test_parse_delta_block() {
        let event = parse_block(r#"data: {"type":"delta","content":"Hi"}"#).unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::Delta {
                content: "Hi".to_string()
            })
        );
    }

    #[test]
    fn test_parse_multiline_json_block() {
        let block = "data: {\"type\":\"delta\",\ndata: \"content\":\"joined\"}";
        let event = parse_block(block).unwrap();
        assert_eq!(
            event,
            Some(StreamEvent::Delta {
                content: "joined".to_string()
            })
        );
    }

    #[test]
    fn test_tool_start_drops_arguments() {
        let block = r#"data: {"type":"tool_start","tool":"search","args":{"q":"secret"}}"#;
        let event = parse_block(block).unwrap().unwrap();
        assert_eq!(
            event,
            StreamEvent::ToolStart {
                tool: "search".to_string()
            }
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_parse_tool_result_block() {
        let block = r#"data: {"type":"tool_result","tool":"search","data":{"hits":2},"error":false}"#;
        match parse_block(block).unwrap().unwrap() {
            StreamEvent::ToolResult {
                tool,
                data,
                explainability,
                error,
            } => {
                assert_eq!(tool, "search");
                assert_eq!(data, Some(serde_json::json!({"hits": 2})));
                assert_eq!(explainability, None);
                assert_eq!(error, Some(false));
            }
            other => panic!("Expected ToolResult event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_final_block() {
        let block = r#"data: {"type":"final","payload":{"agent":"Brain","content":"Hi","next_actions":["a","b"],"assumptions":["x"]}}"#;
        let event = parse_block(block).unwrap().unwrap();
        assert_eq!(
            event,
            StreamEvent::Final {
                payload: FinalPayload {
                    agent: "Brain".to_string(),
                    content: "Hi".to_string(),
                    next_actions: vec!["a".to_string(), "b".to_string()],
                    assumptions: Some(vec!["x".to_string()]),
                }
            }
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_block("data: not json");
        assert!(matches!(result, Err(SseParseError::InvalidJson { .. })));
    }

    #[test]
    fn test_parse_unknown_type_is_error() {
        let result = parse_block(r#"data: {"type":"ping"}"#);
        assert!(matches!(result, Err(SseParseError::InvalidJson { .. })));
    }

    #[test]
    fn test_comment_only_block_yields_nothing() {
        assert_eq!(parse_block(": keep-alive").unwrap(), None);
    }
}
