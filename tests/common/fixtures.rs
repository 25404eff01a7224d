//! Wire fixtures shared by the integration tests.

use bytes::Bytes;

/// Format one event block around a JSON payload.
pub fn sse_block(json: &str) -> String {
    format!("data: {}\n\n", json)
}

pub fn delta_block(content: &str) -> String {
    sse_block(&format!(
        r#"{{"type":"delta","content":{}}}"#,
        serde_json::to_string(content).unwrap()
    ))
}

pub fn final_block(agent: &str, content: &str, next_actions: &[&str]) -> String {
    let payload = serde_json::json!({
        "type": "final",
        "payload": {
            "agent": agent,
            "content": content,
            "next_actions": next_actions,
        }
    });
    sse_block(&payload.to_string())
}

/// A realistic response: tool use, multi-byte deltas, keep-alive, final.
pub fn conversation_body() -> String {
    let mut body = String::new();
    body.push_str(": connected\n\n");
    body.push_str(&sse_block(
        r#"{"type":"tool_start","tool":"search","args":{"q":"café"}}"#,
    ));
    body.push_str(&sse_block(
        r#"{"type":"tool_result","tool":"search","data":{"hits":2},"error":false}"#,
    ));
    body.push_str(&delta_block("Le café "));
    body.push_str(&delta_block("est prêt ☕"));
    body.push_str(&final_block("Brain", "Le café est prêt ☕", &["order", "leave"]));
    body
}

/// Split `body` into single-byte chunks.
pub fn byte_chunks(body: &str) -> Vec<Bytes> {
    body.bytes().map(|b| Bytes::from(vec![b])).collect()
}

/// Split `body` into two chunks at `offset`.
pub fn split_at(body: &str, offset: usize) -> Vec<Bytes> {
    let bytes = body.as_bytes();
    vec![
        Bytes::copy_from_slice(&bytes[..offset]),
        Bytes::copy_from_slice(&bytes[offset..]),
    ]
}
