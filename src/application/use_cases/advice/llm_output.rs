use crate::domain::advice::LlmJson;
use crate::infrastructure::response::clean_llm_response;
use serde::de::DeserializeOwned;

/// Best-effort isolation of the JSON object in a model reply: drop a
/// surrounding code fence, then keep the outermost `{ ... }` span.
pub(crate) fn extract_json_payload(output: &str) -> String {
    let unfenced = strip_code_fence(output);
    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => unfenced[start..=end].to_string(),
        _ => unfenced,
    }
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}

/// Parse a reply into `T`, keeping the verbatim text when it is not valid JSON.
///
/// Reasoning blocks are dropped from the copy that is parsed only; `raw`
/// always holds the reply exactly as received.
pub fn parse_llm_json<T: DeserializeOwned>(output: &str) -> LlmJson<T> {
    let payload = extract_json_payload(&clean_llm_response(output));
    match serde_json::from_str::<T>(&payload) {
        Ok(value) => LlmJson::Parsed(value),
        Err(err) => LlmJson::RawText {
            raw: output.to_string(),
            reason: format!("Failed to parse JSON response: {}", err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_fenced_json() {
        let parsed: LlmJson<Value> = parse_llm_json("```json\n{\"a\":1}\n```");
        assert_eq!(parsed, LlmJson::Parsed(json!({"a": 1})));
    }

    #[test]
    fn test_bare_fence() {
        let parsed: LlmJson<Value> = parse_llm_json("```\n{\"a\": [1, 2]}\n```");
        assert_eq!(parsed.into_parsed(), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn test_prose_around_object() {
        let parsed: LlmJson<Value> = parse_llm_json("Here you go: {\"a\":1} thanks");
        assert_eq!(parsed, LlmJson::Parsed(json!({"a": 1})));
    }

    #[test]
    fn test_no_json_keeps_raw_text() {
        let reply = "no json here";
        match parse_llm_json::<Value>(reply) {
            LlmJson::RawText { raw, reason } => {
                assert_eq!(raw, reply);
                assert!(!reason.is_empty());
            }
            other => panic!("expected raw text, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_reply_is_raw_text() {
        match parse_llm_json::<Value>("") {
            LlmJson::RawText { raw, reason } => {
                assert_eq!(raw, "");
                assert!(reason.starts_with("Failed to parse JSON response"));
            }
            other => panic!("expected raw text, got {other:?}"),
        }
    }

    #[test]
    fn test_reasoning_block_is_skipped_but_raw_kept() {
        let reply = "<think>maybe {\"a\": 0}</think>\n{\"a\": 1}";
        assert_eq!(parse_llm_json::<Value>(reply).into_parsed(), Some(json!({"a": 1})));

        let unparsed = "  not json\n\n\n\n<internal>note</internal>\n";
        match parse_llm_json::<Value>(unparsed) {
            LlmJson::RawText { raw, .. } => assert_eq!(raw, unparsed),
            other => panic!("expected raw text, got {other:?}"),
        }
    }

    #[test]
    fn test_braces_out_of_order_are_left_alone() {
        assert_eq!(extract_json_payload("} nope {"), "} nope {");
        assert!(!parse_llm_json::<Value>("} nope {").is_parsed());
    }

    #[test]
    fn test_shape_mismatch_is_raw_text() {
        #[derive(Debug, serde::Deserialize)]
        struct NeedsCards {
            #[allow(dead_code)]
            cards: Vec<String>,
        }
        let parsed: LlmJson<NeedsCards> = parse_llm_json("{\"title\": \"x\"}");
        assert!(!parsed.is_parsed());
    }
}
