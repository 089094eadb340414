// JSON extraction from raw model output
//
// Models sometimes wrap the JSON object in prose or markdown code fences.
// We try a direct parse first, then the substring between the first "{"
// and the last "}". No bracket-balance repair beyond that single slice.

use serde_json::Value;

use crate::error::{AgentError, Result};

/// Parse model output text into a JSON value, tolerating surrounding text.
pub fn extract_json(text: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(AgentError::MalformedModelOutput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let value = extract_json(r#"{"action":"generate"}"#).unwrap();
        assert_eq!(value["action"], "generate");
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let text = "Here is your setlist:\n{\"setlistName\": \"Sunset Grooves\"}\nEnjoy!";
        let value = extract_json(text).unwrap();
        assert_eq!(value["setlistName"], "Sunset Grooves");
    }

    #[test]
    fn parses_json_wrapped_in_code_fence() {
        let text = "```json\n{\"action\": \"clarify\", \"question\": \"What genre?\"}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["question"], "What genre?");
    }

    #[test]
    fn fails_without_braces() {
        let err = extract_json("I cannot produce a setlist right now.").unwrap_err();
        assert!(matches!(err, AgentError::MalformedModelOutput));
    }

    #[test]
    fn fails_on_unparseable_slice() {
        let err = extract_json("prefix {not json at all} suffix").unwrap_err();
        assert!(matches!(err, AgentError::MalformedModelOutput));
    }
}
