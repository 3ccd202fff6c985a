//! Conversation types and history parsing

use serde::Serialize;
use serde_json::Value;

use crate::config::prompts;

/// Author of a turn, as the provider names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Only an exact `"user"` is a user turn; everything else was said by the model.
    pub fn coerce(raw: Option<&Value>) -> Self {
        match raw.and_then(Value::as_str) {
            Some("user") => Role::User,
            _ => Role::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// Errors from turning caller-supplied history into turns
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("conversationHistory must be an array, got {0}")]
    NotAnArray(&'static str),

    #[error("conversationHistory[{0}] is null")]
    NullEntry(usize),
}

/// Parse `conversationHistory` from a request body.
///
/// Only an absent field means "no history"; an explicit `null` is rejected.
/// Entries that are not objects carry no role or content and become empty
/// model turns.
pub fn parse_history(raw: Option<&Value>) -> Result<Vec<ChatTurn>, HistoryError> {
    let entries = match raw {
        None => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => return Err(HistoryError::NotAnArray(kind_of(other))),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Null => Err(HistoryError::NullEntry(index)),
            Value::Object(fields) => Ok(ChatTurn {
                role: Role::coerce(fields.get("role")),
                content: stringify_content(fields.get("content")),
            }),
            _ => Ok(ChatTurn::model("")),
        })
        .collect()
}

/// Text of a content value, formatted the way browsers stringify values:
/// whole floats drop the fraction, arrays join their items with commas and
/// objects collapse to `[object Object]`.
fn stringify_content(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(value) => display_value(value),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn display_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The history a chat is seeded with before the new message is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub turns: Vec<ChatTurn>,
}

impl Conversation {
    /// Persona turn followed by the scripted greeting
    pub fn new() -> Self {
        Self {
            turns: vec![
                ChatTurn::user(prompts::SYSTEM_PROMPT),
                ChatTurn::model(prompts::GREETING),
            ],
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.turns.extend(history);
        self
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_coercion() {
        assert_eq!(Role::coerce(Some(&json!("user"))), Role::User);
        assert_eq!(Role::coerce(Some(&json!("model"))), Role::Model);
        assert_eq!(Role::coerce(Some(&json!("assistant"))), Role::Model);
        assert_eq!(Role::coerce(Some(&json!("system"))), Role::Model);
        assert_eq!(Role::coerce(Some(&json!("User"))), Role::Model);
        assert_eq!(Role::coerce(Some(&json!(1))), Role::Model);
        assert_eq!(Role::coerce(None), Role::Model);
    }

    #[test]
    fn test_parse_history_absent() {
        assert!(parse_history(None).unwrap().is_empty());
        assert!(parse_history(Some(&json!([]))).unwrap().is_empty());
    }

    #[test]
    fn test_parse_history_rejects_null() {
        let err = parse_history(Some(&Value::Null)).unwrap_err();
        assert!(matches!(err, HistoryError::NotAnArray("null")));
    }

    #[test]
    fn test_parse_history_non_object_entries() {
        let raw = json!([5, "x", true, [1]]);
        let turns = parse_history(Some(&raw)).unwrap();
        assert_eq!(turns, vec![ChatTurn::model(""); 4]);
    }

    #[test]
    fn test_content_stringified_like_browser() {
        let raw = json!([
            {"role": "user", "content": 1.0},
            {"role": "user", "content": 2.5},
            {"role": "user", "content": [1, 2, null, "a"]},
            {"role": "user", "content": {"a": 1}},
            {"role": "user", "content": false},
        ]);
        let contents: Vec<String> = parse_history(Some(&raw))
            .unwrap()
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(contents, vec!["1", "2.5", "1,2,,a", "[object Object]", "false"]);
    }

    #[test]
    fn test_parse_history_maps_entries() {
        let raw = json!([
            {"role": "user", "content": "What is CHEESA?"},
            {"role": "assistant", "content": "A student association."},
            {"content": 42},
            {"role": "user"},
        ]);

        let turns = parse_history(Some(&raw)).unwrap();
        assert_eq!(
            turns,
            vec![
                ChatTurn::user("What is CHEESA?"),
                ChatTurn::model("A student association."),
                ChatTurn::model("42"),
                ChatTurn::user(""),
            ]
        );
    }

    #[test]
    fn test_parse_history_rejects_non_array() {
        let err = parse_history(Some(&json!("hello"))).unwrap_err();
        assert!(matches!(err, HistoryError::NotAnArray("string")));
    }

    #[test]
    fn test_parse_history_rejects_null_entry() {
        let raw = json!([{"role": "user", "content": "hi"}, null]);
        let err = parse_history(Some(&raw)).unwrap_err();
        assert!(matches!(err, HistoryError::NullEntry(1)));
    }

    #[test]
    fn test_conversation_order() {
        let conversation = Conversation::new().with_history(vec![ChatTurn::user("hi")]);
        assert_eq!(conversation.turns.len(), 3);
        assert_eq!(conversation.turns[0], ChatTurn::user(prompts::SYSTEM_PROMPT));
        assert_eq!(conversation.turns[1], ChatTurn::model(prompts::GREETING));
        assert_eq!(conversation.turns[2], ChatTurn::user("hi"));
    }
}
