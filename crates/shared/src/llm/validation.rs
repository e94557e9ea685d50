use std::sync::LazyLock;

use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;

use super::contracts::{AnecdoteReply, reply_schema};

#[derive(Debug, Error)]
pub enum AnecdoteParseError {
    #[error("reply does not embed a json object")]
    NoEmbeddedObject,
    #[error("anecdote schema failed to compile: {0}")]
    SchemaCompile(String),
    #[error("anecdote reply failed schema validation: {0:?}")]
    SchemaViolation(Vec<String>),
    #[error("anecdote reply is invalid: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("anecdote reply has an empty event description")]
    BlankEvent,
}

/// Returns the first well-formed JSON object embedded in free-form text.
///
/// Each `{` is tried as a starting point and the longest valid value from
/// there wins, so prose or code fences around the object are ignored.
pub fn extract_embedded_object(text: &str) -> Option<Value> {
    text.char_indices()
        .filter(|(_, ch)| *ch == '{')
        .find_map(|(start, _)| {
            let mut values =
                serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
            match values.next() {
                Some(Ok(value @ Value::Object(_))) => Some(value),
                _ => None,
            }
        })
}

pub fn parse_anecdote_reply(text: &str) -> Result<AnecdoteReply, AnecdoteParseError> {
    let payload = extract_embedded_object(text).ok_or(AnecdoteParseError::NoEmbeddedObject)?;
    validate_anecdote_value(&payload)
}

pub fn validate_anecdote_value(payload: &Value) -> Result<AnecdoteReply, AnecdoteParseError> {
    let validator = ANECDOTE_VALIDATOR
        .as_ref()
        .map_err(|message| AnecdoteParseError::SchemaCompile(message.clone()))?;

    if let Err(validation_errors) = validator.validate(payload) {
        let errors = validation_errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(AnecdoteParseError::SchemaViolation(errors));
    }

    let mut reply: AnecdoteReply = serde_json::from_value(payload.clone())?;
    reply.event = reply.event.trim().to_string();
    if reply.event.is_empty() {
        return Err(AnecdoteParseError::BlankEvent);
    }
    reply.category = reply
        .category
        .map(|category| category.trim().to_string())
        .filter(|category| !category.is_empty());

    Ok(reply)
}

static ANECDOTE_VALIDATOR: LazyLock<Result<JSONSchema, String>> = LazyLock::new(|| {
    let schema = reply_schema().map_err(|err| err.to_string())?;
    JSONSchema::compile(&schema).map_err(|err| err.to_string())
});
