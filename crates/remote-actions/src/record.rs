//! Command records as delivered by the realtime database.

use crate::action::{Action, CUSTOM_ACTION};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// One command written by the remote dashboard.
///
/// Wire shape: `{ "action": "play", "timestamp": 1718000000000, "command": "..." }`.
/// Unknown fields are ignored. A field of the wrong type counts as absent, so
/// only a non-object value fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: Option<String>,

    /// Producer clock, epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub timestamp: Option<i64>,

    /// Literal shell command, only meaningful for the `custom` action.
    #[serde(default, rename = "command", deserialize_with = "lenient_string")]
    pub payload: Option<String>,
}

/// What a record asks the dispatcher to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Registered(Action),
    Custom(String),
    /// Missing or unknown action name, or a `custom` record whose command is
    /// absent or blank. A whitespace-only command is never handed to a shell.
    Unrecognized(Option<String>),
}

impl CommandRecord {
    pub fn new(action: impl Into<String>, timestamp: i64) -> Self {
        Self {
            action: Some(action.into()),
            timestamp: Some(timestamp),
            payload: None,
        }
    }

    pub fn custom(command: impl Into<String>, timestamp: i64) -> Self {
        Self {
            action: Some(CUSTOM_ACTION.to_string()),
            timestamp: Some(timestamp),
            payload: Some(command.into()),
        }
    }

    /// Decode a record from a JSON value. Only objects are records.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        // derived struct decoding would also accept a positional array
        if !value.is_object() {
            return Err(de::Error::custom(format!(
                "expected a command record object, got {}",
                json_type(value)
            )));
        }
        Self::deserialize(value)
    }

    /// Classify the record for dispatch.
    ///
    /// A `custom` record with an absent or blank command is unrecognized.
    pub fn command(&self) -> Command {
        let Some(name) = self.action.as_deref() else {
            return Command::Unrecognized(None);
        };

        if let Some(action) = Action::from_name(name) {
            return Command::Registered(action);
        }

        match (name, self.payload.as_deref()) {
            (CUSTOM_ACTION, Some(command)) if !command.trim().is_empty() => {
                Command::Custom(command.to_string())
            }
            _ => Command::Unrecognized(Some(name.to_string())),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Accept a string; anything else counts as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Accept integer or float milliseconds; anything else counts as absent.
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    })
}
