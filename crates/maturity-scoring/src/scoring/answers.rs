use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A submitted answer: a single option label or free text, or an ordered list
/// of selected option labels.
///
/// Some clients send multi-select answers as a JSON-encoded string
/// (`"[\"a\",\"b\"]"`); [`AnswerValue::selections`] tolerates both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Selections(Vec<String>),
}

impl AnswerValue {
    /// The answer as a multi-select option list, decoding string-encoded
    /// lists when necessary. `None` when the shape is not a list.
    pub fn selections(&self) -> Option<Vec<String>> {
        match self {
            AnswerValue::Selections(options) => Some(options.clone()),
            AnswerValue::Text(raw) => serde_json::from_str::<Vec<String>>(raw).ok(),
        }
    }

    pub const fn shape(&self) -> &'static str {
        match self {
            AnswerValue::Text(_) => "string",
            AnswerValue::Selections(_) => "array",
        }
    }
}

/// Question key to submitted answer, as received from the client.
pub type AnswerSet = BTreeMap<String, AnswerValue>;
