//! Prediction result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The classification returned by the prediction service
///
/// Accepted as-is: the label is the raw string the service sent, and no range
/// check is applied to the confidence. Any other fields of the response body
/// are kept verbatim in `extra` so they survive into history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    /// Percentage 0-100; `None` when the model gave no probability
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PredictionResult {
    pub fn new(label: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            label: label.into(),
            confidence,
            extra: Map::new(),
        }
    }

    /// Builder method: attach a pass-through field
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The label as one of the known classes, if it is one
    pub fn known_label(&self) -> Option<Label> {
        self.label.parse().ok()
    }

    /// Server-side timestamp, when the service sent one
    pub fn timestamp(&self) -> Option<&str> {
        self.extra.get("timestamp").and_then(Value::as_str)
    }
}

/// The three customer classes the service is expected to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Normal,
    Loyal,
    Fraudulent,
}

impl Label {
    /// All labels in display order
    pub const ALL: [Label; 3] = [Label::Normal, Label::Loyal, Label::Fraudulent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Normal => "Normal",
            Label::Loyal => "Loyal",
            Label::Fraudulent => "Fraudulent",
        }
    }

    /// Chart colour as a hex RGB string
    pub fn color(&self) -> &'static str {
        match self {
            Label::Normal => "#10B981",
            Label::Loyal => "#3B82F6",
            Label::Fraudulent => "#EF4444",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    /// Exact, case-sensitive match; anything else is not a known label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown label: {0:?}")]
pub struct UnknownLabel(pub String);
