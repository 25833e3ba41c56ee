//! Form state for one pending customer record
//!
//! Values are kept exactly as typed. Nothing here parses or validates;
//! that happens once, on submit, in [`crate::record`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::presets::Preset;

/// The ten customer attributes collected by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    Gender,
    Country,
    AvgOrderValue,
    TotalOrders,
    LastPurchase,
    PreferredCategory,
    EmailOpenRate,
    LoyaltyScore,
    ChurnRisk,
}

impl Field {
    /// All fields in canonical (form and wire) order
    pub const ALL: [Field; 10] = [
        Field::Age,
        Field::Gender,
        Field::Country,
        Field::AvgOrderValue,
        Field::TotalOrders,
        Field::LastPurchase,
        Field::PreferredCategory,
        Field::EmailOpenRate,
        Field::LoyaltyScore,
        Field::ChurnRisk,
    ];

    /// Wire name used in the request body and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Gender => "gender",
            Field::Country => "country",
            Field::AvgOrderValue => "avg_order_value",
            Field::TotalOrders => "total_orders",
            Field::LastPurchase => "last_purchase",
            Field::PreferredCategory => "preferred_category",
            Field::EmailOpenRate => "email_open_rate",
            Field::LoyaltyScore => "loyalty_score",
            Field::ChurnRisk => "churn_risk",
        }
    }

    /// Human-readable label for the form view
    pub fn label(&self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::Country => "Country",
            Field::AvgOrderValue => "Avg order value",
            Field::TotalOrders => "Total orders",
            Field::LastPurchase => "Last purchase",
            Field::PreferredCategory => "Preferred category",
            Field::EmailOpenRate => "Email open rate",
            Field::LoyaltyScore => "Loyalty score",
            Field::ChurnRisk => "Churn risk",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// A field name that is not one of the ten known attributes
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

/// Current raw input for every field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    values: BTreeMap<Field, String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Create a form with every field empty
    pub fn new() -> Self {
        Self {
            values: Field::ALL.iter().map(|f| (*f, String::new())).collect(),
        }
    }

    /// Create a form prefilled from a preset
    pub fn from_preset(preset: Preset) -> Self {
        let mut form = Self::new();
        form.apply_preset(preset);
        form
    }

    /// Current raw value of a field
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Replace one field, leaving the others untouched
    pub fn update(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Restore every field to the empty string
    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    /// Overwrite all fields with a preset's values
    ///
    /// This is a full replacement, never a merge: every field ends up with
    /// the preset's value regardless of what was typed before.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.values = preset
            .values()
            .iter()
            .map(|(field, value)| (*field, (*value).to_string()))
            .collect();
    }

    /// Iterate fields and values in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// True when no field is blank
    pub fn is_complete(&self) -> bool {
        self.iter().all(|(_, v)| !v.trim().is_empty())
    }

    /// True when every field is blank
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, v)| v.is_empty())
    }
}
