//! Canned sample records for manual testing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::state::Field;

/// One of the three built-in sample customers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Fraud,
    Loyal,
    Normal,
}

const FRAUD: [(Field, &str); 10] = [
    (Field::Age, "45"),
    (Field::Gender, "Male"),
    (Field::Country, "Nigeria"),
    (Field::AvgOrderValue, "320"),
    (Field::TotalOrders, "3"),
    (Field::LastPurchase, "2024-05-01"),
    (Field::PreferredCategory, "Electronics"),
    (Field::EmailOpenRate, "0.1"),
    (Field::LoyaltyScore, "12"),
    (Field::ChurnRisk, "0.8"),
];

const LOYAL: [(Field, &str); 10] = [
    (Field::Age, "34"),
    (Field::Gender, "Female"),
    (Field::Country, "USA"),
    (Field::AvgOrderValue, "120"),
    (Field::TotalOrders, "25"),
    (Field::LastPurchase, "2025-07-01"),
    (Field::PreferredCategory, "Apparel"),
    (Field::EmailOpenRate, "0.95"),
    (Field::LoyaltyScore, "92"),
    (Field::ChurnRisk, "0.02"),
];

const NORMAL: [(Field, &str); 10] = [
    (Field::Age, "28"),
    (Field::Gender, "Other"),
    (Field::Country, "Canada"),
    (Field::AvgOrderValue, "75"),
    (Field::TotalOrders, "10"),
    (Field::LastPurchase, "2025-06-10"),
    (Field::PreferredCategory, "Books"),
    (Field::EmailOpenRate, "0.5"),
    (Field::LoyaltyScore, "48"),
    (Field::ChurnRisk, "0.3"),
];

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Fraud, Preset::Loyal, Preset::Normal];

    /// Raw field values, one per field, in canonical order
    pub fn values(&self) -> &'static [(Field, &'static str); 10] {
        match self {
            Preset::Fraud => &FRAUD,
            Preset::Loyal => &LOYAL,
            Preset::Normal => &NORMAL,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Fraud => "fraud",
            Preset::Loyal => "loyal",
            Preset::Normal => "normal",
        }
    }

    /// Short description shown by `presets`
    pub fn description(&self) -> &'static str {
        match self {
            Preset::Fraud => "Test Fraud: low engagement, high churn risk",
            Preset::Loyal => "Test Loyal: frequent buyer, high loyalty score",
            Preset::Normal => "Test Normal: average customer",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fraud" | "fraudulent" => Ok(Preset::Fraud),
            "loyal" => Ok(Preset::Loyal),
            "normal" => Ok(Preset::Normal),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown preset: {0} (expected fraud, loyal or normal)")]
pub struct UnknownPreset(pub String);
