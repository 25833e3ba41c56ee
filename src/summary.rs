//! Per-label summary of the prediction history
//!
//! Derived on demand, never stored. Labels outside the three known classes
//! are skipped entirely; there is no "unknown" bucket.

use serde::Serialize;

use crate::history::HistoryEntry;
use crate::predictor::Label;

/// Count of history entries per known label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCount {
    pub normal: usize,
    pub loyal: usize,
    pub fraudulent: usize,
}

/// One bar or slice of a summary chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: Label,
    pub count: usize,
    pub color: &'static str,
}

impl SummaryCount {
    /// Tally `entries` by label
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        entries
            .iter()
            .filter_map(HistoryEntry::known_label)
            .fold(Self::default(), |mut summary, label| {
                *summary.slot(label) += 1;
                summary
            })
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Normal => self.normal,
            Label::Loyal => self.loyal,
            Label::Fraudulent => self.fraudulent,
        }
    }

    /// Entries with a known label
    pub fn total(&self) -> usize {
        self.normal + self.loyal + self.fraudulent
    }

    /// Bar chart data, in label display order
    pub fn series(&self) -> Vec<ChartPoint> {
        Label::ALL
            .iter()
            .map(|label| ChartPoint {
                label: *label,
                count: self.get(*label),
                color: label.color(),
            })
            .collect()
    }

    /// Pie chart data: percent of the known-label total per label
    ///
    /// Empty when nothing has been counted yet.
    pub fn shares(&self) -> Vec<(Label, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }

        Label::ALL
            .iter()
            .map(|label| (*label, self.get(*label) as f64 * 100.0 / total as f64))
            .collect()
    }

    fn slot(&mut self, label: Label) -> &mut usize {
        match label {
            Label::Normal => &mut self.normal,
            Label::Loyal => &mut self.loyal,
            Label::Fraudulent => &mut self.fraudulent,
        }
    }
}

/// Summarize a history sequence
pub fn summarize(entries: &[HistoryEntry]) -> SummaryCount {
    SummaryCount::from_entries(entries)
}
