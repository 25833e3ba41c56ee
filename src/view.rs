//! Terminal rendering
//!
//! Pure functions from state to text. The binary decides when to print;
//! nothing here touches stdout.

use chrono::NaiveDate;
use std::fmt::Write;

use crate::form::{Field, FormState, Preset};
use crate::history::HistoryEntry;
use crate::predictor::{Label, PredictionResult};
use crate::record::ValidationErrors;
use crate::summary::SummaryCount;

const BAR_WIDTH: usize = 30;

/// Cosmetic light/dark switch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn bar(&self) -> char {
        match self {
            Theme::Light => '█',
            Theme::Dark => '▓',
        }
    }

    fn rule(&self) -> char {
        match self {
            Theme::Light => '─',
            Theme::Dark => '═',
        }
    }
}

fn badge(label: &str) -> &'static str {
    match label.parse::<Label>() {
        Ok(Label::Loyal) => "♥",
        Ok(Label::Fraudulent) => "⚠",
        Ok(Label::Normal) => "✔",
        Err(_) => "?",
    }
}

/// `87` for whole numbers, `93.5` otherwise
pub fn format_confidence(confidence: f64) -> String {
    if confidence.fract() == 0.0 {
        format!("{:.0}", confidence)
    } else {
        format!("{}", confidence)
    }
}

/// The editable form, one field per line
pub fn render_form(form: &FormState, today: NaiveDate) -> String {
    let mut out = String::new();
    for (field, value) in form.iter() {
        let shown = if value.is_empty() { "-" } else { value };
        let _ = write!(out, "  {:<20} {:<20} [{}]", field.label(), shown, field.name());
        if field == Field::LastPurchase {
            let _ = write!(out, " (YYYY-MM-DD, up to {})", today.format("%Y-%m-%d"));
        }
        out.push('\n');
    }
    out
}

/// Shown while a request is outstanding
pub fn render_loading() -> &'static str {
    "Predicting..."
}

/// The prediction badge and confidence line
pub fn render_result(result: &PredictionResult) -> String {
    let mut out = format!("{} Prediction: {}\n", badge(&result.label), result.label);
    if let Some(confidence) = result.confidence {
        let _ = writeln!(out, "  Confidence: {}%", format_confidence(confidence));
    }
    out
}

/// Bar chart of counts and pie-style shares
///
/// `None` while the history is empty, so callers can skip the section.
pub fn render_summary(entries: &[HistoryEntry], theme: Theme) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let summary = SummaryCount::from_entries(entries);
    let max = summary.series().iter().map(|p| p.count).max().unwrap_or(0);

    let mut out = String::from("Prediction Summary\n");
    let _ = writeln!(out, "{}", theme.rule().to_string().repeat(40));

    for point in summary.series() {
        let len = if max == 0 {
            0
        } else {
            point.count * BAR_WIDTH / max
        };
        let _ = writeln!(
            out,
            "  {:<11} {:<width$} {}",
            point.label.as_str(),
            theme.bar().to_string().repeat(len),
            point.count,
            width = BAR_WIDTH
        );
    }

    let shares = summary.shares();
    if !shares.is_empty() {
        let parts: Vec<String> = shares
            .iter()
            .map(|(label, pct)| format!("{} {:.1}% ({})", label, pct, label.color()))
            .collect();
        let _ = writeln!(out, "  Share: {}", parts.join(" | "));
    }

    let skipped = entries.len() - summary.total();
    if skipped > 0 {
        let _ = writeln!(out, "  ({} with unrecognised labels not counted)", skipped);
    }

    Some(out)
}

/// All retained predictions, oldest first
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No predictions yet.\n".to_string();
    }

    let mut out = format!("{:<5} {:<12} {:<12} {}\n", "#", "Label", "Confidence", "Timestamp");
    let _ = writeln!(out, "{}", "-".repeat(60));
    for (i, entry) in entries.iter().enumerate() {
        let confidence = entry
            .confidence
            .map(|c| format!("{}%", format_confidence(c)))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<5} {:<12} {:<12} {}",
            i + 1,
            entry.label,
            confidence,
            entry.timestamp().unwrap_or("-")
        );
    }
    out
}

/// The built-in sample records
pub fn render_presets() -> String {
    let mut out = String::new();
    for preset in Preset::ALL {
        let _ = writeln!(out, "{:<8} {}", preset.name(), preset.description());
        let values: Vec<String> = preset
            .values()
            .iter()
            .map(|(field, value)| format!("{}={}", field.name(), value))
            .collect();
        let _ = writeln!(out, "         {}", values.join(" "));
    }
    out
}

/// One line per rejected field
pub fn render_errors(errors: &ValidationErrors) -> String {
    let mut out = String::from("Please fix the following fields:\n");
    for error in errors.errors() {
        let _ = writeln!(out, "  - {}", error);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CustomerRecord;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().name(), "light");
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(87.0), "87");
        assert_eq!(format_confidence(93.5), "93.5");
    }

    #[test]
    fn test_render_form() {
        let form = FormState::from_preset(Preset::Fraud);
        let text = render_form(&form, today());

        assert_eq!(text.lines().count(), 10);
        assert!(text.contains("Avg order value"));
        assert!(text.contains("Nigeria"));
        assert!(text.contains("up to 2026-01-15"));

        let empty = render_form(&FormState::new(), today());
        assert!(empty.lines().all(|l| l.contains(" - ")));
    }

    #[test]
    fn test_render_result() {
        let text = render_result(&PredictionResult::new("Fraudulent", Some(87.0)));
        assert!(text.contains("Prediction: Fraudulent"));
        assert!(text.contains("Confidence: 87%"));

        let text = render_result(&PredictionResult::new("Normal", None));
        assert!(!text.contains("Confidence"));
    }

    #[test]
    fn test_render_summary() {
        assert!(render_summary(&[], Theme::Light).is_none());

        let entries = vec![
            PredictionResult::new("Normal", Some(60.0)),
            PredictionResult::new("Loyal", Some(90.0)),
            PredictionResult::new("Loyal", Some(95.0)),
            PredictionResult::new("Unknown", None),
        ];
        let text = render_summary(&entries, Theme::Light).unwrap();

        assert!(text.contains("Prediction Summary"));
        assert!(text.contains(&"█".repeat(BAR_WIDTH)));
        assert!(text.contains("Loyal 66.7%"));
        assert!(text.contains("1 with unrecognised labels"));

        let dark = render_summary(&entries, Theme::Dark).unwrap();
        assert!(dark.contains('▓'));
        assert!(!dark.contains('█'));
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "No predictions yet.\n");

        let entries = vec![PredictionResult::new("Loyal", Some(91.25))];
        let text = render_history(&entries);
        assert!(text.contains("Loyal"));
        assert!(text.contains("91.25%"));
    }

    #[test]
    fn test_render_presets() {
        let text = render_presets();
        assert!(text.contains("fraud"));
        assert!(text.contains("country=Canada"));
    }

    #[test]
    fn test_render_errors() {
        let errors = CustomerRecord::parse(&FormState::new(), today()).unwrap_err();
        let text = render_errors(&errors);
        assert_eq!(text.lines().count(), 11);
        assert!(text.contains("age is required"));
    }
}
