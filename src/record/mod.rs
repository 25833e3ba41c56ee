//! Customer record
//!
//! The typed record sent to the prediction service, and the single
//! parse-and-validate step that builds it from raw form input.
//!
//! Validation collects every failing field instead of stopping at the first
//! one, so the caller can show all problems at once. A form that fails here
//! never reaches the network.

mod error;

pub use error::{FieldError, ValidationErrors};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::{Field, FormState};

/// One customer, ready to be classified
///
/// Serializes to the request body expected by the `/predict` endpoint:
/// integers for counts and scores, floats for rates and money, the date as
/// `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub age: i64,
    pub gender: String,
    pub country: String,
    pub avg_order_value: f64,
    pub total_orders: u64,
    pub last_purchase: NaiveDate,
    pub preferred_category: String,
    pub email_open_rate: f64,
    pub loyalty_score: i64,
    pub churn_risk: f64,
}

impl CustomerRecord {
    /// Parse and validate raw form input
    ///
    /// `today` bounds `last_purchase`; pass the caller's local date.
    pub fn parse(form: &FormState, today: NaiveDate) -> Result<Self, ValidationErrors> {
        let mut parser = Parser {
            form,
            errors: ValidationErrors::default(),
        };

        let age = parser.integer(Field::Age);
        let gender = parser.text(Field::Gender);
        let country = parser.text(Field::Country);
        let avg_order_value = parser.number(Field::AvgOrderValue);
        let total_orders = parser.count(Field::TotalOrders);
        let last_purchase = parser.past_date(Field::LastPurchase, today);
        let preferred_category = parser.text(Field::PreferredCategory);
        let email_open_rate = parser.fraction(Field::EmailOpenRate);
        let loyalty_score = parser.integer(Field::LoyaltyScore);
        let churn_risk = parser.fraction(Field::ChurnRisk);

        match (
            age,
            gender,
            country,
            avg_order_value,
            total_orders,
            last_purchase,
            preferred_category,
            email_open_rate,
            loyalty_score,
            churn_risk,
        ) {
            (
                Some(age),
                Some(gender),
                Some(country),
                Some(avg_order_value),
                Some(total_orders),
                Some(last_purchase),
                Some(preferred_category),
                Some(email_open_rate),
                Some(loyalty_score),
                Some(churn_risk),
            ) => Ok(Self {
                age,
                gender,
                country,
                avg_order_value,
                total_orders,
                last_purchase,
                preferred_category,
                email_open_rate,
                loyalty_score,
                churn_risk,
            }),
            _ => Err(parser.errors),
        }
    }
}

/// Field-by-field reader that records failures as it goes
struct Parser<'a> {
    form: &'a FormState,
    errors: ValidationErrors,
}

impl<'a> Parser<'a> {
    fn raw(&mut self, field: Field) -> Option<&'a str> {
        let form: &'a FormState = self.form;
        let value = form.get(field).trim();
        if value.is_empty() {
            self.errors.push(FieldError::Missing { field });
            None
        } else {
            Some(value)
        }
    }

    fn text(&mut self, field: Field) -> Option<String> {
        self.raw(field)?;
        // Text is passed through untouched, only blank input is rejected.
        Some(self.form.get(field).to_string())
    }

    fn integer(&mut self, field: Field) -> Option<i64> {
        let value = self.raw(field)?;
        match value.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                let value = value.to_string();
                self.errors.push(FieldError::NotInteger { field, value });
                None
            }
        }
    }

    fn count(&mut self, field: Field) -> Option<u64> {
        let n = self.integer(field)?;
        match u64::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                self.errors.push(FieldError::Negative { field, value: n });
                None
            }
        }
    }

    fn number(&mut self, field: Field) -> Option<f64> {
        let value = self.raw(field)?;
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                let value = value.to_string();
                self.errors.push(FieldError::NotNumber { field, value });
                None
            }
        }
    }

    fn fraction(&mut self, field: Field) -> Option<f64> {
        let n = self.number(field)?;
        if (0.0..=1.0).contains(&n) {
            Some(n)
        } else {
            self.errors.push(FieldError::OutOfRange {
                field,
                value: n,
                min: 0.0,
                max: 1.0,
            });
            None
        }
    }

    fn past_date(&mut self, field: Field, today: NaiveDate) -> Option<NaiveDate> {
        let value = self.raw(field)?;
        let value = value.to_string();
        match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) if date <= today => Some(date),
            Ok(_) => {
                self.errors.push(FieldError::FutureDate { field, value });
                None
            }
            Err(_) => {
                self.errors.push(FieldError::NotDate { field, value });
                None
            }
        }
    }
}
