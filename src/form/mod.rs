//! Form input
//!
//! Raw, unvalidated field values for the record being edited, plus the
//! built-in sample presets that prefill it.

mod presets;
mod state;

pub use presets::{Preset, UnknownPreset};
pub use state::{Field, FormState, UnknownField};
