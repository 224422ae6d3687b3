//! Step validator: pure functions from (step, draft) to an error map.

use std::collections::BTreeMap;

use serde::Serialize;

use super::draft::{FarmOnboardingDraft, Field};
use super::state::WizardStep;

pub const FARM_NAME_REQUIRED: &str = "Farm name is required";
pub const LOCATION_REQUIRED: &str = "Location is required";
pub const TOTAL_AREA_REQUIRED: &str = "Total area is required";
pub const INVALID_NUMBER: &str = "Must be a valid number";
pub const SOWING_DATE_REQUIRED: &str = "Sowing date is required";

/// Field-scoped validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Record `message` for `field`, replacing any earlier message for it.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drop the error for `field`. Returns whether one was present.
    pub fn clear(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl<const N: usize> From<[(Field, &str); N]> for ValidationErrors {
    fn from(entries: [(Field, &str); N]) -> Self {
        Self(entries.into_iter().map(|(f, m)| (f, m.to_string())).collect())
    }
}

/// Whether `raw` reads as a finite number.
///
/// Surrounding whitespace is ignored, as a number input would.
pub fn is_finite_number(raw: &str) -> bool {
    raw.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

/// Validate the fields owned by `step`.
///
/// Every rule runs; nothing short-circuits. The review step has no rules.
pub fn validate_step(step: WizardStep, draft: &FarmOnboardingDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match step {
        WizardStep::FarmDetails => {
            if draft.farm_name.trim().is_empty() {
                errors.insert(Field::FarmName, FARM_NAME_REQUIRED);
            }
            if draft.farm_location.trim().is_empty() {
                errors.insert(Field::FarmLocation, LOCATION_REQUIRED);
            }
            if draft.total_area.is_empty() {
                errors.insert(Field::TotalArea, TOTAL_AREA_REQUIRED);
            } else if !is_finite_number(&draft.total_area) {
                errors.insert(Field::TotalArea, INVALID_NUMBER);
            }
        }
        WizardStep::CropDetails => {
            if draft.sowing_date.is_empty() {
                errors.insert(Field::SowingDate, SOWING_DATE_REQUIRED);
            }
        }
        WizardStep::Preferences | WizardStep::Review => {}
    }

    errors
}
