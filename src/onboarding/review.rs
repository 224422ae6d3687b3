//! Read-only summary shown on the review step.

use chrono::NaiveDate;
use serde::Serialize;

use crate::reference::{AreaUnit, MeasurementUnits};

use super::draft::FarmOnboardingDraft;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub sections: Vec<ReviewSection>,
    /// Area in hectares, when the entered area is a number.
    pub area_hectares: Option<f64>,
}

impl ReviewSummary {
    pub fn from_draft(draft: &FarmOnboardingDraft) -> Self {
        let area_hectares = draft
            .total_area
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| draft.area_unit.to_hectares(v));

        let mut farm_rows = vec![
            ("Farm Name", draft.farm_name.trim().to_string()),
            (
                "Location",
                format!("{}, {}", draft.farm_location.trim(), draft.state.label()),
            ),
        ];
        if let Some((lat, lon)) = draft.coordinates() {
            farm_rows.push(("Coordinates", format!("{lat:.4}, {lon:.4}")));
        }
        farm_rows.push(("Total Area", format_area(draft, area_hectares)));
        farm_rows.push(("Soil Type", draft.soil_type.label().to_string()));

        let crop_rows = vec![
            ("Primary Crop", draft.primary_crop.label().to_string()),
            ("Season", draft.crop_season.label().to_string()),
            ("Sowing Date", format_sowing_date(&draft.sowing_date)),
            ("Irrigation", draft.irrigation_type.label().to_string()),
            ("Water Source", draft.water_source.label().to_string()),
        ];

        let preference_rows = vec![
            ("Default Mode", draft.default_mode.label().to_string()),
            ("Units", draft.measurement_units.label().to_string()),
        ];

        Self {
            sections: vec![
                ReviewSection {
                    title: "Farm Details",
                    rows: farm_rows,
                },
                ReviewSection {
                    title: "Crop Information",
                    rows: crop_rows,
                },
                ReviewSection {
                    title: "Preferences",
                    rows: preference_rows,
                },
            ],
            area_hectares,
        }
    }

    /// Plain-text rendering for terminals and logs.
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        for section in &self.sections {
            out.push(format!("## {}", section.title));
            for (label, value) in &section.rows {
                out.push(format!("- {label}: {value}"));
            }
        }
        out.join("\n")
    }
}

fn format_area(draft: &FarmOnboardingDraft, hectares: Option<f64>) -> String {
    let entered = format!("{} {}", draft.total_area.trim(), draft.area_unit.label());
    match (hectares, draft.area_unit, draft.measurement_units) {
        (Some(ha), AreaUnit::Acres, MeasurementUnits::Metric) => format!("{entered} ({ha:.2} ha)"),
        _ => entered,
    }
}

/// `2025-06-15` becomes `15 Jun 2025`; anything else is shown as typed.
fn format_sowing_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d %b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{IndianState, SoilType};

    fn draft() -> FarmOnboardingDraft {
        FarmOnboardingDraft {
            farm_name: "Green Valley Farm".into(),
            farm_location: "Kharadi".into(),
            state: IndianState::Maharashtra,
            total_area: "12".into(),
            soil_type: SoilType::Black,
            sowing_date: "2025-06-15".into(),
            ..Default::default()
        }
    }

    #[test]
    fn summary_contains_entered_values() {
        let text = ReviewSummary::from_draft(&draft()).to_text();
        assert!(text.contains("Farm Name: Green Valley Farm"));
        assert!(text.contains("Location: Kharadi, Maharashtra"));
        assert!(text.contains("Soil Type: Black Soil"));
        assert!(text.contains("Sowing Date: 15 Jun 2025"));
        assert!(!text.contains("Coordinates"));
    }

    #[test]
    fn acres_show_hectares_in_metric() {
        let summary = ReviewSummary::from_draft(&draft());
        let ha = summary.area_hectares.unwrap();
        assert!((ha - 4.856232).abs() < 1e-6);
        assert!(summary.to_text().contains("12 Acres (4.86 ha)"));
    }

    #[test]
    fn coordinates_appear_when_acquired() {
        let mut d = draft();
        d.latitude = Some(18.5515);
        d.longitude = Some(73.9348);
        let text = ReviewSummary::from_draft(&d).to_text();
        assert!(text.contains("Coordinates: 18.5515, 73.9348"));
    }

    #[test]
    fn unparsed_date_is_shown_raw() {
        let mut d = draft();
        d.sowing_date = "next week".into();
        let text = ReviewSummary::from_draft(&d).to_text();
        assert!(text.contains("Sowing Date: next week"));
    }
}
