//! The onboarding draft and the form store that owns it.

use serde::{Deserialize, Serialize};

use crate::config::WizardDefaults;
use crate::error::FieldError;
use crate::reference::{
    AreaUnit, Crop, CropSeason, FarmMode, IndianState, IrrigationType, MeasurementUnits,
    SoilType, WaterSource,
};

use super::state::WizardStep;

/// Names of the draft's fields, as the UI knows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FarmName,
    FarmLocation,
    State,
    Latitude,
    Longitude,
    TotalArea,
    AreaUnit,
    SoilType,
    PrimaryCrop,
    CropSeason,
    SowingDate,
    IrrigationType,
    WaterSource,
    DefaultMode,
    MeasurementUnits,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::FarmName,
        Field::FarmLocation,
        Field::State,
        Field::Latitude,
        Field::Longitude,
        Field::TotalArea,
        Field::AreaUnit,
        Field::SoilType,
        Field::PrimaryCrop,
        Field::CropSeason,
        Field::SowingDate,
        Field::IrrigationType,
        Field::WaterSource,
        Field::DefaultMode,
        Field::MeasurementUnits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FarmName => "farmName",
            Self::FarmLocation => "farmLocation",
            Self::State => "state",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::TotalArea => "totalArea",
            Self::AreaUnit => "areaUnit",
            Self::SoilType => "soilType",
            Self::PrimaryCrop => "primaryCrop",
            Self::CropSeason => "cropSeason",
            Self::SowingDate => "sowingDate",
            Self::IrrigationType => "irrigationType",
            Self::WaterSource => "waterSource",
            Self::DefaultMode => "defaultMode",
            Self::MeasurementUnits => "measurementUnits",
        }
    }

    /// Look up a field by its UI name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// The step whose form displays this field.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::FarmName
            | Self::FarmLocation
            | Self::State
            | Self::Latitude
            | Self::Longitude
            | Self::TotalArea
            | Self::AreaUnit
            | Self::SoilType => WizardStep::FarmDetails,
            Self::PrimaryCrop
            | Self::CropSeason
            | Self::SowingDate
            | Self::IrrigationType
            | Self::WaterSource => WizardStep::CropDetails,
            Self::DefaultMode | Self::MeasurementUnits => WizardStep::Preferences,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything collected by the wizard.
///
/// `total_area` and `sowing_date` hold exactly what the user typed; nothing
/// is parsed until validation or review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmOnboardingDraft {
    pub farm_name: String,
    pub farm_location: String,
    pub state: IndianState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub total_area: String,
    pub area_unit: AreaUnit,
    pub soil_type: SoilType,
    pub primary_crop: Crop,
    pub crop_season: CropSeason,
    pub sowing_date: String,
    pub irrigation_type: IrrigationType,
    pub water_source: WaterSource,
    pub default_mode: FarmMode,
    pub measurement_units: MeasurementUnits,
}

impl FarmOnboardingDraft {
    /// A fresh draft with the configured default selections and empty text fields.
    pub fn with_defaults(defaults: &WizardDefaults) -> Self {
        Self {
            farm_name: String::new(),
            farm_location: String::new(),
            state: defaults.state,
            latitude: None,
            longitude: None,
            total_area: String::new(),
            area_unit: defaults.area_unit,
            soil_type: defaults.soil_type,
            primary_crop: defaults.primary_crop,
            crop_season: defaults.crop_season,
            sowing_date: String::new(),
            irrigation_type: defaults.irrigation_type,
            water_source: defaults.water_source,
            default_mode: defaults.default_mode,
            measurement_units: defaults.measurement_units,
        }
    }

    /// Both coordinates, if a location has been acquired.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Default for FarmOnboardingDraft {
    fn default() -> Self {
        Self::with_defaults(&WizardDefaults::default())
    }
}

/// A single-field replacement.
///
/// Latitude and longitude have no variants; only
/// [`FormStore::set_coordinates`] writes them.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    FarmName(String),
    FarmLocation(String),
    State(IndianState),
    TotalArea(String),
    AreaUnit(AreaUnit),
    SoilType(SoilType),
    PrimaryCrop(Crop),
    CropSeason(CropSeason),
    SowingDate(String),
    IrrigationType(IrrigationType),
    WaterSource(WaterSource),
    DefaultMode(FarmMode),
    MeasurementUnits(MeasurementUnits),
}

impl FieldUpdate {
    /// The field this update writes.
    pub fn field(&self) -> Field {
        match self {
            Self::FarmName(_) => Field::FarmName,
            Self::FarmLocation(_) => Field::FarmLocation,
            Self::State(_) => Field::State,
            Self::TotalArea(_) => Field::TotalArea,
            Self::AreaUnit(_) => Field::AreaUnit,
            Self::SoilType(_) => Field::SoilType,
            Self::PrimaryCrop(_) => Field::PrimaryCrop,
            Self::CropSeason(_) => Field::CropSeason,
            Self::SowingDate(_) => Field::SowingDate,
            Self::IrrigationType(_) => Field::IrrigationType,
            Self::WaterSource(_) => Field::WaterSource,
            Self::DefaultMode(_) => Field::DefaultMode,
            Self::MeasurementUnits(_) => Field::MeasurementUnits,
        }
    }

    /// Build an update from a field and the raw value an input produced.
    ///
    /// Text fields take the value verbatim. Select fields must name one of
    /// the reference options by code.
    pub fn parse(field: Field, raw: &str) -> Result<Self, FieldError> {
        fn option<T>(field: Field, raw: &str, lookup: fn(&str) -> Option<T>) -> Result<T, FieldError> {
            lookup(raw).ok_or_else(|| FieldError::UnknownOption {
                field: field.as_str().to_string(),
                value: raw.to_string(),
            })
        }

        let update = match field {
            Field::FarmName => Self::FarmName(raw.to_string()),
            Field::FarmLocation => Self::FarmLocation(raw.to_string()),
            Field::TotalArea => Self::TotalArea(raw.to_string()),
            Field::SowingDate => Self::SowingDate(raw.to_string()),
            Field::State => Self::State(option(field, raw, IndianState::from_code)?),
            Field::AreaUnit => Self::AreaUnit(option(field, raw, AreaUnit::from_code)?),
            Field::SoilType => Self::SoilType(option(field, raw, SoilType::from_code)?),
            Field::PrimaryCrop => Self::PrimaryCrop(option(field, raw, Crop::from_code)?),
            Field::CropSeason => Self::CropSeason(option(field, raw, CropSeason::from_code)?),
            Field::IrrigationType => {
                Self::IrrigationType(option(field, raw, IrrigationType::from_code)?)
            }
            Field::WaterSource => Self::WaterSource(option(field, raw, WaterSource::from_code)?),
            Field::DefaultMode => Self::DefaultMode(option(field, raw, FarmMode::from_code)?),
            Field::MeasurementUnits => {
                Self::MeasurementUnits(option(field, raw, MeasurementUnits::from_code)?)
            }
            Field::Latitude | Field::Longitude => {
                return Err(FieldError::NotEditable {
                    field: field.as_str().to_string(),
                });
            }
        };
        Ok(update)
    }
}

/// In-memory holder for the draft. No I/O, no coercion.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    draft: FarmOnboardingDraft,
}

impl FormStore {
    pub fn new(draft: FarmOnboardingDraft) -> Self {
        Self { draft }
    }

    /// Replace one field's value unconditionally.
    pub fn set_field(&mut self, update: FieldUpdate) {
        let d = &mut self.draft;
        match update {
            FieldUpdate::FarmName(v) => d.farm_name = v,
            FieldUpdate::FarmLocation(v) => d.farm_location = v,
            FieldUpdate::State(v) => d.state = v,
            FieldUpdate::TotalArea(v) => d.total_area = v,
            FieldUpdate::AreaUnit(v) => d.area_unit = v,
            FieldUpdate::SoilType(v) => d.soil_type = v,
            FieldUpdate::PrimaryCrop(v) => d.primary_crop = v,
            FieldUpdate::CropSeason(v) => d.crop_season = v,
            FieldUpdate::SowingDate(v) => d.sowing_date = v,
            FieldUpdate::IrrigationType(v) => d.irrigation_type = v,
            FieldUpdate::WaterSource(v) => d.water_source = v,
            FieldUpdate::DefaultMode(v) => d.default_mode = v,
            FieldUpdate::MeasurementUnits(v) => d.measurement_units = v,
        }
    }

    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.draft.latitude = Some(latitude);
        self.draft.longitude = Some(longitude);
    }

    /// A copy of the current draft.
    pub fn draft(&self) -> FarmOnboardingDraft {
        self.draft.clone()
    }

    /// Borrow the draft without copying.
    pub fn view(&self) -> &FarmOnboardingDraft {
        &self.draft
    }
}
