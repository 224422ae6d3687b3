//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StoreError};
use crate::onboarding::geolocation::Coordinates;
use crate::reference::{
    AreaUnit, Crop, CropSeason, FarmMode, IndianState, IrrigationType, MeasurementUnits,
    SoilType, WaterSource,
};
use crate::store::PreferenceStore;

/// Initial selections for the wizard's select inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardDefaults {
    pub state: IndianState,
    pub area_unit: AreaUnit,
    pub soil_type: SoilType,
    pub primary_crop: Crop,
    pub crop_season: CropSeason,
    pub irrigation_type: IrrigationType,
    pub water_source: WaterSource,
    pub default_mode: FarmMode,
    pub measurement_units: MeasurementUnits,
}

impl Default for WizardDefaults {
    fn default() -> Self {
        Self {
            state: IndianState::Maharashtra,
            area_unit: AreaUnit::Acres,
            soil_type: SoilType::Black,
            primary_crop: Crop::Wheat,
            crop_season: CropSeason::Kharif,
            irrigation_type: IrrigationType::Drip,
            water_source: WaterSource::Borewell,
            default_mode: FarmMode::Autonomous,
            measurement_units: MeasurementUnits::Metric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "mr")]
    Marathi,
}

/// Settings keys used for preference persistence.
pub mod settings_keys {
    pub const LANGUAGE: &str = "language";
    pub const DISMISSED_BANNERS: &str = "dismissed_banners";
    pub const PREFERRED_UNITS: &str = "preferred_units";
    pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
}

/// Banner ids the wizard knows how to dismiss.
pub mod banners {
    pub const LOCATION_HINT: &str = "onboarding_location_hint";
}

/// Per-user preferences read through a [`PreferenceStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    pub language: Language,
    pub dismissed_banners: Vec<String>,
    pub preferred_units: Option<MeasurementUnits>,
}

impl UserPreferences {
    /// Load preferences for `user_id`. Missing or malformed values fall back
    /// to defaults.
    pub async fn load(store: &dyn PreferenceStore, user_id: &str) -> Result<Self, StoreError> {
        let mut prefs = Self::default();

        if let Some(value) = store.get_setting(user_id, settings_keys::LANGUAGE).await? {
            match serde_json::from_value(value) {
                Ok(lang) => prefs.language = lang,
                Err(e) => tracing::warn!(user_id, "Ignoring malformed language preference: {e}"),
            }
        }
        if let Some(value) = store
            .get_setting(user_id, settings_keys::DISMISSED_BANNERS)
            .await?
        {
            match serde_json::from_value(value) {
                Ok(ids) => prefs.dismissed_banners = ids,
                Err(e) => tracing::warn!(user_id, "Ignoring malformed banner list: {e}"),
            }
        }
        if let Some(value) = store
            .get_setting(user_id, settings_keys::PREFERRED_UNITS)
            .await?
        {
            match serde_json::from_value(value) {
                Ok(units) => prefs.preferred_units = Some(units),
                Err(e) => tracing::warn!(user_id, "Ignoring malformed unit preference: {e}"),
            }
        }

        Ok(prefs)
    }

    pub async fn save(&self, store: &dyn PreferenceStore, user_id: &str) -> Result<(), StoreError> {
        let ser = |e: serde_json::Error| StoreError::Serialization(e.to_string());

        store
            .set_setting(
                user_id,
                settings_keys::LANGUAGE,
                &serde_json::to_value(self.language).map_err(ser)?,
            )
            .await?;
        store
            .set_setting(
                user_id,
                settings_keys::DISMISSED_BANNERS,
                &serde_json::to_value(&self.dismissed_banners).map_err(ser)?,
            )
            .await?;
        match self.preferred_units {
            Some(units) => {
                store
                    .set_setting(
                        user_id,
                        settings_keys::PREFERRED_UNITS,
                        &serde_json::to_value(units).map_err(ser)?,
                    )
                    .await?
            }
            None => {
                store
                    .delete_setting(user_id, settings_keys::PREFERRED_UNITS)
                    .await?;
            }
        }
        Ok(())
    }

    pub fn is_dismissed(&self, banner: &str) -> bool {
        self.dismissed_banners.iter().any(|b| b == banner)
    }

    pub fn dismiss(&mut self, banner: &str) {
        if !self.is_dismissed(banner) {
            self.dismissed_banners.push(banner.to_string());
        }
    }
}

/// Everything a wizard needs at construction.
#[derive(Debug, Clone, Default)]
pub struct WizardConfig {
    pub defaults: WizardDefaults,
    pub preferences: UserPreferences,
}

impl WizardConfig {
    /// Defaults with the user's stored unit preference applied.
    pub fn effective_defaults(&self) -> WizardDefaults {
        let mut defaults = self.defaults.clone();
        if let Some(units) = self.preferences.preferred_units {
            defaults.measurement_units = units;
        }
        defaults
    }
}

/// Process configuration for the terminal front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Key under which preferences are stored.
    pub user_id: String,
    pub user_name: String,
    pub demo: bool,
    /// Fixed device position; `None` means no location capability.
    pub location: Option<Coordinates>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path: PathBuf = get("KRUSHI_DB_PATH")
            .unwrap_or_else(|| "./data/krushi-mitra.db".to_string())
            .into();
        let user_id = get("KRUSHI_USER_ID").unwrap_or_else(|| "local".to_string());
        let user_name = get("KRUSHI_USER_NAME").unwrap_or_else(|| "Farmer".to_string());
        let demo = match get("KRUSHI_DEMO").as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "KRUSHI_DEMO".into(),
                    message: format!("expected true/false, got '{other}'"),
                });
            }
        };

        let location = match (get("KRUSHI_LAT"), get("KRUSHI_LON")) {
            (Some(lat), Some(lon)) => Some(Coordinates {
                latitude: parse_coord("KRUSHI_LAT", &lat, 90.0)?,
                longitude: parse_coord("KRUSHI_LON", &lon, 180.0)?,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "KRUSHI_LAT/KRUSHI_LON".into(),
                    message: "both coordinates must be set together".into(),
                });
            }
        };

        Ok(Self {
            db_path,
            user_id,
            user_name,
            demo,
            location,
        })
    }
}

fn parse_coord(key: &str, raw: &str, limit: f64) -> Result<f64, ConfigError> {
    let value: f64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{raw}' is not a number"),
    })?;
    if !value.is_finite() || value.abs() > limit {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{value} is out of range"),
        });
    }
    Ok(value)
}
