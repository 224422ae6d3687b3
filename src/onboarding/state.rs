//! Wizard step state machine. Tracks which screen the farmer is on.

use serde::{Deserialize, Serialize};

/// The four screens of the onboarding wizard.
///
/// Progresses FarmDetails → CropDetails → Preferences → Review, and can step
/// back one screen at a time. There is no terminal step; completing from
/// Review leaves the wizard entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    FarmDetails,
    CropDetails,
    Preferences,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::FarmDetails,
        WizardStep::CropDetails,
        WizardStep::Preferences,
        WizardStep::Review,
    ];

    /// 1-based position shown in the progress bar.
    pub fn number(&self) -> u8 {
        match self {
            Self::FarmDetails => 1,
            Self::CropDetails => 2,
            Self::Preferences => 3,
            Self::Review => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::FarmDetails),
            2 => Some(Self::CropDetails),
            3 => Some(Self::Preferences),
            4 => Some(Self::Review),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Whether this is the review screen, the only one that can complete.
    pub fn is_review(&self) -> bool {
        matches!(self, Self::Review)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::FarmDetails => "Farm Details",
            Self::CropDetails => "Crop Information",
            Self::Preferences => "Preferences",
            Self::Review => "Review & Confirm",
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::FarmDetails
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FarmDetails => "farm_details",
            Self::CropDetails => "crop_details",
            Self::Preferences => "preferences",
            Self::Review => "review",
        };
        write!(f, "{s}")
    }
}
