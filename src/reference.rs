//! Static reference tables used by the onboarding wizard's select inputs.
//!
//! Every option carries a stable wire code (what the UI posts and what serde
//! writes) and a display label.

use serde::{Deserialize, Serialize};

macro_rules! reference_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Every option, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable wire code.
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Look up an option by wire code (case-insensitive).
            pub fn from_code(code: &str) -> Option<Self> {
                let code = code.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.code().eq_ignore_ascii_case(code))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }
    };
}

reference_enum! {
    /// Indian states offered in the farm location step.
    IndianState {
        AndhraPradesh => ("andhra_pradesh", "Andhra Pradesh"),
        ArunachalPradesh => ("arunachal_pradesh", "Arunachal Pradesh"),
        Assam => ("assam", "Assam"),
        Bihar => ("bihar", "Bihar"),
        Chhattisgarh => ("chhattisgarh", "Chhattisgarh"),
        Goa => ("goa", "Goa"),
        Gujarat => ("gujarat", "Gujarat"),
        Haryana => ("haryana", "Haryana"),
        HimachalPradesh => ("himachal_pradesh", "Himachal Pradesh"),
        Jharkhand => ("jharkhand", "Jharkhand"),
        Karnataka => ("karnataka", "Karnataka"),
        Kerala => ("kerala", "Kerala"),
        MadhyaPradesh => ("madhya_pradesh", "Madhya Pradesh"),
        Maharashtra => ("maharashtra", "Maharashtra"),
        Manipur => ("manipur", "Manipur"),
        Meghalaya => ("meghalaya", "Meghalaya"),
        Mizoram => ("mizoram", "Mizoram"),
        Nagaland => ("nagaland", "Nagaland"),
        Odisha => ("odisha", "Odisha"),
        Punjab => ("punjab", "Punjab"),
        Rajasthan => ("rajasthan", "Rajasthan"),
        Sikkim => ("sikkim", "Sikkim"),
        TamilNadu => ("tamil_nadu", "Tamil Nadu"),
        Telangana => ("telangana", "Telangana"),
        Tripura => ("tripura", "Tripura"),
        UttarPradesh => ("uttar_pradesh", "Uttar Pradesh"),
        Uttarakhand => ("uttarakhand", "Uttarakhand"),
        WestBengal => ("west_bengal", "West Bengal"),
    }
}

reference_enum! {
    Crop {
        Wheat => ("wheat", "Wheat"),
        Rice => ("rice", "Rice"),
        Cotton => ("cotton", "Cotton"),
        Sugarcane => ("sugarcane", "Sugarcane"),
        Soybean => ("soybean", "Soybean"),
        Maize => ("maize", "Maize"),
        Onion => ("onion", "Onion"),
        Tomato => ("tomato", "Tomato"),
        Pulses => ("pulses", "Pulses"),
        Groundnut => ("groundnut", "Groundnut"),
    }
}

reference_enum! {
    SoilType {
        Black => ("black", "Black Soil"),
        Red => ("red", "Red Soil"),
        Alluvial => ("alluvial", "Alluvial Soil"),
        Laterite => ("laterite", "Laterite Soil"),
        Sandy => ("sandy", "Sandy Soil"),
        Clay => ("clay", "Clay Soil"),
        Loamy => ("loamy", "Loamy Soil"),
    }
}

reference_enum! {
    WaterSource {
        Borewell => ("borewell", "Borewell"),
        Canal => ("canal", "Canal"),
        River => ("river", "River"),
        Well => ("well", "Open Well"),
        Pond => ("pond", "Farm Pond"),
        Rainwater => ("rainwater", "Rainwater"),
    }
}

reference_enum! {
    /// Indian cropping seasons.
    CropSeason {
        Kharif => ("kharif", "Kharif (Monsoon)"),
        Rabi => ("rabi", "Rabi (Winter)"),
        Zaid => ("zaid", "Zaid (Summer)"),
    }
}

reference_enum! {
    AreaUnit {
        Acres => ("acres", "Acres"),
        Hectares => ("hectares", "Hectares"),
    }
}

reference_enum! {
    IrrigationType {
        Drip => ("drip", "Drip Irrigation"),
        Sprinkler => ("sprinkler", "Sprinkler"),
        Flood => ("flood", "Flood Irrigation"),
    }
}

reference_enum! {
    /// Whether the farm's actuators run on their own or wait for the farmer.
    FarmMode {
        Autonomous => ("autonomous", "Autonomous"),
        Manual => ("manual", "Manual"),
    }
}

reference_enum! {
    MeasurementUnits {
        Metric => ("metric", "Metric"),
        Imperial => ("imperial", "Imperial"),
    }
}

/// Hectares per acre.
pub const HECTARES_PER_ACRE: f64 = 0.404_686;

impl AreaUnit {
    /// Convert an area in this unit to hectares.
    pub fn to_hectares(&self, value: f64) -> f64 {
        match self {
            Self::Acres => value * HECTARES_PER_ACRE,
            Self::Hectares => value,
        }
    }
}
