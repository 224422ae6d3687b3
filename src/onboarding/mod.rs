//! Farm onboarding wizard: a four-step form flow run once per new farmer.
//!
//! The controller owns a single draft for the lifetime of the wizard. Each
//! step's fields are validated only when the farmer presses Next on that
//! step; going back never validates. Completing from the review step flags
//! the session and navigates to the dashboard.

pub mod controller;
pub mod draft;
pub mod geolocation;
pub mod review;
pub mod rules;
pub mod session;
pub mod state;
pub mod validate;

pub use controller::{Completion, LocateTicket, Transition, WizardController};
pub use draft::{FarmOnboardingDraft, Field, FieldUpdate, FormStore};
pub use geolocation::{AcquireOutcome, Coordinates, GeoError, GeolocationAcquirer, LocationProvider};
pub use review::ReviewSummary;
pub use session::{AuthenticatedUser, DemoUser, LocalSession, Navigator, Route, Session, SessionProvider};
pub use state::WizardStep;
pub use validate::{ValidationErrors, validate_step};
