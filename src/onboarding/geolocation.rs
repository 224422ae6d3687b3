//! Geolocation acquisition: one awaitable request for the device position.
//!
//! The platform capability sits behind [`LocationProvider`]. The acquirer
//! turns its result into an [`AcquireOutcome`] and honours a cancellation
//! token so a wizard that goes away mid-request never sees the answer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub const PERMISSION_MESSAGE: &str = "Unable to access your location. Please check permissions.";
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your browser.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a position could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("geolocation capability is absent")]
    Unsupported,

    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out")]
    Timeout,
}

impl GeoError {
    /// The advisory shown to the farmer.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unsupported => UNSUPPORTED_MESSAGE,
            Self::PermissionDenied | Self::Unavailable(_) | Self::Timeout => PERMISSION_MESSAGE,
        }
    }
}

/// Platform location capability.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Request the current position once, with the platform's default
    /// accuracy and timeout.
    async fn current_position(&self) -> Result<Coordinates, GeoError>;
}

/// Result of one acquisition attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquireOutcome {
    Located(Coordinates),
    Failed(GeoError),
    /// The token fired before the platform answered.
    Cancelled,
}

/// Wraps a [`LocationProvider`] with cancellation.
#[derive(Clone)]
pub struct GeolocationAcquirer {
    provider: Arc<dyn LocationProvider>,
}

impl GeolocationAcquirer {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self { provider }
    }

    /// Ask the platform for the current position.
    pub async fn acquire(&self, cancel: &CancellationToken) -> AcquireOutcome {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Location request cancelled");
                AcquireOutcome::Cancelled
            }
            result = self.provider.current_position() => match result {
                Ok(coords) => {
                    tracing::debug!(
                        latitude = coords.latitude,
                        longitude = coords.longitude,
                        "Location acquired"
                    );
                    AcquireOutcome::Located(coords)
                }
                Err(e) => {
                    tracing::info!(error = %e, "Location request failed");
                    AcquireOutcome::Failed(e)
                }
            },
        }
    }
}

/// Provider for front ends with no location capability.
pub struct UnsupportedLocation;

#[async_trait]
impl LocationProvider for UnsupportedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Err(GeoError::Unsupported)
    }
}

/// Provider that always answers with the same position.
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}
