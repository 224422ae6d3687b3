use std::sync::Arc;

use krushi_mitra::cli::{self, TerminalNavigator};
use krushi_mitra::config::{AppConfig, UserPreferences, WizardConfig, settings_keys};
use krushi_mitra::onboarding::geolocation::{FixedLocation, LocationProvider, UnsupportedLocation};
use krushi_mitra::onboarding::{
    AuthenticatedUser, DemoUser, GeolocationAcquirer, LocalSession, ReviewSummary, Session,
    SessionProvider, WizardController,
};
use krushi_mitra::store::{LibSqlPreferenceStore, PreferenceStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("🌾 Krushi Mitra v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!(
        "   Session: {} ({})",
        config.user_name,
        if config.demo { "demo" } else { "farmer" }
    );

    // ── Preferences ──────────────────────────────────────────────────────
    let store: Arc<dyn PreferenceStore> =
        Arc::new(LibSqlPreferenceStore::new_local(&config.db_path).await?);
    let preferences = UserPreferences::load(store.as_ref(), &config.user_id).await?;

    let already_onboarded = store
        .get_setting(&config.user_id, settings_keys::ONBOARDING_COMPLETED)
        .await?
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if already_onboarded && !config.demo {
        eprintln!("   Onboarding already complete for {}.", config.user_id);
        return Ok(());
    }

    // ── Session ──────────────────────────────────────────────────────────
    let session = if config.demo {
        Session::DemoAccount(DemoUser {
            name: config.user_name.clone(),
        })
    } else {
        Session::Authenticated(AuthenticatedUser {
            id: uuid::Uuid::new_v4(),
            name: config.user_name.clone(),
            phone: String::new(),
            onboarding_completed: false,
            onboarding_completed_at: None,
        })
    };
    let session = Arc::new(LocalSession::new(session));

    let provider: Arc<dyn LocationProvider> = match config.location {
        Some(coords) => Arc::new(FixedLocation(coords)),
        None => Arc::new(UnsupportedLocation),
    };
    eprintln!(
        "   Location: {}\n   Type 'help' for commands.",
        if config.location.is_some() { "fixed" } else { "unavailable" }
    );

    let wizard = WizardController::new(
        WizardConfig {
            preferences,
            ..WizardConfig::default()
        },
        session.clone(),
        Arc::new(TerminalNavigator),
    );

    let outcome = cli::run(wizard, GeolocationAcquirer::new(provider), cli::stdin_lines()).await;

    outcome
        .preferences
        .save(store.as_ref(), &config.user_id)
        .await?;

    if let Some(done) = outcome.completion {
        if done.marked_complete {
            store
                .set_setting(
                    &config.user_id,
                    settings_keys::ONBOARDING_COMPLETED,
                    &serde_json::Value::Bool(true),
                )
                .await?;
        }
        println!("{}", ReviewSummary::from_draft(&done.draft).to_text());
        eprintln!(
            "   Welcome, {}! Onboarding finished.",
            session.session().display_name()
        );
    }

    Ok(())
}
