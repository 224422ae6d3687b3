//! Terminal front end. Drives a [`WizardController`] from line commands.
//!
//! Input lines arrive over a channel and location requests run on their own
//! task, so the farmer can keep editing while a position is being acquired.
//! [`run`] waits on both.

use std::io::BufRead;

use tokio::sync::mpsc;

use crate::config::UserPreferences;
use crate::error::FieldError;
use crate::onboarding::{
    AcquireOutcome, Completion, Field, GeolocationAcquirer, LocateTicket, Navigator, Route,
    Transition, WizardController, WizardStep,
};
use crate::reference::{
    AreaUnit, Crop, CropSeason, FarmMode, IndianState, IrrigationType, MeasurementUnits,
    SoilType, WaterSource,
};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: Field, value: String },
    Next,
    Back,
    Locate,
    Show,
    Options(Field),
    DismissHint,
    Done,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };

    let field = |name: &str| {
        Field::from_name(name).ok_or_else(|| FieldError::UnknownField(name.to_string()))
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Command::Set {
                field: field(name)?,
                value: value.trim().to_string(),
            }
        }
        "next" | "n" => Command::Next,
        "back" | "prev" | "b" => Command::Back,
        "locate" => Command::Locate,
        "show" => Command::Show,
        "options" => Command::Options(field(rest)?),
        "dismiss" => Command::DismissHint,
        "done" | "complete" => Command::Done,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "/quit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

/// Option codes for a select field, or `None` for free-text fields.
pub fn option_codes(field: Field) -> Option<Vec<&'static str>> {
    fn codes<T: Copy>(all: &[T], code: fn(&T) -> &'static str) -> Option<Vec<&'static str>> {
        Some(all.iter().map(code).collect())
    }
    match field {
        Field::State => codes(IndianState::ALL, IndianState::code),
        Field::AreaUnit => codes(AreaUnit::ALL, AreaUnit::code),
        Field::SoilType => codes(SoilType::ALL, SoilType::code),
        Field::PrimaryCrop => codes(Crop::ALL, Crop::code),
        Field::CropSeason => codes(CropSeason::ALL, CropSeason::code),
        Field::IrrigationType => codes(IrrigationType::ALL, IrrigationType::code),
        Field::WaterSource => codes(WaterSource::ALL, WaterSource::code),
        Field::DefaultMode => codes(FarmMode::ALL, FarmMode::code),
        Field::MeasurementUnits => codes(MeasurementUnits::ALL, MeasurementUnits::code),
        _ => None,
    }
}

/// Navigator that prints the target route.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        println!("→ {route}");
    }
}

/// How a terminal session ended.
#[derive(Debug)]
pub struct CliOutcome {
    /// Present when the farmer completed the wizard.
    pub completion: Option<Completion>,
    /// Preferences as left by the session, for the caller to persist.
    pub preferences: UserPreferences,
}

const HELP: &str = "\
Commands:
  set <field> <value>   e.g. set farmName Green Valley Farm
  options <field>       list codes for a select field
  next | back           move between steps
  locate                use this device's location
  dismiss               hide the location hint
  show                  print the current step
  done                  finish from the review step
  quit                  leave without finishing";

/// Read stdin lines on a dedicated OS thread.
///
/// A pending blocking read cannot be cancelled, so it must not belong to the
/// runtime: the process exits once [`run`] returns even if the thread is still
/// waiting for input.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Error reading input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Run the wizard until the farmer completes it, quits, or input ends.
///
/// Input ends when every sender of `lines` is dropped. Returning does not
/// wait for further input.
pub async fn run(
    mut wizard: WizardController,
    acquirer: GeolocationAcquirer,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> CliOutcome {
    let (located_tx, mut located_rx) = mpsc::unbounded_channel::<(LocateTicket, AcquireOutcome)>();

    print_step(&wizard);
    let mut completion = None;

    loop {
        let line = tokio::select! {
            line = lines.recv() => match line {
                Some(line) => line,
                None => break,
            },
            Some((ticket, outcome)) = located_rx.recv() => {
                report_location(&mut wizard, ticket, outcome);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                println!("{e}. Type 'help' for commands.");
                continue;
            }
        };

        match command {
            Command::Set { field, value } => match wizard.set_field_raw(field, &value) {
                Ok(()) => println!("✓ {field} updated"),
                Err(e) => println!("{e}"),
            },
            Command::Next => match wizard.next() {
                Transition::Moved { .. } => print_step(&wizard),
                Transition::Blocked(errors) => {
                    for (field, message) in errors.iter() {
                        println!("  ✗ {field}: {message}");
                    }
                }
                Transition::Stayed(_) => println!("Already on the last step. Type 'done' to finish."),
            },
            Command::Back => match wizard.previous() {
                Transition::Moved { .. } => print_step(&wizard),
                _ => println!("Already on the first step."),
            },
            Command::Locate => match wizard.begin_locate() {
                Some(ticket) => {
                    println!("Detecting location...");
                    let acquirer = acquirer.clone();
                    let tx = located_tx.clone();
                    tokio::spawn(async move {
                        let outcome = acquirer.acquire(ticket.token()).await;
                        let _ = tx.send((ticket, outcome));
                    });
                }
                None => println!("A location request is already in progress."),
            },
            Command::Show => print_step(&wizard),
            Command::Options(field) => match option_codes(field) {
                Some(codes) => println!("{}", codes.join(", ")),
                None => println!("{field} is a free-text field."),
            },
            Command::DismissHint => {
                wizard.dismiss_location_hint();
                println!("Hint hidden.");
            }
            Command::Done => match wizard.complete() {
                Ok(done) => {
                    completion = Some(done);
                    break;
                }
                Err(e) => println!("{e}"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    wizard.unmount();
    CliOutcome {
        completion,
        preferences: wizard.config().preferences.clone(),
    }
}

fn report_location(wizard: &mut WizardController, ticket: LocateTicket, outcome: AcquireOutcome) {
    if !wizard.apply_location(ticket, outcome) {
        return;
    }
    match wizard.location_message() {
        Some(msg) => println!("⚠️  {msg}"),
        None => {
            if let Some((lat, lon)) = wizard.draft().coordinates() {
                println!("📍 Location set: {lat:.4}, {lon:.4}");
            }
        }
    }
}

fn print_step(wizard: &WizardController) {
    let step = wizard.step();
    println!("\nStep {} of 4: {}", step.number(), step.title());

    if step == WizardStep::Review {
        println!("{}", wizard.review().to_text());
        println!("\nType 'done' to finish or 'back' to edit.");
        return;
    }

    let draft = serde_json::to_value(wizard.draft()).unwrap_or_default();
    for field in Field::ALL.iter().filter(|f| f.step() == step) {
        if matches!(field, Field::Latitude | Field::Longitude) {
            continue;
        }
        let value = match &draft[field.as_str()] {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let error = wizard
            .errors()
            .get(*field)
            .map(|m| format!("  ✗ {m}"))
            .unwrap_or_default();
        println!("  {field}: {value}{error}");
    }

    if step == WizardStep::FarmDetails && wizard.shows_location_hint() {
        println!("  Tip: type 'locate' to fill coordinates from this device.");
    }
    if let Some(msg) = wizard.location_message() {
        println!("  ⚠️  {msg}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::config::WizardConfig;
    use crate::onboarding::geolocation::UnsupportedLocation;
    use crate::onboarding::{DemoUser, LocalSession, Session};

    #[test]
    fn parses_set_with_spaces_in_value() {
        assert_eq!(
            parse_command("set farmName Green Valley Farm").unwrap(),
            Command::Set {
                field: Field::FarmName,
                value: "Green Valley Farm".into()
            }
        );
    }

    #[test]
    fn parses_set_with_empty_value() {
        assert_eq!(
            parse_command("set sowingDate").unwrap(),
            Command::Set {
                field: Field::SowingDate,
                value: String::new()
            }
        );
    }

    #[test]
    fn rejects_unknown_field_and_command() {
        assert_eq!(
            parse_command("set farmname x").unwrap_err(),
            CommandError::Field(FieldError::UnknownField("farmname".into()))
        );
        assert_eq!(
            parse_command("plough").unwrap_err(),
            CommandError::Unknown("plough".into())
        );
    }

    #[test]
    fn short_aliases() {
        assert_eq!(parse_command("n").unwrap(), Command::Next);
        assert_eq!(parse_command("b").unwrap(), Command::Back);
        assert_eq!(parse_command("DONE").unwrap(), Command::Done);
    }

    #[test]
    fn option_codes_for_select_fields_only() {
        assert_eq!(
            option_codes(Field::CropSeason).unwrap(),
            vec!["kharif", "rabi", "zaid"]
        );
        assert!(option_codes(Field::FarmName).is_none());
    }

    fn demo_wizard() -> WizardController {
        let session = Arc::new(LocalSession::new(Session::DemoAccount(DemoUser {
            name: "Demo".into(),
        })));
        WizardController::new(WizardConfig::default(), session, Arc::new(TerminalNavigator))
    }

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Queue `script` on a fresh line channel. The sender is returned so the
    /// caller decides whether input ends.
    fn scripted(script: &str) -> (mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in script.lines() {
            tx.send(line.to_string()).unwrap();
        }
        (tx, rx)
    }

    fn unsupported() -> GeolocationAcquirer {
        GeolocationAcquirer::new(Arc::new(UnsupportedLocation))
    }

    #[tokio::test]
    async fn done_returns_while_input_stays_open() {
        let (_tx, lines) = scripted(
            "set farmName Green Valley Farm
set farmLocation Kharadi
set totalArea 12
next
set sowingDate 2025-06-15
next
next
done",
        );
        let outcome = timeout(TEST_TIMEOUT, run(demo_wizard(), unsupported(), lines))
            .await
            .expect("run should return after done without waiting for more input");

        let done = outcome.completion.expect("wizard should complete");
        assert_eq!(done.route, Route::Dashboard);
        assert!(!done.marked_complete);
        assert_eq!(done.draft.farm_name, "Green Valley Farm");
    }

    #[tokio::test]
    async fn quit_returns_while_input_stays_open() {
        let (_tx, lines) = scripted("set farmName Farm\nquit");
        let outcome = timeout(TEST_TIMEOUT, run(demo_wizard(), unsupported(), lines))
            .await
            .expect("run should return after quit without waiting for more input");
        assert!(outcome.completion.is_none());
    }

    #[tokio::test]
    async fn eof_before_review_leaves_incomplete() {
        let (tx, lines) = scripted("set farmName Farm\nnext\ndismiss");
        drop(tx);
        let outcome = timeout(TEST_TIMEOUT, run(demo_wizard(), unsupported(), lines))
            .await
            .unwrap();
        assert!(outcome.completion.is_none());
        assert_eq!(outcome.preferences.dismissed_banners.len(), 1);
    }
}
