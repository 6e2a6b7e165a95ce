use super::*;
use std::sync::Mutex;

use async_trait::async_trait;
use client_core::{PredictionService, SubmissionState, SubmitError};
use shared::{
    domain::{FieldSet, IrrigationLevel, Location},
    protocol::{PredictRequest, PredictionResult},
};

/// Replies from a script and records every request it receives.
struct ScriptedService {
    replies: Mutex<Vec<Result<PredictionResult, SubmitError>>>,
    requests: Mutex<Vec<FieldSet>>,
}

impl ScriptedService {
    fn new(mut replies: Vec<Result<PredictionResult, SubmitError>>) -> Arc<Self> {
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<FieldSet> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl PredictionService for ScriptedService {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, SubmitError> {
        self.requests.lock().expect("requests lock").push(*request);
        self.replies
            .lock()
            .expect("replies lock")
            .pop()
            .unwrap_or_else(|| Err(SubmitError::Transport("no scripted reply".to_string())))
    }
}

fn scenario_result() -> PredictionResult {
    PredictionResult {
        predicted_yield: 123.456,
        predicted_quality: 8.2,
        predicted_stress: 0.31,
        predicted_agronomic: 65.0,
    }
}

async fn run_session(
    service: Arc<ScriptedService>,
    script: &str,
) -> (String, Arc<SubmissionCoordinator>) {
    let coordinator = SubmissionCoordinator::new(service);
    let mut session = Session::new(FormController::new(), coordinator.clone(), Vec::new());
    session.run(script.as_bytes()).await.expect("session");
    let output = String::from_utf8(session.into_output()).expect("utf8 output");
    (output, coordinator)
}

#[test]
fn parses_set_with_wire_key_containing_spaces() {
    assert_eq!(
        parse_command("set Marker_A (T/C) C"),
        Ok(SessionCommand::Set {
            field: "Marker_A (T/C)".to_string(),
            value: "C".to_string(),
        })
    );
    assert_eq!(
        parse_command("  set   location   Nagpur "),
        Ok(SessionCommand::Set {
            field: "location".to_string(),
            value: "Nagpur".to_string(),
        })
    );
}

#[test]
fn parses_remaining_commands() {
    assert_eq!(parse_command("show"), Ok(SessionCommand::Show));
    assert_eq!(parse_command("SUBMIT"), Ok(SessionCommand::Submit));
    assert_eq!(parse_command("new"), Ok(SessionCommand::Reset));
    assert_eq!(parse_command("options"), Ok(SessionCommand::Options(None)));
    assert_eq!(
        parse_command("options location"),
        Ok(SessionCommand::Options(Some("location".to_string())))
    );
    assert_eq!(parse_command("exit"), Ok(SessionCommand::Quit));
    assert!(parse_command("set location").is_err());
    assert!(parse_command("plant tomatoes").is_err());
}

#[tokio::test]
async fn submit_sends_edited_selection_and_renders_result() {
    let service = ScriptedService::new(vec![Ok(scenario_result())]);
    let (output, coordinator) = run_session(
        service.clone(),
        "set location Nagpur\nset irrigationLevel Stressed\nsubmit\nquit\n",
    )
    .await;

    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].location, Location::Nagpur);
    assert_eq!(requests[0].irrigation_level, IrrigationLevel::Stressed);

    assert!(output.contains("Predicting..."));
    assert!(output.contains("123.46 g"));
    assert!(output.contains("8.20 Brix"));
    assert!(output.contains("0.31 (lower is better)"));
    assert!(output.contains("65.00 days"));

    // Quitting tears the view down.
    assert_eq!(coordinator.state().await, SubmissionState::Idle);
}

#[tokio::test]
async fn invalid_selection_is_reported_and_not_applied() {
    let service = ScriptedService::new(vec![Ok(scenario_result())]);
    let (output, _coordinator) =
        run_session(service.clone(), "set location Mumbai\nsubmit\n").await;

    assert!(output.contains("'Mumbai' is not a valid location option"));
    assert_eq!(service.requests(), vec![FieldSet::default()]);
}

#[tokio::test]
async fn failure_is_shown_and_reset_returns_to_form() {
    let service = ScriptedService::new(vec![
        Err(SubmitError::Protocol { status: 500 }),
        Ok(scenario_result()),
    ]);
    let (output, _coordinator) = run_session(
        service.clone(),
        "submit\nshow\nreset\nreset\nsubmit\n",
    )
    .await;

    assert!(output.contains("Error: Prediction service did not respond as expected (HTTP 500)"));
    assert!(output.contains("Nothing to reset."));
    assert!(output.contains("123.46 g"));
    assert_eq!(service.requests().len(), 2);
}

#[tokio::test]
async fn options_command_lists_values() {
    let service = ScriptedService::new(Vec::new());
    let (output, _coordinator) =
        run_session(service, "options qtlFruitSize\noptions soil\n").await;

    assert!(output.contains("QTL Fruit Size [qtlFruitSize]: A1, A2"));
    assert!(output.contains("unknown field 'soil'"));
}
