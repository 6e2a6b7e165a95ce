use std::{io, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    FormController, HttpPredictionService, SubmissionCoordinator, SubmissionState, SubmitOutcome,
};
use shared::domain::Field;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod session;

use config::{load_settings, Overrides};
use render::{render_options, render_state};
use session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "plant-predictor",
    about = "Predict plant performance traits from genotype and growing conditions"
)]
struct Args {
    /// Path to a TOML config file (defaults to ./predictor.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Prediction service endpoint, e.g. http://127.0.0.1:5000/predict.
    #[arg(long, global = true)]
    service_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one prediction request and print the result.
    Predict(PredictArgs),
    /// List the allowed values for one field or for all of them.
    Options { field: Option<String> },
    /// Edit the selection and submit interactively (the default).
    Session,
}

#[derive(clap::Args, Debug)]
struct PredictArgs {
    #[arg(long, default_value = "G0001")]
    genotype: String,
    #[arg(long, default_value = "T")]
    marker_a: String,
    #[arg(long, default_value = "P")]
    gene_r1: String,
    #[arg(long, default_value = "A1")]
    qtl_fruit_size: String,
    #[arg(long, default_value = "Badlapur")]
    location: String,
    #[arg(long, default_value = "Optimal")]
    irrigation_level: String,
}

impl PredictArgs {
    fn into_form(self) -> Result<FormController> {
        let mut form = FormController::new();
        for (field, value) in [
            (Field::GenotypeId, self.genotype),
            (Field::MarkerA, self.marker_a),
            (Field::GeneR1, self.gene_r1),
            (Field::QtlFruitSize, self.qtl_fruit_size),
            (Field::Location, self.location),
            (Field::IrrigationLevel, self.irrigation_level),
        ] {
            form.update(field, &value)?;
        }
        Ok(form)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Session);

    if let Command::Options { field } = &command {
        match field {
            Some(name) => print!("{}", render_options(name.parse::<Field>()?)),
            None => Field::ALL
                .into_iter()
                .for_each(|field| print!("{}", render_options(field))),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let settings = load_settings(&Overrides {
        config_path: args.config,
        service_url: args.service_url,
        timeout_secs: args.timeout_secs,
    })?;
    let endpoint = settings.service_endpoint()?;
    let service = HttpPredictionService::new(endpoint, settings.request_timeout())
        .context("failed to build HTTP client")?;
    info!(
        url = %service.endpoint(),
        timeout_secs = settings.request_timeout_secs,
        "using prediction service"
    );
    let coordinator = SubmissionCoordinator::new(Arc::new(service));

    match command {
        Command::Predict(predict) => {
            let form = predict.into_form()?;
            let fields = form.snapshot();
            let state = match coordinator.submit(fields).await {
                SubmitOutcome::Completed(state) => state,
                SubmitOutcome::Ignored | SubmitOutcome::Discarded => coordinator.state().await,
            };
            print!("{}", render_state(&state, &fields));
            coordinator.dispose().await;
            Ok(match state {
                SubmissionState::Succeeded(_) => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Command::Session => {
            let mut session = Session::new(FormController::new(), coordinator, io::stdout());
            session.run(BufReader::new(tokio::io::stdin())).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Options { .. } => Ok(ExitCode::SUCCESS),
    }
}
