//! Interactive prediction session: edit the form, submit, inspect, start over.

use std::{io::Write, sync::Arc};

use client_core::{FormController, SubmissionCoordinator, SubmitOutcome};
use shared::domain::Field;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::render::{render_form, render_options, render_state, BUSY_INDICATOR};

const HELP: &str = "\
Commands:
  show                    show the current selection
  set <field> <value>     change one field (e.g. `set location Nagpur`)
  options [field]         list allowed values
  submit                  request a prediction for the current selection
  reset                   clear the last result and start a new prediction
  help                    show this message
  quit                    leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Show,
    Set { field: String, value: String },
    Options(Option<String>),
    Submit,
    Reset,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    match verb.to_ascii_lowercase().as_str() {
        "show" => Ok(SessionCommand::Show),
        "set" => {
            // Wire keys contain spaces, so the value is the last token.
            let (field, value) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| "usage: set <field> <value>".to_string())?;
            Ok(SessionCommand::Set {
                field: field.trim().to_string(),
                value: value.to_string(),
            })
        }
        "options" => Ok(SessionCommand::Options(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "submit" | "predict" => Ok(SessionCommand::Submit),
        "reset" | "new" => Ok(SessionCommand::Reset),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        other => Err(format!("unknown command '{other}'; type `help`")),
    }
}

pub struct Session<W> {
    form: FormController,
    coordinator: Arc<SubmissionCoordinator>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(form: FormController, coordinator: Arc<SubmissionCoordinator>, out: W) -> Self {
        Self {
            form,
            coordinator,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until `quit` or end of input, then disposes the coordinator.
    pub async fn run<R>(&mut self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        write!(self.out, "{}", render_form(&self.form.snapshot()))?;
        writeln!(self.out, "Type `help` for commands.")?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(message) => writeln!(self.out, "{message}")?,
            }
            self.out.flush()?;
        }

        self.coordinator.dispose().await;
        Ok(())
    }

    async fn execute(&mut self, command: SessionCommand) -> anyhow::Result<()> {
        match command {
            SessionCommand::Show => {
                let state = self.coordinator.state().await;
                write!(self.out, "{}", render_state(&state, &self.form.snapshot()))?;
            }
            SessionCommand::Set { field, value } => match self.form.update_named(&field, &value) {
                Ok(fields) => write!(self.out, "{}", render_form(&fields))?,
                Err(err) => writeln!(self.out, "{err}")?,
            },
            SessionCommand::Options(None) => {
                for field in Field::ALL {
                    write!(self.out, "{}", render_options(field))?;
                }
            }
            SessionCommand::Options(Some(name)) => match name.parse::<Field>() {
                Ok(field) => write!(self.out, "{}", render_options(field))?,
                Err(err) => writeln!(self.out, "{err}")?,
            },
            SessionCommand::Submit => {
                writeln!(self.out, "{BUSY_INDICATOR}")?;
                self.out.flush()?;
                let fields = self.form.snapshot();
                match self.coordinator.submit(fields).await {
                    SubmitOutcome::Completed(state) => {
                        write!(self.out, "{}", render_state(&state, &fields))?
                    }
                    SubmitOutcome::Ignored => {
                        writeln!(self.out, "A prediction is already in progress.")?
                    }
                    SubmitOutcome::Discarded => {}
                }
            }
            SessionCommand::Reset => {
                if self.coordinator.reset().await {
                    write!(self.out, "{}", render_form(&self.form.snapshot()))?;
                } else {
                    writeln!(self.out, "Nothing to reset.")?;
                }
            }
            SessionCommand::Help => write!(self.out, "{HELP}")?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
