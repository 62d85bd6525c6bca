use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use indexmap::IndexMap;
use label_state_core::{Operation, Outcome};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

pub fn output_outcome(outcome: &Outcome, operation: Operation, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(outcome) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", display_outcome(outcome, operation));
        }
    }
}

fn display_outcome(outcome: &Outcome, operation: Operation) -> String {
    if !outcome.success {
        return outcome.message.yellow().to_string();
    }

    let mut output = outcome.message.green().to_string();
    match operation {
        Operation::Get => {
            if let Some(value) = &outcome.value {
                output.push_str(&format!("\n  {}: {}", "Value".dimmed(), value.cyan()));
            }
        }
        Operation::GetAll => {
            if let Some(state) = &outcome.state {
                let entries: IndexMap<String, String> =
                    serde_json::from_str(state).unwrap_or_default();
                for (key, value) in entries {
                    output.push_str(&format!("\n  {}: {}", key.cyan().bold(), value));
                }
            }
        }
        Operation::Set | Operation::Remove => {}
    }
    output
}

/// Print a fatal error; `message` is also the failure signal for workflow runners
pub fn output_error(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", error_json(message)),
        OutputFormat::Text => eprintln!("{}: {}", "Error".red().bold(), message),
    }

    if running_in_actions() {
        println!("::error::{}", escape_workflow_data(message));
    }
}

fn error_json(message: &str) -> String {
    let record = serde_json::json!({"success": false, "message": message});
    serde_json::to_string_pretty(&record).unwrap_or_else(|_| record.to_string())
}

fn running_in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Workflow command data escaping for `%`, CR and LF
fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Step outputs written to the file named by `GITHUB_OUTPUT`
pub struct StepOutputs {
    path: Option<PathBuf>,
}

impl StepOutputs {
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("GITHUB_OUTPUT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Record an operation's outputs; `value` and `state` only when the operation has them
    pub fn write_outcome(&self, outcome: &Outcome, operation: Operation) -> Result<()> {
        let mut outputs = vec![
            ("success", outcome.success.to_string()),
            ("message", outcome.message.clone()),
        ];
        match operation {
            Operation::Get => outputs.push(("value", outcome.value.clone().unwrap_or_default())),
            Operation::GetAll => outputs.push(("state", outcome.state.clone().unwrap_or_default())),
            Operation::Set | Operation::Remove => {}
        }
        self.write(&outputs)
    }

    pub fn write_failure(&self, message: &str) -> Result<()> {
        self.write(&[
            ("success", "false".to_string()),
            ("message", message.to_string()),
        ])
    }

    fn write(&self, outputs: &[(&str, String)]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open step output file: {}", path.display()))?;

        for (name, value) in outputs {
            file.write_all(format_output(name, value).as_bytes())
                .with_context(|| format!("Failed to write step output: {}", name))?;
        }
        Ok(())
    }
}

/// Multiline-safe `name<<DELIMITER` block
fn format_output(name: &str, value: &str) -> String {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}
