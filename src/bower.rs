//! Bower process client
//!
//! Runs the `bower` executable with `--json` and turns its output into the
//! crate's types: stderr carries the log stream, stdout the terminal result.
//! Bower keeps its resolution cache in the user's home directory, shared by
//! every invocation, which is what makes the offline pass of
//! [`TwoPassResolver`](crate::TwoPassResolver) work.

use crate::config::Config;
use crate::installer::InstalledPackages;
use crate::registry::{LogEntry, PackageInfo, QueryMode, RegistryClient, RegistryEvent};
use crate::{Error, ResolutionRequest, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct BowerCli {
    command: String,
    extra_args: Vec<String>,
    working_dir: PathBuf,
}

impl BowerCli {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            extra_args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.bower.command_path(),
            config.install.working_dir_path(),
        )
        .with_extra_args(config.bower.extra_args.clone())
    }

    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(args)
            .arg("--json")
            .arg("--config.interactive=false")
            .args(&self.extra_args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Install `request` into the working area and report what got installed
    pub async fn install(&self, request: &ResolutionRequest) -> Result<InstalledPackages> {
        debug!(request = %request, command = %self.command, "running bower install");

        let output = self
            .command(&["install", request.as_str()])
            .output()
            .await
            .map_err(|e| Error::Install(format!("failed to run {}: {}", self.command, e)))?;

        let logs = parse_log_stream(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            return Err(Error::Install(failure_message(&output, &logs)));
        }

        parse_install_report(&String::from_utf8_lossy(&output.stdout)).inspect_err(|e| {
            warn!(request = %request, error = %e, "unreadable install report");
        })
    }
}

impl RegistryClient for BowerCli {
    fn query(
        &self,
        request: &ResolutionRequest,
        mode: QueryMode,
    ) -> mpsc::UnboundedReceiver<RegistryEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut cmd = self.command(&["info", request.as_str()]);
        if mode.is_offline() {
            cmd.arg("--offline");
        }
        let program = self.command.clone();
        let request = request.clone();

        tokio::spawn(async move {
            let output = match cmd.output().await {
                Ok(output) => output,
                Err(e) => {
                    let _ = tx.send(RegistryEvent::Error(format!(
                        "failed to run {}: {}",
                        program, e
                    )));
                    return;
                }
            };

            let logs = parse_log_stream(&String::from_utf8_lossy(&output.stderr));
            let failure = (!output.status.success()).then(|| failure_message(&output, &logs));

            for entry in logs {
                let _ = tx.send(RegistryEvent::Log(entry));
            }

            let terminal = match failure {
                Some(message) => RegistryEvent::Error(message),
                None => match serde_json::from_slice::<PackageInfo>(&output.stdout) {
                    Ok(info) => RegistryEvent::End(info),
                    Err(e) => {
                        RegistryEvent::Error(format!("unreadable info for {}: {}", request, e))
                    }
                },
            };
            let _ = tx.send(terminal);
        });

        rx
    }
}

/// Parse Bower's `--json` stderr into log entries
///
/// Bower writes a sequence of JSON values, either single entries or arrays of
/// entries. Parsing stops at the first malformed value. Entries whose `data`
/// doesn't match the expected shape keep their level, id and message.
pub fn parse_log_stream(text: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();

    for value in serde_json::Deserializer::from_str(text).into_iter::<Value>() {
        match value {
            Ok(Value::Array(items)) => entries.extend(items.into_iter().filter_map(log_entry)),
            Ok(value) => entries.extend(log_entry(value)),
            Err(e) => {
                debug!(error = %e, "stopped reading bower log stream");
                break;
            }
        }
    }

    entries
}

/// Parse Bower's `--json` install result; empty output means nothing was installed
pub fn parse_install_report(text: &str) -> Result<InstalledPackages> {
    if text.trim().is_empty() {
        return Ok(InstalledPackages::new());
    }

    Ok(serde_json::from_str(text)?)
}

fn log_entry(value: Value) -> Option<LogEntry> {
    if !value.is_object() {
        return None;
    }

    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let fallback = LogEntry {
        level: field("level"),
        id: field("id"),
        message: field("message"),
        data: None,
    };

    Some(serde_json::from_value(value).unwrap_or(fallback))
}

fn failure_message(output: &Output, logs: &[LogEntry]) -> String {
    logs.iter()
        .rev()
        .find(|entry| entry.is_error())
        .map(|entry| {
            if entry.id.is_empty() {
                entry.message.clone()
            } else {
                format!("{} ({})", entry.message, entry.id)
            }
        })
        .unwrap_or_else(|| {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                format!("bower exited with {}", output.status)
            } else {
                stderr.to_string()
            }
        })
}
