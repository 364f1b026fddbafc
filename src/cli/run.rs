//! Command execution for the CLI.

use crate::cli::{Command, FieldArgs};
use crate::config::Config;
use crate::database::{Database, Properties, DESCRIPTION, NOTE};
use crate::error::Result;
use crate::record::{Value, TAGS};
use crate::task::Task;
use crate::taskwarrior::TaskTool;
use crate::traits::CommandRunner;
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

impl CliOutput {
    fn success(stdout: Vec<String>) -> Self {
        Self { exit_code: ExitCode::SUCCESS, stdout, stderr: vec![] }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { exit_code: ExitCode::FAILURE, stdout: vec![], stderr: vec![message.into()] }
    }
}

/// Run a CLI command against the task tool reached through `runner`.
pub fn run(command: Command, config: &Config, runner: &dyn CommandRunner) -> CliOutput {
    let tool = TaskTool::from_config(runner, config);
    let result = Database::open(tool, config).and_then(|mut db| execute(&mut db, command));
    match result {
        Ok(lines) => CliOutput::success(lines),
        Err(e) => CliOutput::error(format!("Error: {e}")),
    }
}

fn execute(db: &mut Database<'_>, command: Command) -> Result<Vec<String>> {
    match command {
        Command::List { active } => {
            let tasks = db.get_tasks()?;
            for warning in tasks.warnings() {
                tracing::debug!(%warning, "Skipped while loading");
            }
            Ok(tasks.iter().filter(|task| !active || task.is_active()).map(list_line).collect())
        }
        Command::Show { uuid } => match db.get_task_info(&uuid)? {
            Some(task) => show_task(db, &task),
            None => Ok(vec![format!("No task with uuid {uuid}")]),
        },
        Command::Projects => db.projects(),
        Command::Start { id } => db.start_task(&id).map(|()| vec![]),
        Command::Stop { id } => db.stop_task(&id).map(|()| vec![]),
        Command::Finish { id } => db.finish_task(&id).map(|()| vec![]),
        Command::Restart { id } => db.restart_task(&id).map(|()| vec![]),
        Command::Add { description, fields } => {
            let mut properties = field_properties(fields);
            properties.insert(DESCRIPTION, description);
            Ok(db.add_task(&properties)?.into_iter().collect())
        }
        Command::Modify { id, description, fields } => {
            let mut properties = field_properties(fields);
            if let Some(description) = description {
                properties.insert(DESCRIPTION, description);
            }
            db.update_task(&id, &properties).map(|()| vec![])
        }
        Command::Note { uuid, text } => {
            let task = Task::with_uuid(uuid);
            match text {
                Some(text) => task.set_note(db.notes(), &text).map(|()| vec![]),
                None => Ok(task.note(db.notes())?.into_iter().collect()),
            }
        }
    }
}

fn list_line(task: &Task) -> String {
    let urgency = task.urgency().map_or_else(String::new, |u| format!("{u:>6.2} "));
    let marker = if task.is_active() { "*" } else { " " };
    format!(
        "{marker} {urgency}{} {}",
        task.uuid().unwrap_or("-"),
        task.text(DESCRIPTION).unwrap_or_default()
    )
}

fn show_task(db: &Database<'_>, task: &Task) -> Result<Vec<String>> {
    let mut lines = vec![task.to_string()];
    lines.extend(task.iter().map(|(key, value)| format!("  {key}: {value}")));
    if task.is_active() {
        lines.push(format!("  running: {}", task.formatted_runtime()));
    }
    if let Some(note) = task.note(db.notes())?.filter(|n| !n.is_empty()) {
        lines.push(String::new());
        lines.push(note);
    }
    Ok(lines)
}

fn field_properties(fields: FieldArgs) -> Properties {
    let mut properties = Properties::new();
    for attribute in fields.attributes {
        match attribute.split_once(':') {
            Some((key, value)) => properties.insert(key, value),
            None => tracing::warn!(%attribute, "Ignoring attribute without ':'"),
        }
    }
    if let Some(project) = fields.project {
        properties.insert("project", project);
    }
    if let Some(priority) = fields.priority {
        properties.insert("priority", priority);
    }
    if !fields.tags.is_empty() {
        properties.insert(TAGS, Value::Tags(fields.tags));
    }
    if let Some(note) = fields.note {
        properties.insert(NOTE, note);
    }
    properties
}
