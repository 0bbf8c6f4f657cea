//! Task entities
//!
//! A `TaskList` is the ordered set of remote actions one command needs. It is
//! built fresh for every invocation and handed to an `ExecutionEngine`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Template / script variables
pub type TaskVars = BTreeMap<String, serde_json::Value>;

/// One remote action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Task {
    /// Run a local script on the host with variables substituted
    Script {
        title: String,
        path: PathBuf,
        vars: TaskVars,
    },
    /// Copy a local file to the host; with `vars` the file is a template
    Copy {
        title: String,
        src: PathBuf,
        dest: String,
        vars: Option<TaskVars>,
        progress_bar: bool,
    },
    /// Run a raw shell command; its output is captured in the run report
    Command { title: String, command: String },
}

impl Task {
    pub fn title(&self) -> &str {
        match self {
            Task::Script { title, .. } | Task::Copy { title, .. } | Task::Command { title, .. } => {
                title
            }
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, Task::Copy { .. })
    }
}

/// Ordered sequence of tasks for one logical step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskList {
    title: String,
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Titles in execution order
    pub fn titles(&self) -> Vec<&str> {
        self.tasks.iter().map(Task::title).collect()
    }

    pub fn execute_script(&mut self, title: &str, path: impl AsRef<Path>, vars: TaskVars) {
        self.tasks.push(Task::Script {
            title: title.to_string(),
            path: path.as_ref().to_path_buf(),
            vars,
        });
    }

    /// Plain file copy
    pub fn copy(&mut self, title: &str, src: impl AsRef<Path>, dest: impl Into<String>) {
        self.tasks.push(Task::Copy {
            title: title.to_string(),
            src: src.as_ref().to_path_buf(),
            dest: dest.into(),
            vars: None,
            progress_bar: false,
        });
    }

    /// File copy reporting upload progress
    pub fn copy_with_progress(
        &mut self,
        title: &str,
        src: impl AsRef<Path>,
        dest: impl Into<String>,
        progress_bar: bool,
    ) {
        self.tasks.push(Task::Copy {
            title: title.to_string(),
            src: src.as_ref().to_path_buf(),
            dest: dest.into(),
            vars: None,
            progress_bar,
        });
    }

    /// Render `src` as a template with `vars`, then copy the result
    pub fn copy_template(
        &mut self,
        title: &str,
        src: impl AsRef<Path>,
        dest: impl Into<String>,
        vars: TaskVars,
    ) {
        self.tasks.push(Task::Copy {
            title: title.to_string(),
            src: src.as_ref().to_path_buf(),
            dest: dest.into(),
            vars: Some(vars),
            progress_bar: false,
        });
    }

    pub fn execute(&mut self, title: &str, command: impl Into<String>) {
        self.tasks.push(Task::Command {
            title: title.to_string(),
            command: command.into(),
        });
    }
}
