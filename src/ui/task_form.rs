use tracing::debug;
use validator::Validate;

use crate::error::{AppError, RequestError};
use crate::task::task_dto::CreateTaskDto;
use crate::task::{TaskApi, TaskController};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    /// Blocked client-side; nothing was sent.
    Invalid,
    /// A create or refresh is already running.
    Busy,
    Failed(RequestError),
}

/// Task creation form. Fields are cleared only after a successful submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    title: String,
    description: String,
    validation_error: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// Editing the title dismisses a pending validation message.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.validation_error = None;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Checks the form and builds the request body. Refuses with `Busy`
    /// while a create or refresh is running and with `Invalid` (setting the
    /// inline message) for a blank title; nothing is sent in either case.
    pub fn prepare(&mut self, loading: bool) -> Result<CreateTaskDto, SubmitOutcome> {
        if loading {
            return Err(SubmitOutcome::Busy);
        }
        match self.validated() {
            Ok(dto) => {
                self.validation_error = None;
                Ok(dto)
            }
            Err(AppError::Validation(msg)) => {
                self.validation_error = Some(msg);
                Err(SubmitOutcome::Invalid)
            }
            Err(other) => {
                self.validation_error = Some(other.to_string());
                Err(SubmitOutcome::Invalid)
            }
        }
    }

    fn validated(&self) -> crate::error::Result<CreateTaskDto> {
        let dto = CreateTaskDto::new(self.title.as_str(), self.description.as_str()).trimmed();
        dto.validate()?;
        Ok(dto)
    }

    /// Applies the result of the create call started from [`prepare`].
    ///
    /// [`prepare`]: TaskForm::prepare
    pub fn finish(&mut self, result: Result<(), RequestError>) -> SubmitOutcome {
        match result {
            Ok(()) => {
                self.title.clear();
                self.description.clear();
                SubmitOutcome::Created
            }
            Err(e) => {
                // the banner already shows it
                debug!("Form submission error: {}", e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub async fn submit<A: TaskApi>(&mut self, controller: &TaskController<A>) -> SubmitOutcome {
        let dto = match self.prepare(controller.snapshot().loading) {
            Ok(dto) => dto,
            Err(refused) => return refused,
        };
        let result = controller.add_task(dto).await;
        self.finish(result)
    }

    pub fn render(&self, loading: bool) -> Vec<String> {
        let mut lines = vec![
            "Add a Task".to_string(),
            format!("  Title:       {}", placeholder(&self.title, "Enter task title")),
            format!(
                "  Description: {}",
                placeholder(&self.description, "Enter task description (optional)")
            ),
        ];
        if let Some(msg) = &self.validation_error {
            lines.push(format!("  ! {}", msg));
        }
        lines.push(if loading {
            "  [Adding...]".to_string()
        } else {
            "  [Add Task]".to_string()
        });
        lines
    }
}

fn placeholder<'a>(value: &'a str, hint: &'a str) -> String {
    if value.is_empty() {
        format!("<{}>", hint)
    } else {
        value.to_string()
    }
}
