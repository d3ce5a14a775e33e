pub mod task_client;
pub mod task_controller;
pub mod task_dto;
pub mod task_models;

#[cfg(test)]
pub(crate) mod test_support;

pub use task_client::{HttpTaskClient, TaskApi};
pub use task_controller::{TaskController, TaskState};
pub use task_dto::{CreateTaskDto, TITLE_REQUIRED};
pub use task_models::{Task, TaskId};
