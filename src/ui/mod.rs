pub mod app;
pub mod task_form;
pub mod task_list;

pub use app::{render_app, Command};
pub use task_form::{SubmitOutcome, TaskForm};
pub use task_list::ListView;
