pub mod error;
pub mod state;
pub mod task;
pub mod ui;

pub use error::{AppError, RequestError, Result};
pub use state::Config;
