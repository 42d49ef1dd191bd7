//! A single-window task list: add, search, filter and tick off tasks kept in
//! a local JSON file, with a reminder for anything due today.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod task;
pub mod ui;
pub mod view;

pub use app::App;
pub use config::Config;
pub use error::{StoreError, ValidationError};
pub use store::TaskStore;
pub use task::{Priority, Task, TaskId};
pub use view::StatusFilter;
