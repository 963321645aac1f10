//! Command implementations.

pub mod ask;
pub mod config;
pub mod export;
pub mod run;
pub mod show;

pub use self::ask::execute_ask;
pub use self::config::execute_config;
pub use self::export::execute_export;
pub use self::run::{execute_run, validate_request};
pub use self::show::execute_show;
