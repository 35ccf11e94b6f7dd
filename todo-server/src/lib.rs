//! Todo server
//!
//! REST API over SQLite that persists todos, their labels, and the manual
//! order of each status partition.
//!
//! ```text
//! todo-server/src/
//! ├── core/    # config, state, server lifecycle
//! ├── api/     # routes and handlers
//! ├── db/      # pool, migrations, repositories
//! └── utils/   # error re-exports, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Load `.env`, read the configuration and start logging from it
///
/// The returned guard flushes file logs on drop; keep it alive in `main`.
pub fn setup_environment() -> (Config, Option<tracing_appender::non_blocking::WorkerGuard>) {
    if let Err(e) = dotenv::dotenv() {
        // a missing .env is normal
        eprintln!("No .env loaded: {e}");
    }

    let config = Config::from_env();
    let guard = init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    (config, guard)
}
