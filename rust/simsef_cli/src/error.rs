use simsef::SchedulerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scheduling error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Error interpreting the config: {0}")]
    Config(String),

    #[error("Could not set up logging: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}
