use serde::{
    Deserialize,
    Serialize,
};
use simsef::SchedulerConfig;
use std::path::{
    Path,
    PathBuf,
};

use crate::cli::ScheduleArgs;
use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// Configuration with every required location known.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub scheduler: SchedulerConfig,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Command line arguments take precedence over the config file.
    pub fn with_cli_args(mut self, args: &ScheduleArgs) -> Result<ResolvedConfig, CliError> {
        if let Some(input) = &args.input {
            self.input = Some(InputConfig {
                path: input.clone(),
            });
        }
        if let Some(output_dir) = &args.output_dir {
            self.output = Some(OutputConfig {
                directory: output_dir.clone(),
            });
        }
        if args.schedule_only {
            self.scheduler.schedule_only = true;
        }

        let input = self.input.ok_or_else(|| {
            CliError::Config(
                "No input provided, please provide one in either the config file or with the --input flag"
                    .to_string(),
            )
        })?;
        let output = self.output.ok_or_else(|| {
            CliError::Config(
                "No output directory provided, please provide one in either the config file or with the --output-dir flag"
                    .to_string(),
            )
        })?;

        Ok(ResolvedConfig {
            input: input.path,
            output: output.directory,
            scheduler: self.scheduler,
        })
    }
}
