use simsef::CancellationToken;
use tracing::{
    info,
    instrument,
};

use crate::cli::{
    ScheduleArgs,
    WriteTemplateArgs,
};
use crate::config::Config;
use crate::error::CliError;
use crate::processing::run_schedule;

/// Main function for the 'schedule' subcommand.
#[instrument]
pub fn main_schedule(args: ScheduleArgs) -> Result<(), CliError> {
    let config = Config::from_path(&args.config)?.with_cli_args(&args)?;
    info!("Using configuration: {:#?}", config);
    run_schedule(&config, args.preview, &CancellationToken::new())
}

const CONFIG_TEMPLATE: &str = r#"{
  "input": { "path": "imaging_features.json" },
  "scheduler": {
    "spectra_per_feature": 3,
    "collision_energies": [20.0, 35.0],
    "min_spot_distance": 3.0,
    "min_purity": 0.5,
    "min_intensity": { "absolute": 1000.0, "relative": 0.01 },
    "acquisition_mode": "single",
    "min_mobility_width": 0.005,
    "max_mobility_width": 0.03,
    "isolation_width": 1.7,
    "quad_switch_time_ms": 1.65,
    "new_spot_ce_lookahead": 3,
    "schedule_only": false
  },
  "output": { "directory": "simsef_output" }
}"#;

/// Main function for the 'write-template' subcommand.
pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let target_dir = args.output_path;
    std::fs::create_dir_all(&target_dir)?;

    let config_path = target_dir.join("simsef_config_template.json");
    std::fs::write(&config_path, CONFIG_TEMPLATE)?;
    println!("Wrote config template to: {}", config_path.display());
    Ok(())
}
