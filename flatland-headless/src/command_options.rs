//! Command line option parsing.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use flatland::math::Positive;
use flatland::physics::{ConfigurationError, PhysicsConfig};

use crate::logging::LoggingArgs;

#[derive(Clone, Debug, Parser)]
#[command(author, about, version)]
pub(crate) struct HeadlessArgs {
    /// JSON file of physics settings; any setting it omits keeps its default value.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub(crate) config_file: Option<PathBuf>,

    /// Physics steps per second, overriding the configuration file.
    #[arg(long = "hz", value_name = "RATE")]
    pub(crate) hz: Option<f64>,

    /// Number of steps to run.
    #[arg(long = "ticks", short = 't', default_value_t = 600)]
    pub(crate) ticks: u32,

    /// Log a summary after every this many steps. 0 means only at the end.
    #[arg(long = "report-every", value_name = "TICKS", default_value_t = 60)]
    pub(crate) report_every: u32,

    /// Downward acceleration of the balls in the demo scene.
    #[arg(long = "gravity", default_value_t = 10.0, allow_negative_numbers = true)]
    pub(crate) gravity: f64,

    /// Print the physics settings in effect, as JSON, and exit.
    #[arg(long = "print-config")]
    pub(crate) print_config: bool,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}

impl HeadlessArgs {
    /// Reads the configuration file, if any, and applies command-line overrides.
    pub(crate) fn physics_config(&self) -> Result<PhysicsConfig, anyhow::Error> {
        let mut config = match &self.config_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => PhysicsConfig::default(),
        };
        if let Some(hz) = self.hz {
            config.fixed_step_hz = Positive::<f64>::try_new_finite(hz)
                .map_err(|_| ConfigurationError::StepRate(hz))?;
        }
        config.tick_schedule().context("invalid step rate")?;
        Ok(config)
    }
}
