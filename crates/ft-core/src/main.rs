//! ft-core: compute cost-aware decision thresholds from precomputed scores.

use clap::{Parser, Subcommand, ValueEnum};
use ft_config::{resolve_config, ConfigError, ConfigPaths, ConfigSource, ThresholderConfig};
use ft_core::exit_codes::ExitCode;
use ft_core::logging::init_logging;
use ft_core::{RunBundle, ThresholdReport, Thresholder};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ft-core", version, about = "Cost-aware decision thresholds per facet")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute thresholds for a bundle of examples and model outputs
    Run {
        /// JSON bundle with examples, dataset_spec, output_spec, model_outputs
        #[arg(long)]
        input: PathBuf,
        /// Config file (.toml or .json); falls back to FT_CONFIG, then XDG
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the configured cost ratio
        #[arg(long)]
        cost_ratio: Option<f64>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Resolve and validate a config without running
    ValidateConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a JSON schema
    Schema {
        #[arg(value_enum)]
        target: SchemaTarget,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Summary,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaTarget {
    Config,
    Report,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let code = match cli.command {
        Commands::Run {
            input,
            config,
            cost_ratio,
            format,
        } => cmd_run(input, config, cost_ratio, format),
        Commands::ValidateConfig { config } => cmd_validate_config(config),
        Commands::Schema { target } => cmd_schema(target),
    };
    std::process::exit(code.as_i32());
}

fn load_config(path: Option<PathBuf>) -> Result<(ThresholderConfig, ConfigSource), ExitCode> {
    resolve_config(&ConfigPaths::discover(path)).map_err(|err| {
        eprintln!("ft-core: {err}");
        match err {
            ConfigError::Io { .. } => ExitCode::IoError,
            _ => ExitCode::ConfigError,
        }
    })
}

fn cmd_run(
    input: PathBuf,
    config: Option<PathBuf>,
    cost_ratio: Option<f64>,
    format: Format,
) -> ExitCode {
    let mut config = match load_config(config) {
        Ok((config, _)) => config,
        Err(code) => return code,
    };
    if let Some(ratio) = cost_ratio {
        config.cost_ratio = ratio;
    }

    let raw = match std::fs::read_to_string(&input) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("ft-core: failed to read {}: {err}", input.display());
            return ExitCode::IoError;
        }
    };
    let bundle = match RunBundle::from_json(&raw) {
        Ok(bundle) => bundle,
        Err(err) => {
            eprintln!("ft-core: invalid input bundle {}: {err}", input.display());
            return ExitCode::from(&err);
        }
    };

    let results = bundle.into_parts().and_then(|(examples, model, dataset, outputs)| {
        Thresholder::new().run_with_metadata(
            &examples,
            &model,
            &dataset,
            Some(outputs.as_slice()),
            Some(&config),
        )
    });
    let results = match results {
        Ok(results) => results,
        Err(err) => {
            tracing::error!(target: "thresholder.run", code = err.code(), error = %err, "Run failed");
            eprintln!("ft-core: {err}");
            return ExitCode::from(&err);
        }
    };

    let report = ThresholdReport::new(config.cost_ratio, results);
    match format {
        Format::Json => match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("ft-core: failed to serialize report: {err}");
                return ExitCode::InternalError;
            }
        },
        Format::Summary => print!("{}", report.summary()),
    }
    ExitCode::Ok
}

fn cmd_validate_config(config: Option<PathBuf>) -> ExitCode {
    match load_config(config) {
        Ok((config, source)) => {
            println!(
                "ok: cost_ratio={} facets={} source={source:?}",
                config.cost_ratio,
                config.facets.len()
            );
            ExitCode::Ok
        }
        Err(code) => code,
    }
}

fn cmd_schema(target: SchemaTarget) -> ExitCode {
    let schema = match target {
        SchemaTarget::Config => schemars::schema_for!(ThresholderConfig),
        SchemaTarget::Report => schemars::schema_for!(ThresholdReport),
    };
    match serde_json::to_string_pretty(&schema) {
        Ok(out) => {
            println!("{out}");
            ExitCode::Ok
        }
        Err(err) => {
            eprintln!("ft-core: {err}");
            ExitCode::InternalError
        }
    }
}
