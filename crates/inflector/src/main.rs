//! Inflector - entry point
//!
//! Serves a Swagger 2.0 contract with mock responses for every operation.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use inflector::{build_server, ConfigLoader, HandlerRegistry, InflectorConfig, VERSION};
use inflector_config::ENV_PREFIX;
use inflector_telemetry::init_logging;

/// Config file used when neither `--config` nor `INFLECTOR_CONFIG` is given.
const DEFAULT_CONFIG_FILE: &str = "inflector.yaml";

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "INFLECTOR_CONFIG";

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = Some(
                        args.next()
                            .map(PathBuf::from)
                            .ok_or("--config requires a path")?,
                    );
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("inflector {VERSION}");
                    std::process::exit(0);
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        Ok(Self { config })
    }
}

fn print_help() {
    println!(
        r"Inflector - serve a Swagger 2.0 contract

USAGE:
    inflector [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Configuration file (TOML, JSON or YAML)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    INFLECTOR_CONFIG                      Configuration file when --config is absent
    INFLECTOR__SERVER__HTTP_ADDR          Bind address (default: 0.0.0.0:8080)
    INFLECTOR__DISPATCH__SWAGGER_URL      Contract location (default: swagger.yaml)
    INFLECTOR__LOGGING__LEVEL             Log level (default: info)
    RUST_LOG                              Log filter, overrides the configured level

EXAMPLES:
    inflector --config /etc/inflector/inflector.yaml
    INFLECTOR__DISPATCH__SWAGGER_URL=petstore.json inflector
"
    );
}

/// Where the configuration file comes from, if anywhere.
fn config_path(args: &Args) -> Option<PathBuf> {
    args.config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        })
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<InflectorConfig> {
    let mut loader = ConfigLoader::new().with_dotenv()?;
    if let Some(path) = path {
        loader = loader
            .with_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?;
    }
    Ok(loader.with_env_prefix(ENV_PREFIX).load()?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Use --help for usage information");
            return ExitCode::FAILURE;
        }
    };

    let path = config_path(&args);
    let config = match load_config(path.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.log_config()) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match &path {
        Some(path) => tracing::info!(path = %path.display(), "Loaded configuration"),
        None => tracing::warn!("No configuration file found, using defaults"),
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Inflector stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &InflectorConfig) -> anyhow::Result<()> {
    tracing::info!(
        version = VERSION,
        contract = %config.dispatch.swagger_url,
        addr = %config.server.http_addr,
        "Starting Inflector"
    );

    let server = build_server(config, &HandlerRegistry::new())?;
    server.run().await.context("server failed")?;
    Ok(())
}
