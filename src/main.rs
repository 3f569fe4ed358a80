use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use customer_reference_extract::LogLevel;
use customer_reference_extract::auth::token::AuthMethod;
use customer_reference_extract::config::{self, ConfigSource, DEFAULT_CONFIG_FILE};
use customer_reference_extract::extract::{Source, extract};
use customer_reference_extract::output::{OutputTarget, write_references};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Run the analytics report.
    Report,
    /// Query the reference object directly.
    Query,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AuthArg {
    /// OAuth username/password grant.
    Password,
    /// Signed JWT assertion (RS256).
    Jwt,
}

/// Export approved customer references from Salesforce to JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file with credentials; environment variables are used if it is missing.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Report to run (overrides config and SF_REPORT_ID).
    #[arg(long, value_name = "ID")]
    report_id: Option<String>,

    #[arg(long, value_enum, default_value_t = SourceArg::Report)]
    source: SourceArg,

    #[arg(long, value_enum, default_value_t = AuthArg::Password)]
    auth: AuthArg,

    /// Write to exactly this file.
    #[arg(long, value_name = "PATH", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory for the timestamped output file.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Authenticate against the sandbox login host.
    #[arg(long)]
    sandbox: bool,

    /// REST API version, e.g. v63.0.
    #[arg(long, value_name = "VERSION")]
    api_version: Option<String>,

    /// Extract and print without writing a file.
    #[arg(long)]
    no_save: bool,

    /// Log request URLs and query text.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Information
        }
    }

    fn output_target(&self) -> OutputTarget {
        match &self.output {
            Some(path) => OutputTarget::File(path.clone()),
            None => OutputTarget::Timestamped {
                dir: self.output_dir.clone(),
            },
        }
    }
}

fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.into())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = config::resolve(cli.config.as_deref()).context("resolving credentials")?;

    match &config.source {
        ConfigSource::File(path) => log::info!("Using config file {}", path.display()),
        ConfigSource::Environment => log::info!(
            "No config file found ({}); using SF_* environment variables",
            cli.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
        ),
    }

    if cli.sandbox {
        config.use_sandbox();
    }
    if let Some(version) = &cli.api_version {
        config.api_version = version.clone();
    }

    let method = match cli.auth {
        AuthArg::Password => AuthMethod::Password,
        AuthArg::Jwt => AuthMethod::JwtBearer,
    };
    let source = match cli.source {
        SourceArg::Report => Source::Report {
            report_id: cli.report_id.clone().unwrap_or_else(|| config.report_id.clone()),
        },
        SourceArg::Query => Source::Query,
    };

    let references = extract(&config, method, &source)
        .await
        .context("extraction failed")?;

    if !cli.no_save {
        write_references(&references, &cli.output_target(), chrono::Local::now())
            .context("writing output")?;
    }

    if let Some(first) = references.first() {
        println!("\nSample of first entry:");
        println!("{}", serde_json::to_string_pretty(first)?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("An error occurred: {err:?}");
            ExitCode::FAILURE
        }
    }
}
