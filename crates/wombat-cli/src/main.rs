mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wombat_model::RuntimeContext;

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "wombat",
    version,
    about = "Compile connector step specifications into stream runtime configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Log line encoding
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a steps file and print the runtime configuration
    Compile {
        /// Path to steps YAML file
        steps: PathBuf,
        #[command(flatten)]
        runtime: RuntimeArgs,
        /// Compiler configuration YAML file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the configuration here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write compile telemetry here in Prometheus text format
        #[arg(long)]
        metrics_out: Option<PathBuf>,
    },
    /// Validate a steps file without printing the result
    Check {
        /// Path to steps YAML file
        steps: PathBuf,
    },
}

/// Identity of the connector instance, used for the metrics block.
#[derive(Args, Debug, Default)]
struct RuntimeArgs {
    #[arg(long, default_value = "")]
    namespace: String,
    #[arg(long, default_value = "")]
    instance: String,
    #[arg(long, default_value = "")]
    connector: String,
    #[arg(long, default_value = "")]
    nats_url: String,
    #[arg(long)]
    nats_jwt: Option<String>,
    #[arg(long)]
    nats_seed: Option<String>,
}

impl From<RuntimeArgs> for RuntimeContext {
    fn from(args: RuntimeArgs) -> Self {
        Self {
            namespace: args.namespace,
            instance: args.instance,
            connector: args.connector,
            nats_url: args.nats_url,
            nats_jwt: args.nats_jwt,
            nats_seed: args.nats_seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Compile {
            steps,
            runtime,
            config,
            output,
            metrics_out,
        } => commands::compile::execute(
            &steps,
            &runtime.into(),
            config.as_deref(),
            output.as_deref(),
            metrics_out.as_deref(),
        ),
        Commands::Check { steps } => commands::check::execute(&steps),
    }
}
