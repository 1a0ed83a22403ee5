//! CLI for piworld — simulated device telemetry and LED control dashboard.

mod commands;
mod tui;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "piworld")]
#[command(about = "piworld — simulated device telemetry and LED control dashboard")]
#[command(version = piworld_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Refresh and telemetry options shared by every subcommand.
#[derive(Args, Clone, Copy)]
struct DashboardArgs {
    /// Sensor refresh period in milliseconds
    #[arg(long, default_value = "2000")]
    sensor_interval_ms: u64,

    /// System-info refresh period in milliseconds
    #[arg(long, default_value = "5000")]
    system_interval_ms: u64,

    /// Seed the simulated telemetry for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

impl From<DashboardArgs> for commands::DashboardOptions {
    fn from(args: DashboardArgs) -> Self {
        Self {
            sensor_interval_ms: args.sensor_interval_ms,
            system_interval_ms: args.system_interval_ms,
            seed: args.seed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive dashboard in the terminal (TUI)
    Monitor {
        #[command(flatten)]
        dashboard: DashboardArgs,
    },

    /// Serve the dashboard page and JSON control API over HTTP
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[command(flatten)]
        dashboard: DashboardArgs,
    },

    /// Initialize once and print the dashboard snapshot as JSON
    Snapshot {
        #[command(flatten)]
        dashboard: DashboardArgs,
    },

    /// Print one line per refresh until Ctrl+C
    Watch {
        /// Stop after this many refreshes (default: run until Ctrl+C)
        #[arg(long)]
        ticks: Option<u64>,

        #[command(flatten)]
        dashboard: DashboardArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal; keep log output to warnings unless asked.
    let default_filter = match cli.command {
        Commands::Monitor { .. } => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Monitor { dashboard } => commands::monitor::run(dashboard.into()),
        Commands::Server {
            port,
            host,
            dashboard,
        } => commands::server::run(&host, port, dashboard.into()),
        Commands::Snapshot { dashboard } => commands::snapshot::run(dashboard.into()),
        Commands::Watch { ticks, dashboard } => commands::watch::run(ticks, dashboard.into()),
    }
}
