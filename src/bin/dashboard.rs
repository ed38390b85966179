//! Absenteeism risk dashboard - terminal client for the inference service

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use absentee_risk::dashboard::{self, client::DEFAULT_BACKEND_URL, ClientConfig, DashboardClient, EmployeeInput};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(version)]
#[command(about = "Absenteeism risk assessment dashboard", long_about = None)]
struct Cli {
    /// Inference service base URL
    #[arg(long, global = true, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Timeout for prediction requests, in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict absenteeism risk for one employee
    Predict(EmployeeInput),

    /// Show service health, model performance, details and fairness
    Overview,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = DashboardClient::new(ClientConfig {
        backend_url: cli.backend_url,
        predict_timeout: Duration::from_secs(cli.timeout),
        ..Default::default()
    });

    let view = match cli.command {
        Commands::Predict(input) => dashboard::prediction_view(&client, &input).await,
        Commands::Overview => dashboard::overview_view(&client).await,
    };

    print!("{}", view);
}
