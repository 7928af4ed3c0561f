use anyhow::Result;
use clap::{Parser, Subcommand};
use sojourn_backend::api;
use sojourn_backend::cli;
use sojourn_backend::community::CommunityService;
use sojourn_backend::config::SojournConfig;
use sojourn_backend::telemetry;

#[derive(Parser)]
#[command(author, version, about = "Sojourn community backend daemon and CLI")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for the community API
    Serve,
    /// Start the interactive CLI for browsing and posting
    Cli,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();
    let config = SojournConfig::from_env();
    let community = CommunityService::with_fixtures();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => api::serve_http(config, community).await,
        Command::Cli => cli::run_cli(community).await,
    }
}
