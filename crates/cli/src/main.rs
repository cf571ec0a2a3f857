// linkdeck CLI entry point.

use clap::Parser;

mod client;
mod commands;
mod config;
mod output;
mod prompt;

#[derive(Parser)]
#[command(name = "linkdeck", about = "Bookmark links, grouped into collections")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(error) = commands::run(cli.command).await {
        output::print_anyhow_error(output::OutputFormat::detect(false), &error);
        std::process::exit(1);
    }
}
