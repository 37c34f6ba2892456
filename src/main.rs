use anyhow::Result;
use clap::Parser;
use news_sentiment::cli::{self, Cli};
use news_sentiment::{analyze, chart, logging, lookup};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::set_level(cli.log_level);

    match cli.command() {
        cli::Command::Analyze(args) => analyze::run(args).await,
        cli::Command::Resolve(args) => lookup::run(args).await,
        cli::Command::Render(args) => chart::run(args),
    }
}
