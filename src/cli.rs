use clap::{Parser, Subcommand};

use crate::analyze::AnalyzeArgs;
use crate::chart::RenderArgs;
use crate::logging::Level;
use crate::lookup::LookupArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Financial news sentiment analyzer")]
pub struct Cli {
    /// Minimum level for JSON log lines on stderr (info, warn, error, off)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: Level,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(self) -> Command {
        self.command.unwrap_or_default()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch news for a ticker or company, classify sentiment and chart it by date
    Analyze(AnalyzeArgs),
    /// Validate a ticker or resolve a company name without fetching news
    Resolve(LookupArgs),
    /// Chart a sentiment table saved by a previous analysis
    Render(RenderArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Analyze(AnalyzeArgs::default())
    }
}
