use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

/// Ask the research agents a question and follow their progress.
#[derive(Debug, Parser)]
#[command(name = "sanjaya", version, about)]
pub struct Cli {
    /// Research question, e.g. "repurposing options for drug metformin".
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Streaming chat endpoint of the backend.
    #[arg(long, env = "SANJAYA_ENDPOINT")]
    pub endpoint: Option<String>,

    /// RON configuration file. Defaults to ./sanjaya.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for archived results.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Do not archive results when the run completes.
    #[arg(long)]
    pub no_save: bool,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// More log detail: -v for debug, -vv for trace.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_joined_into_one_query() {
        let cli = Cli::parse_from(["sanjaya", "drug", "metformin", "--no-save"]);
        assert_eq!(cli.query_text(), "drug metformin");
        assert!(cli.no_save);
        assert_eq!(cli.log, LogTarget::File);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "sanjaya",
            "--endpoint",
            "http://backend:9000/api/chat",
            "--log",
            "both",
            "-vv",
            "aspirin",
        ]);
        assert_eq!(cli.endpoint.as_deref(), Some("http://backend:9000/api/chat"));
        assert_eq!(cli.log, LogTarget::Both);
        assert_eq!(cli.verbose, 2);
    }
}
