use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gauntlet",
    version,
    about = "Measures how reliably a language model uses an external execution tool to solve short programming tasks"
)]
pub struct Cli {
    /// Independent repetitions per eval case
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub runs: u32,

    /// provider:model (e.g. "anthropic:claude-haiku-4-5")
    #[arg(long, default_value = "anthropic:claude-sonnet-4-6")]
    pub llm: String,

    /// Base URL for the LLM API (overrides the provider default)
    #[arg(long)]
    pub llm_url: Option<String>,

    /// Base URL of the tool server
    #[arg(long, default_value = "http://localhost:8731")]
    pub tool_url: String,

    /// Glob pattern to match case names (e.g. "*matrix*")
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Tier or range to run (e.g. "2" or "1-3")
    #[arg(long, default_value = "")]
    pub tier: String,

    /// Max tool-call attempts per eval case
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Max LLM round-trips per eval case (includes nudges)
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_iters: u32,

    /// How many trials may be in flight at once
    #[arg(long, default_value_t = 8, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: usize,
}
