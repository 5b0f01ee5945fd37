use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "agent-cost",
    version,
    about = "Cost and ROI calculator for AI agent frameworks"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Print the JSON payload instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP API server (default)
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Monthly cost of one framework/model combination
    Calculate {
        /// Framework id (autogen, crewai, langchain, langgraph, semantic_kernel)
        #[arg(short, long)]
        framework: String,

        /// Model id (openai_gpt4o, openai_gpt4o_mini, claude_35_sonnet, local_llm)
        #[arg(short, long, default_value = "openai_gpt4o")]
        model: String,

        /// Requests per month
        #[arg(short, long, allow_negative_numbers = true)]
        requests: i64,

        /// Custom tokens per request
        #[arg(short, long)]
        tokens: Option<i64>,
    },

    /// Compare every framework for a model and volume, cheapest first
    Compare {
        #[arg(short, long, default_value = "openai_gpt4o")]
        model: String,

        #[arg(short, long, allow_negative_numbers = true)]
        requests: i64,

        #[arg(short, long)]
        tokens: Option<i64>,
    },

    /// NPV, payback and cash flow of migrating between frameworks
    Migrate(MigrateArgs),

    /// Migration ROI across volume and complexity shifts
    Sensitivity(MigrateArgs),

    /// Analyze the predefined business scenarios
    Scenarios {
        /// Analyze a single scenario by key
        key: Option<String>,

        /// Also write the full JSON analysis to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List models and their token pricing
    Models,

    /// List frameworks and their token profiles
    Frameworks,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Current framework id
    #[arg(long)]
    pub from: String,

    /// Target framework id
    #[arg(long)]
    pub to: String,

    #[arg(short, long, default_value = "openai_gpt4o")]
    pub model: String,

    #[arg(short, long, allow_negative_numbers = true)]
    pub requests: i64,

    /// Developers on the migration (default from config)
    #[arg(long)]
    pub team_size: Option<u32>,

    /// Migration timeline in months (default from config)
    #[arg(long)]
    pub timeline: Option<u32>,

    /// Analysis horizon in months (default from config)
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Project complexity factor (default from config)
    #[arg(long)]
    pub complexity: Option<f64>,

    /// Risk scenario (startup, growth, enterprise, research)
    #[arg(long)]
    pub risk: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration, defaults included
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
        })
    }
}
