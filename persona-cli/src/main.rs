mod activity;
mod agent;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use persona_common::ClientConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "persona-cli")]
#[command(about = "Manage agents on a persona agent service")]
struct Args {
    /// Base URL of the agent service (overrides the config file and PERSONA_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Path to a TOML client configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage agents
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Show the action logs of every agent
    Logs,
    /// Show dispatched tasks
    Tasks,
}

#[derive(clap::Args)]
struct AgentFields {
    /// Display name
    #[arg(long)]
    name: String,
    /// What the agent should try to achieve
    #[arg(long, default_value = "")]
    goal: String,
    #[arg(long)]
    gender: String,
    #[arg(long)]
    age_from: i32,
    #[arg(long)]
    age_to: i32,
    #[arg(long)]
    location: String,
    /// Interest tag, repeatable; order is kept
    #[arg(long = "interest")]
    interests: Vec<String>,
    /// Free-text persona description
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum AgentAction {
    /// List all agents
    List,
    /// Get a specific agent
    Get {
        /// Agent id
        id: String,
    },
    /// Create a new agent
    Create {
        #[command(flatten)]
        fields: AgentFields,
    },
    /// Replace an agent's definition
    Update {
        /// Agent id
        id: String,
        #[command(flatten)]
        fields: AgentFields,
    },
    /// Delete an agent
    Delete {
        /// Agent id
        id: String,
    },
    /// Start a task for an agent
    Dispatch {
        /// Agent id
        id: String,
        /// Goal for this run
        #[arg(long)]
        goal: Option<String>,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<String>,
    },
    /// Show an agent's status
    Status {
        /// Agent id
        id: String,
    },
    /// Show an agent's action logs
    Logs {
        /// Agent id
        id: String,
        /// Show a single log entry
        #[arg(long)]
        log_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = load_config(&args).await?;

    match args.command {
        Commands::Agent { action } => agent::handle_agent_command(&config, action, args.json).await?,
        Commands::Logs => activity::show_logs(&config, args.json).await?,
        Commands::Tasks => activity::show_tasks(&config, args.json).await?,
    }

    Ok(())
}

async fn load_config(args: &Args) -> Result<ClientConfig> {
    let config = match &args.config {
        Some(path) => {
            let config = ClientConfig::load(path).await?;
            info!("Loaded client config from {:?}", path);
            config
        }
        None => ClientConfig::from_env(),
    };

    Ok(match &args.api_url {
        Some(url) => config.with_base_url(url.clone()),
        None => config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_keeps_interest_order() {
        let args = Args::try_parse_from([
            "persona-cli",
            "agent",
            "create",
            "--name",
            "scout",
            "--gender",
            "female",
            "--age-from",
            "25",
            "--age-to",
            "34",
            "--location",
            "Berlin",
            "--interest",
            "tea",
            "--interest",
            "chess",
        ])
        .unwrap();

        match args.command {
            Commands::Agent {
                action: AgentAction::Create { fields },
            } => {
                assert_eq!(fields.interests, ["tea", "chess"]);
                assert!(fields.goal.is_empty());
            }
            _ => panic!("Expected agent create"),
        }
    }

    #[test]
    fn test_json_flag_is_global() {
        let args = Args::try_parse_from(["persona-cli", "tasks", "--json"]).unwrap();
        assert!(args.json);
    }

    #[tokio::test]
    async fn test_api_url_overrides_config() {
        let args = Args::try_parse_from([
            "persona-cli",
            "--api-url",
            "http://override:1",
            "logs",
        ])
        .unwrap();

        let config = load_config(&args).await.unwrap();
        assert_eq!(config.base_url, "http://override:1");
    }
}
