use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use agent_cost::config::{self, Config};
use agent_cost::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();
    let command = args.get_command();

    // Every command except `config validate` runs on a loaded configuration;
    // validation loads the file itself so it can report the error
    let load = || -> Result<Config> {
        let cfg = config::load_config(&args.config)?;
        init_tracing(log_level(&command, &cfg), &cfg.server.log_format);
        Ok(cfg)
    };

    // Dispatch to appropriate command handler
    match &command {
        cli::Commands::Serve { host, port } => {
            commands::serve::execute(load()?, host.clone(), *port).await?;
        }
        cli::Commands::Calculate {
            framework,
            model,
            requests,
            tokens,
        } => {
            commands::calculate::calculate(&load()?, framework, model, *requests, *tokens, args.json)?;
        }
        cli::Commands::Compare {
            model,
            requests,
            tokens,
        } => {
            commands::calculate::compare(&load()?, model, *requests, *tokens, args.json)?;
        }
        cli::Commands::Migrate(migrate) => {
            commands::migrate::migrate(&load()?, migrate, args.json)?;
        }
        cli::Commands::Sensitivity(migrate) => {
            commands::migrate::sensitivity(&load()?, migrate, args.json)?;
        }
        cli::Commands::Scenarios { key, output } => {
            commands::scenarios::execute(&load()?, key.as_deref(), output.as_deref(), args.json)?;
        }
        cli::Commands::Models => commands::catalog::models(&load()?, args.json)?,
        cli::Commands::Frameworks => commands::catalog::frameworks(&load()?, args.json)?,
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&load()?)?,
            cli::ConfigCommands::Validate => {
                init_tracing("warn", "text");
                commands::config::validate(&args.config)?;
            }
        },
        cli::Commands::Version => {
            println!("Agent Cost Calculator v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// One-shot commands stay quiet unless RUST_LOG asks otherwise
fn log_level<'a>(command: &cli::Commands, cfg: &'a Config) -> &'a str {
    match command {
        cli::Commands::Serve { .. } => cfg.server.log_level.as_str(),
        _ => "warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_per_command() {
        let mut cfg = Config::default();
        cfg.server.log_level = "debug".to_string();

        let serve = cli::Commands::Serve {
            host: None,
            port: None,
        };
        assert_eq!(log_level(&serve, &cfg), "debug");
        assert_eq!(log_level(&cli::Commands::Models, &cfg), "warn");
    }
}
