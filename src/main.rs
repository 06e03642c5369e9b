use clap::Parser;
use colored::Colorize;
use dotenvy::dotenv;
use std::env;
use std::process::ExitCode;

use evals_cli::EvalsClient;
use evals_cli::cli::{
    Cli, Commands, MetricsCommands, MonitoringCommands, OrgCommands, SetupCommands,
};
use evals_cli::config::{Config, default_config_path};
use evals_cli::handlers::common::confirm;
use evals_cli::handlers::configure::ConfigureHandler;
use evals_cli::handlers::metrics::MetricsHandler;
use evals_cli::handlers::monitoring::MonitoringHandler;
use evals_cli::handlers::organizations::OrganizationsHandler;
use evals_cli::handlers::quickstart::QuickstartHandler;
use evals_cli::handlers::setups::SetupsHandler;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    // Initialize logging with LOG_LEVEL environment variable
    // Default to "warn" if not set (only warnings and errors)
    if env::var("RUST_LOG").is_err() {
        // SAFETY: no other threads read the environment yet
        unsafe {
            env::set_var(
                "RUST_LOG",
                env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            )
        };
    }
    env_logger::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

fn client() -> anyhow::Result<EvalsClient> {
    let config = Config::load()?;
    Ok(EvalsClient::from_config(&config)?)
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let output = match cli.command {
        Commands::Configure {
            base_url,
            auth_token,
        } => {
            let path = default_config_path()
                .ok_or_else(|| anyhow::anyhow!("Cannot locate home directory for config file"))?;
            let auth_token =
                ConfigureHandler::resolve_token(auth_token, std::io::stdin().lock())?;
            ConfigureHandler::save(&base_url, &auth_token, &path)?
        }

        Commands::Org {
            command:
                OrgCommands::Create {
                    name,
                    environments,
                    json,
                },
        } => {
            OrganizationsHandler::create(&client()?, &name, &environments, json)
                .await?
                .1
        }

        Commands::Setup { command } => match command {
            SetupCommands::Create {
                entity_type,
                entity_value,
                evaluator_ids,
                evaluator_types,
            } => {
                SetupsHandler::create(
                    &client()?,
                    &entity_type,
                    &entity_value,
                    &evaluator_ids,
                    &evaluator_types,
                )
                .await?
                .1
            }
            SetupCommands::List {
                entity_type,
                status,
                json,
            } => SetupsHandler::list(&client()?, entity_type, status, json).await?,
            SetupCommands::Get { setup_id } => SetupsHandler::get(&client()?, &setup_id).await?,
            SetupCommands::Delete { setup_id, yes } => {
                if !yes
                    && !confirm(&format!(
                        "Are you sure you want to delete setup '{}'?",
                        setup_id
                    ))?
                {
                    return Ok("Cancelled.".yellow().to_string());
                }
                SetupsHandler::delete(&client()?, &setup_id).await?
            }
        },

        Commands::Monitoring {
            command: MonitoringCommands::Status { json },
        } => MonitoringHandler::status(&client()?, json).await?,

        Commands::Metrics {
            command: MetricsCommands::Query(args),
        } => MetricsHandler::query(&client()?, &args).await?,

        Commands::Quickstart(args) => QuickstartHandler::run(&client()?, &args).await?,
    };

    Ok(output)
}
