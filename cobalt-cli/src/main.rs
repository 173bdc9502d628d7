//! cobalt command-line front end
//!
//! Results go to stdout (text or `--json`), logs and errors to stderr.

mod cli;
mod logging;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cobalt_client::{taxonomy, ClientConfig, CobaltClient, CobaltError};
use tracing::debug;

use cli::{Cli, Command};
use logging::LoggingConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
    }) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<CobaltError>() {
                Some(err) => err.describe(),
                None => format!("{e:#}"),
            };
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> Result<CobaltClient> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(api_url) = &cli.api_url {
        config.api_url.clone_from(api_url);
    }
    if let Some(api_key) = &cli.api_key {
        config.api_key.clone_from(api_key);
    }
    debug!(?config, "loaded configuration");
    Ok(CobaltClient::new(config)?)
}

async fn execute(cli: Cli) -> Result<()> {
    let json = cli.json;

    match &cli.command {
        Command::Resolve { code } => {
            if json {
                output::print_json(&serde_json::json!({
                    "code": code,
                    "description": taxonomy::describe(code),
                }))?;
            } else {
                println!("{}", taxonomy::resolve(code));
            }
        }
        Command::Info { api } => {
            let client = build_client(&cli)?;
            let info = match api {
                Some(api) => client.server_info_at(api).await?,
                None => client.server_info().await?,
            };
            if json {
                output::print_json(&info)?;
            } else {
                output::print_server_info(&info);
            }
        }
        Command::Run(args) => {
            let client = build_client(&cli)?;
            let response = client.run(&args.to_options()).await?;
            if json {
                output::print_json(&response)?;
            } else {
                output::print_download(&response);
            }
        }
        Command::Instances { online } => {
            let client = build_client(&cli)?;
            let mut instances = client.list_instances().await?;
            if *online {
                instances.retain(|instance| instance.is_api_online());
            }
            if json {
                output::print_json(&instances)?;
            } else {
                output::print_instances(&instances);
            }
        }
        Command::Playlist { url } => {
            let client = build_client(&cli)?;
            let videos = client.youtube_playlist(url).await?;
            if json {
                output::print_json(&videos)?;
            } else {
                for video in &videos {
                    println!("{video}");
                }
            }
        }
        Command::Probe { url } => {
            let client = build_client(&cli)?;
            #[allow(deprecated)]
            let info = client.probe_media(url).await?;
            if json {
                output::print_json(&info)?;
            } else {
                output::print_media_info(&info);
            }
        }
    }

    Ok(())
}
