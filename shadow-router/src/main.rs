//! shadow-router command line.

use clap::Parser;
use shadow_router::{
    cli::{self, Cli, Commands},
    logger,
};
use std::process::exit;
use tracing::error;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let config = match logger::load_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            exit(1);
        }
    };

    logger::init(&config.general);

    let result = match args.command {
        Commands::Configcheck => cli::config_check(args.config).map_err(|err| err.to_string()),
        command @ Commands::Route { .. } => cli::route(&config, command)
            .await
            .map_err(|err| err.to_string()),
    };

    if let Err(err) = result {
        error!("{}", err);
        exit(1);
    }
}
