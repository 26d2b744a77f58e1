use clap::Parser;
use flashpair::cli::{self, Cli, Commands, ConfigCommand};
use flashpair::config::Config;
use flashpair::error::Result;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    if let Err(e) = dispatch(&args).await {
        error!(error = %e, "Fatal error");
        if !e.is_reported() {
            cli::output::error(&e.user_message());
        }
        std::process::exit(1);
    }
}

async fn dispatch(args: &Cli) -> Result<()> {
    if let Commands::Config(ConfigCommand::Validate) = args.command {
        return cli::config::execute_validate(&args.config);
    }

    let mut config = Config::load_or_default(&args.config)?;
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    config.init_logging();

    match args.command {
        Commands::Run => {
            info!("flashpair starting");
            cli::run::execute_run(&config).await?;
            info!("flashpair stopped");
            Ok(())
        }
        Commands::Once => cli::run::execute_once(&config).await,
        Commands::Contracts => cli::contracts::execute(&config),
        Commands::Config(ConfigCommand::Show) => cli::config::execute_show(&config),
        Commands::Config(ConfigCommand::Validate) => Ok(()),
    }
}
