use anyhow::{Context, Result};
use llm_hangman::cli::{CliInterface, parse_cli};
use llm_hangman::config::{Config, default_log_dir};
use llm_hangman::logging::{self, LogTarget};
use llm_hangman::tui::TuiInterface;
use llm_hangman::{Backend, Session, Settings, game_loop};
use std::io;

fn main() -> Result<()> {
    let cli = parse_cli();
    // Tokens may live in a .env file in the working directory.
    let _ = dotenvy::dotenv();

    let mut config = Config::load(cli.config_path.as_deref()).context("failed to load configuration")?;
    config
        .apply_overrides(&cli.overrides())
        .context("invalid configuration")?;

    let log_dir = default_log_dir().unwrap_or_else(std::env::temp_dir);
    let target = if cli.tui {
        LogTarget::FileIn(&log_dir)
    } else {
        LogTarget::Stderr
    };
    if let Some(path) = logging::init(target, &config.logging.level).context("failed to set up logging")? {
        eprintln!("Logging to {}", path.display());
    }
    log::info!("Using {:?} backend", config.backend.kind);

    let start = match &cli.category {
        Some(input) => Some(
            config
                .find_category(input)
                .map(str::to_string)
                .with_context(|| format!("unknown category '{input}'"))?,
        ),
        None => None,
    };

    let backend = Backend::from_config(&config.backend).context("failed to set up the model backend")?;
    let mut session = Session::new(backend, Settings::from(&config));

    if cli.tui {
        let mut interface = TuiInterface::new().context("failed to initialize terminal UI")?;
        game_loop(&mut session, &mut interface);
    } else {
        llm_hangman::cli::display_categories(&config.categories);
        let mut interface = CliInterface::new(io::stdin().lock());
        if let Some(category) = start {
            interface = interface.with_start(category);
        }
        game_loop(&mut session, &mut interface);
    }
    Ok(())
}
