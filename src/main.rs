use galactic_quest::{ChatService, Game, RunConfig, StdConsole};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they never land in the middle of the story.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "loaded configuration");

    let service = ChatService::from_config(&config);
    let mut game = Game::new(config, service, StdConsole::stdio());

    match game.play() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("console error: {e}");
            ExitCode::FAILURE
        }
    }
}
