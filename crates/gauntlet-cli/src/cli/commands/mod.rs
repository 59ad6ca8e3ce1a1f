pub mod run;

use gauntlet_core::errors::ConfigError;

use crate::cli::args::Cli;
use crate::exit_codes;

/// Runs the harness. Configuration errors print one line and map to the
/// config exit code before any trial executes; anything else bubbles up.
pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match run::run(cli).await {
        Ok(code) => Ok(code),
        Err(e) => {
            if let Some(cfg) = e.downcast_ref::<ConfigError>() {
                eprintln!("{cfg}");
                Ok(exit_codes::CONFIG_ERROR)
            } else {
                Err(e)
            }
        }
    }
}
