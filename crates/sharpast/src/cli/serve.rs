//! `sharpast serve` command implementation.

use anyhow::{Context, Result};
use sharpast::{Server, TreeSitterParser};

use super::Overrides;

/// Run the request loop on stdin/stdout until stdin closes.
pub fn run(overrides: &Overrides) -> Result<()> {
    let config = overrides.load()?;
    let parser =
        TreeSitterParser::new(config.language)?.with_max_depth(config.projection.max_depth);
    let mut server = Server::new(parser, &config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let stats = server
        .serve(stdin.lock(), stdout.lock())
        .context("request loop stopped")?;

    tracing::debug!(?stats, "Serve finished");
    Ok(())
}
