//! `sharpast parse` command implementation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use sharpast::languages::get_language_support;
use sharpast::{Language, Projector, SourceParser, TreeSitterParser};

use super::Overrides;

/// Parse one file and print its projected tree on stdout.
pub fn run(overrides: &Overrides, file: &Path, pretty: bool) -> Result<()> {
    let mut config = overrides.load()?;
    if overrides.language.is_none() {
        if let Some(language) = detect_language(file) {
            config.language = language;
        }
    }

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut parser =
        TreeSitterParser::new(config.language)?.with_max_depth(config.projection.max_depth);
    let mut projector = Projector::new(&config, parser.vocabulary());

    let tree = match parser.parse(&source) {
        Ok(tree) => tree,
        Err(failure) => {
            for diagnostic in &failure.diagnostics {
                eprintln!("{}:{}", file.display().to_string().cyan(), diagnostic);
            }
            bail!(
                "{} has {} syntax error(s)",
                file.display(),
                failure.diagnostics.len()
            );
        }
    };

    let ast = projector
        .project(&tree)
        .with_context(|| format!("failed to project {}", file.display()))?;
    let json = if pretty {
        serde_json::to_string_pretty(&ast)?
    } else {
        serde_json::to_string(&ast)?
    };
    println!("{json}");
    Ok(())
}

/// Picks a language by file extension.
fn detect_language(file: &Path) -> Option<Language> {
    let extension = file.extension()?.to_str()?;
    Language::value_variants()
        .iter()
        .copied()
        .find(|language| get_language_support(*language).extensions().contains(&extension))
}
