use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use tagline::cli::{CliArgs, Command};
use tagline::runtime::{parse_script, Runtime};
use tagline::source::MemorySource;
use tagline::tokenize::{render_markdown, tokenize, EntityDirectory};
use tagline::trigger::scan_with_limit;
use tagline::{Composer, ComposerConfig, ComposerView};

fn main() -> Result<()> {
    tagline::tracing::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => ComposerConfig::load_from(path),
        None => ComposerConfig::load(),
    };
    let directory = load_directory(args.command.directory_path().as_deref())?;

    match args.command {
        Command::Scan { text, caret } => {
            let caret = caret.unwrap_or_else(|| text.chars().count());
            match scan_with_limit(&text, caret, config.max_query_len) {
                Some(hit) => println!(
                    "{} at {} query {:?}",
                    hit.trigger, hit.start_offset, hit.query
                ),
                None => println!("no trigger"),
            }
        }
        Command::Tokenize { text, json, .. } => {
            let tokens = tokenize(&text, &directory);
            if json {
                let out =
                    serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
                println!("{}", out);
            } else {
                for token in &tokens {
                    println!(
                        "{:<8} {:>3}..{:<3} {:?}",
                        format!("{:?}", token.kind).to_lowercase(),
                        token.range.start,
                        token.range.end,
                        token.text
                    );
                }
                println!();
                println!("{}", render_markdown(&tokens, &config.links));
            }
        }
        Command::Replay { script, .. } => {
            let source = std::fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script {}", script.display()))?;
            let steps = parse_script(&source)
                .with_context(|| format!("Invalid script {}", script.display()))?;

            let catalog = Arc::new(MemorySource::from_directory(&directory));
            let mut runtime = Runtime::new(Composer::new(config), catalog);
            for step in &steps {
                runtime.run_step(step);
                println!("{:?}", step);
                print!("{}", render_view(&runtime.composer().view()));
            }
        }
        Command::Config { write } => {
            let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
            print!("{}", yaml);
            if write {
                match &args.config {
                    Some(path) => config.save_to(path),
                    None => config.save(),
                }
                .map_err(anyhow::Error::msg)?;
            }
        }
    }

    Ok(())
}

fn load_directory(path: Option<&Path>) -> Result<EntityDirectory> {
    match path {
        Some(path) => EntityDirectory::load(path)
            .with_context(|| format!("Failed to load directory {}", path.display())),
        None => Ok(EntityDirectory::default()),
    }
}

/// Field with a `|` at the caret, then the popup rows
fn render_view(view: &ComposerView) -> String {
    let mut out = String::new();
    let split = tagline::editable::char_to_byte(&view.value, view.caret);
    let _ = writeln!(
        out,
        "  {}|{}",
        &view.value[..split],
        &view.value[split..]
    );

    if let (Some(trigger), Some(query)) = (&view.trigger, &view.query) {
        let state = if view.popup_visible { "open" } else { "waiting" };
        let _ = writeln!(out, "  [{} {:?} {}]", trigger, query, state);
    }
    for (i, candidate) in view.candidates.iter().enumerate() {
        let marker = if i == view.selected_index { '>' } else { ' ' };
        let _ = writeln!(out, "  {} {}", marker, candidate.marker_text());
    }
    out
}
