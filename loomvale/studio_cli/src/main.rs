use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{builder::RangedU64ValueParser, Args, Parser, Subcommand};
use loomvale_studio::{
    knowledge::{persona_names, PERSONAS},
    CaptionRequest, IdeaRequest, KitRequest, Mood, Platform, ProState, Studio, StudioConfig,
    StudioError, Tone,
};
use serde::Serialize;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(
    name = "loomvale",
    version,
    about = "Social content ideas, captions and launch kits"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Pro unlock code applied to this invocation.
    #[arg(long, global = true, env = "LOOMVALE_UNLOCK_CODE", hide_env_values = true)]
    unlock_code: Option<String>,
    /// Print structured JSON instead of markdown.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expands a seed into campaign ideas and exports them as CSV/JSON.
    Ideas(IdeasArgs),
    /// Writes captions from a hook and/or source article.
    Captions(CaptionArgs),
    /// Builds a launch content kit.
    Kit(KitArgs),
    /// Shows a persona's pain points, desires and keywords.
    Persona {
        #[arg(default_value = "Wellness Consumers")]
        name: String,
    },
    /// Checks a Pro unlock code.
    Unlock { code: String },
    /// Lists platforms, moods, tones and personas.
    Catalog,
}

#[derive(Args, Debug)]
struct IdeasArgs {
    #[arg(long)]
    seed: String,
    #[arg(long, default_value = "Instagram Reel")]
    platform: Platform,
    #[arg(long, default_value = "Wellness Consumers")]
    persona: String,
    /// Repeat to combine moods.
    #[arg(long = "mood", value_name = "MOOD", default_values_t = [Mood::Cozy, Mood::Minimalist])]
    moods: Vec<Mood>,
    #[arg(long, default_value_t = 6, value_parser = RangedU64ValueParser::<usize>::new().range(3..=12))]
    count: usize,
    /// Skip the hosted model and use templates only.
    #[arg(long)]
    no_remote: bool,
}

#[derive(Args, Debug)]
struct CaptionArgs {
    #[arg(long, default_value = "")]
    seed: String,
    #[arg(long, conflicts_with = "article_file")]
    article: Option<String>,
    #[arg(long)]
    article_file: Option<PathBuf>,
    #[arg(long, default_value = "Wellness Consumers")]
    persona: String,
    #[arg(long, default_value = "Warm storyteller")]
    tone: Tone,
    #[arg(long, default_value = "Instagram Reel")]
    platform: Platform,
    #[arg(long, default_value_t = 4, value_parser = RangedU64ValueParser::<usize>::new().range(2..=10))]
    count: usize,
    #[arg(long)]
    no_remote: bool,
}

#[derive(Args, Debug)]
struct KitArgs {
    #[arg(long)]
    seed: String,
    #[arg(long, default_value = "Instagram Carousel")]
    platform: Platform,
    #[arg(long, default_value = "Gen Z Creators")]
    persona: String,
    #[arg(long)]
    no_remote: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = StudioConfig::load(cli.config.as_deref())?;
    let studio = Studio::from_config(&config)?;
    let pro = session_pro(&studio, cli.unlock_code.as_deref());

    match cli.command {
        Commands::Ideas(args) => {
            let request = IdeaRequest::new(args.seed, args.platform, args.persona)
                .with_moods(args.moods)
                .with_count(args.count)
                .with_remote(!args.no_remote);
            if let Some(expansion) = reported(studio.expand_ideas(&request, pro))? {
                if cli.json {
                    print_json(&expansion)?;
                } else {
                    println!("{}", expansion.batch.markdown);
                    println!();
                    println!("CSV: {}", expansion.export.csv.display());
                    println!("JSON: {}", expansion.export.json.display());
                }
            }
        }
        Commands::Captions(args) => {
            let article = match (args.article, args.article_file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("reading article {}", path.display()))?,
                (None, None) => String::new(),
            };
            let request = CaptionRequest::new(args.seed, args.platform, args.persona)
                .with_article(article)
                .with_tone(args.tone)
                .with_count(args.count)
                .with_remote(!args.no_remote);
            if let Some(batch) = reported(studio.write_captions(&request, pro))? {
                if cli.json {
                    print_json(&batch)?;
                } else {
                    println!("{}", batch.markdown);
                }
            }
        }
        Commands::Kit(args) => {
            let request = KitRequest::new(args.seed, args.platform, args.persona)
                .with_remote(!args.no_remote);
            if let Some(kit) = reported(studio.build_content_kit(&request, pro))? {
                if cli.json {
                    print_json(&kit)?;
                } else {
                    println!("{}", kit.markdown);
                }
            }
        }
        Commands::Persona { name } => {
            let report = studio.persona_deep_dive(&name);
            if cli.json {
                print_json(&json!({ "persona": name, "report": report }))?;
            } else {
                println!("{report}");
            }
        }
        Commands::Unlock { code } => {
            let outcome = studio.unlock(&code);
            if cli.json {
                print_json(&json!({ "message": outcome.message, "unlocked": outcome.is_pro() }))?;
            } else {
                println!("{}", outcome.message);
            }
        }
        Commands::Catalog => {
            if cli.json {
                print_json(&catalog_json())?;
            } else {
                print_catalog();
            }
        }
    }
    Ok(())
}

/// Resolves the Pro state for this invocation; a rejected code is reported
/// on stderr and leaves the free tier in place.
fn session_pro(studio: &Studio, code: Option<&str>) -> ProState {
    let Some(code) = code else {
        return ProState::FREE;
    };
    let outcome = studio.unlock(code);
    if !outcome.is_pro() {
        eprintln!("{}", outcome.message);
    }
    outcome.state
}

/// Prints user-input errors as plain messages and propagates everything else.
fn reported<T>(result: Result<T, StudioError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_user_input() => {
            println!("{err}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn catalog_json() -> serde_json::Value {
    json!({
        "platforms": Platform::ALL.iter().map(|p| p.label()).collect::<Vec<_>>(),
        "moods": Mood::ALL.iter().map(|m| m.label()).collect::<Vec<_>>(),
        "tones": Tone::ALL.iter().map(|t| t.label()).collect::<Vec<_>>(),
        "personas": PERSONAS,
    })
}

fn print_catalog() {
    let section = |title: &str, items: Vec<&str>| {
        println!("{title}:");
        for item in items {
            println!("  - {item}");
        }
    };
    section("Platforms", Platform::ALL.iter().map(|p| p.label()).collect());
    section("Moods", Mood::ALL.iter().map(|m| m.label()).collect());
    section("Tones", Tone::ALL.iter().map(|t| t.label()).collect());
    section("Personas", persona_names().collect());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ideas_defaults_mirror_the_studio_form() {
        let cli = Cli::try_parse_from(["loomvale", "ideas", "--seed", "cacao"]).unwrap();
        let Commands::Ideas(args) = cli.command else {
            panic!("expected ideas");
        };
        assert_eq!(args.platform, Platform::InstagramReel);
        assert_eq!(args.moods, vec![Mood::Cozy, Mood::Minimalist]);
        assert_eq!(args.count, 6);
        assert!(!args.no_remote);
    }

    #[test]
    fn labels_parse_from_flags() {
        let cli = Cli::try_parse_from([
            "loomvale",
            "captions",
            "--seed",
            "serum",
            "--platform",
            "blog-post",
            "--tone",
            "hype friend",
        ])
        .unwrap();
        let Commands::Captions(args) = cli.command else {
            panic!("expected captions");
        };
        assert_eq!(args.platform, Platform::BlogPost);
        assert_eq!(args.tone, Tone::HypeFriend);
    }

    #[test]
    fn counts_outside_the_form_range_are_rejected() {
        assert!(Cli::try_parse_from(["loomvale", "ideas", "--seed", "x", "--count", "13"]).is_err());
        assert!(Cli::try_parse_from(["loomvale", "captions", "--count", "1"]).is_err());
        assert!(Cli::try_parse_from(["loomvale", "ideas", "--seed", "x", "--platform", "myspace"]).is_err());
    }

    #[test]
    fn user_input_errors_are_reported_not_propagated() {
        let outcome: Result<Option<()>> = reported(Err(StudioError::MissingSeed));
        assert!(outcome.unwrap().is_none());
    }
}
