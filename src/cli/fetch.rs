use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::output::LyricsWriter;
use crate::core::sources::LyricsResult;
use crate::core::translation::batch::translate_lyrics;
use crate::services::SimpleServices;
use crate::utils::progress::{ProgressMessages, ProgressUtils};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Artist name
    #[arg(value_name = "ARTIST")]
    artist: String,

    /// Song title
    #[arg(value_name = "SONG")]
    song: String,

    /// Only ask this source (e.g. "Genius", "AZLyrics")
    #[arg(short, long)]
    source: Option<String>,

    /// Directory for the lyrics file (defaults to output_dir from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print lyrics instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Output format for printed results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Translate the lyrics after fetching them
    #[arg(short, long)]
    translate: bool,

    /// Target language for --translate (defaults to target_language from config)
    #[arg(long)]
    target: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    result: &'a LyricsResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<String>,
}

pub async fn execute(args: FetchArgs, services: &SimpleServices) -> Result<()> {
    let config = services.config();
    let manager = services.create_source_manager();

    let spinner = ProgressUtils::create_lookup_spinner(ProgressMessages::searching_for(&args.artist, &args.song));
    let result = match &args.source {
        Some(source) => manager.fetch_from_source(&args.artist, &args.song, source).await,
        None => manager.fetch_lyrics(&args.artist, &args.song).await,
    };

    let lyrics = match (&result.lyrics, &result.source) {
        (Some(lyrics), Some(source)) if result.success => {
            spinner.finish_with_message(ProgressMessages::found_on(source));
            lyrics.clone()
        }
        _ => {
            spinner.finish_with_message(ProgressMessages::NOT_FOUND);
            if args.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&JsonOutput { result: &result, translation: None })?);
            }
            anyhow::bail!(
                "{}",
                result.error.as_deref().unwrap_or(crate::core::sources::NOT_FOUND_MESSAGE)
            );
        }
    };
    let source = result.source.clone().unwrap_or_default();

    let target = args.target.clone().unwrap_or_else(|| config.target_language.clone());
    let translation = if args.translate {
        let translator = services.create_translation_manager();
        let units = crate::core::translation::batch::collect_units(lyrics.lines()).len();
        let spinner = ProgressUtils::create_translation_spinner(units);
        let lines = translate_lyrics(&translator, &lyrics, &config.source_language, &target).await;
        spinner.finish_and_clear();
        Some(lines.join("\n"))
    } else {
        None
    };

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&JsonOutput { result: &result, translation })?);
        return Ok(());
    }

    if args.stdout {
        println!("{}", translation.as_deref().unwrap_or(&lyrics));
        return Ok(());
    }

    let output_dir = args.output.clone().unwrap_or_else(|| config.output_dir.clone());
    let writer = LyricsWriter::new(output_dir);

    let path = writer.save_lyrics(&args.artist, &args.song, &source, &lyrics)?;
    info!("💾 Saved lyrics to {}", path.display());
    println!("✅ {}", path.display());

    if let Some(body) = translation {
        if body == lyrics {
            warn!("⚠️ No translator changed the lyrics");
        }
        let path = writer.save_translation(&args.artist, &args.song, &target, &body)?;
        info!("💾 Saved translation to {}", path.display());
        println!("✅ {}", path.display());
    }

    Ok(())
}
