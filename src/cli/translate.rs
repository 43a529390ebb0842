use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use crate::core::output::{read_lyrics_file, LyricsWriter};
use crate::core::translation::batch::{collect_units, side_by_side, translate_document, translate_lyrics};
use crate::services::SimpleServices;
use crate::utils::progress::ProgressUtils;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TranslateMode {
    /// Each lyric line followed by its translation
    Lines,
    /// Paragraph chunks rendered side by side
    Document,
}

#[derive(Args)]
pub struct TranslateArgs {
    /// Lyrics file written by `fetch`
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Directory for the translation file (defaults to the lyrics file's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = TranslateMode::Lines)]
    mode: TranslateMode,

    /// Source language (defaults to source_language from config)
    #[arg(long)]
    source_lang: Option<String>,

    /// Target language (defaults to target_language from config)
    #[arg(short, long)]
    target: Option<String>,
}

pub async fn execute(args: TranslateArgs, services: &SimpleServices) -> Result<()> {
    let config = services.config();
    let file = read_lyrics_file(&args.file)?;
    info!("📄 {} - {} ({} lines)", file.artist, file.song, file.lyrics.lines().count());

    let source_lang = args.source_lang.clone().unwrap_or_else(|| config.source_language.clone());
    let target = args.target.clone().unwrap_or_else(|| config.target_language.clone());

    let manager = services.create_translation_manager();
    if let Some(primary) = manager.primary_translator() {
        info!("🌐 Primary translator: {}", primary);
    }

    let spinner = ProgressUtils::create_translation_spinner(collect_units(file.lyrics.lines()).len());
    let body = match args.mode {
        TranslateMode::Lines => translate_lyrics(&manager, &file.lyrics, &source_lang, &target)
            .await
            .join("\n"),
        TranslateMode::Document => {
            let translated = translate_document(&manager, &file.lyrics, &source_lang, &target).await;
            side_by_side(&file.lyrics, &translated)
        }
    };
    spinner.finish_and_clear();

    let output_dir = match args.output {
        Some(dir) => dir,
        None => args
            .file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| config.output_dir.clone()),
    };

    let path = LyricsWriter::new(output_dir).save_translation(&file.artist, &file.song, &target, &body)?;
    println!("✅ {}", path.display());
    Ok(())
}
