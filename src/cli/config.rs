use anyhow::Result;
use clap::Args;

use crate::config::{ApiCredentials, Config as AppConfig, EnvParser};

#[derive(Args)]
pub struct ConfigArgs {
    /// Only print the configuration file path
    #[arg(long)]
    path: bool,
}

fn mask(credentials: &ApiCredentials) -> String {
    if credentials.is_complete() {
        format!("{} / ***", credentials.app_id)
    } else {
        "not configured".to_string()
    }
}

pub async fn execute(args: ConfigArgs, config: &AppConfig, config_file: Option<&str>) -> Result<()> {
    let config_path = match config_file {
        Some(path) => std::path::PathBuf::from(path),
        None => AppConfig::config_path()?,
    };

    if args.path {
        println!("{}", config_path.display());
        return Ok(());
    }

    println!("🔧 Current configuration ({}):", config_path.display());
    println!("  ⏱️  request_timeout_seconds: {}", config.request_timeout_seconds);
    println!("  🔁 max_retries: {}", config.max_retries);
    println!("  ⏳ retry_delay_ms: {}", config.retry_delay_ms);
    println!("  🐢 translation_delay_ms: {}", config.translation_delay_ms);
    println!("  🗣️  source_language: {}", config.source_language);
    println!("  🌐 target_language: {}", config.target_language);
    println!("  📁 output_dir: {}", config.output_dir.display());
    println!("  🔌 proxy: enabled={} http={:?} https={:?}", config.proxy.enabled, config.proxy.http, config.proxy.https);
    println!("  🔑 baidu: {}", mask(&config.translation.baidu));
    println!("  🔑 youdao: {}", mask(&config.translation.youdao));
    println!(
        "  🧪 heuristics: min_lyrics_chars={} max_ui_indicators={} youtube_min_chars={} youtube_max_videos={}",
        config.heuristics.min_lyrics_chars,
        config.heuristics.max_ui_indicators,
        config.heuristics.youtube_min_chars,
        config.heuristics.youtube_max_videos
    );

    let env_vars = EnvParser::get_all_lyricsdl_vars();
    if !env_vars.is_empty() {
        println!("\n🌍 Environment overrides:");
        for (key, value) in env_vars {
            println!("  {} = {}", key, value);
        }
    }

    Ok(())
}
