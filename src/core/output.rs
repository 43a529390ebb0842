//! Lyrics and translation files on disk
//!
//! A lyrics file starts with an `Artist - Song` line and a header block
//! fenced by `=` rules; everything after the header is the lyrics text.

use regex::Regex;
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{FileSystemError, Result};

const HEADER_RULE_WIDTH: usize = 50;
const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_SONG: &str = "Unknown Song";

/// A lyrics file read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsFile {
    pub artist: String,
    pub song: String,
    pub source: Option<String>,
    pub lyrics: String,
}

fn rule() -> String {
    "=".repeat(HEADER_RULE_WIDTH)
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)\s+-\s+(.+)$").expect("static regex is valid"))
}

/// Drop characters that are not allowed in file names on common platforms.
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn lyrics_filename(artist: &str, song: &str) -> String {
    format!("{} - {}.txt", safe_filename(artist), safe_filename(song))
}

pub fn translation_filename(artist: &str, song: &str, target_lang: &str) -> String {
    format!(
        "{} - {} (translated {}).txt",
        safe_filename(artist),
        safe_filename(song),
        safe_filename(target_lang)
    )
}

pub fn render_lyrics_file(artist: &str, song: &str, source: &str, lyrics: &str) -> String {
    format!(
        "{} - {}\n{}\nSource: {}\n{}\n\n{}",
        artist,
        song,
        rule(),
        source,
        rule(),
        lyrics
    )
}

pub fn render_translation_file(artist: &str, song: &str, target_lang: &str, body: &str) -> String {
    format!(
        "{} - {}\n{}\nOriginal Lyrics | Translation ({})\n{}\n\n{}\n",
        artist,
        song,
        rule(),
        target_lang,
        rule(),
        body.trim_end()
    )
}

fn is_rule_line(line: &str) -> bool {
    line.contains('=') && line.chars().count() > 20
}

/// Parse the layout written by [`render_lyrics_file`]. Files without the
/// header block are accepted too: the lyrics then start after the first
/// blank line among lines 2 to 5, or at the top.
pub fn parse_lyrics_file(content: &str) -> LyricsFile {
    let lines: Vec<&str> = content.lines().collect();

    let (artist, song) = lines
        .first()
        .and_then(|header| header_re().captures(header.trim()))
        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()))
        .unwrap_or_else(|| (UNKNOWN_ARTIST.to_string(), UNKNOWN_SONG.to_string()));

    let mut source = None;
    let mut start = match lines.iter().position(|line| is_rule_line(line)) {
        Some(i) => i + 1,
        None => lines
            .iter()
            .enumerate()
            .take(5)
            .skip(1)
            .find(|(_, line)| line.trim().is_empty())
            .map(|(i, _)| i + 1)
            .unwrap_or(0),
    };

    // Header block "Source: X" followed by a closing rule
    if let (Some(label), Some(closing)) = (lines.get(start), lines.get(start + 1)) {
        if is_rule_line(closing) {
            if let Some(name) = label.strip_prefix("Source:") {
                source = Some(name.trim().to_string());
            }
            start += 2;
        }
    }

    let lyrics = lines.get(start..).unwrap_or_default().join("\n").trim().to_string();

    LyricsFile {
        artist,
        song,
        source,
        lyrics,
    }
}

pub fn read_lyrics_file(path: &Path) -> Result<LyricsFile> {
    if !path.exists() {
        return Err(FileSystemError::PathNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = read_to_string(path)?;
    let parsed = parse_lyrics_file(&content);
    if parsed.lyrics.is_empty() {
        return Err(FileSystemError::InvalidFormat {
            path: path.to_path_buf(),
        }
        .into());
    }

    Ok(parsed)
}

/// Writes lyrics and translations into one output directory.
pub struct LyricsWriter {
    output_dir: PathBuf,
}

impl LyricsWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn save_lyrics(&self, artist: &str, song: &str, source: &str, lyrics: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(lyrics_filename(artist, song));
        self.write_file(&path, &render_lyrics_file(artist, song, source, lyrics))?;
        Ok(path)
    }

    pub fn save_translation(&self, artist: &str, song: &str, target_lang: &str, body: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(translation_filename(artist, song, target_lang));
        self.write_file(&path, &render_translation_file(artist, song, target_lang, body))?;
        Ok(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        create_dir_all(&self.output_dir)?;
        write(path, content)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("AC/DC"), "ACDC");
        assert_eq!(safe_filename(" What? <Live> "), "What Live");
        assert_eq!(lyrics_filename("Beyond Awareness", "Crime"), "Beyond Awareness - Crime.txt");
        assert_eq!(
            translation_filename("Beyond Awareness", "Crime", "zh"),
            "Beyond Awareness - Crime (translated zh).txt"
        );
    }

    #[test]
    fn test_render_lyrics_file_layout() {
        let content = render_lyrics_file("Beyond Awareness", "Crime", "AZLyrics", "line one\nline two");
        let rule = "=".repeat(50);
        assert_eq!(
            content,
            format!("Beyond Awareness - Crime\n{rule}\nSource: AZLyrics\n{rule}\n\nline one\nline two")
        );
    }

    #[test]
    fn test_parse_rendered_file() {
        let content = render_lyrics_file("Beyond Awareness", "Crime", "AZLyrics", "[Chorus]\nCrime, crime");
        let parsed = parse_lyrics_file(&content);
        assert_eq!(parsed.artist, "Beyond Awareness");
        assert_eq!(parsed.song, "Crime");
        assert_eq!(parsed.source.as_deref(), Some("AZLyrics"));
        assert_eq!(parsed.lyrics, "[Chorus]\nCrime, crime");
    }

    #[test]
    fn test_parse_file_without_rules() {
        let parsed = parse_lyrics_file("Some Artist - Some Song\n\nfirst line\nsecond line\n");
        assert_eq!(parsed.artist, "Some Artist");
        assert_eq!(parsed.song, "Some Song");
        assert_eq!(parsed.source, None);
        assert_eq!(parsed.lyrics, "first line\nsecond line");
    }

    #[test]
    fn test_parse_file_without_header() {
        let parsed = parse_lyrics_file("just lyrics\nmore lyrics");
        assert_eq!(parsed.artist, UNKNOWN_ARTIST);
        assert_eq!(parsed.song, UNKNOWN_SONG);
        assert_eq!(parsed.lyrics, "just lyrics\nmore lyrics");
    }

    #[test]
    fn test_writer_saves_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let writer = LyricsWriter::new(dir.path().join("lyrics"));

        let path = writer.save_lyrics("Beyond Awareness", "Crime", "AZLyrics", "words").unwrap();
        assert!(path.ends_with("Beyond Awareness - Crime.txt"));

        let read = read_lyrics_file(&path).unwrap();
        assert_eq!(read.lyrics, "words");

        let translated = writer
            .save_translation("Beyond Awareness", "Crime", "zh", "words\n词\n")
            .unwrap();
        let content = std::fs::read_to_string(translated).unwrap();
        assert!(content.starts_with("Beyond Awareness - Crime\n"));
        assert!(content.contains("Original Lyrics | Translation (zh)"));
        assert!(content.ends_with("words\n词\n"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_lyrics_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("Path not found"));
    }
}
