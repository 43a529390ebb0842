//! Translating whole lyrics documents
//!
//! Line mode sends only content lines to the translators and rebuilds the
//! document around them, so blank lines and section markers are never
//! translated. Document mode translates paragraph chunks and renders them
//! side by side with the original.

use std::collections::HashMap;
use tracing::{debug, info};

use super::TranslationManager;
use crate::core::text::{classify_line, LineKind};

pub const RULE: &str = "------------------------------";

/// Distinct trimmed content lines, in first-seen order.
pub fn collect_units<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut units: Vec<String> = Vec::new();
    for line in lines {
        if classify_line(line) != LineKind::Content {
            continue;
        }
        let unit = line.trim();
        if !units.iter().any(|seen| seen == unit) {
            units.push(unit.to_string());
        }
    }
    units
}

/// Rebuild the document: a blank line stays blank, a section marker is
/// followed by one blank line, a content line is followed by its
/// translation (the line itself when no translation is known).
pub fn interleave<'a, I>(lines: I, translations: &HashMap<String, String>) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::new();
    for line in lines {
        match classify_line(line) {
            LineKind::Blank => out.push(String::new()),
            LineKind::SectionMarker => {
                out.push(line.trim().to_string());
                out.push(String::new());
            }
            LineKind::Content => {
                let original = line.trim();
                let translated = translations
                    .get(original)
                    .filter(|t| !t.trim().is_empty())
                    .map(String::as_str)
                    .unwrap_or(original);
                out.push(original.to_string());
                out.push(translated.to_string());
            }
        }
    }
    out
}

/// Line-by-line translation of `text` with original and translation interleaved.
pub async fn translate_lyrics(
    manager: &TranslationManager,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Vec<String> {
    let units = collect_units(text.lines());
    info!("Translating {} unique lines", units.len());

    let translations = manager.translate_batch(&units, source_lang, target_lang).await;
    interleave(text.lines(), &translations)
}

/// Split `text` at blank lines into chunks of at most `max_chars`
/// characters. A single paragraph longer than that is split at line
/// boundaries, and a single overlong line is kept whole.
pub fn chunk_paragraphs(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    let pieces = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .flat_map(|paragraph| split_oversized(paragraph, max_chars));

    for piece in pieces {
        let needed = if current.is_empty() {
            piece.chars().count()
        } else {
            current.chars().count() + 2 + piece.chars().count()
        };

        if !current.is_empty() && needed > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(&piece);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_oversized(paragraph: &str, max_chars: usize) -> Vec<String> {
    if paragraph.chars().count() <= max_chars {
        return vec![paragraph.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    for line in paragraph.lines() {
        let needed = current.chars().count() + usize::from(!current.is_empty()) + line.chars().count();
        if !current.is_empty() && needed > max_chars {
            parts.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Translate `text` chunk by chunk; a chunk that fails is kept as it was.
pub async fn translate_document(
    manager: &TranslationManager,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> String {
    let chunks = chunk_paragraphs(text, manager.max_chunk_chars());
    let mut translated = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        if i > 0 && !manager.delay().is_zero() {
            tokio::time::sleep(manager.delay()).await;
        }

        debug!("Translating chunk {}/{}", i + 1, chunks.len());
        let result = manager.translate(chunk, source_lang, target_lang).await;
        translated.push(result.text);
    }

    translated.join("\n\n")
}

/// Pair up paragraphs of the original and the translation.
pub fn side_by_side(original: &str, translated: &str) -> String {
    let paragraphs = |text: &str| -> Vec<String> {
        text.split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    };

    let left = paragraphs(original);
    let right = paragraphs(translated);

    let mut blocks = Vec::new();
    for i in 0..left.len().max(right.len()) {
        let mut block = String::new();
        if let Some(paragraph) = left.get(i) {
            block.push_str("Original:\n");
            block.push_str(paragraph);
            block.push('\n');
        }
        if let Some(paragraph) = right.get(i) {
            if !block.is_empty() {
                block.push('\n');
            }
            block.push_str("Translation:\n");
            block.push_str(paragraph);
            block.push('\n');
        }
        blocks.push(block);
    }

    blocks.join(&format!("\n{}\n\n", RULE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translation::testing::DictionaryTranslator;
    use std::sync::Arc;
    use std::time::Duration;

    const VERSE: &str = "[Verse 1]\nhello\nworld\n\n[Chorus]\nsing";

    fn dictionary() -> HashMap<String, String> {
        [("hello", "A"), ("world", "B"), ("sing", "C")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_interleave_reconstruction() {
        assert_eq!(
            interleave(VERSE.lines(), &dictionary()),
            vec!["[Verse 1]", "", "hello", "A", "world", "B", "", "[Chorus]", "", "sing", "C"]
        );
    }

    #[test]
    fn test_interleave_missing_translation_repeats_original() {
        let out = interleave(["  unknown line  "], &HashMap::new());
        assert_eq!(out, vec!["unknown line", "unknown line"]);
    }

    #[test]
    fn test_collect_units_skips_structure_and_duplicates() {
        let text = "[Chorus]\n  sing  \n\nsing\nagain\n[Chorus]";
        assert_eq!(collect_units(text.lines()), vec!["sing", "again"]);
    }

    #[tokio::test]
    async fn test_translate_lyrics_sends_only_content() {
        let google = Arc::new(
            DictionaryTranslator::new("Google Translate", 3, &[("hello", "A"), ("world", "B"), ("sing", "C")])
                .with_bulk(),
        );
        let manager = TranslationManager::with_translators(vec![google.clone()], Duration::ZERO);

        let out = translate_lyrics(&manager, VERSE, "auto", "zh").await;
        assert_eq!(
            out,
            vec!["[Verse 1]", "", "hello", "A", "world", "B", "", "[Chorus]", "", "sing", "C"]
        );
        assert_eq!(google.calls(), vec!["hello\nworld\nsing"]);
    }

    #[tokio::test]
    async fn test_translate_lyrics_per_line_one_call_per_unit() {
        let baidu = Arc::new(DictionaryTranslator::new("Baidu Translate", 2, &[("hello", "A")]));
        let manager = TranslationManager::with_translators(vec![baidu.clone()], Duration::ZERO);

        let out = translate_lyrics(&manager, "hello\nhello\nbye", "auto", "zh").await;
        assert_eq!(out, vec!["hello", "A", "hello", "A", "bye", "bye"]);
        assert_eq!(baidu.calls(), vec!["hello", "bye"]);
    }

    #[test]
    fn test_chunk_paragraphs_respects_limit() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        assert_eq!(chunk_paragraphs(text, 10), vec!["aaaa\n\nbbbb", "cccc"]);
        assert_eq!(chunk_paragraphs(text, 100), vec![text]);
        assert!(chunk_paragraphs("  \n\n  ", 10).is_empty());
    }

    #[test]
    fn test_chunk_paragraphs_splits_long_paragraph_by_lines() {
        let text = "one one\ntwo two\nthree";
        assert_eq!(chunk_paragraphs(text, 10), vec!["one one", "two two", "three"]);
    }

    #[tokio::test]
    async fn test_translate_document_passes_failures_through() {
        let translator = Arc::new(DictionaryTranslator::new(
            "Google Translate",
            3,
            &[("first paragraph of the song goes like this", "premier paragraphe")],
        ));
        let manager = TranslationManager::with_translators(vec![translator.clone()], Duration::ZERO);

        let text = "first paragraph of the song goes like this\n\nsecond paragraph of the song never ends";
        let out = translate_document(&manager, text, "en", "fr").await;
        assert_eq!(out, "premier paragraphe\n\nsecond paragraph of the song never ends");
        assert_eq!(translator.calls().len(), 2);
    }

    #[test]
    fn test_side_by_side() {
        let out = side_by_side("one\n\ntwo", "uno\n\ndos");
        assert_eq!(
            out,
            format!(
                "Original:\none\n\nTranslation:\nuno\n\n{}\n\nOriginal:\ntwo\n\nTranslation:\ndos\n",
                RULE
            )
        );
        assert_eq!(RULE.len(), 30);
    }
}
