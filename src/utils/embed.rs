use serenity::builder::{CreateEmbed, CreateEmbedFooter};

use crate::character::{Character, FieldValue};

const THEME_COLOR: u32 = 0x8B0000;
const ERROR_COLOR: u32 = 0xED4245;

pub fn error(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Error")
        .description(message)
        .color(ERROR_COLOR)
}

pub fn saved(character: &Character) -> CreateEmbed {
    CreateEmbed::new()
        .title("✅ Character saved")
        .description(format!(
            "**{}** has been registered from the sheet.",
            character.name()
        ))
        .field("Sheet", character.sheet_url.as_str(), false)
        .color(THEME_COLOR)
}

pub fn deleted(name: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("🗑️ Character removed")
        .description(format!("**{name}** has been removed from the registry."))
        .color(THEME_COLOR)
}

pub fn character_sheet(character: &Character) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(character.name().to_string())
        .color(THEME_COLOR)
        .footer(CreateEmbedFooter::new(format!(
            "Last synced {}",
            character.updated_at
        )));

    let mut info_lines = Vec::new();
    let mut dot_lines = Vec::new();
    for (name, value) in &character.fields {
        if name == "name" {
            continue;
        }
        let line = format!("**{}** {value}", display_name(name));
        match value {
            FieldValue::Dots(_) => dot_lines.push(line),
            _ => info_lines.push(line),
        }
    }

    for (title, lines) in [("Details", info_lines), ("Traits", dot_lines)] {
        for (i, chunk) in chunk_lines(&lines, 1024).into_iter().enumerate() {
            let name = if i == 0 {
                title.to_string()
            } else {
                format!("{title} (cont.)")
            };
            embed = embed.field(name, chunk, true);
        }
    }

    embed
}

pub fn roster(characters: &[Character]) -> CreateEmbed {
    let description = if characters.is_empty() {
        "No characters registered yet.".to_string()
    } else {
        characters
            .iter()
            .map(|c| format!("- **{}** (<@{}>)", c.name(), c.owner_id))
            .collect::<Vec<_>>()
            .join("\n")
    };

    CreateEmbed::new()
        .title(format!("Character roster ({})", characters.len()))
        .description(description)
        .color(THEME_COLOR)
}

/// "blood_per_turn" → "Blood Per Turn"
fn display_name(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group lines into chunks that stay under Discord's embed field limit.
/// A single line longer than the limit is hard-split so no chunk can
/// exceed it.
fn chunk_lines(lines: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in lines {
        for piece in split_line(line, limit) {
            if !current.is_empty() && current.len() + piece.len() + 1 > limit {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(piece);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Split one line into pieces of at most `limit` bytes, on char boundaries.
fn split_line(line: &str, limit: usize) -> Vec<&str> {
    if line.len() <= limit {
        return vec![line];
    }
    let mut pieces = Vec::new();
    let mut rest = line;
    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = rest.split_at(cut);
        pieces.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("blood_per_turn"), "Blood Per Turn");
        assert_eq!(display_name("name"), "Name");
    }

    #[test]
    fn test_chunk_lines_respects_limit() {
        let lines: Vec<String> = (0..10).map(|i| format!("line {i} {}", "x".repeat(200))).collect();
        let chunks = chunk_lines(&lines, 1024);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 1024);
        }
    }

    #[test]
    fn test_chunk_lines_empty() {
        assert!(chunk_lines(&[], 1024).is_empty());
    }

    #[test]
    fn test_chunk_lines_splits_single_oversized_line() {
        // A long free-text cell (e.g. a 2000-char concept) must not produce
        // a field value Discord rejects.
        let lines = vec!["x".repeat(2012)];
        let chunks = chunk_lines(&lines, 1024);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.len() <= 1024);
        }
        let total: usize = chunks.iter().map(String::len).sum();
        assert_eq!(total, 2012, "no content lost when splitting");
    }

    #[test]
    fn test_chunk_lines_splits_on_char_boundaries() {
        let lines = vec!["é".repeat(600)]; // 1200 bytes of two-byte chars
        let chunks = chunk_lines(&lines, 1024);
        for chunk in &chunks {
            assert!(chunk.len() <= 1024);
            assert!(chunk.chars().all(|c| c == 'é'));
        }
        let total: usize = chunks.iter().map(|c| c.chars().count()).sum();
        assert_eq!(total, 600);
    }
}
