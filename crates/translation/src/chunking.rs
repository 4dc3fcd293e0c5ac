pub const MAX_CHUNK_CHARS: usize = 200;
pub const BULLET: char = '•';

/// Splits `text` into pieces of at most `max_chars` characters for a
/// length-limited translation call.
///
/// Sections (blank-line separated) that fit are kept verbatim. Oversized
/// sections are packed greedily from their bullet items, or from their
/// sentences when they carry no bullet. Anything still too long is packed
/// word by word, and only a single word longer than the bound is cut.
pub fn chunk_for_translation(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();

    for section in text.split("\n\n") {
        if section.trim().is_empty() {
            continue;
        }

        if char_len(section) <= max_chars {
            chunks.push(section.to_string());
            continue;
        }

        let packed = if section.contains(BULLET) {
            pack_bullets(section, max_chars)
        } else {
            pack_sentences(section, max_chars)
        };

        for chunk in packed {
            if char_len(&chunk) <= max_chars {
                chunks.push(chunk);
            } else {
                chunks.extend(pack_words(&chunk, max_chars));
            }
        }
    }

    chunks
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn pack_bullets(section: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut items = section.split(BULLET);
    let mut current = items.next().unwrap_or_default().trim().to_string();

    for item in items {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let candidate = if current.is_empty() {
            format!("{BULLET} {item}")
        } else {
            format!("{current} {BULLET} {item}")
        };

        if char_len(&candidate) <= max_chars {
            current = candidate;
        } else {
            if !current.is_empty() {
                out.push(current);
            }
            current = format!("{BULLET} {item}");
        }
    }

    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

fn pack_sentences(section: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for sentence in section.split_inclusive(". ") {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let candidate = if current.is_empty() {
            sentence.to_string()
        } else {
            format!("{current} {sentence}")
        };

        if char_len(&candidate) <= max_chars {
            current = candidate;
        } else {
            if !current.is_empty() {
                out.push(current);
            }
            current = sentence.to_string();
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn pack_words(chunk: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in chunk.split_whitespace() {
        for piece in split_long_word(word, max_chars) {
            let needed = if current.is_empty() {
                char_len(&piece)
            } else {
                char_len(&current) + 1 + char_len(&piece)
            };

            if needed <= max_chars {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&piece);
            } else {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                current = piece;
            }
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<String> {
    if char_len(word) <= max_chars {
        return vec![word.to_string()];
    }

    word.chars()
        .collect::<Vec<_>>()
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}
