use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode;

/// Result of a text-editing key: the new text and cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub text: String,
    pub cursor: usize,
}

/// Default single-line input behavior for `key`.
///
/// Returns `None` when the key is not a text-editing key, so the caller can
/// let it fall through. The cursor is a byte offset kept on a grapheme
/// boundary.
pub(crate) fn edit_text(text: &str, cursor: usize, key: &KeyEvent) -> Option<TextEdit> {
    let cursor = unicode::clamp_cursor(text, cursor);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let keep = |cursor: usize| TextEdit {
        text: text.to_string(),
        cursor,
    };

    let edit = match key.code {
        KeyCode::Char('a') if ctrl => keep(0),
        KeyCode::Char('e') if ctrl => keep(text.len()),
        KeyCode::Char('u') if ctrl => TextEdit {
            text: text[cursor..].to_string(),
            cursor: 0,
        },
        KeyCode::Char('w') if ctrl => delete_range(text, unicode::word_boundary_left(text, cursor), cursor),
        KeyCode::Backspace if alt || ctrl => {
            delete_range(text, unicode::word_boundary_left(text, cursor), cursor)
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            let mut out = String::with_capacity(text.len() + c.len_utf8());
            out.push_str(&text[..cursor]);
            out.push(c);
            out.push_str(&text[cursor..]);
            TextEdit {
                text: out,
                cursor: cursor + c.len_utf8(),
            }
        }
        KeyCode::Backspace => match unicode::prev_grapheme_boundary(text, cursor) {
            Some(start) => delete_range(text, start, cursor),
            None => keep(cursor),
        },
        KeyCode::Delete => match unicode::next_grapheme_boundary(text, cursor) {
            Some(end) => delete_range(text, cursor, end),
            None => keep(cursor),
        },
        KeyCode::Left if alt || ctrl => keep(unicode::word_boundary_left(text, cursor)),
        KeyCode::Right if alt || ctrl => keep(unicode::word_boundary_right(text, cursor)),
        KeyCode::Left => keep(unicode::prev_grapheme_boundary(text, cursor).unwrap_or(0)),
        KeyCode::Right => keep(unicode::next_grapheme_boundary(text, cursor).unwrap_or(text.len())),
        KeyCode::Home => keep(0),
        KeyCode::End => keep(text.len()),
        _ => return None,
    };
    Some(edit)
}

fn delete_range(text: &str, start: usize, end: usize) -> TextEdit {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[end..]);
    TextEdit {
        text: out,
        cursor: start,
    }
}
