//! SQL syntax highlighting
//!
//! Line-by-line tokenizer for the query editor, tuned for MySQL lexical
//! rules: `'..'`/`".."` strings with backslash or doubled-quote escapes,
//! backtick-quoted identifiers, and `--`, `#` and `/* */` comments.
//! Keywords are loaded from `data/sql_keywords.txt` (embedded at compile time).

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

/// Token classification for syntax highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    String,
    /// Backtick-quoted identifier
    QuotedIdent,
    Number,
    Comment,
    Normal,
}

static SQL_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("../../data/sql_keywords.txt")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
});

/// Whether `word` is a SQL keyword (case-insensitive)
pub fn is_keyword(word: &str) -> bool {
    SQL_KEYWORDS.contains(word.to_ascii_uppercase().as_str())
}

/// Scan a quoted run starting at `start` (which holds the quote byte).
/// Returns the index just past the closing quote, or `len` if unterminated.
fn scan_quoted(bytes: &[u8], start: usize, quote: u8, backslash_escapes: bool) -> usize {
    let len = bytes.len();
    let mut i = start + 1;
    while i < len {
        let b = bytes[i];
        if backslash_escapes && b == b'\\' {
            i += 2;
            continue;
        }
        if b == quote {
            if i + 1 < len && bytes[i + 1] == quote {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    len
}

/// Scan to the end of a block comment. Returns (end index, still_open).
fn scan_block_comment(bytes: &[u8], mut i: usize) -> (usize, bool) {
    let len = bytes.len();
    while i < len {
        if i + 1 < len && bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return (i + 2, false);
        }
        i += 1;
    }
    (len, true)
}

/// Tokenize a single line for syntax highlighting.
///
/// Returns `(tokens, ends_in_block_comment)`; the bool must be threaded
/// into the next line to handle multi-line `/* ... */` comments.
pub fn highlight_sql(line: &str, in_block_comment: bool) -> (Vec<(TokenKind, Range<usize>)>, bool) {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    if in_block_comment {
        let (end, open) = scan_block_comment(bytes, 0);
        if end > 0 {
            tokens.push((TokenKind::Comment, 0..end));
        }
        if open {
            return (tokens, true);
        }
        i = end;
    }

    while i < len {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        // Line comments: `-- ` and `#` run to end of line
        if (b == b'-' && next == Some(b'-')) || b == b'#' {
            tokens.push((TokenKind::Comment, i..len));
            return (tokens, false);
        }

        if b == b'/' && next == Some(b'*') {
            let (end, open) = scan_block_comment(bytes, i + 2);
            tokens.push((TokenKind::Comment, i..end));
            if open {
                return (tokens, true);
            }
            i = end;
            continue;
        }

        if b == b'\'' || b == b'"' {
            let end = scan_quoted(bytes, i, b, true);
            tokens.push((TokenKind::String, i..end));
            i = end;
            continue;
        }

        if b == b'`' {
            let end = scan_quoted(bytes, i, b'`', false);
            tokens.push((TokenKind::QuotedIdent, i..end));
            i = end;
            continue;
        }

        if b.is_ascii_digit() || (b == b'.' && next.is_some_and(|n| n.is_ascii_digit())) {
            let start = i;
            if b == b'.' {
                i += 1;
            }
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if b != b'.' && i < len && bytes[i] == b'.' {
                i += 1;
                while i < len && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            tokens.push((TokenKind::Number, start..i));
            continue;
        }

        if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$') {
                i += 1;
            }
            let kind = if is_keyword(&line[start..i]) {
                TokenKind::Keyword
            } else {
                TokenKind::Normal
            };
            tokens.push((kind, start..i));
            continue;
        }

        // Operators, whitespace, multi-byte chars: one char at a time
        let width = line[i..].chars().next().map_or(1, char::len_utf8);
        tokens.push((TokenKind::Normal, i..i + width));
        i += width;
    }

    (tokens, false)
}

/// Advance block-comment state through a line without keeping tokens.
///
/// Used to pre-scan lines above the visible viewport so the first visible
/// line knows whether it starts inside a block comment.
pub fn scan_block_comment_state(line: &str, in_block_comment: bool) -> bool {
    highlight_sql(line, in_block_comment).1
}
