//! Lexical helpers for documents that are still being typed.
//!
//! Completion runs on text that is usually syntactically incomplete (`{ ` with
//! the cursor inside). The parser recovers, but an unterminated selection set
//! has no closing token, so its range stops short of the cursor. Appending the
//! missing closers at the end of the text fixes that without moving any
//! offset before the cursor.

use apollo_parser::{Lexer, TokenKind};
use graphql_types::OffsetRange;
use std::borrow::Cow;

/// A lexed token with its byte range.
#[derive(Debug, Clone)]
pub struct LexToken {
    pub kind: TokenKind,
    pub range: OffsetRange,
}

impl LexToken {
    /// Source text of the token.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.start..self.range.end]
    }

    /// Returns `true` for a name token with exactly this text.
    #[must_use]
    pub fn is_name(&self, source: &str, name: &str) -> bool {
        matches!(self.kind, TokenKind::Name) && self.text(source) == name
    }
}

const fn is_trivia(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Whitespace | TokenKind::Comment | TokenKind::Comma | TokenKind::Eof
    )
}

/// Lex `text`, skipping whitespace, commas, comments and lexer errors.
#[must_use]
pub fn significant_tokens(text: &str) -> Vec<LexToken> {
    Lexer::new(text)
        .filter_map(Result::ok)
        .filter(|token| !is_trivia(token.kind()))
        .map(|token| LexToken {
            kind: token.kind(),
            range: OffsetRange::new(token.index(), token.index() + token.data().len()),
        })
        .collect()
}

/// Append closers for every `{`, `(` and `[` left open in `text`.
///
/// Returns the input unchanged when it is balanced. Brackets inside strings
/// and comments are ignored; mismatched closers are skipped.
#[must_use]
pub fn close_unbalanced(text: &str) -> Cow<'_, str> {
    let mut open = Vec::new();

    for token in Lexer::new(text).filter_map(Result::ok) {
        match token.kind() {
            TokenKind::LCurly => open.push('}'),
            TokenKind::LParen => open.push(')'),
            TokenKind::LBracket => open.push(']'),
            TokenKind::RCurly | TokenKind::RParen | TokenKind::RBracket => {
                let closer = token.data().chars().next();
                if open.last().copied() == closer {
                    open.pop();
                }
            }
            _ => {}
        }
    }

    if open.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut repaired = String::with_capacity(text.len() + open.len() + 1);
    repaired.push_str(text);
    repaired.push('\n');
    repaired.extend(open.iter().rev());
    Cow::Owned(repaired)
}

/// Returns `true` if the text contains at least one `#` comment.
#[must_use]
pub fn has_comments(text: &str) -> bool {
    Lexer::new(text)
        .filter_map(Result::ok)
        .any(|token| matches!(token.kind(), TokenKind::Comment))
}

/// Byte range of the partial name ending at `offset`, or a zero-width range
/// at `offset` when the cursor is not right after a name.
#[must_use]
pub fn word_before(text: &str, offset: usize) -> OffsetRange {
    let offset = offset.min(text.len());
    let bytes = text.as_bytes();
    let mut start = offset;
    while start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'_') {
        start -= 1;
    }
    OffsetRange::new(start, offset)
}

/// Significant tokens that end at or before `offset`, excluding the partial
/// name the cursor sits on.
#[must_use]
pub fn tokens_before(text: &str, offset: usize) -> Vec<LexToken> {
    let word = word_before(text, offset);
    significant_tokens(&text[..word.start])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_unbalanced_appends_closers() {
        assert_eq!(close_unbalanced("{ "), "{ \n}");
        assert_eq!(close_unbalanced("{ user(id: [1"), "{ user(id: [1\n])}");
    }

    #[test]
    fn test_close_unbalanced_balanced_input_is_borrowed() {
        let text = "query { user { id } }";
        assert!(matches!(close_unbalanced(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_close_unbalanced_ignores_strings_and_comments() {
        let text = "{ field(arg: \"{\") # {\n";
        assert_eq!(close_unbalanced(text), format!("{text}\n}}"));
    }

    #[test]
    fn test_has_comments() {
        assert!(has_comments("# leading\n{ x }"));
        assert!(!has_comments("{ x(arg: \"# not a comment\") }"));
    }

    #[test]
    fn test_word_before() {
        let text = "{ use";
        assert_eq!(word_before(text, 5), OffsetRange::new(2, 5));
        assert_eq!(word_before(text, 2), OffsetRange::at(2));
        assert_eq!(word_before("", 0), OffsetRange::at(0));
    }

    #[test]
    fn test_tokens_before_skips_partial_word() {
        let text = "{ user @sk";
        let tokens = tokens_before(text, text.len());
        let last = tokens.last().unwrap();
        assert!(matches!(last.kind, TokenKind::At));

        let text = "fragment F on Us";
        let tokens = tokens_before(text, text.len());
        assert!(tokens.last().unwrap().is_name(text, "on"));
    }
}
