//! First-match-wins tokenizer.
//!
//! Among all patterns in the table, the match starting earliest in the
//! remaining input wins; on a tie in start position, the first pattern in
//! table order wins. Pattern ordering is therefore part of the contract —
//! the comment pattern must precede the word and punctuation patterns, or
//! `// …` decomposes into punctuation.

use std::sync::OnceLock;

use regex::Regex;

use crate::token::{Token, TokenKind};

/// Ordered `(kind, pattern)` table driving [`tokenize`].
///
/// If a pattern contains a capture group, group 1 is the token and bounds
/// consumption; this expresses trailing-boundary checks (the byte literal
/// must not be followed by another hex digit) without lookahead.
pub struct PatternTable {
    entries: Vec<(TokenKind, Regex)>,
}

impl PatternTable {
    pub fn new(entries: Vec<(TokenKind, Regex)>) -> Self {
        Self { entries }
    }

    /// The standard lume pattern table.
    pub fn standard() -> &'static PatternTable {
        static TABLE: OnceLock<PatternTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let entries = [
                (TokenKind::Comment, r"//[^\n]*"),
                (TokenKind::Color, r"#[0-9a-fA-F]{6}"),
                (TokenKind::Str, r#""[\w ]*""#),
                (TokenKind::Char, r"'(?s:.)'"),
                (TokenKind::Byte, r"(0[xX][0-9a-fA-F]{2})(?:[^0-9a-fA-F]|$)"),
                (TokenKind::Word, r"[a-zA-Z_][a-zA-Z_0-9]*"),
                (TokenKind::Percentage, r"[0-9.]+%"),
                (TokenKind::Float, r"[+-]?[0-9]*\.[0-9]+"),
                (TokenKind::Number, r"[+-]?[0-9]+"),
                (TokenKind::Whitespace, r"\s+"),
                (TokenKind::Punctuation, r"[^\w\s]"),
            ];
            PatternTable::new(
                entries
                    .into_iter()
                    .map(|(kind, pattern)| {
                        // Patterns are compile-time constants; a failure here
                        // is a typo in the table, not a runtime condition.
                        (kind, Regex::new(pattern).expect("static pattern"))
                    })
                    .collect(),
            )
        })
    }

    /// Earliest token span in `rest`, ties broken by table order.
    /// Zero-length matches are rejected outright.
    fn earliest(&self, rest: &str) -> Option<(usize, usize, TokenKind)> {
        let mut best: Option<(usize, usize, TokenKind)> = None;
        for (kind, re) in &self.entries {
            let Some(caps) = re.captures(rest) else {
                continue;
            };
            let m = match caps.get(1) {
                Some(group) => group,
                None => caps.get(0).expect("group 0 always participates"),
            };
            if m.start() == m.end() {
                // An empty match would consume nothing and stall the loop.
                continue;
            }
            if best.is_none_or(|(start, _, _)| m.start() < start) {
                best = Some((m.start(), m.end(), *kind));
            }
        }
        best
    }
}

/// Tokenize a script against a pattern table.
///
/// Pure and restartable only by re-invocation. Input before the earliest
/// match becomes a single [`TokenKind::Unknown`] token; every iteration
/// consumes at least one byte, so the loop terminates.
pub fn tokenize(script: &str, table: &PatternTable) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = script;

    while !rest.is_empty() {
        match table.earliest(rest) {
            Some((start, end, kind)) => {
                if start > 0 {
                    tokens.push(Token::new(TokenKind::Unknown, &rest[..start]));
                }
                tokens.push(Token::new(kind, &rest[start..end]));
                rest = &rest[end..];
            }
            None => {
                tokens.push(Token::new(TokenKind::Unknown, rest));
                break;
            }
        }
    }

    tokens
}
