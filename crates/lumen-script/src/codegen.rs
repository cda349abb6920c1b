//! Token stream → opcode/operand byte stream.
//!
//! Generation is deterministic and total: malformed input never aborts it.
//! Identifiers miss the opcode table silently (no bytes), malformed
//! literals are dropped, and everything dropped is surfaced through
//! [`CompiledScript::diagnostics`]. The output always opens with the
//! instruction-stream flag and closes with its terminator, even when no
//! token produced bytes in between.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::warn;

use lumen_wire::{ProtocolVersion, END_OF_LUME_BYTES, END_OF_STATEMENT, FLAG_LUME_BYTES};

use crate::diagnostics::Diagnostic;
use crate::lexer::{tokenize, PatternTable};
use crate::opcode::opcode;
use crate::token::{Token, TokenKind};

/// Width of the string operand field on the wire.
const STRING_FIELD: usize = 8;

/// A compiled instruction-stream payload plus everything that was dropped
/// on the way.
#[derive(Debug, Clone)]
pub struct CompiledScript {
    /// Self-delimited payload: flag byte first, terminator last.
    pub bytes: Bytes,
    /// Tokens the generator skipped, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledScript {
    /// True when every token contributed cleanly.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Tokenize against the standard pattern table and generate bytes for the
/// pinned table version.
pub fn compile(script: &str, version: ProtocolVersion) -> CompiledScript {
    generate(&tokenize(script, PatternTable::standard()), version)
}

/// Generate bytes from an already-tokenized script.
pub fn generate(tokens: &[Token], version: ProtocolVersion) -> CompiledScript {
    let mut buf = BytesMut::new();
    let mut diagnostics = Vec::new();

    buf.put_u8(FLAG_LUME_BYTES);

    for token in tokens {
        match token.kind {
            TokenKind::Word => put_word(&mut buf, &token.lexeme, version, &mut diagnostics),
            TokenKind::Number => match token.lexeme.parse::<i32>() {
                Ok(value) => buf.put_i32_le(value),
                Err(_) => drop_token(
                    &mut diagnostics,
                    Diagnostic::MalformedNumber {
                        lexeme: token.lexeme.clone(),
                    },
                ),
            },
            TokenKind::Percentage => {
                let numeric = token.lexeme.trim_end_matches('%');
                match numeric.parse::<f64>() {
                    Ok(percent) => buf.put_u8(fill_percentage(percent)),
                    Err(_) => drop_token(
                        &mut diagnostics,
                        Diagnostic::MalformedPercentage {
                            lexeme: token.lexeme.clone(),
                        },
                    ),
                }
            }
            TokenKind::Color => put_color(&mut buf, &token.lexeme, &mut diagnostics),
            TokenKind::Str => put_string(&mut buf, &token.lexeme),
            TokenKind::Char => {
                // Lexeme is quote, character, quote; emit the code point of
                // the middle one truncated to 8 bits.
                if let Some(c) = token.lexeme.chars().nth(1) {
                    buf.put_u8(c as u32 as u8);
                }
            }
            TokenKind::Byte => match u8::from_str_radix(&token.lexeme[2..], 16) {
                Ok(value) => buf.put_u8(value),
                Err(_) => drop_token(
                    &mut diagnostics,
                    Diagnostic::MalformedNumber {
                        lexeme: token.lexeme.clone(),
                    },
                ),
            },
            TokenKind::Punctuation => {
                if token.lexeme == "}" {
                    buf.put_u8(END_OF_STATEMENT);
                }
            }
            TokenKind::Unknown => drop_token(
                &mut diagnostics,
                Diagnostic::UnknownInput {
                    lexeme: token.lexeme.clone(),
                },
            ),
            // Floats have no operand encoding; comments and whitespace are
            // retained by the lexer but never reach the wire.
            TokenKind::Float | TokenKind::Comment | TokenKind::Whitespace => {}
        }
    }

    buf.put_u8(END_OF_LUME_BYTES);

    CompiledScript {
        bytes: buf.freeze(),
        diagnostics,
    }
}

/// `floor(percent / 100 · 255)`, truncated to the low byte.
pub fn fill_percentage(percent: f64) -> u8 {
    ((percent / 100.0) * 255.0).floor() as i64 as u8
}

fn put_word(buf: &mut BytesMut, word: &str, version: ProtocolVersion, diags: &mut Vec<Diagnostic>) {
    if let Some(value) = operand_constant(word) {
        buf.put_u8(value);
        return;
    }
    match opcode(word, version) {
        Some(code) => buf.put_u8(code),
        None => drop_token(
            diags,
            Diagnostic::UnknownWord {
                lexeme: word.to_string(),
            },
        ),
    }
}

/// Named operand constants, version-independent: booleans and the color
/// switch selectors. These are argument values, not commands, so they live
/// outside the opcode tables.
fn operand_constant(word: &str) -> Option<u8> {
    let value = match word {
        "true" => 1,
        "false" => 0,
        "MODIFIER_SWITCH_NONE" => 0,
        "MODIFIER_SWITCH_RG" | "MODIFIER_SWITCH_GR" => 1,
        "MODIFIER_SWITCH_GB" | "MODIFIER_SWITCH_BG" => 2,
        "MODIFIER_SWITCH_BR" | "MODIFIER_SWITCH_RB" => 3,
        _ => return None,
    };
    Some(value)
}

fn put_color(buf: &mut BytesMut, lexeme: &str, diags: &mut Vec<Diagnostic>) {
    let parsed = lexeme
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .and_then(|hex| {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        });
    match parsed {
        Some(rgb) => buf.put_slice(&rgb),
        None => drop_token(
            diags,
            Diagnostic::MalformedColor {
                lexeme: lexeme.to_string(),
            },
        ),
    }
}

/// Fixed 8-byte field: string bytes right-padded with zeros, truncated to
/// the first 8 when longer. Quotes are stripped from the lexeme.
fn put_string(buf: &mut BytesMut, lexeme: &str) {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    let mut field = [0u8; STRING_FIELD];
    for (dst, src) in field.iter_mut().zip(inner.bytes()) {
        *dst = src;
    }
    buf.put_slice(&field);
}

fn drop_token(diags: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!(%diagnostic, "token dropped during generation");
    diags.push(diagnostic);
}
