//! Parser for compiled directive strings
//!
//! The inverse of [`compile`](super::compile): splits a directive string back
//! into steps, codes and unescaped values, descending into overlay layers.

use super::directive::COMPOUND_CODES;
use super::escape::unescape_value;
use crate::constants::{CHAIN_DELIMITER, KEY_VALUE_DELIMITER, MAX_LAYER_DEPTH, OPTION_DELIMITER};
use crate::error::{ImageKitError, Result};

/// One parsed option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOption {
    Directive { code: String, value: Option<String> },
    Layer(ParsedLayer),
}

impl ParsedOption {
    pub fn directive(code: &str, value: Option<&str>) -> Self {
        Self::Directive {
            code: code.to_string(),
            value: value.map(str::to_string),
        }
    }
}

/// A parsed `l-<kind>,...,l-end` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLayer {
    pub kind: String,
    pub input: Option<String>,
    pub steps: Vec<ParsedStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStep {
    pub options: Vec<ParsedOption>,
}

struct Token<'a> {
    text: &'a str,
    /// Delimiter that followed this token, `None` at end of input
    delimiter: Option<char>,
}

/// Parse a compiled directive string
pub fn parse(compiled: &str) -> Result<Vec<ParsedStep>> {
    if compiled.is_empty() {
        return Ok(Vec::new());
    }

    let tokens = tokenize(compiled);
    let mut pos = 0;
    let steps = parse_steps(&tokens, &mut pos, 0)?;

    if pos != tokens.len() {
        return Err(ImageKitError::encoding(format!(
            "unexpected '{}' in '{}'",
            tokens[pos].text, compiled
        )));
    }
    Ok(steps)
}

fn tokenize(compiled: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, c) in compiled.char_indices() {
        if c == CHAIN_DELIMITER || c == OPTION_DELIMITER {
            tokens.push(Token {
                text: &compiled[start..i],
                delimiter: Some(c),
            });
            start = i + c.len_utf8();
        }
    }
    tokens.push(Token {
        text: &compiled[start..],
        delimiter: None,
    });
    tokens
}

fn parse_steps(tokens: &[Token<'_>], pos: &mut usize, depth: usize) -> Result<Vec<ParsedStep>> {
    let mut steps = Vec::new();
    let mut current = ParsedStep::default();

    while let Some(token) = tokens.get(*pos) {
        if token.text == "l-end" {
            if depth == 0 {
                return Err(ImageKitError::encoding("'l-end' without an open layer"));
            }
            break;
        }

        match token.text.strip_prefix("l-") {
            Some(kind) => {
                *pos += 1;
                let layer = parse_layer(kind, tokens, pos, depth + 1)?;
                current.options.push(ParsedOption::Layer(layer));
            }
            None => {
                current.options.push(parse_directive(token.text)?);
                *pos += 1;
            }
        }

        if tokens[*pos - 1].delimiter == Some(CHAIN_DELIMITER) {
            steps.push(std::mem::take(&mut current));
        }
    }

    if !current.options.is_empty() {
        steps.push(current);
    }
    Ok(steps)
}

fn parse_layer(
    kind: &str,
    tokens: &[Token<'_>],
    pos: &mut usize,
    depth: usize,
) -> Result<ParsedLayer> {
    if depth > MAX_LAYER_DEPTH {
        return Err(ImageKitError::encoding(format!(
            "layers nested deeper than {}",
            MAX_LAYER_DEPTH
        )));
    }

    let mut input = None;
    if let Some(raw) = tokens.get(*pos).and_then(|t| t.text.strip_prefix("i-")) {
        input = Some(unescape_value(raw)?);
        *pos += 1;
    }

    let steps = parse_steps(tokens, pos, depth)?;

    match tokens.get(*pos) {
        Some(token) if token.text == "l-end" => *pos += 1,
        _ => {
            return Err(ImageKitError::encoding(format!(
                "layer 'l-{}' is not terminated by 'l-end'",
                kind
            )))
        }
    }

    Ok(ParsedLayer {
        kind: kind.to_string(),
        input,
        steps,
    })
}

fn parse_directive(text: &str) -> Result<ParsedOption> {
    if text.is_empty() {
        return Err(ImageKitError::encoding("empty directive"));
    }

    for code in COMPOUND_CODES {
        if let Some(rest) = text.strip_prefix(code) {
            if rest.is_empty() {
                return Ok(ParsedOption::directive(code, None));
            }
            if let Some(value) = rest.strip_prefix(KEY_VALUE_DELIMITER) {
                return Ok(ParsedOption::Directive {
                    code: code.to_string(),
                    value: Some(unescape_value(value)?),
                });
            }
        }
    }

    Ok(match text.split_once(KEY_VALUE_DELIMITER) {
        Some((code, value)) => ParsedOption::Directive {
            code: code.to_string(),
            value: Some(unescape_value(value)?),
        },
        None => ParsedOption::directive(text, None),
    })
}
