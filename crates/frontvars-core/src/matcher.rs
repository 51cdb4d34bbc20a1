//! Token matching.
//!
//! Tokens are located with a user-editable, single-capture-group pattern.
//! Group 1 is the variable name. Scanning is lazy, always one line at a
//! time, and never yields a zero-width match.

use crate::{FrontvarsError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

/// A token found in a span of text.
///
/// `end - start == full_text.len()` and `start < end` always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// Variable name (capture group 1).
    pub name: String,

    /// Start offset of the whole token.
    pub start: usize,

    /// End offset of the whole token (exclusive).
    pub end: usize,

    /// The whole matched token, e.g. `{name}`.
    pub full_text: String,
}

impl TokenMatch {
    /// Byte range of the whole token.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Move the match by `offset`, e.g. from line-relative to document offsets.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.start += offset;
        self.end += offset;
        self
    }
}

/// A compiled token pattern.
///
/// # Example
///
/// ```
/// use frontvars_core::TokenPattern;
///
/// let pattern = TokenPattern::new("{([^}]+)}").unwrap();
/// let names: Vec<_> = pattern.matches("Hi {name}, {age}").map(|m| m.name).collect();
/// assert_eq!(names, ["name", "age"]);
/// ```
#[derive(Debug, Clone)]
pub struct TokenPattern {
    source: String,
    regex: Regex,
}

impl TokenPattern {
    /// Compile a pattern. Literal braces outside a counted repetition are
    /// accepted unescaped, so `{([^}]+)}` means "a brace-delimited name".
    pub fn new(pattern: &str) -> Result<Self> {
        let normalized = normalize_braces(pattern);
        let regex = Regex::new(&normalized)
            .map_err(|e| FrontvarsError::PatternMalformed(format!("{}: {}", pattern, e)))?;

        if regex.captures_len() < 2 {
            return Err(FrontvarsError::PatternMalformed(format!(
                "{}: pattern has no capture group for the variable name",
                pattern
            )));
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Lazily scan a single span of text.
    pub fn matches<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            regex: Cow::Borrowed(&self.regex),
            text,
            pos: 0,
        }
    }

    /// Lazily scan `text` one line at a time, yielding offsets relative to
    /// the start of `text`. Tokens never span a line break.
    pub fn matches_by_line<'a>(&'a self, text: &'a str) -> impl Iterator<Item = TokenMatch> + 'a {
        line_spans(text)
            .flat_map(move |(offset, line)| self.matches(line).map(move |m| m.shifted(offset)))
    }
}

/// Compile `pattern` and scan `text` with it.
pub fn scan<'t>(text: &'t str, pattern: &str) -> Result<Matches<'static, 't>> {
    let TokenPattern { regex, .. } = TokenPattern::new(pattern)?;
    Ok(Matches {
        regex: Cow::Owned(regex),
        text,
        pos: 0,
    })
}

/// Lazy iterator over the tokens of one span.
///
/// Borrows the compiled pattern, so scanning many lines shares one regex
/// and its search cache.
#[derive(Debug, Clone)]
pub struct Matches<'r, 't> {
    regex: Cow<'r, Regex>,
    text: &'t str,
    pos: usize,
}

impl Iterator for Matches<'_, '_> {
    type Item = TokenMatch;

    fn next(&mut self) -> Option<TokenMatch> {
        while self.pos <= self.text.len() {
            let caps = self.regex.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;

            if whole.start() == whole.end() {
                // Zero-width: step one character past it, never re-yield here.
                self.pos = next_char_boundary(self.text, whole.end());
                continue;
            }
            self.pos = whole.end();

            // An optional group that did not participate names nothing.
            let Some(name) = caps.get(1) else {
                continue;
            };

            return Some(TokenMatch {
                name: name.as_str().to_string(),
                start: whole.start(),
                end: whole.end(),
                full_text: whole.as_str().to_string(),
            });
        }
        None
    }
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    match text[pos..].chars().next() {
        Some(c) => pos + c.len_utf8(),
        None => text.len() + 1,
    }
}

/// Split text into `(offset, line)` pairs. Line terminators (`\n`, `\r\n`)
/// are not part of the line.
pub fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |raw| {
        let start = offset;
        offset += raw.len() + 1;
        (start, raw.strip_suffix('\r').unwrap_or(raw))
    })
}

/// Escape braces that do not form a counted repetition.
fn normalize_braces(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut class_depth = 0usize;
    let mut repeatable = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            let len = escape_len(&chars[i..]);
            out.extend(&chars[i..i + len]);
            repeatable = true;
            i += len;
            continue;
        }

        if class_depth > 0 {
            match c {
                '[' => class_depth += 1,
                ']' => {
                    class_depth -= 1;
                    if class_depth == 0 {
                        repeatable = true;
                    }
                }
                _ => {}
            }
            out.push(c);
            i += 1;
            continue;
        }

        match c {
            '[' => {
                class_depth = 1;
                out.push(c);
                // A `]` right after `[` or `[^` is a literal member.
                if chars.get(i + 1) == Some(&'^') {
                    out.push('^');
                    i += 1;
                }
                if chars.get(i + 1) == Some(&']') {
                    out.push(']');
                    i += 1;
                }
            }
            '{' => match counted_repetition_len(&chars[i..]) {
                Some(len) if repeatable => {
                    out.extend(&chars[i..i + len]);
                    i += len;
                    repeatable = false;
                    continue;
                }
                _ => {
                    out.push_str("\\{");
                    repeatable = true;
                }
            },
            '}' => {
                out.push_str("\\}");
                repeatable = true;
            }
            '(' | '|' | '*' | '+' | '?' | '^' | '$' => {
                out.push(c);
                repeatable = false;
            }
            _ => {
                out.push(c);
                repeatable = true;
            }
        }
        i += 1;
    }

    out
}

/// Length of the escape at the start of `chars`. Braced escapes such as
/// `\p{L}`, `\P{Greek}`, `\x{41}` and `\u{263A}` run through their `}`.
fn escape_len(chars: &[char]) -> usize {
    match (chars.get(1), chars.get(2)) {
        (Some('p' | 'P' | 'x' | 'u' | 'U'), Some('{')) => chars
            .iter()
            .position(|&c| c == '}')
            .map_or(chars.len(), |close| close + 1),
        (Some(_), _) => 2,
        (None, _) => 1,
    }
}

/// Length of `{n}`, `{n,}` or `{n,m}` at the start of `chars`.
fn counted_repetition_len(chars: &[char]) -> Option<usize> {
    let mut i = 1;
    let digits_start = i;
    while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if chars.get(i) == Some(&',') {
        i += 1;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
    }
    (chars.get(i) == Some(&'}')).then_some(i + 1)
}
