//! Content glob patterns.
//!
//! A content entry is a path glob with two extensions over plain
//! [`glob::Pattern`] syntax: a leading `!` negates the pattern, and
//! `{a,b,c}` groups expand into alternatives (nesting allowed). Each
//! expanded alternative is split into a literal directory prefix, which
//! decides where traversal starts, and a glob remainder matched against
//! paths below that prefix.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use thiserror::Error;

/// Upper bound on the number of alternatives a single entry may expand to.
pub const MAX_ALTERNATIVES: usize = 256;

/// Deepest brace nesting accepted in a single entry.
pub const MAX_BRACE_DEPTH: usize = 32;

/// Match options shared by every content pattern: `*` stays within a path
/// component and dotfiles need an explicit leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Why a content entry is not a usable glob.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    /// The entry (or its body after `!` / `./`) is empty.
    #[error("pattern is empty")]
    Empty,
    /// A `{` has no matching `}` or vice versa.
    #[error("unbalanced braces in pattern '{pattern}'")]
    UnbalancedBrace {
        /// The offending pattern.
        pattern: String,
    },
    /// Brace expansion produced more than [`MAX_ALTERNATIVES`] alternatives.
    #[error("pattern '{pattern}' expands to more than {MAX_ALTERNATIVES} alternatives")]
    TooManyAlternatives {
        /// The offending pattern.
        pattern: String,
    },
    /// Brace groups nest deeper than [`MAX_BRACE_DEPTH`].
    #[error("pattern '{pattern}' nests braces deeper than {MAX_BRACE_DEPTH} levels")]
    TooDeep {
        /// The offending pattern.
        pattern: String,
    },
    /// An expanded alternative is not valid glob syntax.
    #[error("invalid glob '{alternative}': {message}")]
    InvalidGlob {
        /// The expanded alternative that failed to compile.
        alternative: String,
        /// Description from the glob compiler.
        message: String,
    },
}

/// One brace-expanded alternative of a [`ContentPattern`].
#[derive(Debug, Clone)]
struct Alternative {
    /// Expanded text with any leading `./` removed.
    text: String,
    /// Leading components that contain no glob metacharacters.
    literal: Vec<String>,
    /// Glob for the rest of the path; `None` when the whole path is literal.
    remainder: Option<Pattern>,
}

/// A parsed, validated content entry.
#[derive(Debug, Clone)]
pub struct ContentPattern {
    raw: String,
    negated: bool,
    alternatives: Vec<Alternative>,
}

impl ContentPattern {
    /// Parse and validate a raw content entry.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the entry is empty, its braces do not
    /// balance, it expands to too many alternatives, or any alternative is
    /// not valid glob syntax.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        if body.is_empty() {
            return Err(PatternError::Empty);
        }

        let expanded = expand_braces(body)?;
        if expanded.len() > MAX_ALTERNATIVES {
            return Err(PatternError::TooManyAlternatives {
                pattern: raw.to_owned(),
            });
        }

        let alternatives = expanded
            .into_iter()
            .map(|alt| compile_alternative(&alt))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_owned(),
            negated,
            alternatives,
        })
    }

    /// The entry as written in the config.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the entry starts with `!`.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Brace-expanded alternatives, without the `!` and leading `./`.
    #[must_use]
    pub fn alternatives(&self) -> Vec<&str> {
        self.alternatives.iter().map(|a| a.text.as_str()).collect()
    }

    /// Whether any alternative names `dir` as a whole path component.
    #[must_use]
    pub fn mentions_dir(&self, dir: &str) -> bool {
        self.alternatives
            .iter()
            .any(|a| a.text.split('/').any(|component| component == dir))
    }

    /// Anchor every alternative at `base`, producing the directory to walk
    /// and the matcher for paths below it.
    #[must_use]
    pub fn anchor(&self, base: &Path) -> Vec<AnchoredGlob> {
        self.alternatives
            .iter()
            .map(|alt| {
                let mut root = if alt.text.starts_with('/') {
                    PathBuf::from("/")
                } else {
                    base.to_path_buf()
                };
                for component in &alt.literal {
                    match component.as_str() {
                        "" | "." => {}
                        ".." => {
                            root.pop();
                        }
                        name => root.push(name),
                    }
                }
                AnchoredGlob {
                    root,
                    matcher: alt.remainder.clone(),
                }
            })
            .collect()
    }
}

/// An alternative of a [`ContentPattern`] resolved against a base directory.
#[derive(Debug, Clone)]
pub struct AnchoredGlob {
    /// Directory (or, for fully literal patterns, file) where matching starts.
    pub root: PathBuf,
    matcher: Option<Pattern>,
}

impl AnchoredGlob {
    /// Whether `path` (absolute, under the same base) is selected.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let Some(matcher) = &self.matcher else {
            return path == self.root;
        };
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => parts.push(name.to_string_lossy()),
                _ => return false,
            }
        }
        matcher.matches_with(&parts.join("/"), MATCH_OPTIONS)
    }
}

fn compile_alternative(expanded: &str) -> Result<Alternative, PatternError> {
    let mut text = expanded;
    while let Some(rest) = text.strip_prefix("./") {
        text = rest;
    }
    if text.is_empty() || text == "." {
        return Err(PatternError::Empty);
    }

    Pattern::new(text).map_err(|e| PatternError::InvalidGlob {
        alternative: text.to_owned(),
        message: e.msg.to_owned(),
    })?;

    let components: Vec<&str> = text.split('/').collect();
    let split = components
        .iter()
        .position(|c| has_glob_meta(c))
        .unwrap_or(components.len());
    let literal = components[..split].iter().map(|c| (*c).to_owned()).collect();
    let remainder = if split == components.len() {
        None
    } else {
        let rest = components[split..].join("/");
        Some(Pattern::new(&rest).map_err(|e| PatternError::InvalidGlob {
            alternative: text.to_owned(),
            message: e.msg.to_owned(),
        })?)
    };

    Ok(Alternative {
        text: text.to_owned(),
        literal,
        remainder,
    })
}

fn has_glob_meta(component: &str) -> bool {
    component.contains(['*', '?', '['])
}

/// Expand `{a,b}` groups into every combination of alternatives.
///
/// A group without a top-level comma is kept literally, braces included,
/// after expanding anything nested inside it.
///
/// # Errors
///
/// Returns [`PatternError::UnbalancedBrace`] if braces do not pair up,
/// [`PatternError::TooDeep`] if groups nest deeper than
/// [`MAX_BRACE_DEPTH`], and [`PatternError::TooManyAlternatives`] if the
/// expansion exceeds [`MAX_ALTERNATIVES`].
pub fn expand_braces(input: &str) -> Result<Vec<String>, PatternError> {
    let mut depth = 0usize;
    for ch in input.chars() {
        match ch {
            '{' => {
                depth += 1;
                if depth > MAX_BRACE_DEPTH {
                    return Err(PatternError::TooDeep {
                        pattern: input.to_owned(),
                    });
                }
            }
            '}' => {
                depth = depth.checked_sub(1).ok_or_else(|| PatternError::UnbalancedBrace {
                    pattern: input.to_owned(),
                })?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PatternError::UnbalancedBrace {
            pattern: input.to_owned(),
        });
    }
    expand_balanced(input).ok_or_else(|| PatternError::TooManyAlternatives {
        pattern: input.to_owned(),
    })
}

/// Expand an input whose braces are known to balance; `None` when the
/// result would exceed [`MAX_ALTERNATIVES`].
fn expand_balanced(input: &str) -> Option<Vec<String>> {
    let mut out = vec![String::new()];
    let mut rest = input;
    while let Some(open) = rest.find('{') {
        let (close, commas) = group_bounds(rest, open);
        let heads = if commas.is_empty() {
            expand_balanced(&rest[open + 1..close])?
                .into_iter()
                .map(|inner| format!("{{{inner}}}"))
                .collect()
        } else {
            let mut heads = Vec::new();
            let mut start = open + 1;
            for end in commas.into_iter().chain(std::iter::once(close)) {
                heads.extend(expand_balanced(&rest[start..end])?);
                start = end + 1;
            }
            heads
        };

        let prefix = &rest[..open];
        rest = &rest[close + 1..];
        if let [head] = heads.as_slice() {
            for done in &mut out {
                done.push_str(prefix);
                done.push_str(head);
            }
            continue;
        }
        let mut next = Vec::with_capacity(out.len() * heads.len());
        for done in &out {
            for head in &heads {
                next.push(format!("{done}{prefix}{head}"));
            }
            if next.len() > MAX_ALTERNATIVES {
                return None;
            }
        }
        out = next;
    }
    for done in &mut out {
        done.push_str(rest);
    }
    Some(out)
}

/// Closing brace and top-level commas of the group opening at `open`.
fn group_bounds(input: &str, open: usize) -> (usize, Vec<usize>) {
    let mut depth = 0usize;
    let mut commas = Vec::new();
    for (offset, ch) in input[open..].char_indices() {
        let idx = open + offset;
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (idx, commas);
                }
            }
            ',' if depth == 1 => commas.push(idx),
            _ => {}
        }
    }
    (input.len() - 1, commas)
}
