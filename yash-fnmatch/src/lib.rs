// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2022 WATANABE Yuki

//! This crate provides the `fnmatch` function that performs pattern matching
//! based on a globbing pattern.
//!
//! This implementation supports the following syntax in patterns:
//!
//! - Any single character (`?`)
//! - Any character sequence (`*`)
//! - Bracket expression (`[...]`)
//!     - Character literals
//!     - Character ranges (e.g. `a-z`)
//!     - Complement (`[!...]`)
//!     - Collating symbols (e.g. `[.ch.]`)
//!     - Equivalence classes (e.g. `[=a=]`)
//!     - Character classes (`[:alpha:]`)
//!
//! The current implementation does not support any locale-specific
//! characteristics. Especially, collating symbols and equivalent classes only
//! match the specified character sequence itself, and character classes only
//! match ASCII characters.
//!
//! This crate is very similar to the [`fnmatch-regex`] crate in that the both
//! perform matching by converting the pattern to a regular expression. The
//! `yash-fnmatch` crate tries to support the POSIX specification as much as
//! possible rather than introducing unique (non-portable) functionalities.
//!
//! A pattern is first adapted to an iterator of [`PatternChar`]s with
//! [`with_escape`] or [`without_escape`], parsed into an [`ast::Ast`], and
//! then compiled into a [`Pattern`] that can be matched against subject
//! strings.
//!
//! [`fnmatch-regex`]: https://crates.io/crates/fnmatch-regex

pub mod ast;
mod char_iter;

pub use char_iter::{PatternChar, WithEscape, WithoutEscape, with_escape, without_escape};

use ast::Ast;
use std::ops::Range;

/// Error that may occur while parsing or compiling a pattern
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// A character class (e.g. `[:foo:]`) is not defined.
    #[error("undefined character class: {0:?}")]
    UndefinedCharClass(String),
    /// A collating symbol (e.g. `[.x.]`) is empty.
    #[error("empty collating symbol")]
    EmptyCollatingSymbol,
    /// A character class is used as the bound of a range (e.g. `[a-[:digit:]]`).
    #[error("character class cannot be used in a range: {0:?}")]
    CharClassInRange(String),
    /// A bracket expression (`[...]`) is empty.
    #[error("empty bracket expression")]
    EmptyBracket,
}

/// Configuration for parsing and matching a pattern
///
/// This struct is passed to [`Pattern::parse_with_config`] to customize how a
/// pattern is interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct Config {
    /// Whether the pattern must match from the beginning of the subject
    pub anchor_begin: bool,
    /// Whether the pattern must match to the end of the subject
    pub anchor_end: bool,
    /// Whether a leading period in the subject can only be matched by a
    /// literal period in the pattern
    pub literal_period: bool,
    /// Whether [`Pattern::find`] should prefer the shortest match
    pub shortest_match: bool,
}

/// Compiled glob pattern
///
/// A `Pattern` is created from a sequence of [`PatternChar`]s by
/// [`Pattern::parse`] or [`Pattern::parse_with_config`]. It matches subject
/// strings according to the configuration that was in effect when it was
/// compiled.
#[derive(Clone, Debug)]
pub struct Pattern {
    ast: Ast,
    regex: regex::Regex,
    reject_leading_dot: bool,
}

impl Pattern {
    /// Parses a pattern with the default configuration.
    pub fn parse<I>(pattern: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        Self::parse_with_config(pattern, Config::default())
    }

    /// Parses a pattern with the given configuration.
    pub fn parse_with_config<I>(pattern: I, config: Config) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        let ast = Ast::new(pattern)?;
        let pattern_str = ast.to_regex(&config)?;
        let regex = regex::RegexBuilder::new(&pattern_str)
            .swap_greed(config.shortest_match)
            .build()
            .expect("Ast::to_regex should produce a valid regular expression");
        let reject_leading_dot = config.literal_period && !starts_with_literal_dot(&ast);
        Ok(Pattern {
            ast,
            regex,
            reject_leading_dot,
        })
    }

    /// Tests whether the pattern matches the whole or part of the subject.
    #[must_use]
    pub fn is_match(&self, s: &str) -> bool {
        if self.reject_leading_dot && s.starts_with('.') {
            return false;
        }
        self.regex.is_match(s)
    }

    /// Finds the leftmost match of the pattern in the subject.
    #[must_use]
    pub fn find(&self, s: &str) -> Option<Range<usize>> {
        if self.reject_leading_dot && s.starts_with('.') {
            return None;
        }
        self.regex.find(s).map(|m| m.range())
    }

    /// Converts this pattern into a literal string if it contains no
    /// wildcard or bracket expression.
    ///
    /// Returns `Err(self)` if the pattern is not a literal string.
    pub fn into_literal(self) -> Result<String, Self> {
        if self
            .ast
            .atoms
            .iter()
            .all(|atom| matches!(atom, ast::Atom::Char(_)))
        {
            Ok(self
                .ast
                .atoms
                .iter()
                .map(|atom| match atom {
                    ast::Atom::Char(c) => *c,
                    _ => unreachable!(),
                })
                .collect())
        } else {
            Err(self)
        }
    }
}

fn starts_with_literal_dot(ast: &Ast) -> bool {
    matches!(ast.atoms.first(), Some(ast::Atom::Char('.')))
}

/// Tests whether `pattern` matches `s`.
///
/// This is a convenience function that parses `pattern` (interpreting
/// backslashes as escape characters, see [`with_escape`]) with a
/// fully-anchored [`Config`] and tests whether it matches the whole of `s`.
/// Returns `false` if the pattern fails to parse.
#[must_use]
pub fn fnmatch(pattern: &str, s: &str) -> bool {
    let config = Config {
        anchor_begin: true,
        anchor_end: true,
        ..Config::default()
    };
    match Pattern::parse_with_config(with_escape(pattern), config) {
        Ok(pattern) => pattern.is_match(s),
        Err(_) => false,
    }
}
