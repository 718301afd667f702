// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2020 WATANABE Yuki
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Shell script source code
//!
//! This module defines the types used to track where a piece of shell
//! script text came from: [`Source`] describes the origin of a chunk of
//! code, [`Code`] holds the code text together with its origin, and
//! [`Location`] identifies a range of characters within a [`Code`].
//! [`SourceChar`] pairs a single character with its [`Location`].

use crate::alias::Alias;
use std::cell::RefCell;
use std::fmt;
use std::num::NonZeroU64;
use std::ops::Range;
use std::rc::Rc;

pub mod pretty;

/// Origin of a piece of source code
///
/// A `Source` value is attached to a [`Code`] to describe where the code
/// came from. Most variants simply identify where the shell read the code
/// from; the others ([`Source::CommandSubst`], [`Source::Arith`], …) record
/// that the code was produced by expanding or substituting some other code,
/// keeping a [`Location`] that points back to the original code.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Source {
    /// Source code of unknown origin
    ///
    /// This is used for testing purposes only.
    Unknown,
    /// Standard input read in the interactive shell
    Stdin,
    /// Command string given to the shell with the `-c` option
    CommandString,
    /// Command file given to the shell
    CommandFile {
        /// Path of the command file
        path: String,
    },
    /// Value of a variable
    VariableValue {
        /// Name of the variable
        name: String,
    },
    /// Initialization file sourced when the shell starts up
    InitFile {
        /// Path of the file
        path: String,
    },
    /// Source code of other origin
    Other {
        /// Label describing the source
        label: std::borrow::Cow<'static, str>,
    },
    /// Code resulting from command substitution
    CommandSubst {
        /// Location of the original command substitution
        original: Location,
    },
    /// Code resulting from arithmetic expansion
    Arith {
        /// Location of the original arithmetic expansion
        original: Location,
    },
    /// Code produced to be evaluated by the `eval` built-in
    Eval {
        /// Location of the original `eval` operand
        original: Location,
    },
    /// Code of a file sourced by the `.` (dot) built-in
    DotScript {
        /// Name or path used to find the file
        name: String,
        /// Location of the operand that named the file
        origin: Location,
    },
    /// Code run as a signal or exit trap
    Trap {
        /// Condition under which the trap action runs
        condition: String,
        /// Location of the command that set the trap
        origin: Location,
    },
    /// Code resulting from alias substitution
    Alias {
        /// Location of the original word that was substituted
        original: Location,
        /// Alias that was substituted
        alias: Rc<Alias>,
    },
}

impl Source {
    /// Returns a short label describing this source, for use in messages.
    #[must_use]
    pub fn label(&self) -> std::borrow::Cow<'static, str> {
        use Source::*;
        match self {
            Unknown => "<unknown>".into(),
            Stdin => "<stdin>".into(),
            CommandString => "<command_string>".into(),
            CommandFile { path } => path.clone().into(),
            VariableValue { name } => name.clone().into(),
            InitFile { path } => path.clone().into(),
            Other { label } => label.clone(),
            CommandSubst { original }
            | Arith { original }
            | Eval { original } => original.code.source.label(),
            DotScript { origin, .. } | Trap { origin, .. } => origin.code.source.label(),
            Alias { original, .. } => original.code.source.label(),
        }
    }
}

/// Source code containing text and origin information
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Code {
    /// Text of the source code
    pub value: RefCell<String>,
    /// Line number of the first line of this code
    pub start_line_number: NonZeroU64,
    /// Origin of this code
    pub source: Rc<Source>,
}

/// Range of characters in a [`Code`] identifying a location in source code
#[derive(Clone, Debug)]
pub struct Location {
    /// Code containing the character(s) this location refers to
    pub code: Rc<Code>,
    /// Range of character indices in `code.value` that this location refers to
    pub range: Range<usize>,
}

/// Type alias used where a single point (rather than a range) in source code
/// is conceptually expected.
///
/// `Span` is currently identical to [`Location`].
pub type Span = Location;

impl Location {
    /// Creates a dummy location for testing purposes.
    ///
    /// The returned location has an unspecified range in a one-line code
    /// fragment whose source is [`Source::Unknown`].
    #[must_use]
    pub fn dummy<S: Into<String>>(value: S) -> Location {
        let value = value.into();
        let range = 0..value.chars().count();
        let code = Code {
            value: RefCell::new(value),
            start_line_number: NonZeroU64::new(1).unwrap(),
            source: Rc::new(Source::Unknown),
        };
        Location {
            code: Rc::new(code),
            range,
        }
    }

    /// Returns the byte range this location refers to.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Advances the location by `n` characters.
    pub fn advance(&mut self, n: usize) {
        self.range = self.range.start + n..self.range.end + n;
    }

    /// Returns the 1-based column number of the first character of this
    /// location within its line.
    #[must_use]
    pub fn column(&self) -> NonZeroU64 {
        let value = self.code.value.borrow();
        let start = self.range.start.min(value.chars().count());
        let last_newline = value.chars().take(start).enumerate().filter(|&(_, c)| c == '\n').last();
        let column = match last_newline {
            Some((i, _)) => start - i,
            None => start + 1,
        };
        NonZeroU64::new(column as u64).unwrap_or(NonZeroU64::new(1).unwrap())
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.code, &other.code) && self.range == other.range
    }
}

impl Eq for Location {}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.code.source.label(), self.column())
    }
}

/// Creates an iterator of [source char](SourceChar)s from a string.
///
/// `index_offset` will be the index of the first source char's location.
/// For each succeeding char, the index will be incremented by one.
///
/// ```
/// # use yash_syntax::source::{Code, Source, source_chars};
/// # use std::cell::RefCell;
/// # use std::num::NonZeroU64;
/// # use std::rc::Rc;
/// let s = "abc";
/// let code = Rc::new(Code {
///     value: RefCell::new(s.to_string()),
///     start_line_number: NonZeroU64::new(1).unwrap(),
///     source: Rc::new(Source::Unknown),
/// });
/// let chars: Vec<_> = source_chars(s, &code, 10).collect();
/// assert_eq!(chars[0].value, 'a');
/// assert_eq!(chars[0].location.code, code);
/// assert_eq!(chars[0].location.range, 10..11);
/// assert_eq!(chars[1].value, 'b');
/// assert_eq!(chars[1].location.code, code);
/// assert_eq!(chars[1].location.range, 11..12);
/// ```
pub fn source_chars<'a>(
    s: &'a str,
    code: &'a Rc<Code>,
    index_offset: usize,
) -> impl Iterator<Item = SourceChar> + 'a {
    s.chars().enumerate().map(move |(i, value)| SourceChar {
        value,
        location: Location {
            code: Rc::clone(code),
            range: index_offset + i..index_offset + i + 1,
        },
    })
}

/// Character with source description
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceChar {
    /// Character value
    pub value: char,
    /// Location of this character in source code
    pub location: Location,
}
