// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2023 WATANABE Yuki
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

//! Items that define trap conditions

#[cfg(doc)]
use super::state::Action;
use crate::signal;

/// Condition under which an [`Action`] is executed
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Condition {
    /// When the shell exits
    Exit,
    /// When the specified signal is delivered to the shell process
    Signal(signal::Number),
}

/// Conversion from `signal::Number` to `Condition`
impl From<signal::Number> for Condition {
    fn from(signal: signal::Number) -> Self {
        Self::Signal(signal)
    }
}

/// Conversion from `nix`'s `Signal` to `Condition`
///
/// This is a convenience for code that already has a [`nix::sys::signal::Signal`]
/// on hand (for example, a constant like `SIGTERM`). The signal is converted to
/// a [`signal::Number`] using its raw value on the local system.
impl From<nix::sys::signal::Signal> for Condition {
    fn from(signal: nix::sys::signal::Signal) -> Self {
        let raw = std::num::NonZeroI32::new(signal as i32)
            .expect("nix signal constants are never zero");
        Self::Signal(signal::Number::from_raw_unchecked(raw))
    }
}

/// Conversion from `Condition` to `String`
///
/// The result is `"EXIT"` for the exit condition. For a signal condition,
/// since a bare [`signal::Number`] carries no system-independent name, the
/// result is the raw signal number.
impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Exit => "EXIT".fmt(f),
            Condition::Signal(signal) => signal.fmt(f),
        }
    }
}

/// Error in conversion from string to [`Condition`]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ParseConditionError;

/// Conversion from `String` to `Condition`
///
/// This implementation supports `"EXIT"` and a raw signal number. It cannot
/// resolve a signal name to a number, since that depends on the system; use
/// [`crate::system::Signals::signal_number_from_name`] for that and convert
/// the result with [`Condition::from`].
impl std::str::FromStr for Condition {
    type Err = ParseConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXIT" => Ok(Self::Exit),
            _ => s
                .parse()
                .map(signal::Number::from_raw_unchecked)
                .map(Self::Signal)
                .map_err(|_| ParseConditionError),
        }
    }
}
