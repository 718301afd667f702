// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2021 WATANABE Yuki
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

//! Trap built-in.
//!
//! The **`trap`** built-in configures and prints actions to perform on
//! conditions such as the receipt of a signal or the shell exiting.
//!
//! # Syntax
//!
//! ```sh
//! trap
//! trap action condition...
//! ```
//!
//! # Semantics
//!
//! Without operands, the built-in prints the currently configured traps in a
//! format that can be read back by the shell.
//!
//! With operands, the built-in sets `action` as the trap for every specified
//! `condition`. Each `condition` is either `EXIT`, a signal name (without the
//! `SIG` prefix), or a signal number (`0` is a synonym for `EXIT`). The
//! `action` is one of:
//!
//! - `-`, which resets the condition to its default action
//! - an empty string, which causes the condition to be ignored
//! - any other string, which is parsed and executed as a command when the
//!   condition is met
//!
//! If `action` looks like a non-negative integer, it is treated as a
//! condition rather than an action, and the default action is assumed; this
//! lets you clear traps without repeating `-` for every condition.
//!
//! # Options
//!
//! (TODO: The `-p` option to print traps even when other operands are given
//! is not yet supported.)
//!
//! # Exit status
//!
//! Zero unless an error occurs.
//!
//! # Portability
//!
//! POSIX does not allow setting a trap for a signal that is ignored on
//! entry to a non-interactive shell; this implementation enforces that rule
//! for conditions other than `EXIT`.
//!
//! You cannot set a trap for `SIGKILL` or `SIGSTOP`.

use yash_env::semantics::Field;
use yash_env::trap::Action;

pub mod cond;
pub mod semantics;
pub mod syntax;

pub use cond::CondSpec;

/// Parsed command line arguments
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Command {
    /// Print all configured traps.
    PrintAll,

    /// Set a trap action for one or more conditions.
    SetAction {
        /// Action to perform when any of `conditions` is met
        action: Action,
        /// Conditions to set the action for, paired with the operand field
        /// that specified them
        conditions: Vec<(CondSpec, Field)>,
    },
}

/// Entry point of the `trap` built-in
pub async fn main(env: &mut yash_env::Env, args: Vec<Field>) -> crate::Result {
    use crate::common::report_error;
    use crate::common::syntax::parse_arguments;
    use crate::common::syntax::Mode;
    use crate::common::to_single_message;

    match parse_arguments(syntax::OPTION_SPECS, Mode::with_env(env), args) {
        Ok((options, operands)) => match syntax::interpret(options, operands) {
            Ok(command) => semantics::execute(env, command).await,
            Err(errors) => report_error(env, &to_single_message(&errors).unwrap()).await,
        },
        Err(error) => report_error(env, &error).await,
    }
}
