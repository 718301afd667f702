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

//! Alias built-in
//!
//! The **`alias`** built-in defines or prints aliases.
//!
//! # Synopsis
//!
//! ```sh
//! alias [name[=value]…]
//! ```
//!
//! # Description
//!
//! Without any operands, the alias built-in prints all the aliases currently
//! defined, one per line in the form `name=value`, sorted by name.
//!
//! Each operand of the form `name=value` defines an alias named `name` that
//! expands to `value`. An operand without an `=` is treated as the name of an
//! existing alias to print; it is an error if no such alias is defined.
//!
//! # Options
//!
//! None. (TODO: the `-p` option, global aliases)
//!
//! # Exit status
//!
//! Zero unless an operand names a non-existent alias.
//!
//! # Portability
//!
//! The alias built-in is specified in POSIX.

use crate::common::output;
use crate::common::report_error;
use crate::common::report_failure;
use yash_env::Env;
use yash_env::semantics::Field;
use yash_syntax::source::pretty::Message;
use yash_syntax::source::pretty::MessageBase;

pub mod semantics;
pub mod syntax;

/// Parsed command arguments for the `alias` built-in
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Operands specifying aliases to define or print
    pub operands: Vec<Field>,
}

/// Converts a non-empty slice of errors to a message.
///
/// The first error's title is used as the message title. The other errors are
/// added as annotations.
#[must_use]
pub fn to_message(errors: &[semantics::Error]) -> Option<Message> {
    let mut message = Message::from(errors.first()?);
    let other_errors = errors[1..].iter().map(MessageBase::main_annotation);
    message.annotations.extend(other_errors);
    Some(message)
}

/// Entry point for executing the `alias` built-in
pub async fn main(env: &mut Env, args: Vec<Field>) -> crate::Result {
    match syntax::parse(env, args) {
        Ok(command) => {
            let (text, errors) = command.execute(env).await;
            let result = output(env, &text).await;
            match to_message(&errors) {
                None => result,
                Some(message) => result.max(report_failure(env, message).await),
            }
        }
        Err(e) => report_error(env, &e).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt as _;
    use yash_env::VirtualSystem;
    use yash_env_test_helper::assert_stderr;
    use yash_env_test_helper::assert_stdout;

    #[test]
    fn defining_one_alias() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));

        let args = Field::dummies(["foo=bar baz"]);
        let result = main(&mut env, args).now_or_never().unwrap();
        assert_eq!(result.exit_status(), yash_env::semantics::ExitStatus::SUCCESS);

        let alias = env.aliases.get("foo").unwrap().0.as_ref();
        assert_eq!(alias.name, "foo");
        assert_eq!(alias.replacement, "bar baz");
        assert_stderr(&state, |stderr| assert_eq!(stderr, ""));
    }

    #[test]
    fn printing_all_aliases() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));
        let _ = main(&mut env, Field::dummies(["foo=bar"]))
            .now_or_never()
            .unwrap();
        let _ = main(&mut env, Field::dummies(["baz=1"]))
            .now_or_never()
            .unwrap();

        let result = main(&mut env, vec![]).now_or_never().unwrap();
        assert_eq!(result.exit_status(), yash_env::semantics::ExitStatus::SUCCESS);
        assert_stdout(&state, |stdout| {
            assert_eq!(stdout, "baz=1\nfoo=bar\n");
        });
    }

    #[test]
    fn printing_non_existent_alias_is_an_error() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));

        let args = Field::dummies(["foo"]);
        let result = main(&mut env, args).now_or_never().unwrap();
        assert_eq!(result.exit_status(), yash_env::semantics::ExitStatus::FAILURE);
        assert_stderr(&state, |stderr| assert_ne!(stderr, ""));
    }
}
