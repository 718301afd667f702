// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2022 WATANABE Yuki
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

//! Set built-in
//!
//! The **`set`** built-in sets or prints shell options and positional
//! parameters.
//!
//! # Synopsis
//!
//! ```sh
//! set [-abCefhimnuvx] [-o option]… [+abCefhimnuvx] [+o option]… [--] [parameter…]
//! set -o
//! set +o
//! ```
//!
//! # Description
//!
//! Without any operands, the set built-in prints the names and values of all
//! shell variables, sorted by name, in a format that can be parsed back as
//! shell input.
//!
//! With the `-o` option and no other operand, the built-in prints the current
//! state of all shell options in a human-readable format. With `+o` and no
//! other operand, it prints the state of all options in a format that can be
//! reused as input to restore them.
//!
//! Otherwise, each option operand enables (`-`) or disables (`+`) the named
//! option, and any remaining operands after the options (or after a lone `--`
//! or `-`) replace the positional parameters.
//!
//! # Options
//!
//! See [`yash_env::option::Option`] for the list of options and their short
//! and long names.
//!
//! # Exit status
//!
//! Zero unless the arguments are invalid.
//!
//! # Portability
//!
//! The set built-in is specified in POSIX.

use crate::common::output;
use crate::common::report_error;
use itertools::Itertools as _;
use std::fmt::Write as _;
use yash_env::semantics::Field;
use yash_env::stack::Frame;
use yash_env::variable::PositionalParams;
use yash_env::variable::Scope;
use yash_env::variable::Value;
use yash_env::Env;
use yash_quote::quote;
use yash_syntax::source::Location;

pub mod arg;

use self::arg::Parse;

/// Finds the location of the name of the currently executing `set` built-in.
///
/// This walks the stack directly instead of using
/// [`yash_env::stack::Stack::current_builtin`] so the built-in does not
/// depend on a value being found; a dummy location is used as a fallback.
fn builtin_name_location(env: &Env) -> Location {
    env.stack
        .iter()
        .rev()
        .find_map(|frame| match frame {
            Frame::Builtin { name, .. } => Some(name.origin.clone()),
            _ => None,
        })
        .unwrap_or_else(|| Location::dummy("set"))
}

/// Prints all shell variables, sorted by name.
async fn print_variables(env: &mut Env) -> crate::Result {
    let mut vars = env.variables.iter(Scope::Global).collect::<Vec<_>>();
    vars.sort_unstable_by_key(|&(name, _)| name);

    let mut text = String::new();
    for (name, var) in vars {
        let Some(value) = &var.value else { continue };
        match value {
            Value::Scalar(value) => {
                writeln!(text, "{}={}", name, quote(value)).unwrap();
            }
            Value::Array(values) => {
                writeln!(
                    text,
                    "{}=({})",
                    name,
                    values.iter().map(|v| quote(v)).format(" ")
                )
                .unwrap();
            }
        }
    }

    output(env, &text).await
}

/// Prints the current state of all shell options in a human-readable format.
async fn print_options_human_readable(env: &mut Env) -> crate::Result {
    let mut text = String::new();
    for option in yash_env::option::Option::iter() {
        writeln!(text, "{option:<16}{}", env.options.get(option)).unwrap();
    }
    output(env, &text).await
}

/// Prints the current state of all shell options in a format that can be
/// reused as input to restore them.
async fn print_options_machine_readable(env: &mut Env) -> crate::Result {
    use yash_env::option::State;
    let mut text = String::new();
    for option in yash_env::option::Option::iter() {
        let flag = match env.options.get(option) {
            State::On => "-o",
            State::Off => "+o",
        };
        writeln!(text, "set {flag} {option}").unwrap();
    }
    output(env, &text).await
}

/// Entry point for executing the `set` built-in
pub async fn main(env: &mut Env, args: Vec<Field>) -> crate::Result {
    match arg::parse(args) {
        Ok(Parse::PrintVariables) => print_variables(env).await,
        Ok(Parse::PrintOptionsHumanReadable) => print_options_human_readable(env).await,
        Ok(Parse::PrintOptionsMachineReadable) => print_options_machine_readable(env).await,

        Ok(Parse::Modify {
            options,
            positional_params,
        }) => {
            for (option, state) in options {
                env.options.set(option, state);
            }

            if let Some(fields) = positional_params {
                let last_modified_location = Some(builtin_name_location(env));
                let values = fields.into_iter().map(|field| field.value).collect();
                *env.variables.positional_params_mut() = PositionalParams {
                    values,
                    last_modified_location,
                };
            }

            Default::default()
        }

        Err(error) => report_error(env, &error).await,
    }
}
