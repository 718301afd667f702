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

//! Defines the behavior of the trap built-in.

use super::CondSpec;
use super::Command;
use crate::common::output;
use crate::common::report_simple_error;
use std::fmt::Write as _;
use yash_env::semantics::Field;
use yash_env::trap::Action;
use yash_env::trap::Condition;
use yash_env::trap::SignalSystem;
use yash_env::Env;
use yash_quote::quote;

/// Resolves a `CondSpec` into a `Condition` by consulting the system's
/// signal name table.
///
/// Returns `None` if the system does not support the named signal.
fn resolve(env: &Env, spec: CondSpec) -> Option<Condition> {
    match spec {
        CondSpec::Exit => Some(Condition::Exit),
        CondSpec::Number(0) => Some(Condition::Exit),
        CondSpec::Number(number) => {
            let raw = std::num::NonZeroI32::new(number)?;
            Some(Condition::Signal(yash_env::signal::Number::from_raw_unchecked(
                raw,
            )))
        }
        CondSpec::SignalName(name) => Some(Condition::Signal(
            env.system.signal_number_from_name(name)?,
        )),
    }
}

/// Executes a parsed trap command.
pub async fn execute(env: &mut Env, command: Command) -> crate::Result {
    match command {
        Command::PrintAll => print_traps(env).await,
        Command::SetAction { action, conditions } => {
            set_actions(env, action, conditions).await
        }
    }
}

async fn print_traps(env: &mut Env) -> crate::Result {
    let mut text = String::new();
    for (&condition, current, parent) in env.traps.iter() {
        let trap = match (current, parent) {
            (Some(trap), _) => trap,
            (None, Some(trap)) => trap,
            (None, None) => continue,
        };
        let command = match &trap.action {
            Action::Default => continue,
            Action::Ignore => "",
            Action::Command(command) => command,
        };
        let condition = match condition {
            Condition::Exit => "EXIT".to_string(),
            Condition::Signal(number) => env.system.signal_name_from_number(number).to_string(),
        };
        writeln!(text, "trap -- {} {}", quote(command), condition).ok();
    }
    output(env, &text).await
}

async fn set_actions(
    env: &mut Env,
    action: Action,
    conditions: Vec<(CondSpec, Field)>,
) -> crate::Result {
    for (spec, field) in conditions {
        let Some(condition) = resolve(env, spec) else {
            return report_simple_error(env, &format!("unsupported condition: {}", field.value))
                .await;
        };
        if let Err(error) = env.traps.set_action(
            &mut env.system,
            condition,
            action.clone(),
            field.origin.clone(),
            false,
        )
        {
            return report_simple_error(
                env,
                &format!("cannot set trap for {}: {error}", field.value),
            )
            .await;
        }
    }
    crate::Result::default()
}
