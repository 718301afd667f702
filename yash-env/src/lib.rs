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

//! This crate defines the shell execution environment.
//!
//! A shell execution environment is a collection of data that may affect or be
//! affected by execution of commands. The environment consists of
//! application-managed parts and system-managed parts. Application-managed
//! parts are implemented in pure Rust in this crate: [alias]es, [function]s,
//! [job]s, [variable]s, the [option] set, and the [trap] set. System-managed
//! parts depend on the underlying operating system and are accessed through
//! the [`System`](system::System) trait, implemented by [`RealSystem`] for
//! production use and [`VirtualSystem`] for testing.
//!
//! The [`Env`] struct ties all these parts together. Most shell components
//! (the parser, the expansion engine, the executor) take `&mut Env` as an
//! argument so they can read and update the shell's state as they run.

pub mod alias;
pub mod any;
pub mod builtin;
pub mod decl_util;
pub mod expansion;
pub mod function;
pub mod input;
pub mod io;
pub mod job;
pub mod option;
pub mod parser;
pub mod path;
pub mod prompt;
pub mod pwd;
pub mod semantics;
pub mod signal;
pub mod stack;
pub mod str;
pub mod subshell;
pub mod system;
pub mod trap;
pub mod variable;

use self::any::DataSet;
use self::builtin::Builtin;
use self::function::FunctionSet;
use self::io::Fd;
use self::job::{JobSet, Pid};
use self::option::OptionSet;
use self::stack::Stack;
use self::system::{SharedSystem, System};
use self::trap::TrapSet;
use self::variable::VariableSet;
use std::collections::HashMap;
use std::rc::Rc;
use yash_syntax::alias::AliasSet;

#[doc(no_inline)]
pub use self::system::r#virtual::VirtualSystem;
#[cfg(unix)]
#[doc(no_inline)]
pub use self::system::real::RealSystem;

/// Whole shell execution environment.
///
/// The shell execution environment consists of application-managed parts and
/// system-managed parts. Application-managed parts are directly implemented
/// in the `Env` instance. The system-managed parts are accessed through
/// [`system`](Self::system), a [`SharedSystem`] wrapping a `Box<dyn System>`.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Env {
    /// Aliases defined in the environment.
    ///
    /// The `AliasSet` is reference-counted so that the shell can execute traps
    /// while the parser is reading a command line.
    pub aliases: Rc<AliasSet>,

    /// Arbitrary data attached to the environment by other crates.
    ///
    /// This is used by crates that need to extend `Env` with data of their
    /// own without modifying this crate, e.g. `yash-prompt`'s prompt state.
    pub any: DataSet,

    /// Built-in utilities available in the environment.
    pub builtins: HashMap<&'static str, Builtin>,

    /// Exit status of the last executed command.
    pub exit_status: semantics::ExitStatus,

    /// Functions defined in the environment.
    pub functions: FunctionSet,

    /// Jobs managed by the environment.
    pub jobs: JobSet,

    /// Process ID of the main shell process.
    ///
    /// This is the process ID obtained when the environment was created and
    /// does not change even if the shell forks into subshells.
    pub main_pid: Pid,

    /// Process group ID of the main shell process.
    pub main_pgid: Pid,

    /// Shell options currently in effect.
    pub options: OptionSet,

    /// Interface to the underlying operating system.
    pub system: SharedSystem,

    /// Runtime execution context stack.
    pub stack: Stack,

    /// Traps configured in the environment.
    pub traps: TrapSet,

    /// File descriptor connected to the controlling terminal, if any.
    ///
    /// This is `Some` only if the shell is interactive and was able to open
    /// the terminal device for job control purposes.
    pub tty: std::option::Option<Fd>,

    /// Variables defined in the environment.
    pub variables: VariableSet,
}

impl Env {
    /// Creates a new environment with the given system.
    ///
    /// The main process ID and process group ID are obtained from the system.
    /// All other application-managed parts are defaulted.
    #[must_use]
    pub fn with_system(system: Box<dyn System>) -> Self {
        let main_pid = system.getpid();
        let main_pgid = system.getpgrp();
        Env {
            aliases: Rc::default(),
            any: DataSet::default(),
            builtins: HashMap::new(),
            exit_status: semantics::ExitStatus::default(),
            functions: FunctionSet::default(),
            jobs: JobSet::default(),
            main_pid,
            main_pgid,
            options: OptionSet::default(),
            system: SharedSystem::new(system),
            stack: Stack::default(),
            traps: TrapSet::default(),
            tty: None,
            variables: VariableSet::default(),
        }
    }

    /// Creates a new environment with a fresh [`VirtualSystem`].
    ///
    /// This is a convenient shorthand used throughout this crate's and other
    /// crates' unit tests.
    #[must_use]
    pub fn new_virtual() -> Self {
        Self::with_system(Box::new(VirtualSystem::new()))
    }

    /// Tests whether the shell is interactive.
    ///
    /// This is equivalent to
    /// `self.options.get(Interactive) == yash_env::option::State::On`.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        use self::option::{Interactive, State::On};
        self.options.get(Interactive) == On
    }

    /// Tests whether error messages should contain ANSI color escapes.
    ///
    /// Currently, this function returns the same value as
    /// [`is_interactive`](Self::is_interactive). A future version may take
    /// into account other factors such as the `NO_COLOR` environment
    /// variable.
    #[must_use]
    pub fn should_print_error_in_color(&self) -> bool {
        self.is_interactive()
    }

    /// Gets or creates a variable, applying the `AllExport` option.
    ///
    /// This function is equivalent to
    /// [`self.variables.get_or_new(name, scope)`](VariableSet::get_or_new),
    /// except that it also exports the variable if the `AllExport` option is
    /// on.
    pub fn get_or_create_variable<S: Into<String>>(
        &mut self,
        name: S,
        scope: variable::Scope,
    ) -> variable::VariableRefMut<'_> {
        use self::option::{AllExport, State::On};
        let all_export = self.options.get(AllExport) == On;
        let mut var = self.variables.get_or_new(name, scope);
        if all_export {
            var = var.export();
        }
        var
    }
}
