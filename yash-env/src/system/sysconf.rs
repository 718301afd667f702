// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2025 WATANABE Yuki
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

//! Items for obtaining system configuration information

use super::Result;
use crate::str::UnixString;
use std::ffi::CString;

/// Trait for getting system configuration information
pub trait Sysconf {
    /// Returns the standard `$PATH` value where all standard utilities are
    /// expected to be found.
    ///
    /// This is a thin wrapper around `confstr(_CS_PATH, …)`.
    fn confstr_path(&self) -> Result<UnixString>;
}

/// Trait for getting the path to the shell executable
pub trait ShellPath {
    /// Returns the path to the shell executable.
    ///
    /// This is used as the value of the `$0` special parameter when running
    /// a script with the `.` (dot) built-in, and similar contexts where the
    /// name of the running shell is needed.
    #[must_use]
    fn shell_path(&self) -> CString;
}
