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

//! POSIX-flavored string types
//!
//! Like pathnames, environment variable values and command arguments are
//! arbitrary byte sequences on POSIX systems. This module re-exports
//! [`unix_str`]'s string types for use where that distinction matters, such
//! as in [`System`](crate::system::System) implementations that talk
//! directly to `execve` and friends.

#[doc(no_inline)]
pub use unix_str::{UnixStr, UnixString};
