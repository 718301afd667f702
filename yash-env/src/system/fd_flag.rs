// This file is part of yash, an extended POSIX shell.
// Copyright (C) 2024 WATANABE Yuki
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

//! Defines flags attached to a file descriptor (as opposed to the open file
//! description it refers to).

use enumset::EnumSetType;

/// Attributes of a file descriptor
///
/// A set of `FdFlag` values can be passed to [`Dup::dup`](super::Dup::dup) or
/// obtained and set via [`Fcntl::fcntl_getfd`](super::Fcntl::fcntl_getfd) and
/// [`Fcntl::fcntl_setfd`](super::Fcntl::fcntl_setfd).
#[derive(Debug, EnumSetType, Hash)]
#[non_exhaustive]
#[allow(non_camel_case_types)]
pub enum FdFlag {
    /// Close the file descriptor upon execution of an exec family function
    FD_CLOEXEC,
}
