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

//! POSIX-flavored path types
//!
//! Pathnames on POSIX systems are arbitrary byte sequences, not necessarily
//! valid UTF-8. [`std::path::Path`] assumes an OS string encoding that does
//! not match this on all platforms, so this crate uses [`unix_path`] instead.

#[doc(no_inline)]
pub use unix_path::{Component, Components, Path, PathBuf, StripPrefixError};
