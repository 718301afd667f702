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

//! Items about file systems

use super::Result;
pub use super::open_flag::{OfdAccess, OpenFlag};
use bitflags::bitflags;
use enumset::EnumSet;
use std::ffi::{CStr, OsStr};
use std::fmt::Debug;
use std::future::Future;
use std::path::PathBuf;
use yash_syntax::syntax::Fd;

#[cfg(unix)]
const RAW_AT_FDCWD: i32 = nix::libc::AT_FDCWD;
#[cfg(not(unix))]
const RAW_AT_FDCWD: i32 = -100;

/// Sentinel for the current working directory
///
/// This value can be passed to system calls named "*at" such as
/// [`fstatat`](super::System::fstatat).
pub const AT_FDCWD: Fd = Fd(RAW_AT_FDCWD);

/// Metadata of a file contained in a directory
///
/// `DirEntry` objects are enumerated by a [`Dir`] implementor.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct DirEntry<'a> {
    /// Filename
    pub name: &'a OsStr,
}

/// Trait for enumerating directory entries
///
/// An implementor of `Dir` may retain a file descriptor (or any other resource
/// alike) to access the underlying system and obtain entry information. The
/// file descriptor is released when the implementor object is dropped.
pub trait Dir: Debug {
    /// Returns the next directory entry.
    fn next(&mut self) -> Result<Option<DirEntry>>;
}

#[cfg(unix)]
type RawModeDef = nix::libc::mode_t;
#[cfg(not(unix))]
type RawModeDef = u32;

/// Raw file permission bits type
///
/// This is a type alias for the raw file permission bits type `mode_t` declared
/// in the [`libc`] crate. The exact representation of this type is
/// platform-dependent while POSIX requires the type to be an integer. On
/// non-Unix platforms, this type is hard-coded to `u32`.
///
/// File permission bits are usually wrapped in the [`Mode`] type for better type
/// safety, so this type is not used directly in most cases.
///
/// [`libc`]: nix::libc
pub type RawMode = RawModeDef;

bitflags! {
    /// File permission bits
    ///
    /// This type wraps the raw file permission bits in [`RawMode`] in a
    /// [`bitflags`]-based type for type safety and convenient bit
    /// manipulation.
    #[derive(Copy, Clone, Eq, Hash, PartialEq)]
    pub struct Mode: RawMode {
        /// Owner read permission
        const USER_READ = 0o400;
        /// Owner write permission
        const USER_WRITE = 0o200;
        /// Owner execute (or search, for directories) permission
        const USER_EXEC = 0o100;
        /// Group read permission
        const GROUP_READ = 0o040;
        /// Group write permission
        const GROUP_WRITE = 0o020;
        /// Group execute (or search, for directories) permission
        const GROUP_EXEC = 0o010;
        /// Other read permission
        const OTHER_READ = 0o004;
        /// Other write permission
        const OTHER_WRITE = 0o002;
        /// Other execute (or search, for directories) permission
        const OTHER_EXEC = 0o001;
        /// Set-user-ID bit
        const SET_UID = 0o4000;
        /// Set-group-ID bit
        const SET_GID = 0o2000;
        /// Sticky bit
        const STICKY = 0o1000;

        /// All nine owner/group/other read, write, and execute bits
        const ALL_9 = 0o777;
        /// Owner, group, and other execute bits
        const ALL_EXEC = Self::USER_EXEC.bits() | Self::GROUP_EXEC.bits() | Self::OTHER_EXEC.bits();
    }
}

impl Debug for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mode({:#o})", self.bits())
    }
}

/// The default mode is `0o644`, not `0o000`.
impl Default for Mode {
    fn default() -> Mode {
        Mode::from_bits_truncate(0o644)
    }
}

/// Type of a file
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum FileType {
    /// Regular file
    Regular,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// FIFO (named pipe)
    Fifo,
    /// Block device
    BlockDevice,
    /// Character device
    CharacterDevice,
    /// Socket
    Socket,
    /// Any other file type not recognized by this enum
    Other,
}

/// File metadata
///
/// This is the result of [`Fstat::fstat`] and [`Fstat::fstatat`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Stat {
    /// Device ID of the device containing the file
    pub dev: u64,
    /// Inode number
    pub ino: u64,
    /// File permission bits
    pub mode: Mode,
    /// File type
    pub r#type: FileType,
    /// Number of hard links to the file
    pub nlink: u64,
    /// User ID of the file's owner
    pub uid: super::Uid,
    /// Group ID of the file's owning group
    pub gid: super::Gid,
    /// Size of the file in bytes
    pub size: i64,
}

/// Trait for changing the working directory
pub trait Chdir {
    /// Changes the working directory.
    ///
    /// This is a thin wrapper around the [`chdir` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/chdir.html).
    fn chdir(&self, path: &CStr) -> Result<()>;
}

/// Trait for obtaining the working directory
pub trait GetCwd {
    /// Returns the absolute path of the current working directory.
    ///
    /// This is a thin wrapper around the [`getcwd` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/getcwd.html).
    fn getcwd(&self) -> Result<std::path::PathBuf>;
}

/// Trait for obtaining file metadata
pub trait Fstat {
    /// Returns metadata for the file referred to by the file descriptor.
    ///
    /// This is a thin wrapper around the [`fstat` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/stat.html).
    fn fstat(&self, fd: Fd) -> Result<Stat>;

    /// Returns metadata for the file found by resolving `path` relative to
    /// `dir_fd` (or [`AT_FDCWD`] for the current working directory).
    ///
    /// This is a thin wrapper around the [`fstatat` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/stat.html).
    /// If `follow_symlinks` is `false`, a symbolic link found at `path` is not
    /// followed and its own metadata is returned.
    fn fstatat(&self, dir_fd: Fd, path: &CStr, follow_symlinks: bool) -> Result<Stat>;
}

/// Trait for checking whether a file is executable
pub trait IsExecutableFile {
    /// Returns whether the file at `path` exists and is executable by the
    /// current user.
    fn is_executable_file(&self, path: &CStr) -> bool;
}

/// Trait for opening files
pub trait Open {
    /// Opens the file at `path`, creating or truncating it according to
    /// `flags` and `mode` as needed, and returns the new file descriptor.
    ///
    /// This is a thin wrapper around the [`open` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/open.html).
    fn open(
        &self,
        path: &CStr,
        access: OfdAccess,
        flags: EnumSet<OpenFlag>,
        mode: Mode,
    ) -> impl Future<Output = Result<Fd>>;
}

/// Trait for repositioning the read/write offset of a file descriptor
pub trait Seek {
    /// Repositions the read/write offset of the open file description
    /// referred to by `fd`.
    ///
    /// This is a thin wrapper around the [`lseek` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/lseek.html).
    fn lseek(&self, fd: Fd, position: std::io::SeekFrom) -> Result<u64>;
}

/// Trait for getting and setting the file mode creation mask
pub trait Umask {
    /// Sets the file mode creation mask to `new_mask` and returns the
    /// previous mask.
    ///
    /// This is a thin wrapper around the [`umask` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/umask.html).
    fn umask(&self, new_mask: Mode) -> Mode;
}
