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

//! Items related to process management

use super::Result;
use crate::Env;
use crate::job::Pid;
use crate::job::ProcessState;
use crate::semantics::ExitStatus;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::future::Future;
use std::pin::Pin;

/// Trait for getting the current process ID and other process-related information
pub trait GetPid {
    /// Returns the process ID of the current process.
    ///
    /// This method represents the [`getpid` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/getpid.html).
    #[must_use]
    fn getpid(&self) -> Pid;

    /// Returns the process ID of the parent process.
    ///
    /// This method represents the [`getppid` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/getppid.html).
    #[must_use]
    fn getppid(&self) -> Pid;

    /// Returns the process group ID of the current process.
    ///
    /// This method represents the [`getpgrp` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/getpgrp.html).
    #[must_use]
    fn getpgrp(&self) -> Pid;

    /// Returns the session ID of the specified process.
    ///
    /// If `pid` is `Pid(0)`, this function returns the session ID of the
    /// current process.
    fn getsid(&self, pid: Pid) -> Result<Pid>;
}

/// Trait for modifying the process group ID of processes
pub trait SetPgid {
    /// Modifies the process group ID of a process.
    ///
    /// This method represents the [`setpgid` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/setpgid.html).
    ///
    /// `pid` specifies the process whose process group ID is to be changed. If `pid` is
    /// `Pid(0)`, the current process is used.
    /// `pgid` specifies the new process group ID to be set. If `pgid` is
    /// `Pid(0)`, the process ID of the specified process is used.
    fn setpgid(&self, pid: Pid, pgid: Pid) -> Result<()>;
}

/// Function that runs as the body of a new child process
///
/// This is passed to the function returned by [`Fork::new_child_process`].
/// The environment passed to the task is specific to the child process.
pub type ChildProcessTask =
    Box<dyn FnOnce(&mut Env) -> Pin<Box<dyn Future<Output = Infallible>>>>;

/// Function that starts a new child process
///
/// This is the type of the value returned by [`Fork::new_child_process`].
/// Calling it with the parent environment and a [`ChildProcessTask`] creates
/// the child process and returns its process ID.
pub type ChildProcessStarter<S> = Box<dyn FnOnce(&mut Env, ChildProcessTask) -> Pid>;

/// Trait for creating new child processes
pub trait Fork {
    /// Creates a new child process.
    ///
    /// This method represents the [`fork` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/fork.html).
    /// Rather than returning control twice like the real `fork`, this method
    /// returns a [`ChildProcessStarter`] that must be called with the parent
    /// environment and a [`ChildProcessTask`] to actually start the child
    /// process and obtain its process ID.
    fn new_child_process(&self) -> Result<ChildProcessStarter<Self>>
    where
        Self: Sized;
}

/// Trait for waiting for state changes in child processes
pub trait Wait {
    /// Reports updated status of a child process.
    ///
    /// This method represents the [`wait` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/wait.html),
    /// more specifically, a non-blocking use of `waitpid`.
    ///
    /// `target` specifies which child process to wait for. If `target` is a
    /// positive pid, this function waits for that specific process. If
    /// `target` is `Pid(-1)`, this function waits for any child process.
    ///
    /// If there is a child whose state has changed, this function returns
    /// `Ok(Some((pid, state)))`. If there is a child matching `target` but its
    /// state has not changed, this function returns `Ok(None)`. If there is
    /// no child matching `target`, this function fails with `Errno::ECHILD`.
    fn wait(&self, target: Pid) -> Result<Option<(Pid, ProcessState)>>;
}

/// Trait for replacing the currently executing program
pub trait Exec {
    /// Replaces the currently executing program with another.
    ///
    /// This method represents the [`execve` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/exec.html).
    /// If successful, this function does not return (the return type
    /// [`Infallible`] reflects this). Otherwise, it returns an error.
    fn execve(
        &self,
        path: &CStr,
        args: &[CString],
        envs: &[CString],
    ) -> impl Future<Output = Result<Infallible>>;
}

/// Trait for terminating the current process
pub trait Exit {
    /// Terminates the current process with the given exit status.
    ///
    /// This method represents the [`_exit` system
    /// call](https://pubs.opengroup.org/onlinepubs/9799919799/functions/_Exit.html).
    /// This function never returns.
    fn exit(&self, exit_status: ExitStatus) -> impl Future<Output = Infallible>;
}
