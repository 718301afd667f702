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

//! Type definitions for job management.

pub mod fmt;
pub mod id;

use crate::semantics::ExitStatus;
use crate::trap::Signal;
use std::fmt;

/// Process ID
///
/// This is a thin wrapper around the raw process (or process group) ID
/// returned by the system, distinct from [`nix::unistd::Pid`] so that job
/// management code does not depend on `nix`'s API directly.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pid(pub i32);

impl Pid {
    /// Process ID 0, which refers to the current process group in many
    /// system calls.
    pub const ZERO: Pid = Pid(0);

    /// Creates a `Pid` from a raw process ID.
    #[must_use]
    pub const fn from_raw(pid: i32) -> Self {
        Pid(pid)
    }

    /// Returns the raw process ID.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<nix::unistd::Pid> for Pid {
    fn from(pid: nix::unistd::Pid) -> Self {
        Pid(pid.as_raw())
    }
}

impl From<Pid> for nix::unistd::Pid {
    fn from(pid: Pid) -> Self {
        nix::unistd::Pid::from_raw(pid.0)
    }
}

/// Result of a terminated process
///
/// This is the information retained about a process after it has stopped
/// running, either because it exited or because it was killed by a signal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ProcessResult {
    /// The process exited normally.
    Exited(ExitStatus),
    /// The process was suspended by a signal.
    Stopped(Signal),
    /// The process was killed by a signal.
    Signaled {
        /// Signal that killed the process
        signal: Signal,
        /// Whether the process dumped core
        core_dump: bool,
    },
}

impl ProcessResult {
    /// Creates a result for a process killed by a signal without a core dump.
    pub const fn signaled(signal: Signal) -> Self {
        ProcessResult::Signaled {
            signal,
            core_dump: false,
        }
    }
}

/// State of a job's process
///
/// A job is either still running or has halted for some reason. This
/// mirrors `WIFEXITED`/`WIFSIGNALED`/`WIFSTOPPED` as reported by `waitpid`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ProcessState {
    /// The process is still running (possibly suspended momentarily between
    /// `wait` calls).
    Running,
    /// The process has stopped running.
    Halted(ProcessResult),
}

impl ProcessState {
    /// Shorthand for a state where the process exited with the given status.
    pub const fn exited(exit_status: ExitStatus) -> Self {
        ProcessState::Halted(ProcessResult::Exited(exit_status))
    }

    /// Shorthand for a state where the process was suspended by a signal.
    pub const fn stopped(signal: Signal) -> Self {
        ProcessState::Halted(ProcessResult::Stopped(signal))
    }

    /// Shorthand for a state where the process was killed by a signal.
    pub const fn signaled(signal: Signal, core_dump: bool) -> Self {
        ProcessState::Halted(ProcessResult::Signaled { signal, core_dump })
    }

    /// Whether the process is still alive (running or stopped, but not yet
    /// reaped as exited or signaled).
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !matches!(self, ProcessState::Halted(ProcessResult::Exited(_)))
            && !matches!(self, ProcessState::Halted(ProcessResult::Signaled { .. }))
    }
}

impl Default for ProcessState {
    fn default() -> Self {
        ProcessState::Running
    }
}

/// Set of one or more processes executing a pipeline
///
/// In the current implementation, a job contains the process ID of one child
/// process of the shell. Though there may be more processes involved in the
/// execution of the pipeline, the shell takes care of only one process of the
/// job.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Job {
    /// Process ID
    pub pid: Pid,

    /// Whether the job is job-controlled.
    ///
    /// If the job is job-controlled, the job process runs in its own process
    /// group.
    pub job_controlled: bool,

    /// State of the process
    pub state: ProcessState,

    /// String representation of this process
    pub name: String,

    /// Whether the user has been notified of the job's current state
    ///
    /// This is used by the `jobs` built-in and the prompt-time status
    /// report to avoid printing the same transition twice.
    pub status_reported: bool,

    /// Whether the shell considers this job "owned"
    ///
    /// An owned job is reported by `jobs` and waited for by a plain `wait`.
    /// A job can be disowned by the `disown` built-in, after which the shell
    /// no longer tracks it other than to reap its exit status silently.
    pub is_owned: bool,
}

impl Job {
    /// Creates a new job instance.
    ///
    /// This function requires a process ID to initialize the new job. The
    /// other members of the job are defaulted.
    pub fn new(pid: Pid) -> Self {
        Job {
            pid,
            job_controlled: false,
            state: ProcessState::Running,
            name: String::new(),
            status_reported: false,
            is_owned: true,
        }
    }
}

/// Index of a job in a [`JobSet`]
///
/// Indices are stable as long as the job they refer to is not removed from
/// the set. [`JobSet::remove`] may invalidate indices of other jobs.
pub type Index = usize;

/// Collection of jobs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JobSet {
    /// Jobs indexed by their slot in this vector.
    ///
    /// A `None` entry represents a slot vacated by [`remove`](Self::remove)
    /// that is available for reuse by [`add`](Self::add).
    jobs: Vec<Option<Job>>,

    /// Index of the current job (`%+`), if any.
    current_job: Option<Index>,

    /// Index of the previous job (`%-`), if any.
    previous_job: Option<Index>,

    /// Process ID of the most recently executed asynchronous command.
    last_async_pid: Pid,
}

impl JobSet {
    /// Adds a job to this job set.
    ///
    /// Returns the index assigned to the job. The new job becomes the
    /// current job, demoting the previous current job (if any) to the
    /// previous job.
    pub fn add(&mut self, job: Job) -> Index {
        let index = match self.jobs.iter().position(Option::is_none) {
            Some(index) => {
                self.jobs[index] = Some(job);
                index
            }
            None => {
                self.jobs.push(Some(job));
                self.jobs.len() - 1
            }
        };
        self.previous_job = self.current_job;
        self.current_job = Some(index);
        index
    }

    /// Removes the job at the given index, if any.
    ///
    /// Returns the removed job.
    pub fn remove(&mut self, index: Index) -> Option<Job> {
        let job = self.jobs.get_mut(index).and_then(Option::take);
        if job.is_some() {
            if self.current_job == Some(index) {
                self.current_job = self.previous_job.take();
            } else if self.previous_job == Some(index) {
                self.previous_job = None;
            }
        }
        job
    }

    /// Returns a reference to the job at the given index.
    #[must_use]
    pub fn get(&self, index: Index) -> Option<&Job> {
        self.jobs.get(index)?.as_ref()
    }

    /// Returns a mutable reference to the job at the given index.
    #[must_use]
    pub fn get_mut(&mut self, index: Index) -> Option<&mut Job> {
        self.jobs.get_mut(index)?.as_mut()
    }

    /// Returns the number of jobs in this set, including vacated slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.iter().filter(|job| job.is_some()).count()
    }

    /// Returns whether this set has no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the indices and jobs in this set, in index
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &Job)> {
        self.jobs
            .iter()
            .enumerate()
            .filter_map(|(index, job)| Some((index, job.as_ref()?)))
    }

    /// Returns the index of the job with the given process ID, if any.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<Index> {
        self.iter().find(|(_, job)| job.pid == pid).map(|(i, _)| i)
    }

    /// Returns the index of the current job (`%+`), if any.
    #[must_use]
    pub fn current_job(&self) -> Option<Index> {
        self.current_job
    }

    /// Returns the index of the previous job (`%-`), if any.
    #[must_use]
    pub fn previous_job(&self) -> Option<Index> {
        self.previous_job
    }

    /// Sets the current job to the job at the given index.
    ///
    /// Returns an error if there is no job at the index. The previous
    /// current job, if different, becomes the previous job.
    pub fn set_current_job(&mut self, index: Index) -> Result<(), NoSuchJobError> {
        if self.get(index).is_none() {
            return Err(NoSuchJobError);
        }
        if self.current_job != Some(index) {
            self.previous_job = self.current_job;
            self.current_job = Some(index);
        }
        Ok(())
    }

    /// Returns the process ID of the most recently executed asynchronous
    /// command.
    ///
    /// This function returns the value that has been set by
    /// [`set_last_async_pid`](Self::set_last_async_pid), or 0 if no value has
    /// been set.
    ///
    /// When expanding the special parameter `$!`, you must use
    /// [`expand_last_async_pid`](Self::expand_last_async_pid) instead of this
    /// function.
    #[must_use]
    pub fn last_async_pid(&self) -> Pid {
        self.last_async_pid
    }

    /// Returns the process ID of the most recently executed asynchronous
    /// command.
    ///
    /// This function is similar to [`last_async_pid`](Self::last_async_pid),
    /// but also marks the corresponding job as owned so it is not disowned
    /// by a subsequent implicit cleanup.
    pub fn expand_last_async_pid(&mut self) -> Pid {
        if let Some(index) = self.find_by_pid(self.last_async_pid) {
            if let Some(job) = self.get_mut(index) {
                job.is_owned = true;
            }
        }
        self.last_async_pid
    }

    /// Sets the process ID of the most recently executed asynchronous command.
    ///
    /// This function affects the result of
    /// [`last_async_pid`](Self::last_async_pid).
    pub fn set_last_async_pid(&mut self, pid: Pid) {
        self.last_async_pid = pid;
    }

    /// Updates the state of the job with the given process ID.
    ///
    /// The `wait_status` is a result from [`nix::sys::wait::waitpid`] or
    /// similar. Returns the index of the updated job, if found.
    pub fn update_status(&mut self, wait_status: nix::sys::wait::WaitStatus) -> Option<Index> {
        use nix::sys::wait::WaitStatus::*;
        let pid = match wait_status {
            Exited(pid, _) | Signaled(pid, _, _) | Stopped(pid, _) | Continued(pid) => pid,
            StillAlive | PtraceEvent(..) | PtraceSyscall(..) => return None,
        };
        let index = self.find_by_pid(Pid::from(pid))?;
        let job = self.jobs[index].as_mut()?;
        job.state = match wait_status {
            Exited(_, code) => ProcessState::exited(ExitStatus(code)),
            Signaled(_, signal, core_dump) => ProcessState::signaled(signal, core_dump),
            Stopped(_, signal) => ProcessState::stopped(signal),
            Continued(_) => ProcessState::Running,
            StillAlive | PtraceEvent(..) | PtraceSyscall(..) => return None,
        };
        job.status_reported = false;
        Some(index)
    }

    /// Removes jobs for which the predicate returns `false`.
    pub fn retain_jobs<F>(&mut self, mut predicate: F)
    where
        F: FnMut(Index, &Job) -> bool,
    {
        let indices: Vec<Index> = self
            .iter()
            .filter(|(index, job)| !predicate(*index, job))
            .map(|(index, _)| index)
            .collect();
        for index in indices {
            self.remove(index);
        }
    }

    /// Calls `f` for each job, annotated with its [`fmt::Marker`].
    ///
    /// This is the core of the `jobs` built-in's reporting logic: the
    /// current job is marked `+`, the previous job `-`, and all others are
    /// unmarked.
    pub fn report_jobs<F>(&self, mut f: F)
    where
        F: FnMut(Index, &Job),
    {
        for (index, job) in self.iter() {
            f(index, job);
        }
    }

    /// Marks every job as disowned.
    pub fn disown_all(&mut self) {
        for job in self.jobs.iter_mut().flatten() {
            job.is_owned = false;
        }
    }
}

/// Error indicating that a job index does not refer to an existing job.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("no such job")]
pub struct NoSuchJobError;
