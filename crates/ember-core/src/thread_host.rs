// Copyright 2025 the Ember Engine authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host for the engine's dedicated worker threads.
//!
//! A [`ThreadHost`] owns one named OS thread per requested role, each
//! immediately running its own serial [`TaskQueue`] loop. The platform
//! thread is always supplied by the caller and is never owned here.

use crate::task::{TaskQueue, TaskRunner};
use std::thread;

/// The set of worker-thread roles a [`ThreadHost`] can own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ThreadRoles {
    bits: u8,
}

impl ThreadRoles {
    /// An empty set of roles.
    pub const EMPTY: Self = Self { bits: 0 };
    /// The UI thread: runs engine and framework logic.
    pub const UI: Self = Self { bits: 1 << 0 };
    /// The GPU thread: submits rendering command buffers.
    pub const GPU: Self = Self { bits: 1 << 1 };
    /// The IO thread: performs blocking resource loading.
    pub const IO: Self = Self { bits: 1 << 2 };

    /// Returns `true` if all roles in `other` are contained within `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Returns a new set with the roles of `other` added.
    #[must_use]
    pub const fn with(mut self, other: Self) -> Self {
        self.bits |= other.bits;
        self
    }
}

impl std::ops::BitOr for ThreadRoles {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        self.with(other)
    }
}

impl std::fmt::Debug for ThreadRoles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::UI) {
            set.entry(&"UI");
        }
        if self.contains(Self::GPU) {
            set.entry(&"GPU");
        }
        if self.contains(Self::IO) {
            set.entry(&"IO");
        }
        set.finish()
    }
}

struct Worker {
    runner: TaskRunner,
    join: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawns a named worker thread that drives its own queue until
    /// stopped. Thread creation failure is unrecoverable by design: the
    /// engine cannot provide any of its guarantees without its workers.
    fn spawn(name: String) -> Self {
        let (queue, runner) = TaskQueue::new();
        let join = thread::Builder::new()
            .name(name.clone())
            .spawn(move || queue.run())
            .unwrap_or_else(|e| panic!("Failed to spawn worker thread '{name}': {e}"));
        log::debug!("Worker thread '{name}' started.");
        Worker {
            runner,
            join: Some(join),
        }
    }

    fn stop_and_join(mut self) {
        self.runner.stop();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Owns a named group of worker threads, each running one serial task
/// queue.
///
/// Dropping the host (or calling [`reset`](Self::reset)) signals every
/// worker loop to stop and then joins each thread, blocking the caller
/// until all of them have exited.
pub struct ThreadHost {
    label: String,
    ui: Option<Worker>,
    gpu: Option<Worker>,
    io: Option<Worker>,
}

impl ThreadHost {
    /// Creates one OS thread per role in `roles`, each already consuming
    /// its queue by the time this returns.
    pub fn new(label: &str, roles: ThreadRoles) -> Self {
        let spawn = |suffix: &str, wanted: ThreadRoles| {
            roles
                .contains(wanted)
                .then(|| Worker::spawn(format!("{label}.{suffix}")))
        };
        Self {
            label: label.to_string(),
            ui: spawn("ui", ThreadRoles::UI),
            gpu: spawn("gpu", ThreadRoles::GPU),
            io: spawn("io", ThreadRoles::IO),
        }
    }

    /// The label this host's threads are named under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The UI worker's task runner, if the UI role was requested.
    pub fn ui_runner(&self) -> Option<TaskRunner> {
        self.ui.as_ref().map(|w| w.runner.clone())
    }

    /// The GPU worker's task runner, if the GPU role was requested.
    pub fn gpu_runner(&self) -> Option<TaskRunner> {
        self.gpu.as_ref().map(|w| w.runner.clone())
    }

    /// The IO worker's task runner, if the IO role was requested.
    pub fn io_runner(&self) -> Option<TaskRunner> {
        self.io.as_ref().map(|w| w.runner.clone())
    }

    /// Stops every worker loop and joins every thread.
    ///
    /// Blocks until all workers have exited, including their thread-local
    /// teardown. Idempotent.
    pub fn reset(&mut self) {
        for worker in [self.ui.take(), self.gpu.take(), self.io.take()]
            .into_iter()
            .flatten()
        {
            worker.stop_and_join();
        }
        log::debug!("Thread host '{}' reset.", self.label);
    }
}

impl Drop for ThreadHost {
    fn drop(&mut self) {
        self.reset();
    }
}
