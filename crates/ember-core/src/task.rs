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

//! Serial task queues and their cloneable posting handles.
//!
//! A [`TaskQueue`] is a strictly ordered work queue consumed by exactly one
//! thread; a [`TaskRunner`] is a cheap, cloneable handle that posts work to
//! it from any thread. Tasks are fire-and-forget: no future or result
//! channel is returned, and a caller that needs a result back either posts
//! a second task or arranges its own rendezvous.

use crossbeam_channel::{Receiver, Sender};

/// A unit of work executed on the queue's owning thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Task),
    Stop,
}

/// A cloneable handle for posting tasks to a [`TaskQueue`].
///
/// Tasks posted from a single source thread to the same queue run in post
/// order. Ordering across different source threads is unspecified.
#[derive(Clone)]
pub struct TaskRunner {
    sender: Sender<Message>,
}

impl TaskRunner {
    /// Enqueues `task` for asynchronous execution on the queue's owning
    /// thread and returns immediately.
    ///
    /// Posting after the owning loop has stopped is a silent no-op; callers
    /// that care about liveness must guard with their own validity check.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.sender.send(Message::Run(Box::new(task))).is_err() {
            log::trace!("Task dropped: queue is no longer running.");
        }
    }

    /// Asks the owning loop to stop after the tasks already queued ahead of
    /// this request have run. Tasks still queued behind it are dropped.
    pub fn stop(&self) {
        if self.sender.send(Message::Stop).is_err() {
            log::trace!("Stop request dropped: queue is no longer running.");
        }
    }
}

/// The consuming end of a serial task queue.
///
/// Exactly one thread may drive a queue, either a [`ThreadHost`] worker or
/// the caller's own loop for the platform thread.
///
/// [`ThreadHost`]: crate::thread_host::ThreadHost
pub struct TaskQueue {
    receiver: Receiver<Message>,
}

impl TaskQueue {
    /// Creates a queue together with a posting handle for it.
    pub fn new() -> (TaskQueue, TaskRunner) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (TaskQueue { receiver }, TaskRunner { sender })
    }

    /// Runs tasks in order until a stop request arrives or every posting
    /// handle has been dropped. Blocks while idle-waiting for work.
    pub fn run(&self) {
        for message in self.receiver.iter() {
            match message {
                Message::Run(task) => task(),
                Message::Stop => break,
            }
        }
    }

    /// Runs every task currently queued, then returns without blocking.
    ///
    /// Intended for embedders that pump the platform queue from their own
    /// loop. Returns `false` once a stop request has been consumed.
    pub fn run_pending(&self) -> bool {
        for message in self.receiver.try_iter() {
            match message {
                Message::Run(task) => task(),
                Message::Stop => return false,
            }
        }
        true
    }
}

/// The bundle of task-runner handles the engine runs on: the caller's
/// platform loop plus the UI, GPU, and IO workers.
///
/// Handles reference queues owned elsewhere; cloning the set never clones a
/// queue or transfers its ownership.
#[derive(Clone)]
pub struct TaskRunners {
    label: String,
    platform: TaskRunner,
    ui: TaskRunner,
    gpu: TaskRunner,
    io: TaskRunner,
}

impl TaskRunners {
    /// Bundles the four runner handles under a shell label.
    pub fn new(
        label: &str,
        platform: TaskRunner,
        ui: TaskRunner,
        gpu: TaskRunner,
        io: TaskRunner,
    ) -> Self {
        Self {
            label: label.to_string(),
            platform,
            ui,
            gpu,
            io,
        }
    }

    /// The label of the shell these runners belong to.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The caller-supplied platform thread runner.
    pub fn platform(&self) -> &TaskRunner {
        &self.platform
    }

    /// The UI worker runner.
    pub fn ui(&self) -> &TaskRunner {
        &self.ui
    }

    /// The GPU worker runner.
    pub fn gpu(&self) -> &TaskRunner {
        &self.gpu
    }

    /// The IO worker runner.
    pub fn io(&self) -> &TaskRunner {
        &self.io
    }
}
