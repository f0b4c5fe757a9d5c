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

//! # Ember Core
//!
//! Foundational crate containing the threading and messaging primitives the
//! Ember shell is built on: serial task queues bound to dedicated OS
//! threads, the worker-thread host, best-effort thread scheduling tuning,
//! and the managed-runtime binding contract with its per-thread detach
//! bookkeeping.

#![warn(missing_docs)]

pub mod binding;
pub mod sched;
pub mod settings;
pub mod task;
pub mod thread_host;

pub use binding::{RuntimeBinding, ThreadExitKey};
pub use settings::Settings;
pub use task::{TaskQueue, TaskRunner, TaskRunners};
pub use thread_host::{ThreadHost, ThreadRoles};
