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

//! Managed-runtime binding contract and per-thread detach bookkeeping.
//!
//! Worker threads that call into a managed runtime (a garbage-collected
//! host environment) must detach from it exactly once when they terminate,
//! regardless of which object outlives which. That requirement is
//! independent of any object's lifetime, so it lives in a thread-local slot
//! whose destructor fires the hook, gated by a process-wide
//! [`ThreadExitKey`].

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The external managed-runtime environment the engine is embedded in.
pub trait RuntimeBinding: Send + Sync {
    /// Detaches the calling thread from the managed runtime. Invoked once
    /// from each armed worker thread's exit guard.
    fn detach_current_thread(&self);
}

/// Set while a [`ThreadExitKey`] instance is alive.
static EXIT_KEY_LIVE: AtomicBool = AtomicBool::new(false);

struct DetachGuard {
    binding: Arc<dyn RuntimeBinding>,
}

impl Drop for DetachGuard {
    fn drop(&mut self) {
        // Runs during thread-local teardown as the owning thread exits.
        self.binding.detach_current_thread();
    }
}

thread_local! {
    static DETACH_GUARD: RefCell<Option<DetachGuard>> = const { RefCell::new(None) };
}

/// Process-wide slot that detects worker-thread termination and triggers
/// the managed-runtime detach hook exactly once per armed thread.
///
/// Exactly one key may exist at a time: overlapping orchestrators managing
/// the same per-thread hooks cannot be made safe, so double-creation is a
/// fatal programmer error. The key must be released only after every
/// thread armed through it has exited; the owner enforces that by joining
/// its workers first.
pub struct ThreadExitKey {
    // Keeps the key !Send + !Sync; it is owned and released by the
    // orchestrator that created it.
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ThreadExitKey {
    /// Claims the process-wide slot.
    ///
    /// # Panics
    ///
    /// Panics if a key is already live in this process.
    pub fn create() -> Self {
        if EXIT_KEY_LIVE.swap(true, Ordering::SeqCst) {
            panic!(
                "A thread exit key already exists; only one shell orchestrator \
                 may manage per-thread detach hooks at a time."
            );
        }
        log::debug!("Thread exit key created.");
        Self {
            _not_send: std::marker::PhantomData,
        }
    }

    /// Arms the calling thread's detach guard with `binding`.
    ///
    /// Post this from a task on each worker queue that touches the managed
    /// runtime. Arming an already-armed thread is a no-op, so the hook
    /// still fires exactly once at thread exit.
    pub fn arm_current_thread(binding: Arc<dyn RuntimeBinding>) {
        DETACH_GUARD.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(DetachGuard { binding });
            } else {
                log::warn!(
                    "Thread '{}' already has a detach guard armed.",
                    std::thread::current().name().unwrap_or("<unnamed>")
                );
            }
        });
    }
}

impl Drop for ThreadExitKey {
    fn drop(&mut self) {
        EXIT_KEY_LIVE.store(false, Ordering::SeqCst);
        log::debug!("Thread exit key released.");
    }
}
