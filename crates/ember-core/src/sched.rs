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

//! Best-effort OS scheduling priority tuning for the worker threads.
//!
//! Priorities are a latency optimization, never a correctness requirement:
//! a rejected request is logged and the engine keeps running at the default
//! level.

/// Nice level for the GPU thread. The platform's most latency-critical
/// display work sits around -8; sit conservatively just below it.
const GPU_NICE: i32 = -5;
/// Fallback for the GPU thread; some kernels refuse -5 for unprivileged
/// processes.
const GPU_NICE_FALLBACK: i32 = -2;
/// Nice level for the UI thread: one latency-favoring tier.
const UI_NICE: i32 = -1;

/// Requests the given nice level for the calling thread. Returns `true` on
/// success.
#[cfg(target_os = "linux")]
pub fn set_current_thread_nice(nice: i32) -> bool {
    // Each Linux thread is its own scheduling entity, so PRIO_PROCESS with
    // the thread id adjusts only the calling thread.
    unsafe {
        libc::setpriority(
            libc::PRIO_PROCESS as _,
            libc::gettid() as libc::id_t,
            nice,
        ) == 0
    }
}

/// Requests the given nice level for the calling thread. Returns `true` on
/// success. Not supported on this platform; always succeeds as a no-op.
#[cfg(not(target_os = "linux"))]
pub fn set_current_thread_nice(_nice: i32) -> bool {
    true
}

/// Raises the calling GPU thread's priority, falling back one tier if the
/// primary level is rejected. Run this from a task posted to the GPU queue.
pub fn tune_gpu_thread_priority<F>(set_nice: F)
where
    F: Fn(i32) -> bool,
{
    if !set_nice(GPU_NICE) && !set_nice(GPU_NICE_FALLBACK) {
        log::error!("Failed to set GPU task runner priority.");
    }
}

/// Raises the calling UI thread's priority by one latency-favoring tier.
/// Run this from a task posted to the UI queue.
pub fn tune_ui_thread_priority<F>(set_nice: F)
where
    F: Fn(i32) -> bool,
{
    if !set_nice(UI_NICE) {
        log::error!("Failed to set UI task runner priority.");
    }
}
