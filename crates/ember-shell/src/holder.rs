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

//! The shell orchestrator: composes the thread host, task runners, factory
//! protocol, and managed-runtime bookkeeping into one lifecycle.
//!
//! A [`ShellHolder`] is either valid for its whole life or invalid for its
//! whole life: validity is decided once, at construction, by whether the
//! shell assembled. Every public operation on an invalid holder degrades
//! to a no-op so the host can query [`is_valid`](ShellHolder::is_valid)
//! once and branch.
//!
//! Teardown order is mandatory and encoded in the field order below:
//! release the shell, stop and join the worker threads (each runs its
//! detach hook as it exits), and only then release the thread exit key.

use crate::payload::{PointerDataPacket, RunConfiguration, ViewportMetrics};
use crate::platform_view::WeakPlatformView;
use crate::rasterizer::{Screenshot, ScreenshotKind};
use crate::shell::{PlatformViewFactory, RasterizerFactory, Shell};
use ember_core::{
    sched, RuntimeBinding, Settings, TaskRunner, TaskRunners, ThreadExitKey, ThreadHost,
    ThreadRoles,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Monotonic label source so each holder's threads get a distinct name.
static SHELL_COUNT: AtomicU64 = AtomicU64::new(1);

/// Owns one engine shell and the threads it runs on.
///
/// Constructed on the platform thread; the caller supplies its own loop's
/// task runner for the platform slot. All public mutating operations are
/// asynchronous posts to the UI queue except [`screenshot`](Self::screenshot),
/// which is deliberately synchronous because the caller needs the result
/// back.
pub struct ShellHolder {
    settings: Settings,
    platform_view: Option<WeakPlatformView>,
    // Teardown order: shell first, then the thread host (stop + join), and
    // the exit key strictly last, once no armed thread is left alive.
    shell: Option<Shell>,
    thread_host: ThreadHost,
    _exit_key: ThreadExitKey,
}

impl ShellHolder {
    /// Spins up the worker threads, runs the factory protocol, and
    /// assembles the shell.
    ///
    /// `platform_runner` must post to a queue driven by the calling
    /// thread's own loop. If assembly fails the holder is returned in the
    /// invalid state rather than as an error: every subsequent operation
    /// no-ops.
    pub fn new(
        settings: Settings,
        binding: Arc<dyn RuntimeBinding>,
        platform_runner: TaskRunner,
        on_create_platform_view: PlatformViewFactory,
        on_create_rasterizer: RasterizerFactory,
    ) -> Self {
        let label = SHELL_COUNT.fetch_add(1, Ordering::SeqCst).to_string();

        let exit_key = ThreadExitKey::create();
        let thread_host = ThreadHost::new(
            &label,
            ThreadRoles::UI | ThreadRoles::GPU | ThreadRoles::IO,
        );
        let ui = thread_host
            .ui_runner()
            .expect("UI worker was requested at construction");
        let gpu = thread_host
            .gpu_runner()
            .expect("GPU worker was requested at construction");
        let io = thread_host
            .io_runner()
            .expect("IO worker was requested at construction");

        // Detach from the managed runtime when the UI and GPU threads
        // exit. Posted first so the guards are armed before any engine
        // work runs on either thread.
        let ui_binding = Arc::clone(&binding);
        ui.post(move || ThreadExitKey::arm_current_thread(ui_binding));
        gpu.post(move || ThreadExitKey::arm_current_thread(binding));

        let task_runners =
            TaskRunners::new(&label, platform_runner, ui.clone(), gpu.clone(), io);

        // Capture the weak platform-view handle at callback time:
        // ownership passes into the shell immediately afterwards.
        let view_slot: Arc<Mutex<Option<WeakPlatformView>>> = Arc::new(Mutex::new(None));
        let captured_slot = Arc::clone(&view_slot);
        let capturing_factory: PlatformViewFactory = Box::new(move |context| {
            let view = on_create_platform_view(context)?;
            *captured_slot.lock().unwrap() = Some(WeakPlatformView::downgrade(&view));
            Ok(view)
        });

        let shell = Shell::create(
            task_runners,
            settings.clone(),
            capturing_factory,
            on_create_rasterizer,
        );
        let platform_view = view_slot.lock().unwrap().take();

        if shell.is_some() {
            gpu.post(|| sched::tune_gpu_thread_priority(sched::set_current_thread_nice));
            ui.post(|| sched::tune_ui_thread_priority(sched::set_current_thread_nice));
        } else {
            log::error!("Shell '{label}' assembly failed; holder is invalid.");
        }

        Self {
            settings,
            platform_view,
            shell,
            thread_host,
            _exit_key: exit_key,
        }
    }

    /// Whether the shell assembled at construction. Immutable for the
    /// holder's lifetime.
    pub fn is_valid(&self) -> bool {
        self.shell.is_some()
    }

    /// The settings this holder was constructed with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The assembled shell, if construction succeeded.
    pub fn shell(&self) -> Option<&Shell> {
        self.shell.as_ref()
    }

    /// The weak handle to the platform view captured during assembly.
    ///
    /// # Panics
    ///
    /// Panics if no handle was captured, which means the caller ignored an
    /// invalid holder: a programmer error, not a runtime condition.
    pub fn platform_view(&self) -> WeakPlatformView {
        self.platform_view
            .clone()
            .expect("Platform view handle was never captured; holder is invalid.")
    }

    /// Starts the engine runtime with `config` by posting a move-only task
    /// to the UI queue. No-op if the holder is invalid. A runtime start
    /// failure is logged inside the task, never propagated.
    pub fn launch(&self, config: RunConfiguration) {
        let Some(shell) = &self.shell else {
            return;
        };
        let engine = shell.engine();
        shell.task_runners().ui().post(move || {
            if let Some(engine) = engine.upgrade() {
                if let Err(e) = engine.lock().unwrap().run(config) {
                    log::error!("Could not launch engine in configuration: {e}");
                }
            }
        });
    }

    /// Updates the engine's view geometry by posting a copy of `metrics`
    /// to the UI queue. No-op if the holder is invalid.
    pub fn set_viewport_metrics(&self, metrics: ViewportMetrics) {
        let Some(shell) = &self.shell else {
            return;
        };
        let engine = shell.engine();
        shell.task_runners().ui().post(move || {
            if let Some(engine) = engine.upgrade() {
                engine.lock().unwrap().set_viewport_metrics(metrics);
            }
        });
    }

    /// Transfers ownership of `packet` into a task posted to the UI queue.
    /// No-op if the holder is invalid.
    pub fn dispatch_pointer_data_packet(&self, packet: PointerDataPacket) {
        let Some(shell) = &self.shell else {
            return;
        };
        let engine = shell.engine();
        shell.task_runners().ui().post(move || {
            if let Some(engine) = engine.upgrade() {
                engine.lock().unwrap().dispatch_pointer_data_packet(packet);
            }
        });
    }

    /// Captures the most recently rendered frame, synchronously delegating
    /// to the shell. Returns the empty result if the holder is invalid.
    pub fn screenshot(&self, kind: ScreenshotKind, base64_encode: bool) -> Screenshot {
        match &self.shell {
            Some(shell) => shell.screenshot(kind, base64_encode),
            None => Screenshot::empty(),
        }
    }
}

impl Drop for ShellHolder {
    fn drop(&mut self) {
        // Release the shell first: its platform view and rasterizer go
        // with it, and every outstanding weak handle goes empty.
        self.shell.take();
        // Stop and join the workers. Each UI/GPU thread runs its detach
        // guard during thread-local teardown, so by the time this returns
        // every detach hook has fired.
        self.thread_host.reset();
        // `_exit_key` drops after this body, once no armed thread remains.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform_view::PlatformView;
    use crate::rasterizer::Rasterizer;
    use ember_core::TaskQueue;
    use std::sync::atomic::AtomicU32;

    // Each holder claims the process-wide exit key, so holder tests must
    // not overlap.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> std::sync::MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[derive(Default)]
    struct CountingBinding {
        detaches: AtomicU32,
    }

    impl RuntimeBinding for CountingBinding {
        fn detach_current_thread(&self) {
            self.detaches.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct StubView;
    impl PlatformView for StubView {
        fn name(&self) -> &str {
            "stub-view"
        }
        fn notify_surface_created(&self) {}
        fn notify_surface_destroyed(&self) {}
    }

    struct StubRasterizer;
    impl Rasterizer for StubRasterizer {
        fn screenshot(&self, _kind: ScreenshotKind, _base64_encode: bool) -> Screenshot {
            Screenshot {
                data: vec![0xEE],
                width: 4,
                height: 4,
            }
        }
    }

    fn valid_holder(binding: Arc<dyn RuntimeBinding>) -> (ShellHolder, TaskQueue) {
        let (platform_queue, platform_runner) = TaskQueue::new();
        let holder = ShellHolder::new(
            Settings::default(),
            binding,
            platform_runner,
            Box::new(|_| Ok(Arc::new(StubView) as Arc<dyn PlatformView>)),
            Box::new(|_| Ok(Arc::new(StubRasterizer) as Arc<dyn Rasterizer>)),
        );
        (holder, platform_queue)
    }

    fn invalid_holder(binding: Arc<dyn RuntimeBinding>) -> (ShellHolder, TaskQueue) {
        let (platform_queue, platform_runner) = TaskQueue::new();
        let holder = ShellHolder::new(
            Settings::default(),
            binding,
            platform_runner,
            Box::new(|_| anyhow::bail!("factory declined")),
            Box::new(|_| Ok(Arc::new(StubRasterizer) as Arc<dyn Rasterizer>)),
        );
        (holder, platform_queue)
    }

    /// Posts a probe to the UI queue and waits for it, so everything
    /// posted earlier has run.
    fn drain_ui_queue(holder: &ShellHolder) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        holder
            .shell()
            .unwrap()
            .task_runners()
            .ui()
            .post(move || tx.send(()).unwrap());
        rx.recv().unwrap();
    }

    #[test]
    fn valid_holder_reports_valid_and_screenshots() {
        let _guard = serial();
        let (holder, _platform_queue) = valid_holder(Arc::new(CountingBinding::default()));
        assert!(holder.is_valid());
        assert!(holder.platform_view().upgrade().is_some());

        let shot = holder.screenshot(ScreenshotKind::UncompressedImage, false);
        assert_eq!(shot.data, vec![0xEE]);
    }

    #[test]
    fn launch_runs_engine_exactly_once_with_that_config() {
        let _guard = serial();
        let (holder, _platform_queue) = valid_holder(Arc::new(CountingBinding::default()));

        holder.launch(RunConfiguration::new("bundle", "main"));
        drain_ui_queue(&holder);

        let engine = holder.shell().unwrap().engine().upgrade().unwrap();
        {
            let engine = engine.lock().unwrap();
            assert!(engine.is_running());
            assert_eq!(engine.configuration().unwrap().entrypoint(), "main");
            assert_eq!(engine.configuration().unwrap().bundle_path(), "bundle");
        }

        // A second launch is logged, not applied.
        holder.launch(RunConfiguration::new("other", "alt"));
        drain_ui_queue(&holder);
        assert_eq!(
            engine.lock().unwrap().configuration().unwrap().entrypoint(),
            "main"
        );
    }

    #[test]
    fn viewport_and_pointer_posts_reach_the_engine() {
        let _guard = serial();
        let (holder, _platform_queue) = valid_holder(Arc::new(CountingBinding::default()));

        let metrics = ViewportMetrics {
            device_pixel_ratio: 3.0,
            physical_width: 1080.0,
            physical_height: 1920.0,
            ..Default::default()
        };
        holder.set_viewport_metrics(metrics);
        holder.dispatch_pointer_data_packet(PointerDataPacket::default());
        drain_ui_queue(&holder);

        let engine = holder.shell().unwrap().engine().upgrade().unwrap();
        let engine = engine.lock().unwrap();
        assert_eq!(engine.viewport_metrics(), metrics);
        assert_eq!(engine.packets_dispatched(), 1);
    }

    #[test]
    fn invalid_holder_no_ops_every_operation() {
        let _guard = serial();
        let (holder, _platform_queue) = invalid_holder(Arc::new(CountingBinding::default()));

        assert!(!holder.is_valid());
        holder.launch(RunConfiguration::new("bundle", "main"));
        holder.set_viewport_metrics(ViewportMetrics::default());
        holder.dispatch_pointer_data_packet(PointerDataPacket::default());
        assert!(holder
            .screenshot(ScreenshotKind::CompressedImage, true)
            .is_empty());
        assert!(holder.shell().is_none());
    }

    #[test]
    #[should_panic(expected = "never captured")]
    fn platform_view_on_invalid_holder_is_a_programmer_error() {
        let _guard = serial();
        let (holder, _platform_queue) = invalid_holder(Arc::new(CountingBinding::default()));
        let _ = holder.platform_view();
    }

    #[test]
    fn drop_detaches_ui_and_gpu_threads_exactly_once() {
        let _guard = serial();
        let binding = Arc::new(CountingBinding::default());
        let (holder, _platform_queue) = valid_holder(binding.clone());

        assert_eq!(binding.detaches.load(Ordering::SeqCst), 0);
        drop(holder);
        // UI and GPU each fired once; the IO thread is never armed.
        assert_eq!(binding.detaches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn priority_tuning_failure_does_not_invalidate_the_holder() {
        let _guard = serial();
        // Real OS priority requests usually fail for unprivileged test
        // runs; construction must stay valid regardless.
        let (holder, _platform_queue) = valid_holder(Arc::new(CountingBinding::default()));
        drain_ui_queue(&holder);
        assert!(holder.is_valid());
    }
}
