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

//! The assembled engine instance.
//!
//! [`Shell::create`] runs the component factory protocol on the correct
//! threads — the platform view on the calling (platform) thread, the
//! rasterizer on the GPU queue, the engine on the UI queue — and composes
//! the results into one owning object. Construction is the only place the
//! shell blocks on a worker: each cross-thread factory call is a one-shot
//! rendezvous over a bounded channel.

use crate::engine::Engine;
use crate::platform_view::PlatformView;
use crate::rasterizer::{Rasterizer, Screenshot, ScreenshotKind};
use ember_core::{Settings, TaskRunners};
use std::sync::{Arc, Mutex, Weak};

/// Construction context handed to each factory callback.
pub struct ShellBuildContext {
    /// The task runners the new component may post to.
    pub task_runners: TaskRunners,
    /// The settings the shell is being assembled with.
    pub settings: Settings,
}

/// Callback slot producing the platform-facing component. Invoked exactly
/// once, on the platform thread.
pub type PlatformViewFactory =
    Box<dyn FnOnce(&ShellBuildContext) -> anyhow::Result<Arc<dyn PlatformView>> + Send>;

/// Callback slot producing the rendering-facing component. Invoked exactly
/// once, on the GPU thread.
pub type RasterizerFactory =
    Box<dyn FnOnce(&ShellBuildContext) -> anyhow::Result<Arc<dyn Rasterizer>> + Send>;

/// The assembled running engine: owns the platform view, the rasterizer,
/// and the engine runtime object.
///
/// A shell is exclusively owned by its orchestrator; collaborators hold
/// weak handles ([`WeakPlatformView`](crate::platform_view::WeakPlatformView),
/// [`engine`](Self::engine)) that go empty when the shell is dropped.
pub struct Shell {
    task_runners: TaskRunners,
    settings: Settings,
    platform_view: Arc<dyn PlatformView>,
    rasterizer: Arc<dyn Rasterizer>,
    engine: Arc<Mutex<Engine>>,
}

impl Shell {
    /// Runs the factory protocol and assembles the shell.
    ///
    /// Must be called on the platform thread. Returns `None` if either
    /// factory fails; the cause is logged and never propagated further.
    pub fn create(
        task_runners: TaskRunners,
        settings: Settings,
        on_create_platform_view: PlatformViewFactory,
        on_create_rasterizer: RasterizerFactory,
    ) -> Option<Shell> {
        let context = ShellBuildContext {
            task_runners: task_runners.clone(),
            settings: settings.clone(),
        };

        let platform_view = match on_create_platform_view(&context) {
            Ok(view) => view,
            Err(e) => {
                log::error!("Platform view creation failed: {e:#}");
                return None;
            }
        };
        log::debug!("Platform view '{}' created.", platform_view.name());

        let (tx, rx) = crossbeam_channel::bounded(1);
        let gpu_context = ShellBuildContext {
            task_runners: task_runners.clone(),
            settings: settings.clone(),
        };
        task_runners.gpu().post(move || {
            let _ = tx.send(on_create_rasterizer(&gpu_context));
        });
        let rasterizer = match rx.recv() {
            Ok(Ok(rasterizer)) => rasterizer,
            Ok(Err(e)) => {
                log::error!("Rasterizer creation failed: {e:#}");
                return None;
            }
            Err(_) => {
                log::error!("Rasterizer creation task was dropped before it ran.");
                return None;
            }
        };

        let (tx, rx) = crossbeam_channel::bounded(1);
        let engine_settings = settings.clone();
        task_runners.ui().post(move || {
            let _ = tx.send(Arc::new(Mutex::new(Engine::new(engine_settings))));
        });
        let engine = match rx.recv() {
            Ok(engine) => engine,
            Err(_) => {
                log::error!("Engine creation task was dropped before it ran.");
                return None;
            }
        };

        log::info!("Shell '{}' assembled.", task_runners.label());
        Some(Shell {
            task_runners,
            settings,
            platform_view,
            rasterizer,
            engine,
        })
    }

    /// The task runners this shell executes on.
    pub fn task_runners(&self) -> &TaskRunners {
        &self.task_runners
    }

    /// The settings this shell was assembled with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The platform view this shell owns.
    pub fn platform_view(&self) -> &Arc<dyn PlatformView> {
        &self.platform_view
    }

    /// A weak runtime handle for tasks posted to the UI queue; upgrades to
    /// `None` once the shell is gone.
    pub fn engine(&self) -> Weak<Mutex<Engine>> {
        Arc::downgrade(&self.engine)
    }

    /// Captures the most recently rendered frame, synchronously, on the
    /// calling thread. The one deliberately non-queued operation: the
    /// caller needs the result back without maintaining a response
    /// channel.
    pub fn screenshot(&self, kind: ScreenshotKind, base64_encode: bool) -> Screenshot {
        self.rasterizer.screenshot(kind, base64_encode)
    }
}
