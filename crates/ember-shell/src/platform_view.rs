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

//! The platform-facing component and its non-owning handle.
//!
//! The platform view is owned by the [`Shell`](crate::shell::Shell) and may
//! be destroyed on another thread while the host still holds references to
//! it. Those references are therefore weak handles over the `Arc` control
//! block: upgrading either yields a live view or `None`, never a
//! half-destroyed object.

use std::sync::{Arc, Weak};

/// The component that mediates between the engine and the host platform
/// (input delivery, surface lifecycle notifications, accessibility).
///
/// Implemented by the embedder and produced by the platform-view factory
/// callback on the platform thread during shell assembly.
pub trait PlatformView: Send + Sync {
    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Notifies the view that its rendering surface was created.
    fn notify_surface_created(&self);

    /// Notifies the view that its rendering surface was destroyed.
    fn notify_surface_destroyed(&self);
}

/// A non-owning handle to the shell's platform view.
///
/// Must be re-validated with [`upgrade`](Self::upgrade) before every use;
/// once the shell is destroyed the handle is permanently empty, observable
/// from any thread with no stale intermediate state.
#[derive(Clone)]
pub struct WeakPlatformView {
    inner: Weak<dyn PlatformView>,
}

impl WeakPlatformView {
    /// Produces a weak handle to `view` without taking ownership.
    pub fn downgrade(view: &Arc<dyn PlatformView>) -> Self {
        Self {
            inner: Arc::downgrade(view),
        }
    }

    /// Attempts to obtain a live reference to the view.
    pub fn upgrade(&self) -> Option<Arc<dyn PlatformView>> {
        self.inner.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubView;

    impl PlatformView for StubView {
        fn name(&self) -> &str {
            "stub"
        }
        fn notify_surface_created(&self) {}
        fn notify_surface_destroyed(&self) {}
    }

    #[test]
    fn handle_tracks_owner_lifetime() {
        let view: Arc<dyn PlatformView> = Arc::new(StubView);
        let handle = WeakPlatformView::downgrade(&view);

        assert_eq!(handle.upgrade().unwrap().name(), "stub");
        drop(view);
        assert!(handle.upgrade().is_none());
    }

    #[test]
    fn clones_share_the_control_block() {
        let view: Arc<dyn PlatformView> = Arc::new(StubView);
        let first = WeakPlatformView::downgrade(&view);
        let second = first.clone();

        drop(view);
        assert!(first.upgrade().is_none());
        assert!(second.upgrade().is_none());
    }
}
