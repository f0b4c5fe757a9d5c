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

//! Value payloads crossing the UI queue boundary.
//!
//! [`ViewportMetrics`] is copied into posted tasks. [`RunConfiguration`]
//! and [`PointerDataPacket`] deliberately do not implement `Clone`: they
//! are moved into exactly one posted task so ownership is never duplicated
//! across threads.

/// The geometry of the view the engine renders into.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Ratio of physical pixels to logical pixels.
    pub device_pixel_ratio: f64,
    /// Width of the view in physical pixels.
    pub physical_width: f64,
    /// Height of the view in physical pixels.
    pub physical_height: f64,
    /// Physical padding inset from the top edge (system chrome).
    pub physical_padding_top: f64,
    /// Physical padding inset from the bottom edge (system chrome).
    pub physical_padding_bottom: f64,
}

/// Everything the engine runtime needs to start executing application
/// code. Move-only: launched exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct RunConfiguration {
    bundle_path: String,
    entrypoint: String,
}

impl RunConfiguration {
    /// Describes an application bundle and the entrypoint to run in it.
    pub fn new(bundle_path: impl Into<String>, entrypoint: impl Into<String>) -> Self {
        Self {
            bundle_path: bundle_path.into(),
            entrypoint: entrypoint.into(),
        }
    }

    /// Path to the application bundle.
    pub fn bundle_path(&self) -> &str {
        &self.bundle_path
    }

    /// Name of the entrypoint function to execute.
    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    /// A configuration is usable only if it names an entrypoint.
    pub fn is_valid(&self) -> bool {
        !self.entrypoint.is_empty()
    }
}

/// The kind of state change a single pointer sample describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerChange {
    /// The pointer input was cancelled by the platform.
    Cancel,
    /// A pointer became tracked.
    Add,
    /// A pointer stopped being tracked.
    Remove,
    /// The pointer moved without contact.
    Hover,
    /// The pointer made contact.
    Down,
    /// The pointer moved while in contact.
    Move,
    /// The pointer broke contact.
    Up,
}

/// One pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerData {
    /// Timestamp of the sample, microseconds since an arbitrary epoch.
    pub time_stamp_us: u64,
    /// The state change this sample describes.
    pub change: PointerChange,
    /// Platform device identifier.
    pub device: i64,
    /// Horizontal position in physical pixels.
    pub x: f64,
    /// Vertical position in physical pixels.
    pub y: f64,
}

/// A batch of pointer samples delivered to the engine in one message.
/// Move-only: ownership transfers into the posted task.
#[derive(Debug, Default, PartialEq)]
pub struct PointerDataPacket {
    data: Vec<PointerData>,
}

impl PointerDataPacket {
    /// Wraps a batch of samples.
    pub fn new(data: Vec<PointerData>) -> Self {
        Self { data }
    }

    /// The samples in this packet, in delivery order.
    pub fn data(&self) -> &[PointerData] {
        &self.data
    }
}
