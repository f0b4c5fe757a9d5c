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

//! The rendering-facing component boundary.
//!
//! The rasterizer itself (GPU command submission, compositing) is an
//! external collaborator; this module only specifies the contract the
//! shell assembles against and the screenshot value types flowing back
//! across it.

/// What a screenshot request should capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenshotKind {
    /// Raw uncompressed surface pixels.
    UncompressedImage,
    /// The surface encoded as a compressed image.
    CompressedImage,
}

/// The result of a screenshot request: pixel bytes plus the captured
/// dimensions. Empty when the request could not be served.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screenshot {
    /// Captured bytes; encoding depends on the requested kind.
    pub data: Vec<u8>,
    /// Captured width in physical pixels.
    pub width: u32,
    /// Captured height in physical pixels.
    pub height: u32,
}

impl Screenshot {
    /// The empty result returned when no shell is available to serve the
    /// request.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if this result carries no captured pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.width == 0 && self.height == 0
    }
}

/// The component that turns layer trees into GPU work.
///
/// Implemented by the embedder and produced by the rasterizer factory
/// callback on the GPU thread during shell assembly.
pub trait Rasterizer: Send + Sync {
    /// Captures the most recently rendered frame.
    ///
    /// Called synchronously from whichever thread asked for the
    /// screenshot; implementations must tolerate off-GPU-thread reads or
    /// perform their own rendezvous.
    fn screenshot(&self, kind: ScreenshotKind, base64_encode: bool) -> Screenshot;
}
