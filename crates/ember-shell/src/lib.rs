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

//! # Ember Shell
//!
//! Assembles the Ember engine into a running instance and orchestrates its
//! lifecycle on behalf of a host application: worker-thread topology, the
//! component factory protocol, cross-thread message posting, and teardown
//! order.
//!
//! The entry point for embedders is [`ShellHolder`].

#![warn(missing_docs)]

pub mod engine;
pub mod holder;
pub mod payload;
pub mod platform_view;
pub mod rasterizer;
pub mod shell;

pub use engine::{Engine, EngineError};
pub use holder::ShellHolder;
pub use payload::{PointerData, PointerDataPacket, RunConfiguration, ViewportMetrics};
pub use platform_view::{PlatformView, WeakPlatformView};
pub use rasterizer::{Rasterizer, Screenshot, ScreenshotKind};
pub use shell::{PlatformViewFactory, RasterizerFactory, Shell, ShellBuildContext};
