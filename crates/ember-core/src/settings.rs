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

//! Immutable engine configuration snapshot.

/// Configuration captured at shell construction and owned, unchanged, for
/// the lifetime of the instance.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Render through a software fallback instead of the GPU backend.
    /// Forwarded to the platform-view factory at assembly time.
    pub enable_software_rendering: bool,
    /// Emit verbose engine diagnostics.
    pub verbose_logging: bool,
}
