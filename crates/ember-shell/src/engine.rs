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

//! The engine runtime object.
//!
//! The engine's event and animation loop body is outside this crate; what
//! lives here is the runtime-facing state the shell manages across the UI
//! queue boundary: starting the runtime with a configuration, view
//! geometry, and pointer delivery. The engine is built on the UI queue and
//! only ever touched from tasks posted there.

use crate::payload::{PointerDataPacket, RunConfiguration, ViewportMetrics};
use ember_core::Settings;
use std::fmt;

/// Failure to start the engine runtime.
#[derive(Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The runtime was already started; a configuration can be launched
    /// only once per engine.
    AlreadyRunning,
    /// The configuration cannot be run (for example, no entrypoint).
    InvalidConfiguration(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AlreadyRunning => {
                write!(f, "The engine runtime is already running.")
            }
            EngineError::InvalidConfiguration(reason) => {
                write!(f, "The run configuration is not usable: {reason}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// The core engine/runtime object owned by the shell.
pub struct Engine {
    settings: Settings,
    viewport_metrics: ViewportMetrics,
    configuration: Option<RunConfiguration>,
    packets_dispatched: u64,
    last_packet: Option<PointerDataPacket>,
}

impl Engine {
    /// Creates a stopped engine with default view geometry.
    pub fn new(settings: Settings) -> Self {
        if settings.verbose_logging {
            log::info!("Engine created with verbose diagnostics enabled.");
        }
        Self {
            settings,
            viewport_metrics: ViewportMetrics::default(),
            configuration: None,
            packets_dispatched: 0,
            last_packet: None,
        }
    }

    /// Starts the runtime with `config`, taking ownership of it.
    ///
    /// Succeeds at most once per engine; later calls fail with
    /// [`EngineError::AlreadyRunning`] and leave the original
    /// configuration in place.
    pub fn run(&mut self, config: RunConfiguration) -> Result<(), EngineError> {
        if self.configuration.is_some() {
            return Err(EngineError::AlreadyRunning);
        }
        if !config.is_valid() {
            return Err(EngineError::InvalidConfiguration(
                "no entrypoint".to_string(),
            ));
        }
        log::info!(
            "Engine runtime starting: bundle '{}', entrypoint '{}'.",
            config.bundle_path(),
            config.entrypoint()
        );
        self.configuration = Some(config);
        Ok(())
    }

    /// Updates the engine's view geometry.
    pub fn set_viewport_metrics(&mut self, metrics: ViewportMetrics) {
        self.viewport_metrics = metrics;
    }

    /// Delivers a batch of pointer samples, taking ownership of it.
    pub fn dispatch_pointer_data_packet(&mut self, packet: PointerDataPacket) {
        self.packets_dispatched += 1;
        self.last_packet = Some(packet);
    }

    /// Whether the runtime has been started.
    pub fn is_running(&self) -> bool {
        self.configuration.is_some()
    }

    /// The configuration the runtime was started with, if any.
    pub fn configuration(&self) -> Option<&RunConfiguration> {
        self.configuration.as_ref()
    }

    /// The most recently applied view geometry.
    pub fn viewport_metrics(&self) -> ViewportMetrics {
        self.viewport_metrics
    }

    /// Number of pointer packets delivered so far.
    pub fn packets_dispatched(&self) -> u64 {
        self.packets_dispatched
    }

    /// The most recently delivered pointer packet, if any.
    pub fn last_packet(&self) -> Option<&PointerDataPacket> {
        self.last_packet.as_ref()
    }

    /// The settings this engine was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_succeeds_once_and_keeps_the_first_configuration() {
        let mut engine = Engine::new(Settings::default());
        assert!(!engine.is_running());

        engine
            .run(RunConfiguration::new("bundle", "main"))
            .expect("first run should succeed");
        assert!(engine.is_running());

        let err = engine
            .run(RunConfiguration::new("other", "alt"))
            .expect_err("second run must fail");
        assert_eq!(err, EngineError::AlreadyRunning);
        assert_eq!(engine.configuration().unwrap().entrypoint(), "main");
    }

    #[test]
    fn run_rejects_configurations_without_entrypoint() {
        let mut engine = Engine::new(Settings::default());
        let err = engine
            .run(RunConfiguration::new("bundle", ""))
            .expect_err("empty entrypoint must be rejected");
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        assert!(!engine.is_running());
    }

    #[test]
    fn viewport_and_pointer_state_are_tracked() {
        let mut engine = Engine::new(Settings::default());

        let metrics = ViewportMetrics {
            device_pixel_ratio: 2.0,
            physical_width: 800.0,
            physical_height: 600.0,
            ..Default::default()
        };
        engine.set_viewport_metrics(metrics);
        assert_eq!(engine.viewport_metrics(), metrics);

        engine.dispatch_pointer_data_packet(PointerDataPacket::default());
        engine.dispatch_pointer_data_packet(PointerDataPacket::default());
        assert_eq!(engine.packets_dispatched(), 2);
        assert!(engine.last_packet().is_some());
    }
}
