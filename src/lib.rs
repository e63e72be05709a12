// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator

pub mod types;
pub mod stats;
pub mod tree;
pub mod pool;
pub mod probe;
pub mod accumulator;
pub mod simulation;
pub mod session;

pub use types::*;
pub use simulation::{ProbeSimulation, SimulationError};
pub use session::{Session, SessionError};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ProbeSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        stations: u32,
        ready_stations: u32,
        probe_level: u32,
        scenarios: u32,
        advanced: bool,
    ) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let variant = if advanced { Variant::Advanced } else { Variant::Basic };
        Self::from_config(SimulationConfig::new(
            stations,
            ready_stations,
            probe_level,
            scenarios,
            variant,
        ))
    }

    /// Pins the RNG so every following run is reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Runs the simulation and returns the full report; errors come back as
    /// their message.
    #[wasm_bindgen(js_name = run)]
    pub fn run_js(&mut self) -> Result<JsValue, JsValue> {
        let report = self.run().map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&report).map_err(JsValue::from)
    }

    pub fn status(&self) -> Option<String> {
        self.last_report.as_ref().map(|r| r.status.clone())
    }

    /// Averaged success share of the last run, in percent.
    #[wasm_bindgen(js_name = successPercent)]
    pub fn success_percent(&self) -> f64 { self.percentages().success }

    #[wasm_bindgen(js_name = collisionPercent)]
    pub fn collision_percent(&self) -> f64 { self.percentages().collision }

    #[wasm_bindgen(js_name = idlePercent)]
    pub fn idle_percent(&self) -> f64 { self.percentages().idle }

    pub fn get_config(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.config).unwrap_or(JsValue::NULL)
    }
}
