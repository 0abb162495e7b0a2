//! WebAssembly bindings for thermal grids.
//!
//! Provides a thin wrapper around `DiffusionGrid` for browser visualizations.
//! Display modes (temperature vs. material view) live entirely in the client,
//! which simply skips `tick()` while showing the material field.

use wasm_bindgen::prelude::*;

use crate::{
    compute::{Cell, DiffusionGrid, GridStats},
    schema::GridConfig,
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());
}

/// Reference configuration as JSON.
#[wasm_bindgen(js_name = defaultConfig)]
pub fn default_config() -> Result<String, JsValue> {
    serde_json::to_string(&GridConfig::default())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// WebAssembly wrapper for a diffusion grid.
#[wasm_bindgen]
pub struct WasmGrid {
    grid: DiffusionGrid,
}

#[wasm_bindgen]
impl WasmGrid {
    /// Create a new grid from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing GridConfig
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmGrid, JsValue> {
        let config: GridConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;

        let grid = DiffusionGrid::new(&config).map_err(to_js_error)?;

        Ok(WasmGrid { grid })
    }

    /// Advance one tick.
    #[wasm_bindgen]
    pub fn tick(&mut self) {
        self.grid.tick();
    }

    /// Run multiple ticks.
    #[wasm_bindgen]
    pub fn run(&mut self, steps: u64) {
        self.grid.run(steps);
    }

    /// Flip source membership. Returns the new membership.
    #[wasm_bindgen(js_name = toggleSource)]
    pub fn toggle_source(&mut self, row: i32, col: i32) -> Result<bool, JsValue> {
        self.grid
            .toggle_source(row as isize, col as isize)
            .map_err(to_js_error)
    }

    /// Flip sink membership. Returns the new membership.
    #[wasm_bindgen(js_name = toggleSink)]
    pub fn toggle_sink(&mut self, row: i32, col: i32) -> Result<bool, JsValue> {
        self.grid
            .toggle_sink(row as isize, col as isize)
            .map_err(to_js_error)
    }

    /// Row-major temperature field (copied).
    #[wasm_bindgen]
    pub fn temperatures(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.grid.temperatures())
    }

    /// Row-major thermal mass field (copied).
    #[wasm_bindgen(js_name = thermalMass)]
    pub fn thermal_mass(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.grid.thermal_masses())
    }

    #[wasm_bindgen(js_name = temperatureAt)]
    pub fn temperature_at(&self, row: i32, col: i32) -> Result<f64, JsValue> {
        self.grid
            .temperature_at(row as isize, col as isize)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = thermalMassAt)]
    pub fn thermal_mass_at(&self, row: i32, col: i32) -> Result<f64, JsValue> {
        self.grid
            .thermal_mass_at(row as isize, col as isize)
            .map_err(to_js_error)
    }

    /// Source cells as an array of `{row, col}`.
    #[wasm_bindgen(js_name = getSources)]
    pub fn get_sources(&self) -> Result<JsValue, JsValue> {
        to_js_cells(&self.grid.sources().to_vec())
    }

    /// Sink cells as an array of `{row, col}`.
    #[wasm_bindgen(js_name = getSinks)]
    pub fn get_sinks(&self) -> Result<JsValue, JsValue> {
        to_js_cells(&self.grid.sinks().to_vec())
    }

    /// Get grid statistics as JSON.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        let stats = GridStats::from_grid(&self.grid);
        serde_wasm_bindgen::to_value(&stats)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen]
    pub fn rows(&self) -> usize {
        self.grid.dimensions().0
    }

    #[wasm_bindgen]
    pub fn cols(&self) -> usize {
        self.grid.dimensions().1
    }

    #[wasm_bindgen(js_name = tickCount)]
    pub fn tick_count(&self) -> u64 {
        self.grid.tick_count()
    }
}

fn to_js_cells(cells: &[Cell]) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(cells)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn to_js_error(e: crate::compute::GridError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
