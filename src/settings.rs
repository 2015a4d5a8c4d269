//! Scene configuration
//!
//! Every knob has a default matching the shipped scene. Overrides can be
//! stored as JSON in LocalStorage on the web.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::phrases::default_phrases;
use crate::sim::scheme::PaletteColor;
use crate::sim::text_fit::FontSpec;

/// Hex colors for each palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub orange: String,
    pub pink: String,
    pub blue: String,
    pub black: String,
    /// Canvas clear color
    pub background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            orange: "#FF5F00".into(),
            pink: "#E84EB5".into(),
            blue: "#2F80FF".into(),
            black: "#000000".into(),
            background: "#FF5F00".into(),
        }
    }
}

impl Palette {
    pub fn hex(&self, color: PaletteColor) -> &str {
        match color {
            PaletteColor::Orange => &self.orange,
            PaletteColor::Pink => &self.pink,
            PaletteColor::Blue => &self.blue,
            PaletteColor::Black => &self.black,
        }
    }
}

/// Launcher box geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub width: f32,
    pub height: f32,
    pub chamfer: f32,
    /// Gap between the box bottom and the viewport bottom
    pub bottom_gap: f32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            width: BOX_W,
            height: BOX_H,
            chamfer: BOX_CHAMFER,
            bottom_gap: BOX_BOTTOM_GAP,
        }
    }
}

impl LauncherConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Resting position for a viewport: centered, sitting near the bottom
    pub fn base_position(&self, viewport: Vec2) -> Vec2 {
        Vec2::new(
            viewport.x / 2.0,
            viewport.y - self.height / 2.0 - self.bottom_gap,
        )
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Stickers spawned by the explosion
    pub launch_count: usize,
    pub gravity: f32,
    pub palette: Palette,
    pub font_family: String,
    pub font_weight: u16,
    pub phrases: Vec<String>,
    pub launcher: LauncherConfig,

    // === Timing (ms) ===
    pub vibrate_ms: f64,
    pub scroll_unlock_delay_ms: f64,
    pub scroll_debounce_ms: f64,

    // === World ===
    pub wall_thickness: f32,
    /// Dynamic bodies deeper than this below the viewport are removed
    pub cleanup_margin: f32,
    pub pointer_stiffness: f32,
    pub max_pixel_ratio: f64,

    /// Fixed RNG seed (random per page load when absent)
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            launch_count: LAUNCH_COUNT,
            gravity: GRAVITY,
            palette: Palette::default(),
            font_family: "system-ui, -apple-system, Segoe UI, Roboto, Arial".into(),
            font_weight: 900,
            phrases: default_phrases(),
            launcher: LauncherConfig::default(),

            vibrate_ms: VIBRATE_MS,
            scroll_unlock_delay_ms: SCROLL_UNLOCK_DELAY_MS,
            scroll_debounce_ms: SCROLL_DEBOUNCE_MS,

            wall_thickness: WALL_THICKNESS,
            cleanup_margin: CLEANUP_MARGIN,
            pointer_stiffness: POINTER_STIFFNESS,
            max_pixel_ratio: MAX_PIXEL_RATIO,

            seed: None,
        }
    }
}

impl SceneConfig {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "sticker_burst_config";

    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.font_family.clone(), self.font_weight)
    }

    /// Parse a (possibly partial) JSON override; missing fields use defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Device pixel ratio clamped to the configured cap
    pub fn pixel_ratio(&self, device_ratio: f64) -> f64 {
        device_ratio.max(1.0).min(self.max_pixel_ratio)
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded scene config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored scene config: {e}"),
                }
            }
        }

        log::info!("Using default scene config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Scene config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
