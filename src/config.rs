//! View configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `avatar_view.ron` file (if exists)
//! 3. Environment variables prefixed with `AVATAR_VIEW_`
//!
//! Example environment variable: `AVATAR_VIEW_TOOLTIP__HORIZONTAL_OFFSET_FACTOR=1.0`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main view configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewConfig {
    #[serde(default)]
    pub resources: ResourceConfig,

    #[serde(default)]
    pub tooltip: TooltipConfig,

    #[serde(default)]
    pub exp_bar: ExpBarConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub debug: DebugConfig,
}

/// Where avatar images are looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub root: PathBuf,
    /// Subdirectory of `root` holding avatar images
    pub avatar_dir: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            avatar_dir: String::from("UIImage"),
        }
    }
}

/// Tooltip placement relative to the hovered view
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TooltipConfig {
    /// Fraction of the view's width added to the tooltip's x
    pub horizontal_offset_factor: f32,
    /// Added to the tooltip's y, in canvas units
    pub vertical_offset: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            horizontal_offset_factor: 0.5,
            vertical_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpBarConfig {
    /// Bar width; the fill height is the percentage itself
    pub width: f32,
    pub label_prefix: String,
}

impl Default for ExpBarConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            label_prefix: String::from("EXP"),
        }
    }
}

/// Screen and portrait panel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Portrait panel size in canvas units
    pub panel_width: f32,
    pub panel_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            panel_width: 240.0,
            panel_height: 120.0,
        }
    }
}

/// Debug/development settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DebugConfig {
    /// Enable verbose logging
    pub verbose_logging: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl ViewConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `avatar_view.ron` file (if exists)
    /// 3. Environment variables prefixed with `AVATAR_VIEW_` (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("avatar_view")
    }

    /// Same as `load`, reading the optional file `<name>.ron`
    pub fn load_from(name: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("resources.root", "assets")?
            .set_default("resources.avatar_dir", "UIImage")?
            .set_default("tooltip.horizontal_offset_factor", 0.5)?
            .set_default("tooltip.vertical_offset", 0.0)?
            .set_default("exp_bar.width", 20.0)?
            .set_default("exp_bar.label_prefix", "EXP")?
            .set_default("ui.viewport_width", 1280_i64)?
            .set_default("ui.viewport_height", 720_i64)?
            .set_default("ui.panel_width", 240.0)?
            .set_default("ui.panel_height", 120.0)?
            .set_default("debug.verbose_logging", false)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(name)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (AVATAR_VIEW_TOOLTIP__VERTICAL_OFFSET, etc.)
            .add_source(Environment::with_prefix("AVATAR_VIEW").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
