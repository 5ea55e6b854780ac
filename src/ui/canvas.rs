//! Canvas, camera and widget geometry
//!
//! Three spaces are involved:
//! - world: where widgets live (`RectTransform::position`)
//! - screen: pixels, origin bottom-left, y up
//! - canvas-local: origin at the canvas center, in canvas units
//!
//! egui works in points with origin top-left and y down; the camera converts
//! between its screen space and egui positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Camera rendering the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiCamera {
    /// World point shown at the viewport center
    pub center: Vec2,
    pub pixels_per_unit: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl UiCamera {
    pub fn new(center: Vec2, pixels_per_unit: f32, viewport: Vec2) -> Self {
        Self {
            center,
            pixels_per_unit,
            viewport,
        }
    }

    /// Camera whose world units are screen pixels
    pub fn screen_space(viewport: Vec2) -> Self {
        Self::new(viewport * 0.5, 1.0, viewport)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.center) * self.pixels_per_unit + self.viewport * 0.5
    }

    /// Inverse of `world_to_screen`; `None` for a degenerate scale
    pub fn screen_to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.pixels_per_unit == 0.0 || !self.pixels_per_unit.is_finite() {
            return None;
        }
        Some((screen - self.viewport * 0.5) / self.pixels_per_unit + self.center)
    }

    pub fn screen_to_egui(&self, screen: Vec2) -> egui::Pos2 {
        egui::pos2(screen.x, self.viewport.y - screen.y)
    }

    pub fn egui_to_screen(&self, pos: egui::Pos2) -> Vec2 {
        Vec2::new(pos.x, self.viewport.y - pos.y)
    }
}

impl Default for UiCamera {
    fn default() -> Self {
        Self::screen_space(Vec2::new(1280.0, 720.0))
    }
}

/// Root rectangle that tooltips are parented to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// World position of the canvas center
    pub center: Vec2,
    /// Size in canvas units
    pub size: Vec2,
    /// World units per canvas unit
    pub scale: f32,
}

impl Canvas {
    pub fn new(center: Vec2, size: Vec2, scale: f32) -> Self {
        Self {
            center,
            size,
            scale,
        }
    }

    /// Canvas covering a screen-space camera's whole viewport
    pub fn overlay(camera: &UiCamera) -> Self {
        Self::new(camera.center, camera.viewport, 1.0 / camera.pixels_per_unit)
    }

    /// Translate a screen point into this canvas's local space
    pub fn screen_point_to_local(&self, screen: Vec2, camera: &UiCamera) -> Option<Vec2> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        let world = camera.screen_to_world(screen)?;
        let local = (world - self.center) / self.scale;
        log::trace!(
            "screen_point_to_local: screen({:.1},{:.1}) -> world({:.1},{:.1}) -> local({:.1},{:.1})",
            screen.x,
            screen.y,
            world.x,
            world.y,
            local.x,
            local.y
        );
        Some(local)
    }

    pub fn local_to_screen(&self, local: Vec2, camera: &UiCamera) -> Vec2 {
        camera.world_to_screen(self.center + local * self.scale)
    }
}

/// Position and size of a widget
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectTransform {
    /// World position of the pivot
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl RectTransform {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }
}
