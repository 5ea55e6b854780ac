//! # Avatar View - character portrait HUD
//!
//! Binds an observable character model to a portrait panel (avatar, name,
//! level, combat stats, experience bar) and shows a detail tooltip on hover.

pub mod config;
pub mod error;
pub mod model;
pub mod ui;

pub use error::ViewError;
pub use ui::AvatarView;

/// Common imports for internal use
pub mod prelude {
    pub use crate::config::ViewConfig;
    pub use crate::error::ViewError;
    pub use crate::model::{CharacterAttributes, CharacterModel, ExpTable};
    pub use crate::ui::{AvatarView, AvatarWidgets, Canvas, PointerEvent, RectTransform, UiCamera};
    pub use glam::Vec2;
}
