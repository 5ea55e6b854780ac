//! Faults surfaced by the view instead of crashing the host

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("widget `{0}` is not assigned")]
    MissingWidget(&'static str),

    #[error("character model was dropped while the view was still bound")]
    ModelDropped,

    #[error("view has no character bound; call init() first")]
    NotBound,

    /// Pointer exit arrived before any pointer enter created the tooltip
    #[error("tooltip was never created (pointer exit without a prior enter)")]
    TooltipNotCreated,

    #[error("level {level} has no experience threshold (table has {table_len} entries)")]
    LevelOutOfRange { level: i32, table_len: usize },

    #[error("experience range for level {level} is empty (both bounds are {threshold})")]
    DegenerateExpRange { level: i32, threshold: i32 },

    #[error("character is already shown in HUD slot {slot}")]
    AlreadyShown { slot: usize },

    #[error("screen point could not be mapped into canvas space")]
    CoordinateTranslation,

    #[error("texture not found: {0:?}")]
    TextureNotFound(PathBuf),

    #[error("failed to decode texture: {0}")]
    TextureDecode(#[from] image::ImageError),
}
