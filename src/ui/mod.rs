//! UI system - portrait panels, tooltips and the widgets they write into

pub mod avatar_view;
pub mod canvas;
pub mod hud;
pub mod pointer;
pub mod resources;
pub mod tooltip;
pub mod widgets;

pub use avatar_view::{AvatarView, DisplaySnapshot};
pub use canvas::{Canvas, RectTransform, UiCamera};
pub use hud::Hud;
pub use pointer::{HoverTracker, PointerEvent};
pub use resources::{DirTextureLoader, Texture, TextureLoader};
pub use tooltip::{
    CharacterAttributeTips, HoverTooltipController, TemplateFactory, TooltipFactory, TooltipPhase,
};
pub use widgets::{AvatarImage, AvatarWidgets, ExpBar, TextLabel};
