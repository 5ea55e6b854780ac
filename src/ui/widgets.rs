//! Widget state written by the view and read by the renderer

use glam::Vec2;

use super::canvas::RectTransform;
use super::resources::Texture;
use crate::error::ViewError;

/// Single line of text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLabel {
    pub text: String,
}

impl TextLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Vertical fill bar; `size.y` is the fill height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpBar {
    pub size: Vec2,
}

impl ExpBar {
    pub fn new(width: f32) -> Self {
        Self {
            size: Vec2::new(width, 0.0),
        }
    }

    pub fn fill_height(&self) -> f32 {
        self.size.y
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvatarImage {
    pub texture: Option<Texture>,
}

/// Every widget slot of the portrait panel.
///
/// Slots are optional so a partially assigned layout can be detected with
/// `validate` instead of failing deep inside a change handler.
#[derive(Debug, Clone, Default)]
pub struct AvatarWidgets {
    pub avatar_image: Option<AvatarImage>,
    pub hero_name: Option<TextLabel>,
    pub level: Option<TextLabel>,
    pub attack: Option<TextLabel>,
    pub defense: Option<TextLabel>,
    pub move_speed: Option<TextLabel>,
    pub force_power: Option<TextLabel>,
    pub agile_power: Option<TextLabel>,
    pub intelligence_power: Option<TextLabel>,
    pub exp: Option<TextLabel>,
    pub exp_bar: Option<ExpBar>,
    /// Geometry of the view itself, used to place the tooltip
    pub rect: RectTransform,
}

impl AvatarWidgets {
    /// Layout with every slot assigned
    pub fn complete(rect: RectTransform, exp_bar_width: f32) -> Self {
        Self {
            avatar_image: Some(AvatarImage::default()),
            hero_name: Some(TextLabel::default()),
            level: Some(TextLabel::default()),
            attack: Some(TextLabel::default()),
            defense: Some(TextLabel::default()),
            move_speed: Some(TextLabel::default()),
            force_power: Some(TextLabel::default()),
            agile_power: Some(TextLabel::default()),
            intelligence_power: Some(TextLabel::default()),
            exp: Some(TextLabel::default()),
            exp_bar: Some(ExpBar::new(exp_bar_width)),
            rect,
        }
    }

    /// Fail with the first unassigned slot
    pub fn validate(&self) -> Result<(), ViewError> {
        let slots = [
            ("avatar_image", self.avatar_image.is_some()),
            ("hero_name", self.hero_name.is_some()),
            ("level", self.level.is_some()),
            ("attack", self.attack.is_some()),
            ("defense", self.defense.is_some()),
            ("move_speed", self.move_speed.is_some()),
            ("force_power", self.force_power.is_some()),
            ("agile_power", self.agile_power.is_some()),
            ("intelligence_power", self.intelligence_power.is_some()),
            ("exp", self.exp.is_some()),
            ("exp_bar", self.exp_bar.is_some()),
        ];
        match slots.iter().find(|(_, present)| !present) {
            Some((name, _)) => Err(ViewError::MissingWidget(*name)),
            None => Ok(()),
        }
    }
}
