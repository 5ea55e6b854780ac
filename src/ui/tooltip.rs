//! Hover tooltip with extended character detail

use glam::Vec2;

use super::canvas::{Canvas, RectTransform, UiCamera};
use crate::config::TooltipConfig;
use crate::error::ViewError;
use crate::model::CharacterAttributes;

/// One `label: value` row of the tooltip
#[derive(Debug, Clone, PartialEq)]
pub struct TipsLine {
    pub label: String,
    pub value: String,
}

impl TipsLine {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Tooltip panel showing a character's attributes in detail
#[derive(Debug, Clone)]
pub struct CharacterAttributeTips {
    title: String,
    lines: Vec<TipsLine>,
    anchored_position: Vec2,
    visible: bool,
    /// Background alpha of the window frame
    opacity: u8,
}

impl CharacterAttributeTips {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            lines: Vec::new(),
            anchored_position: Vec2::ZERO,
            visible: false,
            opacity: 220,
        }
    }

    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    /// Repopulate from a character snapshot
    pub fn modify(&mut self, attrs: &CharacterAttributes) {
        self.title = attrs.name.clone();

        let exp = match attrs.next_level_need_exp() {
            Ok(next) => format!("{} / {}", attrs.exp, next),
            Err(_) => attrs.exp.to_string(),
        };

        self.lines = vec![
            TipsLine::new("Level", attrs.level.to_string()),
            TipsLine::new("Attack", attrs.attack.to_string()),
            TipsLine::new("Defense", attrs.defense.to_string()),
            TipsLine::new("Move Speed", attrs.move_speed.to_string()),
            TipsLine::new("Force", format!("{:.1}", attrs.force_power)),
            TipsLine::new("Agility", format!("{:.1}", attrs.agile_power)),
            TipsLine::new("Intelligence", format!("{:.1}", attrs.intelligence_power)),
            TipsLine::new("Exp", exp),
        ];
    }

    pub fn reveal(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[TipsLine] {
        &self.lines
    }

    /// Value of the row labelled `label`
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }

    /// Position in the parent canvas's local space
    pub fn anchored_position(&self) -> Vec2 {
        self.anchored_position
    }

    pub fn set_anchored_position(&mut self, position: Vec2) {
        self.anchored_position = position;
    }

    /// Render at the anchored position
    pub fn show(&self, ctx: &egui::Context, canvas: &Canvas, camera: &UiCamera) {
        if !self.visible {
            return;
        }

        let screen = canvas.local_to_screen(self.anchored_position, camera);
        let pos = camera.screen_to_egui(screen);

        egui::Window::new("##character_attribute_tips")
            .id(egui::Id::new(("character_attribute_tips", self.title.as_str())))
            .title_bar(false)
            .resizable(false)
            .fixed_pos(pos)
            .frame(egui::Frame {
                fill: egui::Color32::from_rgba_unmultiplied(0, 0, 0, self.opacity),
                stroke: egui::Stroke::new(1.0, egui::Color32::from_rgb(100, 100, 100)),
                inner_margin: egui::Margin::same(8),
                outer_margin: egui::Margin::same(0),
                corner_radius: egui::CornerRadius::same(4),
                shadow: egui::epaint::Shadow::NONE,
            })
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(&self.title)
                        .color(egui::Color32::WHITE)
                        .strong(),
                );
                ui.separator();
                egui::Grid::new("##character_attribute_rows")
                    .num_columns(2)
                    .show(ui, |ui| {
                        for line in &self.lines {
                            ui.label(
                                egui::RichText::new(&line.label)
                                    .color(egui::Color32::LIGHT_GRAY)
                                    .size(12.0),
                            );
                            ui.label(
                                egui::RichText::new(&line.value)
                                    .color(egui::Color32::WHITE)
                                    .size(12.0),
                            );
                            ui.end_row();
                        }
                    });
            });
    }
}

impl Default for CharacterAttributeTips {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the tooltip instance the first time it is needed
pub trait TooltipFactory {
    fn instantiate(&mut self, canvas: &Canvas) -> CharacterAttributeTips;
}

impl<F> TooltipFactory for F
where
    F: FnMut(&Canvas) -> CharacterAttributeTips,
{
    fn instantiate(&mut self, canvas: &Canvas) -> CharacterAttributeTips {
        self(canvas)
    }
}

/// Clones a template panel, hidden
#[derive(Debug, Clone, Default)]
pub struct TemplateFactory {
    template: CharacterAttributeTips,
}

impl TemplateFactory {
    pub fn new(template: CharacterAttributeTips) -> Self {
        Self { template }
    }
}

impl TooltipFactory for TemplateFactory {
    fn instantiate(&mut self, _canvas: &Canvas) -> CharacterAttributeTips {
        let mut tips = self.template.clone();
        tips.hide();
        tips
    }
}

/// Where the tooltip is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    NoTooltip,
    Hidden,
    Visible,
}

/// Canvas-local anchor for a tooltip next to `rect`
pub fn tooltip_anchor(
    rect: &RectTransform,
    canvas: &Canvas,
    camera: &UiCamera,
    config: &TooltipConfig,
) -> Result<Vec2, ViewError> {
    let screen = camera.world_to_screen(rect.position);
    let local = canvas
        .screen_point_to_local(screen, camera)
        .ok_or(ViewError::CoordinateTranslation)?;
    Ok(Vec2::new(
        local.x + rect.size.x * config.horizontal_offset_factor,
        local.y + config.vertical_offset,
    ))
}

/// Shows the tooltip on pointer enter and hides it on exit.
///
/// The panel is created once, on the first enter, and reused afterwards.
pub struct HoverTooltipController {
    factory: Box<dyn TooltipFactory>,
    instance: Option<CharacterAttributeTips>,
    config: TooltipConfig,
}

impl HoverTooltipController {
    pub fn new(factory: Box<dyn TooltipFactory>, config: TooltipConfig) -> Self {
        Self {
            factory,
            instance: None,
            config,
        }
    }

    pub fn phase(&self) -> TooltipPhase {
        match &self.instance {
            None => TooltipPhase::NoTooltip,
            Some(tips) if tips.is_visible() => TooltipPhase::Visible,
            Some(_) => TooltipPhase::Hidden,
        }
    }

    pub fn tooltip(&self) -> Option<&CharacterAttributeTips> {
        self.instance.as_ref()
    }

    /// Populate, place and reveal the tooltip. Returns its anchored position.
    pub fn on_pointer_enter(
        &mut self,
        attrs: &CharacterAttributes,
        rect: &RectTransform,
        canvas: &Canvas,
        camera: &UiCamera,
    ) -> Result<Vec2, ViewError> {
        let factory = &mut self.factory;
        let tips = self.instance.get_or_insert_with(|| {
            log::debug!("Instantiating character attribute tooltip");
            factory.instantiate(canvas)
        });
        tips.modify(attrs);

        let anchor = tooltip_anchor(rect, canvas, camera, &self.config)?;
        tips.set_anchored_position(anchor);
        tips.reveal();
        Ok(anchor)
    }

    /// Hide the tooltip, keeping it for the next hover
    pub fn on_pointer_exit(&mut self) -> Result<(), ViewError> {
        let tips = self
            .instance
            .as_mut()
            .ok_or(ViewError::TooltipNotCreated)?;
        tips.hide();
        Ok(())
    }

    pub fn show(&self, ctx: &egui::Context, canvas: &Canvas, camera: &UiCamera) {
        if let Some(tips) = &self.instance {
            tips.show(ctx, canvas, camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExpTable;
    use std::cell::Cell;
    use std::rc::Rc;

    fn attrs() -> CharacterAttributes {
        CharacterAttributes {
            name: String::from("Lyra"),
            level: 2,
            exp: 150,
            force_power: 3.94,
            exp_table: ExpTable::new(vec![0, 100, 300]),
            ..Default::default()
        }
    }

    fn scene() -> (UiCamera, Canvas, RectTransform) {
        let camera = UiCamera::screen_space(Vec2::new(800.0, 600.0));
        let canvas = Canvas::overlay(&camera);
        let rect = RectTransform::new(Vec2::new(100.0, 500.0), Vec2::new(240.0, 120.0));
        (camera, canvas, rect)
    }

    #[test]
    fn test_anchor_offsets_half_width() {
        let (camera, canvas, rect) = scene();
        let anchor = tooltip_anchor(&rect, &canvas, &camera, &TooltipConfig::default()).unwrap();
        // local(100, 500) = (-300, 200); + 240 / 2 on x
        assert_eq!(anchor, Vec2::new(-180.0, 200.0));
    }

    #[test]
    fn test_anchor_with_degenerate_camera() {
        let (_, canvas, rect) = scene();
        let camera = UiCamera::new(Vec2::ZERO, 0.0, Vec2::new(800.0, 600.0));
        assert!(matches!(
            tooltip_anchor(&rect, &canvas, &camera, &TooltipConfig::default()),
            Err(ViewError::CoordinateTranslation)
        ));
    }

    #[test]
    fn test_phase_transitions() {
        let (camera, canvas, rect) = scene();
        let mut ctl = HoverTooltipController::new(
            Box::new(TemplateFactory::default()),
            TooltipConfig::default(),
        );
        assert_eq!(ctl.phase(), TooltipPhase::NoTooltip);

        ctl.on_pointer_enter(&attrs(), &rect, &canvas, &camera).unwrap();
        assert_eq!(ctl.phase(), TooltipPhase::Visible);

        ctl.on_pointer_exit().unwrap();
        assert_eq!(ctl.phase(), TooltipPhase::Hidden);

        ctl.on_pointer_enter(&attrs(), &rect, &canvas, &camera).unwrap();
        assert_eq!(ctl.phase(), TooltipPhase::Visible);
    }

    #[test]
    fn test_exit_before_enter_is_a_fault() {
        let mut ctl = HoverTooltipController::new(
            Box::new(TemplateFactory::default()),
            TooltipConfig::default(),
        );
        assert!(matches!(ctl.on_pointer_exit(), Err(ViewError::TooltipNotCreated)));
        assert_eq!(ctl.phase(), TooltipPhase::NoTooltip);
    }

    #[test]
    fn test_factory_called_once() {
        let (camera, canvas, rect) = scene();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut ctl = HoverTooltipController::new(
            Box::new(move |_: &Canvas| {
                counter.set(counter.get() + 1);
                CharacterAttributeTips::new()
            }),
            TooltipConfig::default(),
        );

        for _ in 0..5 {
            ctl.on_pointer_enter(&attrs(), &rect, &canvas, &camera).unwrap();
            ctl.on_pointer_exit().unwrap();
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_tooltip_contents_follow_latest_snapshot() {
        let (camera, canvas, rect) = scene();
        let mut ctl = HoverTooltipController::new(
            Box::new(TemplateFactory::default()),
            TooltipConfig::default(),
        );
        let mut a = attrs();
        ctl.on_pointer_enter(&a, &rect, &canvas, &camera).unwrap();
        let tips = ctl.tooltip().unwrap();
        assert_eq!(tips.title(), "Lyra");
        assert_eq!(tips.value_of("Force"), Some("3.9"));
        assert_eq!(tips.value_of("Exp"), Some("150 / 300"));

        a.level = 1;
        a.attack = 12;
        ctl.on_pointer_enter(&a, &rect, &canvas, &camera).unwrap();
        let tips = ctl.tooltip().unwrap();
        assert_eq!(tips.value_of("Level"), Some("1"));
        assert_eq!(tips.value_of("Attack"), Some("12"));
    }

    #[test]
    fn test_vertical_offset_config() {
        let (camera, canvas, rect) = scene();
        let config = TooltipConfig {
            horizontal_offset_factor: 1.0,
            vertical_offset: -10.0,
        };
        let anchor = tooltip_anchor(&rect, &canvas, &camera, &config).unwrap();
        assert_eq!(anchor, Vec2::new(-60.0, 190.0));
    }
}
