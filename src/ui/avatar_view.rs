//! Character portrait panel bound to a `CharacterModel`
//!
//! `AvatarView::init` subscribes to the model's experience, level and power
//! notifications, then refreshes every widget once so the panel matches the
//! model before the first change arrives. Hovering the panel shows a
//! `CharacterAttributeTips` tooltip next to it.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;

use super::canvas::{Canvas, RectTransform, UiCamera};
use super::pointer::{HoverTracker, PointerEvent};
use super::resources::TextureLoader;
use super::tooltip::{HoverTooltipController, TooltipFactory};
use super::widgets::{AvatarWidgets, TextLabel};
use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::model::{CharacterAttributes, CharacterId, CharacterModel, ExpTable, Subscription};

/// Power stats are shown without their fractional part (3.9 -> "3")
pub fn format_power(value: f32) -> String {
    (value as i32).to_string()
}

pub fn format_move_speed(value: f32) -> String {
    value.to_string()
}

pub fn format_exp_label(prefix: &str, rate: i32) -> String {
    format!("{}: {}%", prefix, rate)
}

fn write_label(slot: &mut Option<TextLabel>, name: &'static str, text: String) -> Result<(), ViewError> {
    let label = slot.as_mut().ok_or(ViewError::MissingWidget(name))?;
    label.text = text;
    Ok(())
}

fn write_exp(
    widgets: &mut AvatarWidgets,
    prefix: &str,
    exp: i32,
    level: i32,
    table: &ExpTable,
) -> Result<(), ViewError> {
    let rate = table.percentage(exp, level)?;
    write_label(&mut widgets.exp, "exp", format_exp_label(prefix, rate))?;
    let bar = widgets.exp_bar.as_mut().ok_or(ViewError::MissingWidget("exp_bar"))?;
    bar.size = Vec2::new(bar.size.x, rate as f32);
    Ok(())
}

/// Register a handler that writes into the shared widgets, logging faults
fn widget_handler<T: 'static>(
    widgets: &Rc<RefCell<AvatarWidgets>>,
    attribute: &'static str,
    mut write: impl FnMut(&mut AvatarWidgets, &T, &CharacterAttributes) -> Result<(), ViewError> + 'static,
) -> Box<dyn FnMut(&T, &T, &CharacterAttributes)> {
    let widgets = Rc::clone(widgets);
    Box::new(move |_old: &T, new: &T, attrs: &CharacterAttributes| {
        let Ok(mut w) = widgets.try_borrow_mut() else {
            log::warn!("{} changed while the view was busy; update skipped", attribute);
            return;
        };
        if let Err(e) = write(&mut *w, new, attrs) {
            log::warn!("Failed to display {}: {}", attribute, e);
        }
    })
}

/// Values currently displayed by the view
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    pub name: String,
    pub level: String,
    pub attack: String,
    pub defense: String,
    pub move_speed: String,
    pub force_power: String,
    pub agile_power: String,
    pub intelligence_power: String,
    pub exp: String,
    pub exp_fill: f32,
    pub avatar: Option<String>,
}

pub struct AvatarView {
    widgets: Rc<RefCell<AvatarWidgets>>,
    canvas: Canvas,
    camera: UiCamera,
    tooltip: HoverTooltipController,
    textures: Option<Rc<dyn TextureLoader>>,
    character: Option<Weak<RefCell<CharacterModel>>>,
    character_id: Option<CharacterId>,
    subscriptions: Vec<Subscription>,
    exp_label_prefix: String,
    hover: HoverTracker,
    avatar_handle: Option<(String, egui::TextureHandle)>,
}

impl AvatarView {
    pub fn new(
        widgets: AvatarWidgets,
        canvas: Canvas,
        camera: UiCamera,
        tooltip_factory: Box<dyn TooltipFactory>,
        config: &ViewConfig,
    ) -> Self {
        Self {
            widgets: Rc::new(RefCell::new(widgets)),
            canvas,
            camera,
            tooltip: HoverTooltipController::new(tooltip_factory, config.tooltip),
            textures: None,
            character: None,
            character_id: None,
            subscriptions: Vec::new(),
            exp_label_prefix: config.exp_bar.label_prefix.clone(),
            hover: HoverTracker::new(),
            avatar_handle: None,
        }
    }

    /// Load avatar images through `loader`
    pub fn with_textures(mut self, loader: Rc<dyn TextureLoader>) -> Self {
        self.textures = Some(loader);
        self
    }

    /// Bind to `character` and display its current state.
    ///
    /// A previously bound character is unbound first.
    pub fn init(&mut self, character: &Rc<RefCell<CharacterModel>>) -> Result<(), ViewError> {
        self.widgets.borrow().validate()?;
        self.unbind();

        self.character = Some(Rc::downgrade(character));
        let id = {
            let mut model = character.borrow_mut();
            self.bind_attributes(&mut model);
            model.id()
        };
        self.character_id = Some(id);
        log::debug!("AvatarView bound to {} ({} handlers)", id, self.subscriptions.len());
        self.refresh()
    }

    /// Subscribe to the attributes that change during play
    fn bind_attributes(&mut self, model: &mut CharacterModel) {
        let prefix = self.exp_label_prefix.clone();
        self.subscriptions.push(model.on_exp_changed(widget_handler(
            &self.widgets,
            "exp",
            move |w, new: &i32, attrs| write_exp(w, &prefix, *new, attrs.level, &attrs.exp_table),
        )));
        self.subscriptions.push(model.on_level_changed(widget_handler(
            &self.widgets,
            "level",
            |w, new: &i32, _| write_label(&mut w.level, "level", new.to_string()),
        )));
        self.subscriptions.push(model.on_force_power_changed(widget_handler(
            &self.widgets,
            "force_power",
            |w, new: &f32, _| write_label(&mut w.force_power, "force_power", format_power(*new)),
        )));
        self.subscriptions.push(model.on_agile_power_changed(widget_handler(
            &self.widgets,
            "agile_power",
            |w, new: &f32, _| write_label(&mut w.agile_power, "agile_power", format_power(*new)),
        )));
        self.subscriptions.push(model.on_intelligence_power_changed(widget_handler(
            &self.widgets,
            "intelligence_power",
            |w, new: &f32, _| {
                write_label(&mut w.intelligence_power, "intelligence_power", format_power(*new))
            },
        )));

        if let Some(loader) = &self.textures {
            let loader = Rc::clone(loader);
            self.subscriptions.push(model.on_avatar_changed(widget_handler(
                &self.widgets,
                "avatar",
                move |w, new: &String, _| {
                    let image = w
                        .avatar_image
                        .as_mut()
                        .ok_or(ViewError::MissingWidget("avatar_image"))?;
                    image.texture = Some(loader.load(new)?);
                    Ok(())
                },
            )));
        }
    }

    /// Remove every handler this view registered
    pub fn unbind(&mut self) {
        self.character_id = None;
        let Some(model) = self.character.take().and_then(|weak| weak.upgrade()) else {
            self.subscriptions.clear();
            return;
        };
        let borrowed = model.try_borrow_mut();
        match borrowed {
            Ok(mut model) => {
                for sub in self.subscriptions.drain(..) {
                    model.unsubscribe(sub);
                }
            }
            Err(_) => {
                log::warn!(
                    "Could not unbind {} handlers: character model is borrowed",
                    self.subscriptions.len()
                );
                self.subscriptions.clear();
            }
        };
    }

    /// Character this view is bound to, if any
    pub fn character_id(&self) -> Option<CharacterId> {
        self.character_id.filter(|_| self.is_bound())
    }

    pub fn is_bound(&self) -> bool {
        self.character
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    fn character(&self) -> Result<Rc<RefCell<CharacterModel>>, ViewError> {
        self.character
            .as_ref()
            .ok_or(ViewError::NotBound)?
            .upgrade()
            .ok_or(ViewError::ModelDropped)
    }

    fn attributes(&self) -> Result<CharacterAttributes, ViewError> {
        let character = self.character()?;
        let attrs = character.borrow().attributes().clone();
        Ok(attrs)
    }

    /// Rewrite every widget from the bound character's current values
    pub fn refresh(&mut self) -> Result<(), ViewError> {
        let attrs = self.attributes()?;

        self.on_name_changed(&attrs.name, &attrs.name)?;
        self.on_level_changed(attrs.level, attrs.level)?;
        self.on_attack_changed(attrs.attack, attrs.attack)?;
        self.on_defense_changed(attrs.defense, attrs.defense)?;
        self.on_move_speed_changed(attrs.move_speed, attrs.move_speed)?;
        self.on_force_power_changed(attrs.force_power, attrs.force_power)?;
        self.on_agile_power_changed(attrs.agile_power, attrs.agile_power)?;
        self.on_intelligence_power_changed(attrs.intelligence_power, attrs.intelligence_power)?;
        let exp = self.on_exp_changed(attrs.exp, attrs.exp);

        let avatar = if self.textures.is_some() && !attrs.avatar.is_empty() {
            self.on_avatar_image_changed(&attrs.avatar, &attrs.avatar)
        } else {
            Ok(())
        };
        exp.and(avatar)
    }

    pub fn on_avatar_image_changed(&mut self, _old: &str, new: &str) -> Result<(), ViewError> {
        let loader = self.textures.as_ref().ok_or(ViewError::TextureNotFound(new.into()))?;
        let texture = loader.load(new)?;
        let mut w = self.widgets.borrow_mut();
        let image = w
            .avatar_image
            .as_mut()
            .ok_or(ViewError::MissingWidget("avatar_image"))?;
        image.texture = Some(texture);
        Ok(())
    }

    pub fn on_name_changed(&mut self, _old: &str, new: &str) -> Result<(), ViewError> {
        write_label(&mut self.widgets.borrow_mut().hero_name, "hero_name", new.to_string())
    }

    pub fn on_level_changed(&mut self, _old: i32, new: i32) -> Result<(), ViewError> {
        write_label(&mut self.widgets.borrow_mut().level, "level", new.to_string())
    }

    pub fn on_attack_changed(&mut self, _old: i32, new: i32) -> Result<(), ViewError> {
        write_label(&mut self.widgets.borrow_mut().attack, "attack", new.to_string())
    }

    pub fn on_defense_changed(&mut self, _old: i32, new: i32) -> Result<(), ViewError> {
        write_label(&mut self.widgets.borrow_mut().defense, "defense", new.to_string())
    }

    pub fn on_move_speed_changed(&mut self, _old: f32, new: f32) -> Result<(), ViewError> {
        write_label(
            &mut self.widgets.borrow_mut().move_speed,
            "move_speed",
            format_move_speed(new),
        )
    }

    pub fn on_force_power_changed(&mut self, _old: f32, new: f32) -> Result<(), ViewError> {
        write_label(
            &mut self.widgets.borrow_mut().force_power,
            "force_power",
            format_power(new),
        )
    }

    pub fn on_agile_power_changed(&mut self, _old: f32, new: f32) -> Result<(), ViewError> {
        write_label(
            &mut self.widgets.borrow_mut().agile_power,
            "agile_power",
            format_power(new),
        )
    }

    pub fn on_intelligence_power_changed(&mut self, _old: f32, new: f32) -> Result<(), ViewError> {
        write_label(
            &mut self.widgets.borrow_mut().intelligence_power,
            "intelligence_power",
            format_power(new),
        )
    }

    /// Uses the bound character's level and experience table
    pub fn on_exp_changed(&mut self, _old: i32, new: i32) -> Result<(), ViewError> {
        let character = self.character()?;
        let model = character.borrow();
        let attrs = model.attributes();
        let mut widgets = self.widgets.borrow_mut();
        write_exp(&mut widgets, &self.exp_label_prefix, new, attrs.level, &attrs.exp_table)
    }

    /// Feed a pointer transition to the tooltip controller
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<(), ViewError> {
        match event {
            PointerEvent::Enter => {
                let attrs = self.attributes()?;
                let rect = self.widgets.borrow().rect;
                let anchor = self
                    .tooltip
                    .on_pointer_enter(&attrs, &rect, &self.canvas, &self.camera)?;
                log::trace!("Tooltip revealed at ({:.1}, {:.1})", anchor.x, anchor.y);
                Ok(())
            }
            PointerEvent::Exit => self.tooltip.on_pointer_exit(),
        }
    }

    /// Feed this frame's hover flag; returns the transition that was handled.
    ///
    /// An exit that follows a failed enter has no tooltip to hide. That enter
    /// already reported its error, so the exit is not a second fault.
    pub fn dispatch_hover(&mut self, hovered: bool) -> Result<Option<PointerEvent>, ViewError> {
        let Some(event) = self.hover.update(hovered) else {
            return Ok(None);
        };
        match self.handle_pointer(event) {
            Ok(()) => Ok(Some(event)),
            Err(ViewError::TooltipNotCreated) if event == PointerEvent::Exit => {
                log::debug!("Pointer left the panel before its tooltip was created");
                Ok(Some(event))
            }
            Err(e) => Err(e),
        }
    }

    pub fn widgets(&self) -> Ref<'_, AvatarWidgets> {
        self.widgets.borrow()
    }

    pub fn tooltip(&self) -> &HoverTooltipController {
        &self.tooltip
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn camera(&self) -> &UiCamera {
        &self.camera
    }

    pub fn set_rect(&mut self, rect: RectTransform) {
        self.widgets.borrow_mut().rect = rect;
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let w = self.widgets.borrow();
        let text = |label: &Option<TextLabel>| label.as_ref().map(|l| l.text.clone()).unwrap_or_default();
        DisplaySnapshot {
            name: text(&w.hero_name),
            level: text(&w.level),
            attack: text(&w.attack),
            defense: text(&w.defense),
            move_speed: text(&w.move_speed),
            force_power: text(&w.force_power),
            agile_power: text(&w.agile_power),
            intelligence_power: text(&w.intelligence_power),
            exp: text(&w.exp),
            exp_fill: w.exp_bar.map(|b| b.fill_height()).unwrap_or_default(),
            avatar: w
                .avatar_image
                .as_ref()
                .and_then(|i| i.texture.as_ref())
                .map(|t| t.name.clone()),
        }
    }

    // ---- egui -----------------------------------------------------------

    /// Paint the panel, dispatch hover transitions and paint the tooltip
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let size = self.widgets.borrow().rect.size;
        let (response, painter) =
            ui.allocate_painter(egui::vec2(size.x, size.y), egui::Sense::hover());
        let rect = response.rect;

        // Keep the tooltip anchor on the panel's actual position
        let center = self.camera.egui_to_screen(rect.center());
        if let Some(world) = self.camera.screen_to_world(center) {
            self.widgets.borrow_mut().rect.position = world;
        }

        self.paint(ui.ctx(), &painter, rect);

        if let Err(e) = self.dispatch_hover(response.hovered()) {
            log::warn!("Tooltip update failed: {}", e);
        }
        self.tooltip.show(ui.ctx(), &self.canvas, &self.camera);
        response
    }

    fn avatar_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let w = self.widgets.borrow();
        let texture = w.avatar_image.as_ref()?.texture.as_ref()?;
        let cached = matches!(&self.avatar_handle, Some((name, _)) if *name == texture.name);
        if !cached {
            let handle = ctx.load_texture(
                format!("avatar/{}", texture.name),
                texture.to_color_image(),
                egui::TextureOptions::LINEAR,
            );
            self.avatar_handle = Some((texture.name.clone(), handle));
        }
        self.avatar_handle.as_ref().map(|(_, handle)| handle.id())
    }

    fn paint(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        use egui::{Align2, Color32, CornerRadius, FontId, Stroke, StrokeKind};

        painter.rect_filled(rect, CornerRadius::same(4), Color32::from_rgba_unmultiplied(20, 20, 28, 220));

        // Avatar: square on the left
        let avatar_rect = egui::Rect::from_min_size(
            rect.min + egui::vec2(6.0, 6.0),
            egui::vec2(rect.height() - 12.0, rect.height() - 12.0),
        );
        match self.avatar_texture(ctx) {
            Some(id) => {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(id, avatar_rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(avatar_rect, CornerRadius::same(4), Color32::from_gray(60));
            }
        }

        let snap = self.snapshot();
        let text_x = avatar_rect.max.x + 8.0;
        let line = 15.0;
        let rows = [
            format!("{}  Lv.{}", snap.name, snap.level),
            format!("ATK {}  DEF {}  SPD {}", snap.attack, snap.defense, snap.move_speed),
            format!(
                "STR {}  AGI {}  INT {}",
                snap.force_power, snap.agile_power, snap.intelligence_power
            ),
            snap.exp.clone(),
        ];
        for (i, row) in rows.iter().enumerate() {
            painter.text(
                egui::pos2(text_x, rect.min.y + 8.0 + i as f32 * line),
                Align2::LEFT_TOP,
                row,
                FontId::proportional(13.0),
                Color32::WHITE,
            );
        }

        // Experience bar: vertical, on the right edge, fill grows upward
        let bar_width = self
            .widgets
            .borrow()
            .exp_bar
            .map(|b| b.size.x)
            .unwrap_or(0.0)
            .min(rect.width() * 0.25);
        let bar_rect = egui::Rect::from_min_max(
            egui::pos2(rect.max.x - bar_width - 6.0, rect.min.y + 6.0),
            egui::pos2(rect.max.x - 6.0, rect.max.y - 6.0),
        );
        painter.rect_filled(bar_rect, CornerRadius::same(2), Color32::from_rgb(40, 40, 70));
        let fill = (snap.exp_fill / 100.0).clamp(0.0, 1.0) * bar_rect.height();
        let fill_rect = egui::Rect::from_min_max(
            egui::pos2(bar_rect.min.x, bar_rect.max.y - fill),
            bar_rect.max,
        );
        painter.rect_filled(fill_rect, CornerRadius::same(2), Color32::from_rgb(90, 170, 255));
        painter.rect_stroke(
            bar_rect,
            CornerRadius::same(2),
            Stroke::new(1.5, Color32::BLACK),
            StrokeKind::Outside,
        );
    }
}

impl Drop for AvatarView {
    fn drop(&mut self) {
        self.unbind();
    }
}
