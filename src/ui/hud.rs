use std::cell::RefCell;
use std::rc::Rc;

use egui::Context;

use super::avatar_view::AvatarView;
use crate::error::ViewError;
use crate::model::{CharacterId, CharacterModel};

/// Heads-up display holding one portrait panel per party slot
pub struct Hud {
    show: bool,
    slots: Vec<AvatarView>,
}

impl Hud {
    pub fn new() -> Self {
        Hud {
            show: true,
            slots: Vec::new(),
        }
    }

    /// Toggle HUD visibility
    pub fn toggle(&mut self) {
        self.show = !self.show;
    }

    pub fn is_visible(&self) -> bool {
        self.show
    }

    /// Slot currently showing the character `id`
    pub fn slot_of(&self, id: CharacterId) -> Option<usize> {
        self.slots.iter().position(|v| v.character_id() == Some(id))
    }

    fn ensure_not_shown(
        &self,
        character: &Rc<RefCell<CharacterModel>>,
        except: Option<usize>,
    ) -> Result<(), ViewError> {
        let id = character.borrow().id();
        match self.slot_of(id) {
            Some(slot) if Some(slot) != except => {
                log::warn!("{} is already shown in HUD slot {}", id, slot);
                Err(ViewError::AlreadyShown { slot })
            }
            _ => Ok(()),
        }
    }

    /// Add a slot bound to `character`; returns the slot index
    pub fn add_slot(
        &mut self,
        mut view: AvatarView,
        character: &Rc<RefCell<CharacterModel>>,
    ) -> Result<usize, ViewError> {
        self.ensure_not_shown(character, None)?;
        view.init(character)?;
        self.slots.push(view);
        Ok(self.slots.len() - 1)
    }

    /// Rebind an existing slot to another character
    pub fn assign(
        &mut self,
        slot: usize,
        character: &Rc<RefCell<CharacterModel>>,
    ) -> Result<(), ViewError> {
        self.ensure_not_shown(character, Some(slot))?;
        match self.slots.get_mut(slot) {
            Some(view) => view.init(character),
            None => {
                log::warn!("Invalid HUD slot: {}", slot);
                Err(ViewError::NotBound)
            }
        }
    }

    pub fn slot(&self, slot: usize) -> Option<&AvatarView> {
        self.slots.get(slot)
    }

    pub fn slot_mut(&mut self, slot: usize) -> Option<&mut AvatarView> {
        self.slots.get_mut(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Remove a slot, unbinding its view
    pub fn remove_slot(&mut self, slot: usize) -> Option<AvatarView> {
        if slot < self.slots.len() {
            let mut view = self.slots.remove(slot);
            view.unbind();
            Some(view)
        } else {
            None
        }
    }

    /// Render the HUD overlay
    pub fn render(&mut self, ctx: &Context) {
        if !self.show {
            return;
        }

        egui::Area::new("hud".into())
            .fixed_pos(egui::pos2(10.0, 10.0))
            .show(ctx, |ui| {
                for view in self.slots.iter_mut() {
                    view.show(ui);
                    ui.add_space(5.0);
                }
            });
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}
