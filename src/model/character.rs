//! Observable character model
//!
//! Every setter compares against the current value and, when it changed,
//! calls the attribute's handlers with `(old, new, snapshot)`. The snapshot
//! is the post-change attribute set, so handlers never need to borrow the
//! model back.

use super::attributes::CharacterAttributes;
use super::CharacterId;

/// Attribute whose changes can be observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Name,
    Avatar,
    Level,
    Attack,
    Defense,
    MoveSpeed,
    ForcePower,
    AgilePower,
    IntelligencePower,
    Exp,
}

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    attribute: Attribute,
    id: u64,
}

impl Subscription {
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }
}

/// Change callback: `(old, new, attributes after the change)`
pub type ChangeHandler<T> = Box<dyn FnMut(&T, &T, &CharacterAttributes)>;

struct HandlerList<T> {
    handlers: Vec<(u64, ChangeHandler<T>)>,
}

impl<T> HandlerList<T> {
    fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    fn add(&mut self, id: u64, handler: ChangeHandler<T>) {
        self.handlers.push((id, handler));
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(hid, _)| *hid != id);
        self.handlers.len() != before
    }

    fn notify(&mut self, old: &T, new: &T, attributes: &CharacterAttributes) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(old, new, attributes);
        }
    }

    fn len(&self) -> usize {
        self.handlers.len()
    }
}

#[derive(Default)]
struct ChangeHandlers {
    name: HandlerList<String>,
    avatar: HandlerList<String>,
    level: HandlerList<i32>,
    attack: HandlerList<i32>,
    defense: HandlerList<i32>,
    move_speed: HandlerList<f32>,
    force_power: HandlerList<f32>,
    agile_power: HandlerList<f32>,
    intelligence_power: HandlerList<f32>,
    exp: HandlerList<i32>,
}

impl<T> Default for HandlerList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `field(attributes)` with `value` and notify when it changed
fn apply<T, F>(
    attributes: &mut CharacterAttributes,
    handlers: &mut HandlerList<T>,
    field: F,
    value: T,
) -> bool
where
    T: PartialEq + Clone,
    F: Fn(&mut CharacterAttributes) -> &mut T,
{
    let slot = field(&mut *attributes);
    if *slot == value {
        return false;
    }
    let old = std::mem::replace(slot, value.clone());
    handlers.notify(&old, &value, attributes);
    true
}

/// A character's live attributes plus their change notifications
pub struct CharacterModel {
    id: CharacterId,
    attributes: CharacterAttributes,
    handlers: ChangeHandlers,
    next_subscription: u64,
}

impl CharacterModel {
    pub fn new(attributes: CharacterAttributes) -> Self {
        Self {
            id: CharacterId::next(),
            attributes,
            handlers: ChangeHandlers::default(),
            next_subscription: 1,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Current attribute values
    pub fn attributes(&self) -> &CharacterAttributes {
        &self.attributes
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn level(&self) -> i32 {
        self.attributes.level
    }

    pub fn exp(&self) -> i32 {
        self.attributes.exp
    }

    // ---- setters --------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        apply(
            &mut self.attributes,
            &mut self.handlers.name,
            |a| &mut a.name,
            name.into(),
        )
    }

    pub fn set_avatar(&mut self, avatar: impl Into<String>) -> bool {
        apply(
            &mut self.attributes,
            &mut self.handlers.avatar,
            |a| &mut a.avatar,
            avatar.into(),
        )
    }

    pub fn set_level(&mut self, level: i32) -> bool {
        apply(&mut self.attributes, &mut self.handlers.level, |a| &mut a.level, level)
    }

    pub fn set_attack(&mut self, attack: i32) -> bool {
        apply(&mut self.attributes, &mut self.handlers.attack, |a| &mut a.attack, attack)
    }

    pub fn set_defense(&mut self, defense: i32) -> bool {
        apply(&mut self.attributes, &mut self.handlers.defense, |a| &mut a.defense, defense)
    }

    pub fn set_move_speed(&mut self, speed: f32) -> bool {
        apply(
            &mut self.attributes,
            &mut self.handlers.move_speed,
            |a| &mut a.move_speed,
            speed,
        )
    }

    pub fn set_force_power(&mut self, power: f32) -> bool {
        apply(
            &mut self.attributes,
            &mut self.handlers.force_power,
            |a| &mut a.force_power,
            power,
        )
    }

    pub fn set_agile_power(&mut self, power: f32) -> bool {
        apply(
            &mut self.attributes,
            &mut self.handlers.agile_power,
            |a| &mut a.agile_power,
            power,
        )
    }

    pub fn set_intelligence_power(&mut self, power: f32) -> bool {
        apply(
            &mut self.attributes,
            &mut self.handlers.intelligence_power,
            |a| &mut a.intelligence_power,
            power,
        )
    }

    pub fn set_exp(&mut self, exp: i32) -> bool {
        apply(&mut self.attributes, &mut self.handlers.exp, |a| &mut a.exp, exp)
    }

    /// Add experience, levelling up through as many thresholds as it crosses.
    ///
    /// The level is updated before the experience so exp handlers see the
    /// level the new total belongs to. Returns the number of levels gained.
    pub fn gain_exp(&mut self, amount: i32) -> i32 {
        let total = self.attributes.exp.saturating_add(amount);
        let old_level = self.attributes.level;
        let new_level = self.attributes.exp_table.level_after(old_level, total);
        if new_level != old_level {
            log::debug!(
                "{}: level {} -> {} ({} exp)",
                self.attributes.name,
                old_level,
                new_level,
                total
            );
            self.set_level(new_level);
        }
        self.set_exp(total);
        new_level - old_level
    }

    // ---- subscriptions --------------------------------------------------

    fn next_id(&mut self, attribute: Attribute) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        Subscription { attribute, id }
    }

    pub fn on_name_changed(&mut self, handler: ChangeHandler<String>) -> Subscription {
        let sub = self.next_id(Attribute::Name);
        self.handlers.name.add(sub.id, handler);
        sub
    }

    pub fn on_avatar_changed(&mut self, handler: ChangeHandler<String>) -> Subscription {
        let sub = self.next_id(Attribute::Avatar);
        self.handlers.avatar.add(sub.id, handler);
        sub
    }

    pub fn on_level_changed(&mut self, handler: ChangeHandler<i32>) -> Subscription {
        let sub = self.next_id(Attribute::Level);
        self.handlers.level.add(sub.id, handler);
        sub
    }

    pub fn on_attack_changed(&mut self, handler: ChangeHandler<i32>) -> Subscription {
        let sub = self.next_id(Attribute::Attack);
        self.handlers.attack.add(sub.id, handler);
        sub
    }

    pub fn on_defense_changed(&mut self, handler: ChangeHandler<i32>) -> Subscription {
        let sub = self.next_id(Attribute::Defense);
        self.handlers.defense.add(sub.id, handler);
        sub
    }

    pub fn on_move_speed_changed(&mut self, handler: ChangeHandler<f32>) -> Subscription {
        let sub = self.next_id(Attribute::MoveSpeed);
        self.handlers.move_speed.add(sub.id, handler);
        sub
    }

    pub fn on_force_power_changed(&mut self, handler: ChangeHandler<f32>) -> Subscription {
        let sub = self.next_id(Attribute::ForcePower);
        self.handlers.force_power.add(sub.id, handler);
        sub
    }

    pub fn on_agile_power_changed(&mut self, handler: ChangeHandler<f32>) -> Subscription {
        let sub = self.next_id(Attribute::AgilePower);
        self.handlers.agile_power.add(sub.id, handler);
        sub
    }

    pub fn on_intelligence_power_changed(&mut self, handler: ChangeHandler<f32>) -> Subscription {
        let sub = self.next_id(Attribute::IntelligencePower);
        self.handlers.intelligence_power.add(sub.id, handler);
        sub
    }

    pub fn on_exp_changed(&mut self, handler: ChangeHandler<i32>) -> Subscription {
        let sub = self.next_id(Attribute::Exp);
        self.handlers.exp.add(sub.id, handler);
        sub
    }

    /// Remove a handler. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let h = &mut self.handlers;
        match sub.attribute {
            Attribute::Name => h.name.remove(sub.id),
            Attribute::Avatar => h.avatar.remove(sub.id),
            Attribute::Level => h.level.remove(sub.id),
            Attribute::Attack => h.attack.remove(sub.id),
            Attribute::Defense => h.defense.remove(sub.id),
            Attribute::MoveSpeed => h.move_speed.remove(sub.id),
            Attribute::ForcePower => h.force_power.remove(sub.id),
            Attribute::AgilePower => h.agile_power.remove(sub.id),
            Attribute::IntelligencePower => h.intelligence_power.remove(sub.id),
            Attribute::Exp => h.exp.remove(sub.id),
        }
    }

    /// Number of handlers registered for `attribute`
    pub fn handler_count(&self, attribute: Attribute) -> usize {
        let h = &self.handlers;
        match attribute {
            Attribute::Name => h.name.len(),
            Attribute::Avatar => h.avatar.len(),
            Attribute::Level => h.level.len(),
            Attribute::Attack => h.attack.len(),
            Attribute::Defense => h.defense.len(),
            Attribute::MoveSpeed => h.move_speed.len(),
            Attribute::ForcePower => h.force_power.len(),
            Attribute::AgilePower => h.agile_power.len(),
            Attribute::IntelligencePower => h.intelligence_power.len(),
            Attribute::Exp => h.exp.len(),
        }
    }
}

impl Default for CharacterModel {
    fn default() -> Self {
        Self::new(CharacterAttributes::default())
    }
}

impl std::fmt::Debug for CharacterModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterModel")
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}
