pub mod attributes;
pub mod character;
pub mod experience;

pub use attributes::CharacterAttributes;
pub use character::{Attribute, ChangeHandler, CharacterModel, Subscription};
pub use experience::{exp_percentage, ExpTable};

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a character model for the lifetime of the process.
///
/// The HUD keys its slots by this so one character never occupies two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterId(u64);

static CHARACTER_COUNTER: AtomicU64 = AtomicU64::new(1);

impl CharacterId {
    pub(crate) fn next() -> Self {
        CharacterId(CHARACTER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "char#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_get_distinct_ids() {
        let a = CharacterModel::default();
        let b = CharacterModel::default();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.id());
        assert_eq!(CharacterId(7).to_string(), "char#7");
    }
}
