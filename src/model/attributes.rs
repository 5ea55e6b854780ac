use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::experience::ExpTable;
use crate::error::ViewError;

/// Snapshot of every attribute a character exposes to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterAttributes {
    pub name: String,
    /// Image name, resolved relative to the avatar resource directory
    pub avatar: String,
    pub level: i32,
    pub attack: i32,
    pub defense: i32,
    pub move_speed: f32,
    pub force_power: f32,
    pub agile_power: f32,
    pub intelligence_power: f32,
    pub exp: i32,
    pub exp_table: ExpTable,
}

impl Default for CharacterAttributes {
    fn default() -> Self {
        Self {
            name: String::from("Hero"),
            avatar: String::new(),
            level: 0,
            attack: 0,
            defense: 0,
            move_speed: 0.0,
            force_power: 0.0,
            agile_power: 0.0,
            intelligence_power: 0.0,
            exp: 0,
            exp_table: ExpTable::default(),
        }
    }
}

impl CharacterAttributes {
    /// Experience needed to reach the next level
    pub fn next_level_need_exp(&self) -> Result<i32, ViewError> {
        self.exp_table.upper_bound(self.level)
    }

    /// Progress through the current level, `0..=100`
    pub fn exp_percentage(&self) -> Result<i32, ViewError> {
        self.exp_table.percentage(self.exp, self.level)
    }

    /// Parse a character from RON text
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).context("Failed to parse character attributes")
    }

    /// Load a character from a `.ron` file
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read character file {:?}", path))?;
        Self::from_ron_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_level_need_exp() {
        let attrs = CharacterAttributes {
            level: 1,
            exp_table: ExpTable::new(vec![100, 300, 600]),
            ..Default::default()
        };
        assert_eq!(attrs.next_level_need_exp().unwrap(), 300);
    }

    #[test]
    fn test_from_ron_fills_missing_fields() {
        let attrs = CharacterAttributes::from_ron_str(
            r#"(name: "Lyra", level: 2, exp: 150, force_power: 3.9, exp_table: [0, 100, 300])"#,
        )
        .unwrap();
        assert_eq!(attrs.name, "Lyra");
        assert_eq!(attrs.attack, 0);
        assert_eq!(attrs.force_power, 3.9);
        assert_eq!(attrs.exp_percentage().unwrap(), 25);
    }

    #[test]
    fn test_from_ron_rejects_garbage() {
        assert!(CharacterAttributes::from_ron_str("(name: 12").is_err());
    }
}
