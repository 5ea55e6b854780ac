use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Cumulative experience thresholds, one per level boundary.
///
/// Level `L > 0` spans `[t[L-1], t[L])`. Level 0 starts at 0 and shares its
/// upper bound `t[1]` with level 1, so tables conventionally begin with 0.
/// `upper_bound(L)` is the experience needed to leave level `L`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpTable {
    thresholds: Vec<i32>,
}

impl ExpTable {
    pub fn new(thresholds: Vec<i32>) -> Self {
        ExpTable { thresholds }
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn thresholds(&self) -> &[i32] {
        &self.thresholds
    }

    /// Highest level that still has an upper bound (0 for tables shorter
    /// than two entries)
    pub fn max_level(&self) -> i32 {
        (self.thresholds.len() as i32 - 1).max(0)
    }

    /// Experience at which `level` begins (0 for level 0)
    pub fn lower_bound(&self, level: i32) -> Result<i32, ViewError> {
        if level == 0 {
            return Ok(0);
        }
        self.threshold_at(level, level - 1)
    }

    /// Experience needed to leave `level`
    pub fn upper_bound(&self, level: i32) -> Result<i32, ViewError> {
        if level < 0 {
            return self.threshold_at(level, level);
        }
        self.threshold_at(level, level.max(1))
    }

    fn threshold_at(&self, level: i32, index: i32) -> Result<i32, ViewError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.thresholds.get(i).copied())
            .ok_or(ViewError::LevelOutOfRange {
                level,
                table_len: self.thresholds.len(),
            })
    }

    /// Level reached with `exp` total experience, starting from level 0
    pub fn level_for(&self, exp: i32) -> i32 {
        self.level_after(0, exp)
    }

    /// Level reached from `level` once the total is `exp`.
    ///
    /// Climbs while `exp` has reached the current level's upper bound, capped
    /// at `max_level()`. Never goes down.
    pub fn level_after(&self, level: i32, exp: i32) -> i32 {
        let mut level = level.max(0);
        while level < self.max_level() {
            match self.upper_bound(level) {
                Ok(upper) if exp >= upper => level += 1,
                _ => break,
            }
        }
        level
    }

    /// Progress through `level` as a whole percentage in `0..=100`
    pub fn percentage(&self, exp: i32, level: i32) -> Result<i32, ViewError> {
        let lower = self.lower_bound(level)?;
        let upper = self.upper_bound(level)?;
        exp_percentage(exp, lower, upper).ok_or(ViewError::DegenerateExpRange {
            level,
            threshold: lower,
        })
    }
}

/// `clamp(floor(100 * (exp - lower) / (upper - lower)), 0, 100)`
///
/// Computed with exact integer division; returns `None` when the range is
/// empty.
pub fn exp_percentage(exp: i32, lower: i32, upper: i32) -> Option<i32> {
    let span = i64::from(upper) - i64::from(lower);
    if span == 0 {
        return None;
    }
    let gained = 100 * (i64::from(exp) - i64::from(lower));
    // floor division for either sign of the denominator
    let (num, den) = if span < 0 { (-gained, -span) } else { (gained, span) };
    Some(num.div_euclid(den).clamp(0, 100) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ExpTable {
        ExpTable::new(vec![0, 100, 300])
    }

    #[test]
    fn test_bounds() {
        let t = table();
        assert_eq!(t.lower_bound(0).unwrap(), 0);
        assert_eq!(t.upper_bound(0).unwrap(), 100);
        assert_eq!(t.lower_bound(1).unwrap(), 0);
        assert_eq!(t.upper_bound(1).unwrap(), 100);
        assert_eq!(t.lower_bound(2).unwrap(), 100);
        assert_eq!(t.upper_bound(2).unwrap(), 300);
        assert!(matches!(
            t.upper_bound(3),
            Err(ViewError::LevelOutOfRange { level: 3, table_len: 3 })
        ));
        assert!(t.lower_bound(-1).is_err());
        assert!(t.upper_bound(-1).is_err());
        // level 0 needs a second entry for its upper bound
        assert!(ExpTable::new(vec![0]).upper_bound(0).is_err());
    }

    #[test]
    fn test_percentage_mid_level() {
        // floor(100 * (150 - 100) / (300 - 100)) = 25
        assert_eq!(table().percentage(150, 2).unwrap(), 25);
    }

    #[test]
    fn test_percentage_level_zero_with_leading_zero() {
        // next level need exp is 100
        let t = table();
        assert_eq!(t.upper_bound(0).unwrap(), 100);
        assert_eq!(t.percentage(40, 0).unwrap(), 40);
        assert_eq!(t.percentage(60, 0).unwrap(), 60);
    }

    #[test]
    fn test_percentage_level_zero_uses_zero_lower_bound() {
        let t = ExpTable::new(vec![50, 200]);
        assert_eq!(t.percentage(40, 0).unwrap(), 20);
    }

    #[test]
    fn test_percentage_is_clamped() {
        let t = table();
        assert_eq!(t.percentage(10_000, 2).unwrap(), 100);
        assert_eq!(t.percentage(50, 2).unwrap(), 0);
        assert_eq!(t.percentage(-20, 1).unwrap(), 0);
    }

    #[test]
    fn test_percentage_monotonic_within_level() {
        let t = ExpTable::new(vec![37, 120, 455, 1000]);
        for level in 1..=3 {
            let lower = t.lower_bound(level).unwrap();
            let upper = t.upper_bound(level).unwrap();
            let mut prev = -1;
            for exp in lower..upper {
                let pct = t.percentage(exp, level).unwrap();
                assert!(pct >= prev, "level {level} exp {exp}: {pct} < {prev}");
                assert!((0..=100).contains(&pct));
                prev = pct;
            }
        }
    }

    #[test]
    fn test_percentage_floors_exactly() {
        // 29/100 is not representable in binary floating point
        assert_eq!(exp_percentage(29, 0, 100), Some(29));
        assert_eq!(exp_percentage(2, 0, 3), Some(66));
    }

    #[test]
    fn test_degenerate_range() {
        let t = ExpTable::new(vec![100, 100]);
        assert!(matches!(
            t.percentage(100, 1),
            Err(ViewError::DegenerateExpRange { level: 1, threshold: 100 })
        ));
        assert_eq!(exp_percentage(5, 7, 7), None);
    }

    #[test]
    fn test_level_for() {
        let t = ExpTable::new(vec![0, 100, 300, 600]);
        assert_eq!(t.level_for(0), 0);
        assert_eq!(t.level_for(99), 0);
        // level 1 shares level 0's upper bound, so 100 lands in level 2
        assert_eq!(t.level_for(100), 2);
        assert_eq!(t.level_for(450), 3);
        // capped at the last level that still has an upper bound
        assert_eq!(t.level_for(5_000), 3);
        assert_eq!(ExpTable::new(vec![0]).level_for(50), 0);
    }

    #[test]
    fn test_level_after_lands_inside_its_range() {
        let t = ExpTable::new(vec![0, 100, 300, 600]);
        for exp in 0..600 {
            let level = t.level_after(0, exp);
            assert!(exp >= t.lower_bound(level).unwrap());
            assert!(exp < t.upper_bound(level).unwrap(), "exp {exp} level {level}");
        }
        // already past the total: no level is lost
        assert_eq!(t.level_after(3, 10), 3);
        assert_eq!(t.level_after(1, 40), 1);
    }
}
