//! Scoring, leveling and gravity speed

/// Gravity interval at level 1
pub const BASE_DROP_INTERVAL_MS: u64 = 1000;
/// Gravity never gets faster than this
pub const MIN_DROP_INTERVAL_MS: u64 = 100;
/// Interval shaved off per level gained
pub const DROP_INTERVAL_STEP_MS: u64 = 100;
/// Cumulative lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;
/// Base points per line, before the quadratic and level multipliers
const POINTS_PER_LINE: u64 = 100;

/// Level reached after clearing `lines` lines in total
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level: 100 ms faster per level, floored at 100 ms
pub fn drop_interval_for_level(level: u32) -> u64 {
    let step = u64::from(level.saturating_sub(1)) * DROP_INTERVAL_STEP_MS;
    BASE_DROP_INTERVAL_MS
        .saturating_sub(step)
        .max(MIN_DROP_INTERVAL_MS)
}

/// Points for clearing `lines` rows in one lock at `level`
pub fn points_for_clear(lines: u32, level: u32) -> u64 {
    let lines = u64::from(lines);
    lines * lines * POINTS_PER_LINE * u64::from(level)
}

/// Score, level and speed progression for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starts at 1 and never decreases
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
    /// Milliseconds between gravity steps
    pub drop_interval_ms: u64,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
        }
    }

    /// Credit a line clear and return the points awarded
    ///
    /// Zero lines is a no-op. The award uses the level in effect before the
    /// clear; the level and gravity update afterwards.
    pub fn add_clear(&mut self, lines: u32) -> u64 {
        if lines == 0 {
            return 0;
        }

        let awarded = points_for_clear(lines, self.level);
        self.points += awarded;
        self.lines += lines;

        let new_level = level_for_lines(self.lines);
        if new_level > self.level {
            self.level = new_level;
            self.drop_interval_ms = drop_interval_for_level(new_level);
        }

        awarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        assert_eq!(score.add_clear(1), 100);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_quadratic_bonus() {
        let mut score = Score::new();
        assert_eq!(score.add_clear(4), 1600);
        assert_eq!(score.lines, 4);
    }

    #[test]
    fn test_double_at_level_three() {
        let mut score = Score::new();
        score.level = 3;
        assert_eq!(score.add_clear(2), 1200);
    }

    #[test]
    fn test_zero_lines_changes_nothing() {
        let mut score = Score::new();
        score.add_clear(3);
        let before = score.clone();
        assert_eq!(score.add_clear(0), 0);
        assert_eq!(score, before);
    }

    #[test]
    fn test_level_up() {
        let mut score = Score::new();
        for _ in 0..9 {
            score.add_clear(1);
        }
        assert_eq!(score.level, 1);
        assert_eq!(score.drop_interval_ms, 1000);

        // The tenth line is still scored at level 1
        assert_eq!(score.add_clear(1), 100);
        assert_eq!(score.level, 2);
        assert_eq!(score.drop_interval_ms, 900);
    }

    #[test]
    fn test_level_curve() {
        for lines in [0, 9, 10, 19, 20, 95, 250] {
            assert_eq!(level_for_lines(lines), lines / 10 + 1);
        }
    }

    #[test]
    fn test_drop_interval_floor() {
        assert_eq!(drop_interval_for_level(1), 1000);
        assert_eq!(drop_interval_for_level(5), 600);
        assert_eq!(drop_interval_for_level(10), 100);
        assert_eq!(drop_interval_for_level(11), 100);
        assert_eq!(drop_interval_for_level(40), 100);
    }

    #[test]
    fn test_multi_level_jump() {
        let mut score = Score::new();
        score.lines = 18;
        score.level = level_for_lines(18);
        score.add_clear(4);
        assert_eq!(score.level, 3);
        assert_eq!(score.drop_interval_ms, 800);
    }
}
