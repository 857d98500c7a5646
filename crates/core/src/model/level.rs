use std::ops::RangeInclusive;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelConfigError {
    #[error("level number must be >= 1")]
    InvalidLevel,

    #[error("level {level} needs at least one fixed number")]
    NoFixedNumbers { level: u32 },

    #[error("level {level} has an empty random range [{min}, {max}]")]
    EmptyRange { level: u32, min: i32, max: i32 },

    #[error("level table must not be empty")]
    EmptyTable,

    #[error("level table expected level {expected}, found {found}")]
    OutOfSequence { expected: u32, found: u32 },
}

//
// ─── LEVEL CONFIG ──────────────────────────────────────────────────────────────
//

/// One configured block of questions.
///
/// Every value in `fixed_numbers` is paired with every value in the inclusive
/// random range exactly once when a question set is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    level: u32,
    total_questions: u32,
    fixed_numbers: Vec<i32>,
    random_min: i32,
    random_max: i32,
}

impl LevelConfig {
    /// Build a validated level configuration.
    ///
    /// `total_questions` is informational; the generated set is always sized
    /// by `fixed_numbers.len() * (max - min + 1)`.
    ///
    /// # Errors
    ///
    /// Returns `LevelConfigError::InvalidLevel` for level 0,
    /// `LevelConfigError::NoFixedNumbers` for an empty operand list, and
    /// `LevelConfigError::EmptyRange` when `max < min`.
    pub fn new(
        level: u32,
        total_questions: u32,
        fixed_numbers: Vec<i32>,
        random_range: (i32, i32),
    ) -> Result<Self, LevelConfigError> {
        let (random_min, random_max) = random_range;
        if level == 0 {
            return Err(LevelConfigError::InvalidLevel);
        }
        if fixed_numbers.is_empty() {
            return Err(LevelConfigError::NoFixedNumbers { level });
        }
        if random_max < random_min {
            return Err(LevelConfigError::EmptyRange {
                level,
                min: random_min,
                max: random_max,
            });
        }

        Ok(Self {
            level,
            total_questions,
            fixed_numbers,
            random_min,
            random_max,
        })
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn fixed_numbers(&self) -> &[i32] {
        &self.fixed_numbers
    }

    #[must_use]
    pub fn random_range(&self) -> RangeInclusive<i32> {
        self.random_min..=self.random_max
    }

    /// Number of distinct values in the random range.
    #[must_use]
    pub fn range_width(&self) -> usize {
        let width = i64::from(self.random_max) - i64::from(self.random_min) + 1;
        usize::try_from(width).unwrap_or(0)
    }

    /// Size of the question set this level generates.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.fixed_numbers.len() * self.range_width()
    }
}

//
// ─── LEVEL TABLE ───────────────────────────────────────────────────────────────
//

/// Ordered, immutable list of levels starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl LevelTable {
    /// Build a table from consecutive levels `1..=n`.
    ///
    /// # Errors
    ///
    /// Returns `LevelConfigError::EmptyTable` or `LevelConfigError::OutOfSequence`.
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelConfigError> {
        if levels.is_empty() {
            return Err(LevelConfigError::EmptyTable);
        }
        for (expected, config) in (1_u32..).zip(&levels) {
            if config.level() != expected {
                return Err(LevelConfigError::OutOfSequence {
                    expected,
                    found: config.level(),
                });
            }
        }
        Ok(Self { levels })
    }

    /// The three built-in times-table levels.
    ///
    /// # Errors
    ///
    /// Returns the first `LevelConfigError` raised while validating a level.
    pub fn standard() -> Result<Self, LevelConfigError> {
        let ones: Vec<i32> = (1..=9).collect();
        let teens: Vec<i32> = (11..=20).collect();
        let levels = vec![
            LevelConfig::new(1, 90, ones.clone(), (0, 9))?,
            LevelConfig::new(2, 90, ones, (11, 20))?,
            LevelConfig::new(3, 90, teens, (0, 9))?,
        ];
        Self::new(levels)
    }

    /// Look up a level; `None` means the table is exhausted.
    #[must_use]
    pub fn get(&self, level: u32) -> Option<&LevelConfig> {
        self.levels.iter().find(|config| config.level() == level)
    }

    #[must_use]
    pub fn last_level(&self) -> u32 {
        self.levels.last().map_or(0, LevelConfig::level)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}
