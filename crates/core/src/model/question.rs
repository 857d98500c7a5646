use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::model::LevelConfig;

/// A single multiplication prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    operand1: i32,
    operand2: i32,
}

impl Question {
    #[must_use]
    pub fn new(operand1: i32, operand2: i32) -> Self {
        Self { operand1, operand2 }
    }

    #[must_use]
    pub fn operand1(&self) -> i32 {
        self.operand1
    }

    #[must_use]
    pub fn operand2(&self) -> i32 {
        self.operand2
    }

    /// The product the player has to type.
    #[must_use]
    pub fn answer(&self) -> i64 {
        i64::from(self.operand1) * i64::from(self.operand2)
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        format!("What is {} x {}?", self.operand1, self.operand2)
    }

    /// Compare raw player input against the product.
    ///
    /// Input that does not parse never matches.
    #[must_use]
    pub fn is_correct(&self, raw: &str) -> bool {
        parse_answer(raw) == Some(self.answer())
    }
}

/// Ordered questions for one attempt at a level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

/// Build the full cross-product of a level's fixed numbers and random range.
///
/// Groups keep the order of `fixed_numbers`; within a group the second
/// operands are drawn without replacement, so each value of the range shows
/// up exactly once in a random position.
pub fn generate_unique_questions<R: Rng + ?Sized>(config: &LevelConfig, rng: &mut R) -> QuestionSet {
    let mut questions = Vec::with_capacity(config.question_count());
    let mut draws: Vec<i32> = config.random_range().collect();

    for &fixed in config.fixed_numbers() {
        draws.shuffle(rng);
        questions.extend(draws.iter().map(|&value| Question::new(fixed, value)));
    }

    QuestionSet::new(questions)
}

/// Read a typed answer the way a lenient number field would.
///
/// Leading/trailing whitespace is ignored and only the leading integer prefix
/// counts (`"12abc"` reads as 12). Returns `None` when no digits are present.
#[must_use]
pub fn parse_answer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::model::LevelTable;

    #[test]
    fn generates_full_cross_product_per_level() {
        let mut rng = StdRng::seed_from_u64(7);
        for config in LevelTable::standard().unwrap().iter() {
            let set = generate_unique_questions(config, &mut rng);
            assert_eq!(set.len(), config.question_count());

            let expected: BTreeSet<i32> = config.random_range().collect();
            for &fixed in config.fixed_numbers() {
                let seconds: Vec<i32> = set
                    .iter()
                    .filter(|q| q.operand1() == fixed)
                    .map(Question::operand2)
                    .collect();
                assert_eq!(seconds.len(), expected.len(), "duplicates for {fixed}");
                assert_eq!(seconds.into_iter().collect::<BTreeSet<_>>(), expected);
            }
        }
    }

    #[test]
    fn groups_stay_contiguous_in_fixed_order() {
        let config = LevelConfig::new(1, 12, vec![4, 2, 9], (1, 4)).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let set = generate_unique_questions(&config, &mut rng);

        let firsts: Vec<i32> = set.iter().map(Question::operand1).collect();
        assert_eq!(firsts, vec![4, 4, 4, 4, 2, 2, 2, 2, 9, 9, 9, 9]);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let config = LevelTable::standard().unwrap().get(2).cloned().unwrap();
        let a = generate_unique_questions(&config, &mut StdRng::seed_from_u64(3));
        let b = generate_unique_questions(&config, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn single_value_range_yields_one_question_per_fixed_number() {
        let config = LevelConfig::new(1, 2, vec![5, 6], (3, 3)).unwrap();
        let set = generate_unique_questions(&config, &mut StdRng::seed_from_u64(1));
        assert_eq!(set.as_slice(), &[Question::new(5, 3), Question::new(6, 3)]);
    }

    #[test]
    fn parse_answer_reads_leading_integer() {
        assert_eq!(parse_answer("42"), Some(42));
        assert_eq!(parse_answer("  42 "), Some(42));
        assert_eq!(parse_answer("-3"), Some(-3));
        assert_eq!(parse_answer("+8"), Some(8));
        assert_eq!(parse_answer("12abc"), Some(12));
        assert_eq!(parse_answer("7.9"), Some(7));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("abc"), None);
        assert_eq!(parse_answer("-"), None);
    }

    #[test]
    fn non_numeric_input_is_never_correct() {
        let zero = Question::new(0, 9);
        assert!(zero.is_correct("0"));
        assert!(!zero.is_correct(""));
        assert!(!zero.is_correct("zero"));
        assert_eq!(Question::new(7, 8).prompt(), "What is 7 x 8?");
    }
}
