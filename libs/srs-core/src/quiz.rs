//! Multiple-choice quiz adapter.
//!
//! Quiz mode presents each due item with its correct meaning among
//! distractor meanings drawn from the rest of the catalog. Answers are
//! binary, so they are mapped onto the 0-5 scale before scheduling: a right
//! answer counts as a perfect recall, a wrong one as a failed recall (1 or
//! 2). The scheduler itself never sees anything but a `Quality`.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SrsError};
use crate::types::{LearningItem, Quality, ReviewSettings};

/// Binary answer to quality mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizGrading {
    pub correct_quality: Quality,
    pub incorrect_quality: Quality,
}

impl Default for QuizGrading {
    fn default() -> Self {
        Self {
            correct_quality: Quality::PERFECT,
            incorrect_quality: Quality(1),
        }
    }
}

impl QuizGrading {
    /// Mapping with the given failing quality, which must be 1 or 2.
    pub fn new(incorrect_quality: u8) -> Result<Self> {
        if !(1..=2).contains(&incorrect_quality) {
            return Err(SrsError::invalid(format!(
                "quiz failing quality must be 1 or 2, got {incorrect_quality}"
            )));
        }
        Ok(Self {
            correct_quality: Quality::PERFECT,
            incorrect_quality: Quality::new(incorrect_quality)?,
        })
    }

    pub fn from_settings(settings: &ReviewSettings) -> Result<Self> {
        Self::new(settings.quiz_incorrect_quality)
    }

    pub fn quality_for(&self, correct: bool) -> Quality {
        if correct {
            self.correct_quality
        } else {
            self.incorrect_quality
        }
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub item_id: i64,
    pub text: String,
}

/// A multiple-choice question for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub item_id: i64,
    pub prompt: String,
    pub options: Vec<QuizOption>,
    #[serde(skip_serializing)]
    pub correct_index: usize,
}

impl QuizQuestion {
    /// Whether `option_index` picks the right answer.
    pub fn is_correct(&self, option_index: usize) -> Result<bool> {
        if option_index >= self.options.len() {
            return Err(SrsError::invalid(format!(
                "option {option_index} out of range, question has {} options",
                self.options.len()
            )));
        }
        Ok(option_index == self.correct_index)
    }
}

/// Distinct meanings of a catalog, prepared once and reused per question.
#[derive(Debug, Clone)]
pub struct DistractorPool<'a> {
    candidates: Vec<&'a LearningItem>,
}

impl<'a> DistractorPool<'a> {
    /// One catalog item per distinct meaning.
    pub fn new(catalog: &'a [LearningItem]) -> Self {
        let mut candidates: Vec<&LearningItem> = catalog.iter().collect();
        candidates.sort_by(|a, b| a.meaning.cmp(&b.meaning));
        candidates.dedup_by(|a, b| a.meaning == b.meaning);
        Self { candidates }
    }

    /// Build a question for `item` with up to `distractor_count` wrong options.
    pub fn question<R: Rng + ?Sized>(
        &self,
        item: &LearningItem,
        distractor_count: usize,
        rng: &mut R,
    ) -> Result<QuizQuestion> {
        let mut distractors: Vec<&LearningItem> = self
            .candidates
            .iter()
            .copied()
            .filter(|c| c.id != item.id && c.meaning != item.meaning)
            .collect();

        if distractors.is_empty() {
            return Err(SrsError::NotEnoughItems {
                needed: 1,
                available: 0,
            });
        }

        distractors.shuffle(rng);
        distractors.truncate(distractor_count);

        let mut options: Vec<QuizOption> = distractors
            .into_iter()
            .map(|c| QuizOption {
                item_id: c.id,
                text: c.meaning.clone(),
            })
            .collect();
        options.push(QuizOption {
            item_id: item.id,
            text: item.meaning.clone(),
        });
        options.shuffle(rng);

        let correct_index = options
            .iter()
            .position(|o| o.item_id == item.id)
            .ok_or_else(|| SrsError::invalid("correct option missing after shuffle"))?;

        Ok(QuizQuestion {
            item_id: item.id,
            prompt: item.text.clone(),
            options,
            correct_index,
        })
    }
}

/// Build a question for `item` with up to `distractor_count` wrong options.
///
/// Distractors are meanings of other catalog items, with duplicates of each
/// other and of the right answer removed. Fails when no distractor exists.
/// Use [`DistractorPool`] directly when quizzing many items from one catalog.
pub fn build_question<R: Rng + ?Sized>(
    item: &LearningItem,
    catalog: &[LearningItem],
    distractor_count: usize,
    rng: &mut R,
) -> Result<QuizQuestion> {
    DistractorPool::new(catalog).question(item, distractor_count, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn item(id: i64, text: &str, meaning: &str) -> LearningItem {
        LearningItem {
            id,
            text: text.to_string(),
            meaning: meaning.to_string(),
        }
    }

    fn catalog() -> Vec<LearningItem> {
        vec![
            item(1, "كتاب", "book"),
            item(2, "قلم", "pen"),
            item(3, "بيت", "house"),
            item(4, "رب", "lord"),
            item(5, "علم", "knowledge"),
            item(6, "دار", "house"),
        ]
    }

    #[test]
    fn question_has_one_correct_and_distinct_options() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let question = build_question(&catalog[0], &catalog, 3, &mut rng).unwrap();

        assert_eq!(question.prompt, "كتاب");
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.options[question.correct_index].text, "book");
        assert!(question.is_correct(question.correct_index).unwrap());

        let texts: HashSet<_> = question.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts.len(), 4);
    }

    #[test]
    fn fewer_distractors_when_catalog_is_small() {
        let catalog = vec![item(1, "a", "x"), item(2, "b", "y"), item(3, "c", "y")];
        let mut rng = StdRng::seed_from_u64(1);
        let question = build_question(&catalog[0], &catalog, 3, &mut rng).unwrap();
        assert_eq!(question.options.len(), 2);
    }

    #[test]
    fn lone_item_cannot_be_quizzed() {
        let catalog = vec![item(1, "a", "x"), item(2, "b", "x")];
        let mut rng = StdRng::seed_from_u64(1);
        let err = build_question(&catalog[0], &catalog, 3, &mut rng).unwrap_err();
        assert!(matches!(err, SrsError::NotEnoughItems { .. }));
    }

    #[test]
    fn out_of_range_option_is_invalid() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        let question = build_question(&catalog[1], &catalog, 2, &mut rng).unwrap();
        assert!(question.is_correct(3).is_err());
    }

    #[test]
    fn pool_serves_every_item_of_a_catalog() {
        let catalog = catalog();
        let pool = DistractorPool::new(&catalog);
        let mut rng = StdRng::seed_from_u64(11);
        for item in &catalog {
            let question = pool.question(item, 3, &mut rng).unwrap();
            assert_eq!(question.options[question.correct_index].text, item.meaning);
            let texts: HashSet<_> = question.options.iter().map(|o| o.text.as_str()).collect();
            assert_eq!(texts.len(), question.options.len());
            assert_eq!(question.options.len(), 4);
        }
    }

    #[test]
    fn grading_maps_answers_to_quality() {
        let grading = QuizGrading::default();
        assert_eq!(grading.quality_for(true).value(), 5);
        assert_eq!(grading.quality_for(false).value(), 1);

        let lenient = QuizGrading::new(2).unwrap();
        assert_eq!(lenient.quality_for(false).value(), 2);
        assert!(!lenient.quality_for(false).is_correct());

        assert!(QuizGrading::new(3).is_err());
        assert!(QuizGrading::new(0).is_err());
    }
}
