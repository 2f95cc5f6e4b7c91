//! Quiz mode: the rapid-fire warm-up
//!
//! Twenty-five questions drawn round-robin from the category pools,
//! without repeats, ramping easy to hard, answered one at a time. Each
//! answer is scored independently with length and keyword heuristics;
//! the run passes on 60% accuracy. No call session and no hang-up model.

use chrono::{DateTime, Utc};
use serde_json::json;
use unicode_segmentation::UnicodeSegmentation;

use calltrainer_config::{QuizBank, QuizCategory, QuizQuestion};
use calltrainer_core::{CoreError, ModeKind, UserInput};

use crate::run::{ModeDeps, ProcessReply, RunOutcome};

pub struct QuizController {
    deps: ModeDeps,
    questions: Vec<QuizQuestion>,
    index: usize,
    correct: usize,
    streak: usize,
    best_streak: usize,
    started_at: DateTime<Utc>,
    outcome: Option<RunOutcome>,
}

impl QuizController {
    pub fn new(deps: ModeDeps) -> (Self, String) {
        let bank = QuizBank::builtin();
        let count = deps.tuning.quiz_question_count.min(bank.len());

        // Stratified draw: cycle the category pools, picking a random
        // remaining question from each, so no category dominates the round
        let mut pools: Vec<(QuizCategory, Vec<QuizQuestion>)> = Vec::new();
        for question in bank.questions() {
            match pools.iter_mut().find(|(c, _)| *c == question.category) {
                Some((_, pool)) => pool.push(question.clone()),
                None => pools.push((question.category, vec![question.clone()])),
            }
        }

        let mut questions = Vec::with_capacity(count);
        let mut slot = 0;
        while questions.len() < count {
            let pool_count = pools.len();
            let (_, pool) = &mut pools[slot % pool_count];
            if !pool.is_empty() {
                let pick = deps.rng.pick_index(pool.len());
                questions.push(pool.swap_remove(pick));
            }
            slot += 1;
        }
        // Ramp the round easy to hard
        questions.sort_by_key(|q| q.difficulty);

        let opening = format!(
            "Warm-up challenge: {} quick-fire questions. Answer out loud as if \
             you were on a live call.\n\nQuestion 1: {}",
            count, questions[0].prompt
        );

        (
            Self {
                deps,
                questions,
                index: 0,
                correct: 0,
                streak: 0,
                best_streak: 0,
                started_at: Utc::now(),
                outcome: None,
            },
            opening,
        )
    }

    /// Length plus keyword heuristics; enough met checks make a correct
    /// answer.
    fn grade(&self, answer: &str) -> (bool, usize) {
        let question = &self.questions[self.index];
        let lower = answer.to_lowercase();
        let words = lower.unicode_words().count();
        let keyword_hits = question
            .keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .count();

        let checks = [
            words >= self.deps.tuning.quiz_min_answer_words,
            keyword_hits >= 1,
            keyword_hits >= 2,
        ];
        let met = checks.iter().filter(|c| **c).count();
        (met >= self.deps.tuning.quiz_checks_to_pass, keyword_hits)
    }

    pub async fn process_input(&mut self, input: &UserInput) -> Result<ProcessReply, CoreError> {
        if self.outcome.is_some() {
            return Err(CoreError::invalid_state("quiz run already finished"));
        }
        if input.is_blank() {
            return Err(CoreError::validation("answer is empty"));
        }

        // Silence counts as a skipped (incorrect) answer
        let (is_correct, feedback) = match input.text() {
            Some(answer) => {
                let (correct, hits) = self.grade(answer);
                if correct {
                    self.correct += 1;
                    self.streak += 1;
                    self.best_streak = self.best_streak.max(self.streak);
                    (true, format!("Good answer. Streak: {}.", self.streak))
                } else {
                    self.streak = 0;
                    let hint = if hits == 0 {
                        format!(
                            " Strong answers usually mention: {}.",
                            self.questions[self.index].keywords.join(", ")
                        )
                    } else {
                        String::new()
                    };
                    (false, format!("Not quite.{}", hint))
                }
            }
            None => {
                self.streak = 0;
                (false, "Skipped.".to_string())
            }
        };

        tracing::debug!(
            question = %self.questions[self.index].id,
            correct = is_correct,
            "quiz answer graded"
        );

        self.index += 1;
        let mut reply = ProcessReply::simple(String::new(), None);
        if self.index >= self.questions.len() {
            self.finalize();
            let outcome = self.outcome.as_ref().expect("finalize sets the outcome");
            reply.text = format!(
                "{} That's the round: {} of {} correct.",
                feedback,
                self.correct,
                self.questions.len()
            );
            reply.call_ended = true;
            reply.run_complete = true;
            reply.progress_note = Some(if outcome.passed {
                "Warm-up passed".to_string()
            } else {
                "Below the accuracy bar, run it back".to_string()
            });
        } else {
            reply.text = format!(
                "{}\n\nQuestion {}: {}",
                feedback,
                self.index + 1,
                self.questions[self.index].prompt
            );
        }
        Ok(reply)
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Force-finish; unanswered questions count as incorrect
    pub fn end(&mut self) -> RunOutcome {
        if self.outcome.is_none() {
            self.finalize();
        }
        self.outcome.clone().expect("finalize sets the outcome")
    }

    fn finalize(&mut self) {
        let total = self.questions.len();
        let accuracy = self.correct as f64 / total as f64;
        let passed = accuracy >= self.deps.tuning.quiz_pass_accuracy;
        let score = (accuracy * 100.0).round() as u32;

        tracing::info!(
            correct = self.correct,
            total,
            best_streak = self.best_streak,
            passed,
            "quiz run finished"
        );

        self.outcome = Some(RunOutcome {
            mode: ModeKind::Quiz,
            score,
            passed,
            started_at: self.started_at,
            completed_at: Utc::now(),
            details: json!({
                "correct": self.correct,
                "total": total,
                "best_streak": self.best_streak,
            }),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::canned_deps;
    use calltrainer_core::SilenceKind;

    /// Answer guaranteed correct for any question: long and echoing every
    /// keyword verbatim.
    fn winning_answer(controller: &QuizController) -> String {
        let q = &controller.questions[controller.index];
        format!(
            "Honestly I would keep it simple and say {} because that lands well",
            q.keywords.join(" and ")
        )
    }

    #[tokio::test]
    async fn test_all_correct_passes_with_full_streak() {
        let (mut controller, opening) = QuizController::new(canned_deps(21));
        assert!(opening.contains("Question 1"));
        let total = controller.questions.len();
        assert_eq!(total, 25);

        for i in 0..total {
            let answer = winning_answer(&controller);
            let reply = controller
                .process_input(&UserInput::spoke(answer))
                .await
                .unwrap();
            assert_eq!(reply.run_complete, i == total - 1);
        }

        let outcome = controller.outcome().unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.details["best_streak"], 25);
    }

    #[test]
    fn test_draw_is_stratified_and_ramps_difficulty() {
        let (controller, _) = QuizController::new(canned_deps(25));
        let questions = &controller.questions;
        assert_eq!(questions.len(), 25);

        // Five categories, five questions each: no pool dominates
        for category in [
            QuizCategory::Openers,
            QuizCategory::ObjectionHandling,
            QuizCategory::Tonality,
            QuizCategory::Qualification,
            QuizCategory::Closing,
        ] {
            assert_eq!(
                questions.iter().filter(|q| q.category == category).count(),
                5,
                "{:?}",
                category
            );
        }

        // No repeats
        let mut ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 25);

        // Easy questions come before hard ones
        assert!(questions
            .windows(2)
            .all(|pair| pair[0].difficulty <= pair[1].difficulty));
    }

    #[tokio::test]
    async fn test_vague_answers_fail_the_run() {
        let (mut controller, _) = QuizController::new(canned_deps(22));
        let total = controller.questions.len();

        for _ in 0..total {
            controller
                .process_input(&UserInput::spoke("um, not sure"))
                .await
                .unwrap();
        }

        let outcome = controller.outcome().unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.details["best_streak"], 0);
    }

    #[tokio::test]
    async fn test_silence_breaks_streak() {
        let (mut controller, _) = QuizController::new(canned_deps(23));

        let answer = winning_answer(&controller);
        controller
            .process_input(&UserInput::spoke(answer))
            .await
            .unwrap();
        assert_eq!(controller.streak, 1);

        controller
            .process_input(&UserInput::silence(SilenceKind::Impatience))
            .await
            .unwrap();
        assert_eq!(controller.streak, 0);
        assert_eq!(controller.best_streak, 1);
        assert_eq!(controller.correct, 1);
    }

    #[tokio::test]
    async fn test_accuracy_gate_is_sixty_percent() {
        let (mut controller, _) = QuizController::new(canned_deps(24));
        let total = controller.questions.len();
        // 15 of 25 correct = exactly 60%
        for i in 0..total {
            let input = if i < 15 {
                UserInput::spoke(winning_answer(&controller))
            } else {
                UserInput::spoke("no idea honestly")
            };
            controller.process_input(&input).await.unwrap();
        }

        let outcome = controller.outcome().unwrap();
        assert_eq!(outcome.score, 60);
        assert!(outcome.passed, "60% accuracy meets the bar exactly");
    }
}
