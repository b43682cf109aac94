//! Quiz submission bookkeeping.
//!
//! One entry per quiz id: the first submission creates it, later submissions
//! supersede the score, accumulate time and count attempts. Quiz scores do
//! not enter the lesson score average.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::aggregate::{ProgressAggregate, QuizProgress};
use crate::engine::error::{validate_minutes, validate_score, ProgressResult};

#[derive(Debug, Clone)]
pub struct SubmitQuiz {
    pub score: i64,
    pub time_spent: i64,
}

pub fn submit(
    aggregate: &mut ProgressAggregate,
    quiz_id: Uuid,
    cmd: SubmitQuiz,
    now: DateTime<Utc>,
) -> ProgressResult<u32> {
    let score = validate_score(cmd.score)?;
    let minutes = validate_minutes(cmd.time_spent)?;

    match aggregate.quiz_mut(quiz_id) {
        Some(quiz) => {
            quiz.score = score;
            quiz.completed_at = now;
            quiz.time_spent += minutes;
            quiz.attempts += 1;
        }
        None => aggregate.quizzes.push(QuizProgress {
            quiz_id,
            score,
            completed_at: now,
            time_spent: minutes,
            attempts: 1,
        }),
    }

    Ok(score)
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::engine::error::ProgressError;

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 10, 0, 0).unwrap()
    }

    #[test]
    fn resubmission_supersedes_score_and_accumulates_time() {
        let mut aggregate = ProgressAggregate::new(Uuid::new_v4(), at(1));
        let quiz_id = Uuid::new_v4();

        submit(&mut aggregate, quiz_id, SubmitQuiz { score: 60, time_spent: 12 }, at(1)).unwrap();
        submit(&mut aggregate, quiz_id, SubmitQuiz { score: 90, time_spent: 8 }, at(2)).unwrap();

        assert_eq!(aggregate.quizzes.len(), 1);
        let quiz = &aggregate.quizzes[0];
        assert_eq!(quiz.score, 90);
        assert_eq!(quiz.time_spent, 20);
        assert_eq!(quiz.attempts, 2);
        assert_eq!(quiz.completed_at, at(2));
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut aggregate = ProgressAggregate::new(Uuid::new_v4(), at(1));
        let err = submit(
            &mut aggregate,
            Uuid::new_v4(),
            SubmitQuiz { score: 120, time_spent: 5 },
            at(1),
        )
        .unwrap_err();
        assert!(matches!(err, ProgressError::InvalidScore(120)));
        assert!(aggregate.quizzes.is_empty());
    }
}
