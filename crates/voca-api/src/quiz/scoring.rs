use serde::Serialize;
use voca_db::models::{GradingMode, TestResult};

/// Share of correct answers as a whole percentage, rounded half up
pub fn percentage(correct: i32, total: i32) -> u32 {
    if total <= 0 {
        return 0;
    }
    (f64::from(correct.clamp(0, total)) / f64::from(total) * 100.0).round() as u32
}

/// `"correct/total"`
pub fn score_label(correct: i32, total: i32) -> String {
    format!("{correct}/{total}")
}

/// Stored tally as returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub id: i64,
    pub group_id: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub grading_mode: GradingMode,
    pub score: String,
    pub percentage: u32,
}

impl TestSummary {
    pub fn new(result: &TestResult, grading_mode: GradingMode) -> Self {
        Self {
            id: result.id,
            group_id: result.group_id,
            total_questions: result.total_questions,
            correct_answers: result.correct_answers,
            grading_mode,
            score: score_label(result.correct_answers, result.total_questions),
            percentage: percentage(result.correct_answers, result.total_questions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 10), 0);
        assert_eq!(percentage(10, 10), 100);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        // Half rounds up
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn test_score_label() {
        assert_eq!(score_label(7, 10), "7/10");
    }

    #[test]
    fn test_summary_serialization() {
        let result = TestResult {
            id: 3,
            user_id: uuid::Uuid::new_v4(),
            group_id: 9,
            total_questions: 4,
            correct_answers: 3,
            grading_mode: "self".to_string(),
            test_date: chrono::Utc::now(),
        };

        let json = serde_json::to_value(TestSummary::new(&result, GradingMode::SelfGraded)).unwrap();
        assert_eq!(json["score"], "3/4");
        assert_eq!(json["percentage"], 75);
        assert_eq!(json["grading_mode"], "self");
    }
}
