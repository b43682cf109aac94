use serde::Deserialize;

use crate::engine::SubmitQuiz;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SubmitQuizRequest {
    /// 0-100.
    pub score: i64,
    /// Minutes spent on this attempt.
    pub time_spent: i64,
}

impl From<SubmitQuizRequest> for SubmitQuiz {
    fn from(req: SubmitQuizRequest) -> Self {
        Self {
            score: req.score,
            time_spent: req.time_spent,
        }
    }
}
