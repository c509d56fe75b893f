use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::prompts::{build_similarity_prompt, JobSummary, SIMILARITY_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::{parse_json_reply, LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("model returned no score entries")]
    NoScore,
}

impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        AppError::Llm(e.to_string())
    }
}

/// One entry of the model's reply. The job id is not needed for a single job.
#[derive(Debug, Deserialize)]
struct ScoreEntry {
    #[serde(default)]
    score: f64,
}

/// Reads the first entry's score from a (possibly fenced) JSON array.
/// A missing score counts as zero.
pub fn parse_score(reply: &str) -> Result<f64, ScoringError> {
    let entries: Vec<ScoreEntry> = parse_json_reply(reply)?;
    entries
        .first()
        .map(|e| e.score)
        .ok_or(ScoringError::NoScore)
}

#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn score(&self, candidate_profile: &str, job: &JobSummary) -> Result<f64, ScoringError>;
}

/// Scores through the generative-AI client with a single request.
pub struct LlmSimilarityScorer {
    llm: LlmClient,
}

impl LlmSimilarityScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SimilarityScorer for LlmSimilarityScorer {
    async fn score(&self, candidate_profile: &str, job: &JobSummary) -> Result<f64, ScoringError> {
        let prompt = build_similarity_prompt(candidate_profile, std::slice::from_ref(job));
        let response = self.llm.call(&prompt, SIMILARITY_SYSTEM).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        parse_score(text)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_score() {
        let reply = "```json\n[{\"id\": 3, \"score\": 82}]\n```";
        assert_eq!(parse_score(reply).unwrap(), 82.0);
    }

    #[test]
    fn test_missing_score_counts_as_zero() {
        assert_eq!(parse_score("[{\"id\": 3}]").unwrap(), 0.0);
    }

    #[test]
    fn test_first_entry_wins() {
        assert_eq!(
            parse_score("[{\"id\": 1, \"score\": 40.5}, {\"id\": 2, \"score\": 90}]").unwrap(),
            40.5
        );
    }

    #[test]
    fn test_empty_array_is_an_error() {
        assert!(matches!(parse_score("[]"), Err(ScoringError::NoScore)));
    }

    #[test]
    fn test_prose_reply_is_an_error() {
        assert!(matches!(
            parse_score("The candidate is a strong fit."),
            Err(ScoringError::Llm(LlmError::Parse(_)))
        ));
    }
}
