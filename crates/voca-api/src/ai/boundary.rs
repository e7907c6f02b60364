//! Timeout and retry boundary around a [`LanguageModel`].

use std::{sync::Arc, time::Duration};

use super::{
    evaluation::{AnswerEvaluation, answer_evaluation_request, parse_answer_evaluation},
    model::{AiError, CompletionRequest, LanguageModel},
    translation::{
        MAX_WORDS_PER_REQUEST, WordToValidate, WordValidation, parse_word_validations,
        word_validation_request,
    },
};
use crate::metrics::record_ai_request;

const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct AiBoundary {
    model: Arc<dyn LanguageModel>,
    answer_timeout: Duration,
    validation_timeout: Duration,
    max_retries: u32,
    backoff_base: Duration,
}

impl AiBoundary {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        answer_timeout: Duration,
        validation_timeout: Duration,
        max_retries: u32,
    ) -> Self {
        Self {
            model,
            answer_timeout,
            validation_timeout,
            max_retries,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    /// Override the first retry delay. Later retries double it.
    #[must_use]
    pub const fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Ask the model whether `user_answer` is an acceptable translation of `english`.
    pub async fn evaluate_answer(
        &self,
        english: &str,
        expected: &str,
        user_answer: &str,
    ) -> Result<AnswerEvaluation, AiError> {
        let request = answer_evaluation_request(english, expected, user_answer);
        let result = self
            .complete(&request, self.answer_timeout)
            .await
            .and_then(|content| parse_answer_evaluation(&content));

        record_ai_request("evaluate_answer", &result);
        result
    }

    /// Check word pairs in batches of [`MAX_WORDS_PER_REQUEST`].
    pub async fn validate_words(
        &self,
        words: &[WordToValidate],
    ) -> Result<Vec<WordValidation>, AiError> {
        let mut validations = Vec::with_capacity(words.len());

        for batch in words.chunks(MAX_WORDS_PER_REQUEST) {
            let request = word_validation_request(batch);
            let result = self
                .complete(&request, self.validation_timeout)
                .await
                .and_then(|content| parse_word_validations(&content, batch));

            record_ai_request("validate_words", &result);
            validations.extend(result?);
        }

        Ok(validations)
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        timeout: Duration,
    ) -> Result<String, AiError> {
        let mut attempt = 0;

        loop {
            let result = match tokio::time::timeout(timeout, self.model.complete_json(request)).await
            {
                Ok(result) => result,
                Err(_) => Err(AiError::Timeout),
            };

            match result {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff_base * 2u32.pow(attempt);
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying AI request"
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}
