//! Validator node: judges whether the fetched context answers the query.
//!
//! This is a judgment call by the model, not a deterministic check; a wrong
//! PASS or FAILED is acceptable. Loop termination never depends on it; that
//! is the router's job.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::WorkflowError;
use crate::llm::LlmClient;
use crate::prompts::CONTEXT_VALIDATION_PROMPT;
use crate::state::{ConversationState, StateDelta, ValidationStatus};

use super::{Node, RunContext, Step};

/// Validator node.
///
/// PASS: status recorded, retry_count untouched, proceed to generation.
/// FAILED (or any non-PASS label): retry_count incremented, back to the
/// router for another attempt or the budget fallback.
#[derive(Clone)]
pub struct ValidatorNode {
    llm: Arc<dyn LlmClient>,
}

impl ValidatorNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn render_prompt(state: &ConversationState) -> String {
        format!(
            "{}\n\nUser query:\n{}\n\nContext:\n{}",
            CONTEXT_VALIDATION_PROMPT, state.user_query, state.context
        )
    }
}

#[async_trait]
impl Node for ValidatorNode {
    fn id(&self) -> &str {
        "validator"
    }

    async fn run(
        &self,
        state: &ConversationState,
        _ctx: &RunContext,
    ) -> Result<(StateDelta, Step), WorkflowError> {
        let label = self.llm.classify(&Self::render_prompt(state)).await?;
        let passed = label.trim() == "PASS";
        debug!(label = %label.trim(), retry_count = state.retry_count, "context validated");

        let mut delta = StateDelta::default();
        if passed {
            delta.validation_status = Some(ValidationStatus::Pass);
            Ok((delta, Step::Generate))
        } else {
            delta.validation_status = Some(ValidationStatus::Failed);
            delta.retry_count = Some(state.retry_count + 1);
            Ok((delta, Step::Router))
        }
    }
}
