//! Engine configuration. Can be filled from the environment.

/// Knobs for one workflow engine instance.
///
/// **Interaction**: Consumed at engine construction; individual nodes receive
/// the values they need (the router takes `max_tool_iterations`, the
/// generator `summary_trigger_count`, the summarizer `summary_retain_count`).
/// `retrieval_score_threshold` is carried for the external tool gateway's
/// cache-hit decision and is not read by the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkflowConfig {
    /// Maximum consecutive tool-invoking assistant turns per run before the
    /// router forces a direct answer.
    pub max_tool_iterations: u32,
    /// Message count above which a turn ends with summarization.
    pub summary_trigger_count: usize,
    /// Messages retained verbatim after a summarization pass.
    pub summary_retain_count: usize,
    /// Relevance score below which the tool gateway re-fetches instead of
    /// serving a cached document.
    pub retrieval_score_threshold: f32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_tool_iterations: 3,
            summary_trigger_count: 30,
            summary_retain_count: 5,
            retrieval_score_threshold: 0.5,
        }
    }
}

impl WorkflowConfig {
    /// Reads overrides from `MAX_TOOL_ITERATIONS`, `SUMMARY_TRIGGER_COUNT`,
    /// `SUMMARY_RETAIN_COUNT` and `RETRIEVAL_SCORE_THRESHOLD`. Unset or
    /// unparsable variables keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = parse_env("MAX_TOOL_ITERATIONS") {
            config.max_tool_iterations = v;
        }
        if let Some(v) = parse_env("SUMMARY_TRIGGER_COUNT") {
            config.summary_trigger_count = v;
        }
        if let Some(v) = parse_env("SUMMARY_RETAIN_COUNT") {
            config.summary_retain_count = v;
        }
        if let Some(v) = parse_env("RETRIEVAL_SCORE_THRESHOLD") {
            config.retrieval_score_threshold = v;
        }
        config
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
