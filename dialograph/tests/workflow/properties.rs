//! Invariants that must hold for every run.

use tokio_stream::StreamExt;

use dialograph::{MockLlm, MockToolSource, Role, WorkflowConfig};

use super::common::{engine_with, tool_message_count};

/// Always-failing validation with budget N. Used by the bound checks below.
fn always_failing_fixture(max_tool_iterations: u32) -> (MockLlm, MockToolSource) {
    let mut llm = MockLlm::default();
    let mut tools = MockToolSource::default();
    for i in 0..max_tool_iterations {
        llm = llm
            .push_tool_call("web_search", r#"{"query":"q"}"#)
            .push_verdict("FAILED");
        tools = tools.push_result(format!("noise {}", i));
    }
    (llm.push_response("gave up nicely"), tools)
}

/// **Scenario**: retry_count never exceeds the budget in any persisted
/// snapshot, for budgets 1..=4.
#[tokio::test]
async fn retry_count_never_exceeds_budget() {
    for budget in 1..=4u32 {
        let (llm, tools) = always_failing_fixture(budget);
        let config = WorkflowConfig {
            max_tool_iterations: budget,
            ..WorkflowConfig::default()
        };
        let (engine, saver) = engine_with(llm, tools, config);

        let events: Vec<_> = engine.run("bound", "hard".into()).collect().await;
        assert!(events.iter().all(|e| e.is_ok()));

        for state in saver.saved_states() {
            assert!(
                state.retry_count <= budget,
                "retry_count {} exceeded budget {}",
                state.retry_count,
                budget
            );
        }
    }
}

/// **Scenario**: the retrieval loop runs at most `budget` attempts even when
/// validation never passes.
#[tokio::test]
async fn retrieval_attempts_bounded_by_budget() {
    let budget = 3u32;
    let (llm, tools) = always_failing_fixture(budget);
    let config = WorkflowConfig {
        max_tool_iterations: budget,
        ..WorkflowConfig::default()
    };
    let (engine, _) = engine_with(llm, tools, config);

    let _: Vec<_> = engine.run("attempts", "hard".into()).collect().await;
    let state = engine.get_state("attempts").await.unwrap().unwrap();
    assert_eq!(tool_message_count(&state), budget as usize);
}

/// **Scenario**: after generation, user_query and context are empty in the
/// persisted snapshot, so turn-scoped fields never leak into the next turn.
#[tokio::test]
async fn turn_scoped_fields_cleared_after_generation() {
    let llm = MockLlm::default()
        .push_tool_call("web_search", r#"{"query":"fact"}"#)
        .push_verdict("PASS")
        .push_response("answer with context");
    let tools = MockToolSource::default().push_result("a useful document");
    let (engine, _) = engine_with(llm, tools, WorkflowConfig::default());

    let _: Vec<_> = engine.run("cleared", "need a fact".into()).collect().await;
    let state = engine.get_state("cleared").await.unwrap().unwrap();
    assert_eq!(state.user_query, "");
    assert_eq!(state.context, "");
}

/// **Scenario**: message ordering matches arrival order in every persisted
/// snapshot; ids are unique and never reused.
#[tokio::test]
async fn message_order_and_id_uniqueness_hold() {
    let llm = MockLlm::default()
        .push_tool_call("web_search", "{}")
        .push_verdict("PASS")
        .push_response("done");
    let tools = MockToolSource::default().push_result("doc");
    let (engine, saver) = engine_with(llm, tools, WorkflowConfig::default());

    let _: Vec<_> = engine.run("ordered", "q".into()).collect().await;

    for state in saver.saved_states() {
        let ids: Vec<u64> = state
            .messages
            .iter()
            .map(|m| m.id.trim_start_matches('m').parse().expect("numeric id"))
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "duplicate message id");
        assert!(
            ids.windows(2).all(|w| w[0] < w[1]),
            "arrival order violated: {:?}",
            ids
        );
    }
}

/// **Scenario**: only generator output is streamed; tool results and the
/// router's discarded reply never reach the caller.
#[tokio::test]
async fn stream_carries_generator_fragments_only() {
    let llm = MockLlm::default()
        .push_tool_call("web_search", "{}")
        .push_verdict("PASS")
        .push_response("clean reply");
    let tools = MockToolSource::default().push_result("SECRET TOOL PAYLOAD");
    let (engine, _) = engine_with(llm, tools, WorkflowConfig::default());

    let fragments: Vec<String> = engine
        .run("clean", "q".into())
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(fragments.concat(), "clean reply");
    assert!(fragments.iter().all(|f| !f.contains("SECRET")));

    // The tool payload still made it into the persisted history.
    let state = engine.get_state("clean").await.unwrap().unwrap();
    assert!(state
        .messages
        .iter()
        .any(|m| m.role == Role::Tool && m.content.contains("SECRET")));
}

/// **Scenario**: a checkpoint exists after every node transition (input +
/// one per node), so a crash resumes from the last completed node.
#[tokio::test]
async fn checkpoint_saved_per_transition() {
    let llm = MockLlm::default()
        .push_response("router direct")
        .push_response("reply");
    let (engine, saver) = engine_with(llm, MockToolSource::default(), WorkflowConfig::default());

    let _: Vec<_> = engine.run("steps", "hi".into()).collect().await;

    // input append, router, generator
    let saved = saver.saved_states();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[0].messages.len(), 1);
    assert_eq!(saved[2].messages.len(), 2);
}
