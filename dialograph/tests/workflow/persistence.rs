//! Resume, snapshot and disconnect behavior.

use std::time::Duration;

use tokio_stream::StreamExt;

use dialograph::{InputPayload, MockLlm, MockToolSource, WorkflowConfig, WorkflowError};

use super::common::{engine_with, reply_contents};

/// **Scenario**: a second run on the same thread resumes the persisted
/// history; the first turn's messages are still there, in order.
#[tokio::test]
async fn second_run_resumes_thread() {
    let llm = MockLlm::default()
        .push_response("router 1")
        .push_response("first reply")
        .push_response("router 2")
        .push_response("second reply");
    let (engine, _) = engine_with(llm, MockToolSource::default(), WorkflowConfig::default());

    let _: Vec<_> = engine.run("resume", "first question".into()).collect().await;
    let _: Vec<_> = engine
        .run("resume", "second question".into())
        .collect()
        .await;

    let state = engine.get_state("resume").await.unwrap().unwrap();
    let contents: Vec<_> = state.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "first question",
            "first reply",
            "second question",
            "second reply"
        ]
    );
    assert_eq!(reply_contents(&state), vec!["first reply", "second reply"]);
}

/// **Scenario**: get_state is read-only; two calls with no intervening run
/// return identical snapshots.
#[tokio::test]
async fn get_state_is_idempotent() {
    let llm = MockLlm::default()
        .push_response("router")
        .push_response("reply");
    let (engine, _) = engine_with(llm, MockToolSource::default(), WorkflowConfig::default());

    let _: Vec<_> = engine.run("idem", "hello".into()).collect().await;
    let first = engine.get_state("idem").await.unwrap();
    let second = engine.get_state("idem").await.unwrap();
    assert_eq!(first, second);
    assert!(first.is_some());
}

/// **Scenario**: list-of-strings input appends all entries as user messages
/// of one turn.
#[tokio::test]
async fn list_input_appends_all_user_messages() {
    let llm = MockLlm::default()
        .push_response("router")
        .push_response("covered both");
    let (engine, _) = engine_with(llm, MockToolSource::default(), WorkflowConfig::default());

    let payload: InputPayload = vec!["part one".to_string(), "part two".to_string()].into();
    let _: Vec<_> = engine.run("multi", payload).collect().await;

    let state = engine.get_state("multi").await.unwrap().unwrap();
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.messages[0].content, "part one");
    assert_eq!(state.messages[1].content, "part two");
}

/// **Scenario**: malformed input produces one error event and leaves no
/// trace of the thread.
#[tokio::test]
async fn malformed_input_starts_nothing() {
    let (engine, saver) = engine_with(
        MockLlm::default(),
        MockToolSource::default(),
        WorkflowConfig::default(),
    );

    let payload = InputPayload::parse(&serde_json::json!({"message": "wrong shape"}));
    let events: Vec<_> = engine.run("ghost", payload).collect().await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(WorkflowError::MalformedInput)));
    assert!(engine.get_state("ghost").await.unwrap().is_none());
    assert!(saver.saved_states().is_empty());
}

/// **Scenario**: dropping the stream mid-run does not lose the turn; the
/// full assistant message is still persisted.
#[tokio::test]
async fn dropped_stream_still_persists_reply() {
    let llm = MockLlm::default()
        .push_response("router")
        .push_response("the reply nobody watched");
    let (engine, _) = engine_with(llm, MockToolSource::default(), WorkflowConfig::default());

    let stream = engine.run("walkaway", "hello?".into());
    drop(stream);

    // The spawned run keeps going; poll until it lands.
    let mut persisted = None;
    for _ in 0..100 {
        if let Some(state) = engine.get_state("walkaway").await.unwrap() {
            if !reply_contents(&state).is_empty() {
                persisted = Some(state);
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let state = persisted.expect("run should complete after disconnect");
    assert_eq!(reply_contents(&state), vec!["the reply nobody watched"]);
    assert_eq!(state.user_query, "");
    assert_eq!(state.context, "");
}

/// **Scenario**: two different threads run concurrently without sharing
/// state.
#[tokio::test]
async fn threads_do_not_share_state() {
    let llm = MockLlm::default()
        .push_response("router a")
        .push_response("reply a")
        .push_response("router b")
        .push_response("reply b");
    let (engine, _) = engine_with(llm, MockToolSource::default(), WorkflowConfig::default());

    let _: Vec<_> = engine.run("thread-a", "question a".into()).collect().await;
    let _: Vec<_> = engine.run("thread-b", "question b".into()).collect().await;

    let a = engine.get_state("thread-a").await.unwrap().unwrap();
    let b = engine.get_state("thread-b").await.unwrap().unwrap();
    assert_eq!(a.messages.len(), 2);
    assert_eq!(b.messages.len(), 2);
    assert_eq!(a.messages[0].content, "question a");
    assert_eq!(b.messages[0].content, "question b");
}
