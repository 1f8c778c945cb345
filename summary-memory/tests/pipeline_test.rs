//! Integration tests for [`summary_memory::SummarizationPipeline`].
//!
//! Walks every terminal outcome (empty, under budget, summarized, summarization
//! failed), both budget units, the fatal error kinds, session resolution and the
//! external-memory source.

mod common;

use common::{store_with_turns, MockLlm, UnavailableStore, YieldingMemory};
use memory_core::{ExternalMessage, MessageStore, NewMessage, RetrievalQuery, SenderType, SortOrder};
use memory_inmemory::{InMemoryChatHistory, InMemoryMessageStore};
use std::sync::Arc;
use std::time::Duration;
use summary_memory::{
    BudgetUnit, PipelineError, PipelineStatus, SummarizationPipeline, SummaryMemoryConfig,
};
use token_estimate::{EstimationMethod, ModelFamily};

const CLAUDE: &str = "claude-3-haiku";

/// **Test: Empty retrieval short-circuits.**
///
/// **Setup:** Empty store.
/// **Action:** `run` for any session.
/// **Expected:** Status `Empty`, placeholder text, no LLM call.
#[tokio::test]
async fn test_empty_history() {
    let llm = Arc::new(MockLlm::replying(CLAUDE, "unused"));
    let pipeline = SummarizationPipeline::new(
        Arc::new(InMemoryMessageStore::new()),
        llm.clone(),
        SummaryMemoryConfig::default(),
    );

    let result = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap();

    assert_eq!(result.status, PipelineStatus::Empty);
    assert_eq!(result.text, "no history available for summarization");
    assert_eq!(result.message_count, 0);
    assert_eq!(llm.calls(), 0);
}

/// **Test: Under budget returns the formatted history unchanged.**
///
/// **Setup:** Three turns, default template, budget 1000.
/// **Action:** `run`.
/// **Expected:** Status `UnderBudget`, text is the formatted lines, no LLM call.
#[tokio::test]
async fn test_under_budget() {
    let store = store_with_turns("s1", &["hi there", "hello, how can I help?", "tell me a joke"]).await;
    let llm = Arc::new(MockLlm::replying(CLAUDE, "unused"));
    let pipeline =
        SummarizationPipeline::new(Arc::new(store), llm.clone(), SummaryMemoryConfig::default());

    let result = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap();

    assert_eq!(result.status, PipelineStatus::UnderBudget);
    assert_eq!(
        result.text,
        "alice: hi there\nbot: hello, how can I help?\nalice: tell me a joke"
    );
    assert_eq!(result.message_count, 3);
    assert_eq!(result.raw_bytes, result.text.len());
    assert_eq!(result.compressed_bytes, None);
    let estimate = result.estimate.unwrap();
    assert_eq!(estimate.method, EstimationMethod::ApproximateCharacterRatio);
    assert_eq!(estimate.count, result.text.chars().count().div_ceil(4));
    assert_eq!(llm.calls(), 0);
}

/// **Test: Over budget with a working LLM is summarized.**
///
/// **Setup:** History of 6000 characters (1500 approximate units), budget 1000.
/// **Action:** `run`.
/// **Expected:** Status `Summarized`, text is the LLM reply, one call with the rendered prompt.
#[tokio::test]
async fn test_over_budget_summarized() {
    // 7 + 2993 + 1 + 5 + 2994 = 6000 chars
    let store = store_with_turns("s1", &[&"x".repeat(2993), &"x".repeat(2994)]).await;
    let llm = Arc::new(MockLlm::replying(CLAUDE, "short summary"));
    let pipeline =
        SummarizationPipeline::new(Arc::new(store), llm.clone(), SummaryMemoryConfig::default());

    let result = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap();

    assert_eq!(result.status, PipelineStatus::Summarized);
    assert_eq!(result.text, "short summary");
    assert!(result.is_summarized());
    assert_eq!(result.estimate.unwrap().count, 1500);
    assert_eq!(result.raw_bytes, 6000);
    assert_eq!(result.compressed_bytes, Some(13));
    assert_eq!(result.summary_estimate.unwrap().count, 4);
    assert_eq!(llm.calls(), 1);
    assert!(llm.prompts()[0].ends_with(" 1000"));
}

/// **Test: Summarizer failure falls back to the original text.**
///
/// **Setup:** Same as the summarized case, LLM returns a transport error.
/// **Action:** `run`.
/// **Expected:** `Ok` with status `SummarizationFailed`, original text and a diagnostic.
#[tokio::test]
async fn test_summarization_failure_falls_back() {
    let long_turn = "x".repeat(2993);
    let store = store_with_turns("s1", &[&long_turn, &long_turn]).await;
    let llm = Arc::new(MockLlm::failing(CLAUDE, "transport error"));
    let pipeline =
        SummarizationPipeline::new(Arc::new(store), llm, SummaryMemoryConfig::default());

    let result = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap();

    assert_eq!(result.status, PipelineStatus::SummarizationFailed);
    assert_eq!(result.text, format!("alice: {}\nbot: {}", long_turn, long_turn));
    assert!(result.diagnostic.unwrap().contains("transport error"));
    assert_eq!(result.compressed_bytes, None);
}

/// **Test: Summarizer timeout is a summarization failure.**
///
/// **Setup:** LLM sleeps 120 s, timeout 1 s, paused clock.
/// **Action:** `run`.
/// **Expected:** Status `SummarizationFailed` with a timeout diagnostic.
#[tokio::test(start_paused = true)]
async fn test_summarization_timeout() {
    let store = store_with_turns("s1", &[&"y".repeat(200)]).await;
    let llm = Arc::new(MockLlm::slow(CLAUDE, Duration::from_secs(120)));
    let config = SummaryMemoryConfig::default()
        .with_character_limit(10)
        .with_summarize_timeout(Some(Duration::from_secs(1)));
    let pipeline = SummarizationPipeline::new(Arc::new(store), llm, config);

    let result = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap();

    assert_eq!(result.status, PipelineStatus::SummarizationFailed);
    assert!(result.diagnostic.unwrap().contains("timed out"));
}

/// **Test: Store failure is fatal.**
#[tokio::test]
async fn test_store_unavailable_is_error() {
    let pipeline = SummarizationPipeline::new(
        Arc::new(UnavailableStore),
        Arc::new(MockLlm::replying(CLAUDE, "unused")),
        SummaryMemoryConfig::default(),
    );

    let err = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap_err();

    assert!(matches!(err, PipelineError::StoreUnavailable(_)));
}

/// **Test: Strict template with an unknown field is fatal; lenient renders empty.**
#[tokio::test]
async fn test_strict_template_field_missing() {
    let store = Arc::new(store_with_turns("s1", &["hi"]).await);
    let llm = Arc::new(MockLlm::replying(CLAUDE, "unused"));
    let template = "{sender_name} ({mood}): {text}";

    let strict = SummarizationPipeline::new(
        store.clone(),
        llm.clone(),
        SummaryMemoryConfig::default()
            .with_template(template)
            .with_strict_template(true),
    );
    let err = strict.run(RetrievalQuery::for_session("s1")).await.unwrap_err();
    assert!(matches!(err, PipelineError::TemplateFieldMissing(_)));

    let lenient = SummarizationPipeline::new(
        store,
        llm,
        SummaryMemoryConfig::default().with_template(template),
    );
    let result = lenient.run(RetrievalQuery::for_session("s1")).await.unwrap();
    assert_eq!(result.text, "alice (): hi");
}

/// **Test: Character budget compares text length, cost budget compares the estimate.**
///
/// **Setup:** One turn formatting to 407 characters (102 approximate units), budget 200.
/// **Action:** Run with each budget unit.
/// **Expected:** Cost is under budget; characters are over and get summarized.
#[tokio::test]
async fn test_budget_units() {
    let store = Arc::new(store_with_turns("s1", &[&"z".repeat(400)]).await);

    let by_cost = SummarizationPipeline::new(
        store.clone(),
        Arc::new(MockLlm::replying(CLAUDE, "summary")),
        SummaryMemoryConfig::default()
            .with_character_limit(200)
            .with_budget_unit(BudgetUnit::EstimatedCost),
    );
    let result = by_cost.run(RetrievalQuery::for_session("s1")).await.unwrap();
    assert_eq!(result.status, PipelineStatus::UnderBudget);
    assert_eq!(result.estimate.unwrap().count, 102);

    let by_chars = SummarizationPipeline::new(
        store,
        Arc::new(MockLlm::replying(CLAUDE, "summary")),
        SummaryMemoryConfig::default()
            .with_character_limit(200)
            .with_budget_unit(BudgetUnit::Characters),
    );
    let result = by_chars.run(RetrievalQuery::for_session("s1")).await.unwrap();
    assert_eq!(result.status, PipelineStatus::Summarized);
    assert_eq!(result.text, "summary");
}

/// **Test: Budget equal to the estimate is still under budget.**
#[tokio::test]
async fn test_budget_boundary_inclusive() {
    // "alice: " + 393 chars = 400 chars = 100 units
    let store = store_with_turns("s1", &[&"w".repeat(393)]).await;
    let llm = Arc::new(MockLlm::replying(CLAUDE, "unused"));
    let pipeline = SummarizationPipeline::new(
        Arc::new(store),
        llm.clone(),
        SummaryMemoryConfig::default().with_character_limit(100),
    );

    let result = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap();

    assert_eq!(result.status, PipelineStatus::UnderBudget);
    assert_eq!(llm.calls(), 0);
}

/// **Test: Model id override drives estimation.**
///
/// **Setup:** LLM reports an unknown model; config overrides with a Claude id.
/// **Expected:** Estimate is tagged with the Anthropic family.
#[tokio::test]
async fn test_model_id_override() {
    let store = store_with_turns("s1", &["hello"]).await;
    let pipeline = SummarizationPipeline::new(
        Arc::new(store),
        Arc::new(MockLlm::replying("local-model", "unused")),
        SummaryMemoryConfig::default().with_model_id("anthropic/claude-3-5-sonnet"),
    );

    assert_eq!(pipeline.model_id(), "anthropic/claude-3-5-sonnet");
    let result = pipeline.run(RetrievalQuery::for_session("s1")).await.unwrap();
    assert_eq!(result.estimate.unwrap().family, ModelFamily::Anthropic);
}

/// **Test: Empty query session resolves to the configured default.**
#[tokio::test]
async fn test_default_session_resolution() {
    let store = store_with_turns("current", &["from current"]).await;
    store
        .add(NewMessage::new("other", SenderType::User, "from other"))
        .await
        .unwrap();
    let pipeline = SummarizationPipeline::new(
        Arc::new(store),
        Arc::new(MockLlm::replying(CLAUDE, "unused")),
        SummaryMemoryConfig::default()
            .with_default_session_id("current")
            .with_template("{text}"),
    );

    let result = pipeline.run(RetrievalQuery::default()).await.unwrap();

    assert_eq!(result.text, "from current");
}

/// **Test: External memory replaces the primary store.**
///
/// **Setup:** Unreachable store, chat history with four turns, user filter, descending.
/// **Expected:** Only user turns, newest first; the store is never queried.
#[tokio::test]
async fn test_external_memory_source() {
    let history = InMemoryChatHistory::new("s1");
    history
        .extend_session(
            "s1",
            [
                ExternalMessage::user("first question").with_sender_name("alice"),
                ExternalMessage::ai("first answer").with_sender_name("bot"),
                ExternalMessage::user("second question").with_sender_name("alice"),
                ExternalMessage::ai("second answer").with_sender_name("bot"),
            ],
        )
        .await;
    let pipeline = SummarizationPipeline::new(
        Arc::new(UnavailableStore),
        Arc::new(MockLlm::replying(CLAUDE, "unused")),
        SummaryMemoryConfig::default(),
    )
    .with_external_memory(Arc::new(history));

    let query = RetrievalQuery::for_session("s1")
        .with_sender_type(Some(SenderType::User))
        .with_order(SortOrder::Descending);
    let result = pipeline.run(query).await.unwrap();

    assert_eq!(result.status, PipelineStatus::UnderBudget);
    assert_eq!(result.text, "alice: second question\nalice: first question");
}

/// **Test: Runs share no state.**
#[tokio::test]
async fn test_runs_are_independent() {
    let store = store_with_turns("a", &["alpha"]).await;
    let pipeline = SummarizationPipeline::new(
        Arc::new(store),
        Arc::new(MockLlm::replying(CLAUDE, "unused")),
        SummaryMemoryConfig::default(),
    );

    let first = pipeline.run(RetrievalQuery::for_session("a")).await.unwrap();
    let empty = pipeline.run(RetrievalQuery::for_session("b")).await.unwrap();
    let again = pipeline.run(RetrievalQuery::for_session("a")).await.unwrap();

    assert_eq!(empty.status, PipelineStatus::Empty);
    assert_eq!(first, again);
}

/// **Test: Concurrent runs over one external memory read their own sessions.**
///
/// **Setup:** External memory with sessions `alice` and `bob` that yields inside every call.
/// **Action:** Run both sessions at once on the same pipeline.
/// **Expected:** Each result holds only its own session's turns.
#[tokio::test]
async fn test_concurrent_runs_keep_sessions_apart() {
    let memory = YieldingMemory::new()
        .with_session("alice", &["alice secret"])
        .with_session("bob", &["bob note"]);
    let pipeline = SummarizationPipeline::new(
        Arc::new(UnavailableStore),
        Arc::new(MockLlm::replying(CLAUDE, "unused")),
        SummaryMemoryConfig::default().with_template("{session_id}: {text}"),
    )
    .with_external_memory(Arc::new(memory));

    let (alice, bob) = tokio::join!(
        pipeline.run(RetrievalQuery::for_session("alice")),
        pipeline.run(RetrievalQuery::for_session("bob")),
    );

    assert_eq!(alice.unwrap().text, "alice: alice secret");
    assert_eq!(bob.unwrap().text, "bob: bob note");
}
