//! Conversational turns against real local storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use journal_application::{JournalUseCase, PersistenceAdapter, SendOutcome};
use journal_core::assistant::{
    AssistantGateway, AssistantReply, AssistantRequest, ToolInvocation, UPDATE_DIARY_TOOL,
};
use journal_core::chat::WELCOME_MESSAGE_ID;
use journal_core::diary::Mood;
use journal_core::error::Result;
use journal_infrastructure::{JournalPaths, create_journal_repository};
use serde_json::json;
use tempfile::TempDir;

/// Writes whatever the user says as the entry of the focused date.
struct EchoDiaryGateway;

#[async_trait]
impl AssistantGateway for EchoDiaryGateway {
    async fn generate_response(&self, request: AssistantRequest<'_>) -> Result<AssistantReply> {
        let args = json!({
            "date": request.selected_date_key,
            "content": request.user_text,
            "mood": "happy"
        });
        let args = args.as_object().cloned().unwrap_or_default();
        Ok(AssistantReply::with_tools(
            "",
            vec![ToolInvocation::new(UPDATE_DIARY_TOOL, args)],
        ))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

async fn open(temp_dir: &TempDir) -> JournalUseCase {
    let paths = JournalPaths::new(Some(temp_dir.path()));
    let repository =
        create_journal_repository(&Default::default(), &paths).expect("local repository");
    JournalUseCase::initialize(
        PersistenceAdapter::new(repository),
        Arc::new(EchoDiaryGateway),
        today(),
    )
    .await
}

#[tokio::test]
async fn test_turn_is_visible_after_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let usecase = open(&temp_dir).await;
        let outcome = usecase.send_message("Baked bread with a friend.").await;
        assert!(
            matches!(outcome, SendOutcome::Replied(ref m) if m.text == "I've saved that entry for 2024-03-10.")
        );
    }

    // The user message is written in the background; give it a moment.
    let mut chat_len = 0;
    for _ in 0..100 {
        let usecase = open(&temp_dir).await;
        let state = usecase.snapshot().await;
        chat_len = state.chat.len();
        if chat_len == 2 {
            let entry = &state.entries["2024-03-10"];
            assert_eq!(entry.content, "Baked bread with a friend.");
            assert_eq!(entry.mood, Some(Mood::Happy));
            assert!(state.chat.iter().all(|m| m.id != WELCOME_MESSAGE_ID));
            assert!(state.chat[0].is_user());
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected user and model messages on disk, found {chat_len}");
}

#[tokio::test]
async fn test_manual_entry_is_persisted() {
    let temp_dir = TempDir::new().unwrap();

    {
        let usecase = open(&temp_dir).await;
        usecase
            .select_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
            .await;
        usecase.save_manual_entry("Leap day notes.").await;
    }

    let usecase = open(&temp_dir).await;
    let state = usecase.snapshot().await;
    assert_eq!(state.entries["2024-02-29"].content, "Leap day notes.");
    assert_eq!(state.entries["2024-02-29"].mood, Some(Mood::Neutral));
}

#[tokio::test]
async fn test_reloaded_chat_keeps_turn_order() {
    let temp_dir = TempDir::new().unwrap();
    let turns = 40;

    {
        let usecase = open(&temp_dir).await;
        for i in 0..turns {
            let outcome = usecase.send_message(&format!("note {i}")).await;
            assert!(matches!(outcome, SendOutcome::Replied(_)));
        }
    }

    let paths = JournalPaths::new(Some(temp_dir.path()));
    let mut chat = Vec::new();
    for _ in 0..100 {
        let repository = create_journal_repository(&Default::default(), &paths).unwrap();
        chat = PersistenceAdapter::new(repository).load_chat().await;
        if chat.len() == turns * 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(chat.len(), turns * 2);

    for (i, pair) in chat.chunks(2).enumerate() {
        assert!(pair[0].is_user(), "turn {i} starts with the model reply");
        assert_eq!(pair[0].text, format!("note {i}"));
        assert!(!pair[1].is_user());
    }
    assert!(chat.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}
