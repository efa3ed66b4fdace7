//! End-to-end integration tests for the Budget Splitter Assistant.
//!
//! These tests drive the full pipeline from an inbound channel message to the
//! replies sent back, with a real file-backed store underneath.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use budgetsplit_agent::{BudgetAssistant, run_session_until};
use budgetsplit_config::{AppConfig, StoreBackend};
use budgetsplit_core::category::UserId;
use budgetsplit_core::channel::{Channel, ChannelMessage};
use budgetsplit_core::error::ChannelError;
use budgetsplit_core::store::CategoryStore;
use budgetsplit_engine::Allocator;
use budgetsplit_store::FileStore;
use tempfile::TempDir;
use tokio::sync::mpsc;

// ── Scripted channel ─────────────────────────────────────────────────────

/// A channel that replays scripted messages and records every reply.
struct ScriptedChannel {
    script: Mutex<Vec<ChannelMessage>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedChannel {
    fn new(script: Vec<ChannelMessage>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn texts_to(&self, chat_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(chat, _)| chat == chat_id)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    fn name(&self) -> &str {
        "e2e_scripted"
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        let script = std::mem::take(&mut *self.script.lock().unwrap());
        let (tx, rx) = mpsc::channel(script.len().max(1));
        for msg in script {
            tx.send(Ok(msg)).await.unwrap();
        }
        Ok(rx)
    }

    async fn send(&self, chat_id: &str, content: &str) -> Result<(), ChannelError> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), content.to_string()));
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn from(user: i64, text: &str) -> ChannelMessage {
    ChannelMessage::new(user, user.to_string(), text).with_sender_name(format!("user{user}"))
}

async fn run_script(store: Arc<dyn CategoryStore>, script: Vec<ChannelMessage>) -> Arc<ScriptedChannel> {
    let channel = ScriptedChannel::new(script);
    let assistant = Arc::new(BudgetAssistant::new(store).with_admin_chat("1000"));
    run_session_until(channel.clone(), assistant, std::future::pending())
        .await
        .unwrap();
    channel
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_define_and_split_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("categories.json");

    let store = Arc::new(FileStore::open(&path));
    let channel = run_script(
        store,
        vec![
            from(1, r#"{"Food": 50, "Rent": 30, "Other": 20}"#),
            from(1, "1250"),
        ],
    )
    .await;
    assert_eq!(
        channel.texts_to("1"),
        vec![
            "Categories updated successfully via JSON.".to_string(),
            "Budget split:\nFood: 550\nRent: 400\nOther: 300\n".to_string(),
        ]
    );

    // A fresh process sees the same categories in the same order.
    let reopened = Arc::new(FileStore::open(&path));
    let channel = run_script(reopened, vec![from(1, "1000")]).await;
    assert_eq!(
        channel.texts_to("1"),
        vec!["Budget split:\nFood: 500\nRent: 300\nOther: 200\n".to_string()]
    );
}

#[tokio::test]
async fn e2e_yaml_without_spaces_then_small_amount() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("categories.json")));

    let channel = run_script(store, vec![from(2, "Food:50\nRent:30\nOther:20"), from(2, "100")]).await;
    let texts = channel.texts_to("2");
    assert_eq!(texts[0], "Categories updated successfully via YAML.");
    assert_eq!(texts[1], "Budget split:\nFood: 100\nRent: 0\nOther: 0\n");
}

#[tokio::test]
async fn e2e_users_do_not_share_categories() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("categories.json")));

    let channel = run_script(
        store.clone(),
        vec![from(1, "Savings: 1"), from(2, "500"), from(1, "500")],
    )
    .await;

    assert!(channel.texts_to("2")[0].starts_with("No categories set."));
    assert_eq!(channel.texts_to("1")[1], "Budget split:\nSavings: 500\n");
    assert_eq!(store.users().await.unwrap(), 1);
    assert!(store.get(&UserId::from(2_i64)).await.unwrap().is_none());
}

#[tokio::test]
async fn e2e_garbage_keeps_previous_categories() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("categories.json")));

    let channel = run_script(
        store,
        vec![
            from(3, "Food: 1\nRent: 1"),
            from(3, "{}"),
            from(3, "what is this"),
            from(3, "200"),
        ],
    )
    .await;

    let texts = channel.texts_to("3");
    assert!(texts[1].starts_with("Send a number to split your budget"));
    assert!(texts[2].starts_with("Send a number to split your budget"));
    assert_eq!(texts[3], "Budget split:\nFood: 100\nRent: 100\n");
}

#[tokio::test]
async fn e2e_feedback_reaches_admin() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("categories.json")));

    let channel = run_script(store, vec![from(4, "/feedback please add currencies")]).await;

    assert_eq!(
        channel.texts_to("1000"),
        vec!["Feedback from user4 (ID: 4):\nplease add currencies".to_string()]
    );
    assert_eq!(channel.texts_to("4"), vec!["Feedback sent, thank you!".to_string()]);
}

#[tokio::test]
async fn e2e_config_selects_store_and_unit() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    let store_path = dir.path().join("store.json");
    std::fs::write(
        &config_path,
        format!(
            "admin_id = 77\n\n[store]\nbackend = \"file\"\npath = {:?}\n\n[allocation]\nrounding_unit = 10\n",
            store_path.display().to_string()
        ),
    )
    .unwrap();

    let config = AppConfig::load_from(&config_path).unwrap();
    assert_eq!(config.store.backend, StoreBackend::File);
    assert_eq!(config.store_path(), store_path);

    let store: Arc<dyn CategoryStore> = Arc::new(FileStore::open(config.store_path()));
    let allocator = Allocator::new(config.allocation.rounding_unit).unwrap();
    let assistant = Arc::new(BudgetAssistant::new(store).with_allocator(allocator));

    let channel = ScriptedChannel::new(vec![from(5, "Food: 50\nRent: 30\nOther: 20"), from(5, "125")]);
    run_session_until(channel.clone(), assistant, std::future::pending())
        .await
        .unwrap();

    assert_eq!(
        channel.texts_to("5")[1],
        "Budget split:\nFood: 55\nRent: 40\nOther: 30\n"
    );
    assert!(store_path.exists());
}
