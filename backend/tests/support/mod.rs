//! In-memory port doubles shared by integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use tasks_backend::domain::ports::{
    BalanceForwarder, BalanceForwarderError, DayCache, DayCacheError, ModerationNotifier,
    ModerationNotifierError, ProgressLedger, ProgressLedgerError, TaskSheet, TaskSheetError,
    TokenVerifier, TokenVerifierError, UserRegistry, UserRegistryError,
};
use tasks_backend::domain::{
    AnswerLinks, AnswerOracle, BalanceUpdate, BearerCredential, DayAggregator, IdentityVerifier,
    ModerationMessage, Principal, SheetLayout, TaskRecord, TaskService, TaskServicePorts,
    TaskTable, Username,
};

/// Token accepted by [`StaticTokens`].
pub const VALID_TOKEN: &str = "valid.token.alice";

pub fn task_rows() -> TaskTable {
    let rows = [
        json!({
            "№": 1,
            "Описание": "Find the cat",
            "Номер дня": 1,
            "Ответ": "Cat",
            "Аватарка": "a.png",
        }),
        json!({
            "№": 2,
            "Описание": "Count the stairs",
            "Номер дня": 2,
            "Ответ": "42",
            "Аватарка": "b.png",
        }),
        json!({
            "№": 3,
            "Описание": "Film the sunset",
            "Номер дня": 3,
            "Ответ": null,
            "Аватарка": "c.png",
        }),
    ];
    let records: Vec<TaskRecord> = rows
        .into_iter()
        .map(|row| match row {
            Value::Object(map) => TaskRecord::new(map),
            other => panic!("expected object, got {other}"),
        })
        .collect();
    let headers = records
        .first()
        .map(|record| record.fields().keys().cloned().collect())
        .unwrap_or_default();
    TaskTable::new(headers, records)
}

/// Sheet double counting full reads.
#[derive(Default)]
pub struct CountingSheet {
    reads: AtomicUsize,
}

impl CountingSheet {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskSheet for CountingSheet {
    async fn read_table(&self) -> Result<TaskTable, TaskSheetError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(task_rows())
    }
}

#[derive(Default)]
pub struct MemoryCache {
    buckets: Mutex<HashMap<u32, Vec<TaskRecord>>>,
}

#[async_trait]
impl DayCache for MemoryCache {
    async fn get(&self, day: u32) -> Result<Option<Vec<TaskRecord>>, DayCacheError> {
        Ok(self.buckets.lock().expect("cache lock").get(&day).cloned())
    }

    async fn put(&self, day: u32, rows: &[TaskRecord]) -> Result<(), DayCacheError> {
        self.buckets
            .lock()
            .expect("cache lock")
            .insert(day, rows.to_vec());
        Ok(())
    }

    async fn cached_days(&self) -> Result<Vec<u32>, DayCacheError> {
        let mut days: Vec<u32> = self.buckets.lock().expect("cache lock").keys().copied().collect();
        days.sort_unstable();
        Ok(days)
    }
}

/// Accepts only [`VALID_TOKEN`], issued to `alice`.
pub struct StaticTokens;

#[async_trait]
impl TokenVerifier for StaticTokens {
    async fn verify(&self, credential: &BearerCredential) -> Result<Username, TokenVerifierError> {
        if credential.expose() == VALID_TOKEN {
            Username::new("alice").map_err(|err| TokenVerifierError::invalid(err.to_string()))
        } else {
            Err(TokenVerifierError::invalid("signature mismatch"))
        }
    }
}

/// Registry and ledger sharing one in-memory user table.
#[derive(Default)]
pub struct MemoryUsers {
    progress: Mutex<HashSet<(String, i64)>>,
}

#[async_trait]
impl UserRegistry for MemoryUsers {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Principal>, UserRegistryError> {
        Ok((username.as_str() == "alice").then(|| Principal::new(42, username.clone())))
    }
}

#[async_trait]
impl ProgressLedger for MemoryUsers {
    async fn contains(
        &self,
        username: &Username,
        task_id: i64,
    ) -> Result<bool, ProgressLedgerError> {
        Ok(self
            .progress
            .lock()
            .expect("ledger lock")
            .contains(&(username.as_str().to_owned(), task_id)))
    }

    async fn append(&self, username: &Username, task_id: i64) -> Result<(), ProgressLedgerError> {
        self.progress
            .lock()
            .expect("ledger lock")
            .insert((username.as_str().to_owned(), task_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub delivered: Mutex<Vec<ModerationMessage>>,
}

#[async_trait]
impl ModerationNotifier for RecordingNotifier {
    async fn deliver(&self, message: &ModerationMessage) -> Result<(), ModerationNotifierError> {
        self.delivered
            .lock()
            .expect("notifier lock")
            .push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBalance {
    pub forwarded: Mutex<Vec<BalanceUpdate>>,
}

#[async_trait]
impl BalanceForwarder for RecordingBalance {
    async fn forward(
        &self,
        update: &BalanceUpdate,
        _credential: &BearerCredential,
    ) -> Result<(), BalanceForwarderError> {
        self.forwarded
            .lock()
            .expect("balance lock")
            .push(update.clone());
        Ok(())
    }
}

/// Doubles wired into one service, kept for later inspection.
pub struct World {
    pub sheet: Arc<CountingSheet>,
    pub notifier: Arc<RecordingNotifier>,
    pub balance: Arc<RecordingBalance>,
    pub service: Arc<TaskService>,
}

pub fn world() -> World {
    let sheet = Arc::new(CountingSheet::default());
    let users = Arc::new(MemoryUsers::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let balance = Arc::new(RecordingBalance::default());
    let links = AnswerLinks::from_json(r#"{"1": "https://t.me/c/2621459328/2"}"#)
        .expect("links parse");

    let service = Arc::new(TaskService::new(TaskServicePorts {
        identity: IdentityVerifier::new(Arc::new(StaticTokens), users.clone()),
        days: DayAggregator::new(Arc::new(MemoryCache::default())),
        oracle: AnswerOracle::new(sheet.clone(), SheetLayout::default()),
        ledger: users,
        notifier: notifier.clone(),
        balance: balance.clone(),
        answer_links: Arc::new(links),
    }));

    World {
        sheet,
        notifier,
        balance,
        service,
    }
}
