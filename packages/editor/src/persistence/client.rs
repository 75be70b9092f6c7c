//! Debounced save client.
//!
//! A background worker owns two [`DelayedTask`] slots, one for page content
//! and one for the title. Every schedule call resets its slot's quiescence
//! window; when the window elapses the latest payload is written through the
//! [`PageStore`] on a detached task, so a later reschedule never aborts a write
//! already on the wire. Writes report back to the worker, which owns the
//! published [`SaveStatus`].
//!
//! At most one write per target (the title, or one language's content) is on
//! the wire at a time. A write that comes due while its target is busy is
//! parked and issued once the earlier one is acknowledged, so the store always
//! ends up holding the newest payload.

use super::store::{PageStore, StoreError};
use super::task::DelayedTask;
use lander_common::{Language, WebsiteId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(2000);
pub const DEFAULT_SAVED_FLASH: Duration = Duration::from_millis(2000);

/// How failed writes are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per write, at least 1
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveConfig {
    /// Quiescence window before a scheduled write is issued
    pub debounce: Duration,
    /// How long `saved` stays set after a successful write
    pub saved_flash: Duration,
    pub retry: RetryPolicy,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_SAVE_DEBOUNCE,
            saved_flash: DEFAULT_SAVED_FLASH,
            retry: RetryPolicy::default(),
        }
    }
}

/// Save indicator state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveStatus {
    /// A write is in flight
    pub saving: bool,
    /// The latest write succeeded recently
    pub saved: bool,
    pub last_error: Option<String>,
    /// Sequence number of the newest write acknowledged
    pub last_acked_seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WriteKind {
    Content,
    Title,
}

#[derive(Debug, Clone)]
enum PendingWrite {
    Content { language: Language, content: String },
    Title { title: String },
}

/// What a write targets. Writes with the same key are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct WriteKey {
    kind: WriteKind,
    language: Option<Language>,
}

impl PendingWrite {
    fn kind(&self) -> WriteKind {
        match self {
            PendingWrite::Content { .. } => WriteKind::Content,
            PendingWrite::Title { .. } => WriteKind::Title,
        }
    }

    fn key(&self) -> WriteKey {
        let language = match self {
            PendingWrite::Content { language, .. } => Some(*language),
            PendingWrite::Title { .. } => None,
        };
        WriteKey {
            kind: self.kind(),
            language,
        }
    }
}

#[derive(Debug)]
struct Job {
    seq: u64,
    write: PendingWrite,
}

enum Command {
    Schedule(PendingWrite),
    CancelContent,
    Cancel,
    Flush(Option<oneshot::Sender<()>>),
}

struct Ack {
    seq: u64,
    key: WriteKey,
    result: Result<(), StoreError>,
}

/// Handle to the save worker of one page
///
/// Dropping the handle flushes pending writes.
pub struct SaveClient {
    website_id: WebsiteId,
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SaveStatus>,
}

impl SaveClient {
    /// Start the save worker on the current tokio runtime. Outside a runtime
    /// no worker is started and scheduled writes are dropped.
    pub fn spawn(store: Arc<dyn PageStore>, website_id: WebsiteId, config: SaveConfig) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(SaveStatus::default());

        if tokio::runtime::Handle::try_current().is_ok() {
            let (worker, ack_rx) = SaveWorker::new(store, website_id, config, status_tx);
            tokio::spawn(worker.run(command_rx, ack_rx));
        } else {
            tracing::warn!(website_id, "no tokio runtime, saves are disabled");
        }

        Self {
            website_id,
            commands,
            status,
        }
    }

    pub fn website_id(&self) -> WebsiteId {
        self.website_id
    }

    /// Debounce a content write for one language
    pub fn schedule_content(&self, language: Language, content: impl Into<String>) {
        self.send(Command::Schedule(PendingWrite::Content {
            language,
            content: content.into(),
        }));
    }

    /// Debounce a title write. Independent of the content timer.
    pub fn schedule_title(&self, title: impl Into<String>) {
        self.send(Command::Schedule(PendingWrite::Title { title: title.into() }));
    }

    /// Drop a pending content write that has not been issued yet. A pending
    /// title write is kept.
    pub fn cancel_content(&self) {
        self.send(Command::CancelContent);
    }

    /// Drop pending writes that have not been issued yet
    pub fn cancel_pending(&self) {
        self.send(Command::Cancel);
    }

    /// Issue pending writes now without waiting for them
    pub fn flush_pending(&self) {
        self.send(Command::Flush(None));
    }

    /// Issue pending writes now and wait until no write is in flight
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Flush(Some(tx)));
        let _ = rx.await;
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!(website_id = self.website_id, "save worker is gone, dropping command");
        }
    }
}

struct SaveWorker {
    store: Arc<dyn PageStore>,
    website_id: WebsiteId,
    config: SaveConfig,
    status: watch::Sender<SaveStatus>,
    content: DelayedTask<Job>,
    title: DelayedTask<Job>,
    next_seq: u64,
    /// Targets with a write on the wire, each with the newest write parked
    /// behind it
    in_flight: HashMap<WriteKey, Option<Job>>,
    acked: HashMap<WriteKey, u64>,
    /// Latest unresolved failure per target
    failures: HashMap<WriteKey, String>,
    saved_until: Option<Instant>,
    idle_waiters: Vec<oneshot::Sender<()>>,
    acks: mpsc::UnboundedSender<Ack>,
}

impl SaveWorker {
    fn new(
        store: Arc<dyn PageStore>,
        website_id: WebsiteId,
        config: SaveConfig,
        status: watch::Sender<SaveStatus>,
    ) -> (Self, mpsc::UnboundedReceiver<Ack>) {
        let (acks, ack_rx) = mpsc::unbounded_channel();
        let worker = Self {
            store,
            website_id,
            config,
            status,
            content: DelayedTask::new(),
            title: DelayedTask::new(),
            next_seq: 0,
            in_flight: HashMap::new(),
            acked: HashMap::new(),
            failures: HashMap::new(),
            saved_until: None,
            idle_waiters: Vec::new(),
            acks,
        };
        (worker, ack_rx)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>, mut acks: mpsc::UnboundedReceiver<Ack>) {
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(ack) = acks.recv() => self.handle_ack(ack),
                _ = sleep_until(deadline) => self.handle_deadline(Instant::now()),
            }
        }

        // Handle dropped: committed edits still go out, parked ones included
        self.fire_all();
        while !self.in_flight.is_empty() {
            match acks.recv().await {
                Some(ack) => self.handle_ack(ack),
                None => break,
            }
        }
        tracing::debug!(website_id = self.website_id, "save worker stopped");
    }

    fn next_deadline(&self) -> Option<Instant> {
        [self.content.deadline(), self.title.deadline(), self.saved_until]
            .into_iter()
            .flatten()
            .min()
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Schedule(write) => {
                self.next_seq += 1;
                let job = Job {
                    seq: self.next_seq,
                    write,
                };
                let deadline = Instant::now() + self.config.debounce;
                let slot = match job.write.kind() {
                    WriteKind::Content => &mut self.content,
                    WriteKind::Title => &mut self.title,
                };
                if let Some(replaced) = slot.schedule(deadline, job) {
                    tracing::trace!(seq = replaced.seq, "debounced write superseded");
                }
            }
            Command::CancelContent => {
                self.content.cancel();
            }
            Command::Cancel => {
                self.content.cancel();
                self.title.cancel();
            }
            Command::Flush(waiter) => {
                self.fire_all();
                if let Some(waiter) = waiter {
                    if self.in_flight.is_empty() {
                        let _ = waiter.send(());
                    } else {
                        self.idle_waiters.push(waiter);
                    }
                }
            }
        }
    }

    fn handle_deadline(&mut self, now: Instant) {
        if let Some(job) = self.content.take_due(now) {
            self.fire(job);
        }
        if let Some(job) = self.title.take_due(now) {
            self.fire(job);
        }
        if self.saved_until.is_some_and(|until| until <= now) {
            self.saved_until = None;
            self.status.send_modify(|status| status.saved = false);
        }
    }

    fn fire_all(&mut self) {
        if let Some(job) = self.content.take() {
            self.fire(job);
        }
        if let Some(job) = self.title.take() {
            self.fire(job);
        }
    }

    fn fire(&mut self, job: Job) {
        let key = job.write.key();
        if let Some(parked) = self.in_flight.get_mut(&key) {
            tracing::debug!(website_id = self.website_id, seq = job.seq, ?key, "write parked behind in-flight write");
            if let Some(replaced) = parked.replace(job) {
                tracing::trace!(seq = replaced.seq, "parked write superseded");
            }
            return;
        }
        self.in_flight.insert(key, None);
        self.issue(job);
    }

    fn issue(&mut self, job: Job) {
        tracing::debug!(website_id = self.website_id, seq = job.seq, kind = ?job.write.kind(), "issuing save");
        self.status.send_modify(|status| {
            status.saving = true;
            status.saved = false;
        });

        let store = self.store.clone();
        let acks = self.acks.clone();
        let website_id = self.website_id;
        let retry = self.config.retry;

        tokio::spawn(async move {
            let key = job.write.key();
            let result = write_with_retry(store.as_ref(), website_id, &job.write, retry).await;
            let _ = acks.send(Ack {
                seq: job.seq,
                key,
                result,
            });
        });
    }

    fn handle_ack(&mut self, ack: Ack) {
        if let Some(Some(parked)) = self.in_flight.remove(&ack.key) {
            self.in_flight.insert(ack.key, None);
            self.issue(parked);
        }
        let saving = !self.in_flight.is_empty();

        if let Err(error) = &ack.result {
            tracing::error!(website_id = self.website_id, seq = ack.seq, key = ?ack.key, %error, "save failed");
        }

        let latest = self.acked.get(&ack.key).copied().unwrap_or(0);
        if ack.seq < latest {
            tracing::debug!(seq = ack.seq, latest, "discarding stale save acknowledgement");
            self.status.send_modify(|status| status.saving = saving);
        } else {
            self.acked.insert(ack.key, ack.seq);
            match ack.result {
                Ok(()) => {
                    self.failures.remove(&ack.key);
                    let last_error = self.failures.values().next().cloned();
                    self.saved_until = Some(Instant::now() + self.config.saved_flash);
                    self.status.send_modify(|status| {
                        status.saving = saving;
                        status.saved = true;
                        status.last_error = last_error;
                        status.last_acked_seq = status.last_acked_seq.max(ack.seq);
                    });
                }
                Err(error) => {
                    let message = error.to_string();
                    self.failures.insert(ack.key, message.clone());
                    self.status.send_modify(|status| {
                        status.saving = saving;
                        status.saved = false;
                        status.last_error = Some(message);
                        status.last_acked_seq = status.last_acked_seq.max(ack.seq);
                    });
                }
            }
        }

        if !saving {
            for waiter in self.idle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

async fn write_with_retry(
    store: &dyn PageStore,
    website_id: WebsiteId,
    write: &PendingWrite,
    retry: RetryPolicy,
) -> Result<(), StoreError> {
    let attempts = retry.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = match write {
            PendingWrite::Content { language, content } => store.update_content(website_id, *language, content).await,
            PendingWrite::Title { title } => store.update_title(website_id, title).await,
        };
        match result {
            Ok(_) => return Ok(()),
            Err(error) if attempt < attempts => {
                tracing::warn!(website_id, attempt, %error, "save attempt failed, retrying");
                attempt += 1;
                tokio::time::sleep(retry.backoff).await;
            }
            Err(error) => return Err(error),
        }
    }
}
