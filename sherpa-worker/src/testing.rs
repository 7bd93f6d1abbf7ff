//! In-memory collaborators for exercising the worker without a network

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use sherpa_core::domain::analysis::Analysis;
use sherpa_core::domain::job::{IcebreakerPayload, Job, JobId, JobPayload, TranscriptPayload};
use sherpa_core::domain::status::{JobStatus, JobStatusRecord, Transition};

use crate::config::Config;
use crate::repository::{Analyzer, QueueRepository, ResultRepository, StatusRepository};
use crate::scheduler::JobPoller;
use crate::service::JobProcessor;

pub fn transcript_payload() -> TranscriptPayload {
    TranscriptPayload {
        company: "Acme".to_string(),
        attendees: vec!["Ada".to_string(), "Grace".to_string()],
        date: "2025-06-01".to_string(),
        transcript: "We walked through the renewal and pricing.".to_string(),
    }
}

pub fn icebreaker_payload() -> IcebreakerPayload {
    IcebreakerPayload {
        name: "Ada".to_string(),
        linkedin_bio: "Analyst, writes about engines".to_string(),
        pitch_deck_text: Some("Difference engines for everyone".to_string()),
    }
}

#[derive(Default)]
pub struct InMemoryQueue {
    queues: Mutex<HashMap<String, VecDeque<Value>>>,
    pops: Mutex<Vec<(String, Instant)>>,
}

impl InMemoryQueue {
    pub fn push(&self, queue: &str, value: Value) {
        self.queues
            .lock()
            .unwrap()
            .entry(queue.to_string())
            .or_default()
            .push_back(value);
    }

    /// Queue names in the order they were popped, empty pops included
    pub fn pops(&self) -> Vec<String> {
        self.pops
            .lock()
            .unwrap()
            .iter()
            .map(|(queue, _)| queue.clone())
            .collect()
    }

    /// When each pop of one queue happened
    pub fn pop_times(&self, queue: &str) -> Vec<Instant> {
        self.pops
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == queue)
            .map(|(_, at)| *at)
            .collect()
    }
}

#[async_trait]
impl QueueRepository for InMemoryQueue {
    async fn pop_head(&self, queue: &str) -> Result<Option<Value>> {
        self.pops
            .lock()
            .unwrap()
            .push((queue.to_string(), Instant::now()));
        Ok(self
            .queues
            .lock()
            .unwrap()
            .get_mut(queue)
            .and_then(VecDeque::pop_front))
    }
}

/// Queue store that is never reachable
#[derive(Default)]
pub struct FailingQueue {
    attempts: Mutex<Vec<Instant>>,
}

impl FailingQueue {
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueRepository for FailingQueue {
    async fn pop_head(&self, queue: &str) -> Result<Option<Value>> {
        self.attempts.lock().unwrap().push(Instant::now());
        Err(anyhow!("connection refused while popping {}", queue))
    }
}

#[derive(Default)]
pub struct InMemoryStatuses {
    records: Mutex<HashMap<JobId, (JobStatusRecord, Vec<JobStatus>)>>,
}

impl InMemoryStatuses {
    pub fn insert_pending(&self, job: &Job) {
        let id = job.id.unwrap_or_default();
        let fields = serde_json::to_value(&job.payload).unwrap();
        let record = JobStatusRecord::pending(id, job.kind(), fields);
        self.records
            .lock()
            .unwrap()
            .insert(id, (record, vec![JobStatus::Pending]));
    }

    pub fn get(&self, id: JobId) -> Option<JobStatusRecord> {
        self.records.lock().unwrap().get(&id).map(|(r, _)| r.clone())
    }

    /// Every status the job has held, oldest first
    pub fn history(&self, id: JobId) -> Vec<JobStatus> {
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .map(|(_, h)| h.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StatusRepository for InMemoryStatuses {
    async fn read(&self, id: JobId) -> Result<Option<JobStatusRecord>> {
        Ok(self.get(id))
    }

    async fn transition(&self, id: JobId, transition: Transition) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let (record, history) = records
            .get_mut(&id)
            .ok_or_else(|| anyhow!("job {} not found", id))?;
        record
            .apply(&transition)
            .map_err(|(from, to)| anyhow!("job {} cannot move from {} to {}", id, from, to))?;
        history.push(record.status);
        Ok(())
    }
}

/// Status store whose first few reads or Processing marks fail
pub struct FlakyStatuses {
    inner: Arc<InMemoryStatuses>,
    failing_reads: AtomicUsize,
    failing_processing: AtomicUsize,
}

impl FlakyStatuses {
    pub fn failing_reads(inner: Arc<InMemoryStatuses>, times: usize) -> Self {
        Self {
            inner,
            failing_reads: AtomicUsize::new(times),
            failing_processing: AtomicUsize::new(0),
        }
    }

    pub fn failing_processing(inner: Arc<InMemoryStatuses>, times: usize) -> Self {
        Self {
            inner,
            failing_reads: AtomicUsize::new(0),
            failing_processing: AtomicUsize::new(times),
        }
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl StatusRepository for FlakyStatuses {
    async fn read(&self, id: JobId) -> Result<Option<JobStatusRecord>> {
        if Self::take_failure(&self.failing_reads) {
            return Err(anyhow!("connection reset while reading job {}", id));
        }
        self.inner.read(id).await
    }

    async fn transition(&self, id: JobId, transition: Transition) -> Result<()> {
        if matches!(transition, Transition::Processing)
            && Self::take_failure(&self.failing_processing)
        {
            return Err(anyhow!("connection reset while updating job {}", id));
        }
        self.inner.transition(id, transition).await
    }
}

#[derive(Default)]
pub struct RecordingResults {
    transcripts: Mutex<Vec<(TranscriptPayload, String)>>,
    icebreakers: Mutex<Vec<(IcebreakerPayload, String)>>,
}

impl RecordingResults {
    pub fn transcripts(&self) -> Vec<(TranscriptPayload, String)> {
        self.transcripts.lock().unwrap().clone()
    }

    pub fn icebreakers(&self) -> Vec<(IcebreakerPayload, String)> {
        self.icebreakers.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultRepository for RecordingResults {
    async fn insert_transcript(&self, payload: &TranscriptPayload, analysis: &str) -> Result<()> {
        self.transcripts
            .lock()
            .unwrap()
            .push((payload.clone(), analysis.to_string()));
        Ok(())
    }

    async fn insert_icebreaker(&self, payload: &IcebreakerPayload, analysis: &str) -> Result<()> {
        self.icebreakers
            .lock()
            .unwrap()
            .push((payload.clone(), analysis.to_string()));
        Ok(())
    }
}

type Reply = Box<dyn Fn(&str) -> Analysis + Send + Sync>;

pub struct ScriptedAnalyzer {
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, prompt: &str) -> Analysis {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)(prompt)
    }
}

/// One set of fakes shared by a processor and a poller
pub struct Fixture {
    pub queue: Arc<InMemoryQueue>,
    pub statuses: Arc<InMemoryStatuses>,
    pub results: Arc<RecordingResults>,
    pub analyzer: Arc<ScriptedAnalyzer>,
}

impl Fixture {
    pub fn replying(reply: impl Fn(&str) -> Analysis + Send + Sync + 'static) -> Self {
        Self {
            queue: Arc::default(),
            statuses: Arc::default(),
            results: Arc::default(),
            analyzer: Arc::new(ScriptedAnalyzer {
                reply: Box::new(reply),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    /// A job with a pending status record, as a producer would submit it
    pub fn tracked(&self, payload: JobPayload) -> Job {
        let job = Job::new(payload);
        self.statuses.insert_pending(&job);
        job
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.transcript_delay = Duration::ZERO;
        config.idle_interval = Duration::from_millis(10);
        config.error_backoff = Duration::from_millis(10);
        config
    }

    pub fn processor(&self) -> JobProcessor {
        JobProcessor::new(
            self.analyzer.clone(),
            self.statuses.clone(),
            self.results.clone(),
            Duration::ZERO,
        )
    }

    pub fn poller(&self) -> JobPoller {
        JobPoller::new(self.config(), self.queue.clone(), self.processor())
    }
}
