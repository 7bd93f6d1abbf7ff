//! Job domain types

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Identifier assigned by the producer before a job is enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of analysis a job requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Transcript,
    Icebreaker,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Transcript => "transcript",
            JobKind::Icebreaker => "icebreaker",
        }
    }

    /// Name of the queue this kind is pushed to by default
    pub fn default_queue(&self) -> &'static str {
        match self {
            JobKind::Transcript => "transcript-queue",
            JobKind::Icebreaker => "icebreaker-queue",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transcript" => Ok(JobKind::Transcript),
            "icebreaker" => Ok(JobKind::Icebreaker),
            other => Err(format!("unknown job kind '{}'", other)),
        }
    }
}

/// Meeting transcript to review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptPayload {
    pub company: String,
    #[serde(deserialize_with = "attendee_list")]
    pub attendees: Vec<String>,
    pub date: String,
    pub transcript: String,
}

/// Person and pitch context for an opening message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcebreakerPayload {
    pub name: String,
    pub linkedin_bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_deck_text: Option<String>,
}

/// Type-specific job fields, discriminated by `type` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobPayload {
    Transcript(TranscriptPayload),
    Icebreaker(IcebreakerPayload),
}

impl JobPayload {
    pub fn kind(&self) -> JobKind {
        match self {
            JobPayload::Transcript(_) => JobKind::Transcript,
            JobPayload::Icebreaker(_) => JobKind::Icebreaker,
        }
    }

    /// Short human label used in log lines
    pub fn subject(&self) -> &str {
        match self {
            JobPayload::Transcript(t) => &t.company,
            JobPayload::Icebreaker(i) => &i.name,
        }
    }
}

/// Canonical job record
///
/// Jobs without an id predate status tracking; their results go straight
/// to the result tables instead of the status store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "job_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,
    #[serde(flatten)]
    pub payload: JobPayload,
}

impl Job {
    /// Creates a tracked job with a fresh id
    pub fn new(payload: JobPayload) -> Self {
        Self {
            id: Some(JobId::new()),
            payload,
        }
    }

    /// Creates a job without an id
    pub fn legacy(payload: JobPayload) -> Self {
        Self { id: None, payload }
    }

    pub fn kind(&self) -> JobKind {
        self.payload.kind()
    }
}

/// Accepts either a list of names or a single comma-separated string
fn attendee_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Attendees {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Attendees::deserialize(deserializer)? {
        Attendees::List(list) => list,
        Attendees::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
