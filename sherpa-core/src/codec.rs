//! Job codec
//!
//! Entries popped off a queue arrive in several shapes depending on which
//! producer pushed them:
//!
//! - a structured object that already is the job
//! - a string holding the JSON-encoded job
//! - a one-element array wrapping either of the above
//! - an envelope object `{"value": ...}` holding an encoded or raw job
//!
//! `decode` peels these layers until it reaches an object, then validates
//! it into a typed [`Job`]. `encode` always writes the canonical flat form.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::job::{IcebreakerPayload, Job, JobId, JobKind, JobPayload, TranscriptPayload};

/// Layers deeper than this are treated as malformed
const MAX_DEPTH: usize = 8;

/// A queue entry that cannot be turned into a job
#[derive(Debug, Error)]
pub enum MalformedJob {
    #[error("entry is not valid JSON: {0}")]
    InvalidEncoding(#[from] serde_json::Error),

    #[error("entry wraps an empty list")]
    EmptyList,

    #[error("entry has unsupported shape: {0}")]
    UnsupportedShape(&'static str),

    #[error("entry is nested too deeply")]
    TooDeep,

    #[error("invalid job id '{0}'")]
    InvalidId(String),

    #[error("unknown job type '{0}'")]
    UnknownKind(String),

    #[error("invalid {kind} job: {source}")]
    InvalidFields {
        kind: JobKind,
        source: serde_json::Error,
    },
}

/// One layer of a queue entry
enum WireShape {
    /// Already the job mapping
    Structured(Map<String, Value>),
    /// JSON text of some inner shape
    Encoded(String),
    /// Single-element list around some inner shape
    Wrapped(Value),
    /// `{"value": ...}` envelope around some inner shape
    Enveloped(Value),
}

impl WireShape {
    fn classify(raw: Value) -> Result<Self, MalformedJob> {
        match raw {
            Value::String(text) => Ok(WireShape::Encoded(text)),
            Value::Array(items) => items
                .into_iter()
                .next()
                .map(WireShape::Wrapped)
                .ok_or(MalformedJob::EmptyList),
            Value::Object(mut map) if map.len() == 1 && map.contains_key("value") => {
                let inner = map.remove("value").unwrap_or(Value::Null);
                Ok(WireShape::Enveloped(inner))
            }
            Value::Object(map) => Ok(WireShape::Structured(map)),
            Value::Null => Err(MalformedJob::UnsupportedShape("null")),
            Value::Bool(_) => Err(MalformedJob::UnsupportedShape("boolean")),
            Value::Number(_) => Err(MalformedJob::UnsupportedShape("number")),
        }
    }
}

/// Normalizes a raw queue entry into a canonical job
///
/// `default_kind` applies to entries without a `type` field, which is
/// how producers predating the discriminant pushed jobs.
pub fn decode(raw: &Value, default_kind: JobKind) -> Result<Job, MalformedJob> {
    let fields = unwrap_layers(raw.clone())?;
    job_from_fields(fields, default_kind)
}

/// Serializes a job to the canonical string pushed onto a queue
pub fn encode(job: &Job) -> String {
    // Job only holds strings and ids, so serialization cannot fail
    serde_json::to_string(job).unwrap_or_default()
}

fn unwrap_layers(mut raw: Value) -> Result<Map<String, Value>, MalformedJob> {
    for _ in 0..MAX_DEPTH {
        raw = match WireShape::classify(raw)? {
            WireShape::Structured(fields) => return Ok(fields),
            WireShape::Encoded(text) => serde_json::from_str(&text)?,
            WireShape::Wrapped(inner) | WireShape::Enveloped(inner) => inner,
        };
    }
    Err(MalformedJob::TooDeep)
}

fn job_from_fields(
    mut fields: Map<String, Value>,
    default_kind: JobKind,
) -> Result<Job, MalformedJob> {
    let kind = match fields.remove("type") {
        None | Some(Value::Null) => default_kind,
        Some(Value::String(kind)) => kind
            .parse::<JobKind>()
            .map_err(|_| MalformedJob::UnknownKind(kind))?,
        Some(other) => return Err(MalformedJob::UnknownKind(other.to_string())),
    };

    let id_value = fields.remove("job_id").or_else(|| fields.remove("id"));
    let id = match id_value {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => {
            Some(JobId::parse(&id).map_err(|_| MalformedJob::InvalidId(id))?)
        }
        Some(other) => return Err(MalformedJob::InvalidId(other.to_string())),
    };

    let fields = Value::Object(fields);
    let invalid = |source| MalformedJob::InvalidFields { kind, source };
    let payload = match kind {
        JobKind::Transcript => JobPayload::Transcript(
            serde_json::from_value::<TranscriptPayload>(fields).map_err(invalid)?,
        ),
        JobKind::Icebreaker => JobPayload::Icebreaker(
            serde_json::from_value::<IcebreakerPayload>(fields).map_err(invalid)?,
        ),
    };

    Ok(Job { id, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript_job() -> Job {
        Job::new(JobPayload::Transcript(TranscriptPayload {
            company: "Acme".to_string(),
            attendees: vec!["Ada".to_string(), "Grace".to_string()],
            date: "2025-06-01".to_string(),
            transcript: "We discussed the roadmap.".to_string(),
        }))
    }

    #[test]
    fn test_decode_accepts_every_wire_shape() {
        let job = transcript_job();
        let encoded = encode(&job);
        let structured: Value = serde_json::from_str(&encoded).unwrap();

        let shapes = [
            ("structured", structured.clone()),
            ("encoded", Value::String(encoded.clone())),
            ("wrapped", json!([encoded.clone()])),
            ("wrapped structured", json!([structured.clone()])),
            ("enveloped", json!({ "value": encoded.clone() })),
            ("enveloped structured", json!({ "value": structured })),
        ];

        for (name, raw) in shapes {
            let decoded = decode(&raw, JobKind::Icebreaker)
                .unwrap_or_else(|e| panic!("{} shape failed: {}", name, e));
            assert_eq!(decoded, job, "{} shape", name);
        }
    }

    #[test]
    fn test_decode_is_idempotent_on_canonical_job() {
        let job = transcript_job();
        let once = decode(&Value::String(encode(&job)), JobKind::Transcript).unwrap();
        let twice = decode(&Value::String(encode(&once)), JobKind::Transcript).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_legacy_entry_takes_queue_kind() {
        // Envelope written by producers that post the value as a JSON body
        let raw = json!(
            r#"{"value": "{\"name\": \"Ada\", \"linkedin_bio\": \"Analyst\", \"pitch_deck_text\": \"Engines\"}"}"#
        );

        let job = decode(&raw, JobKind::Icebreaker).unwrap();
        assert_eq!(job.id, None);
        assert_eq!(
            job.payload,
            JobPayload::Icebreaker(IcebreakerPayload {
                name: "Ada".to_string(),
                linkedin_bio: "Analyst".to_string(),
                pitch_deck_text: Some("Engines".to_string()),
            })
        );
    }

    #[test]
    fn test_legacy_transcript_with_joined_attendees() {
        let raw = json!({
            "job_id": "9f6f1c0e-8a59-4a8e-9a51-2f1d3c1c7b10",
            "company": "Acme",
            "attendees": "Ada, Grace",
            "date": "2025-06-01",
            "transcript": "hello"
        });

        let job = decode(&raw, JobKind::Transcript).unwrap();
        assert_eq!(
            job.id,
            Some(JobId::parse("9f6f1c0e-8a59-4a8e-9a51-2f1d3c1c7b10").unwrap())
        );
        match job.payload {
            JobPayload::Transcript(t) => assert_eq!(t.attendees, vec!["Ada", "Grace"]),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_discriminant_overrides_queue_kind() {
        let raw = json!({ "type": "icebreaker", "name": "Ada", "linkedin_bio": "bio" });
        let job = decode(&raw, JobKind::Transcript).unwrap();
        assert_eq!(job.kind(), JobKind::Icebreaker);
    }

    #[test]
    fn test_malformed_entries() {
        assert!(matches!(
            decode(&json!("not json {"), JobKind::Transcript),
            Err(MalformedJob::InvalidEncoding(_))
        ));
        assert!(matches!(
            decode(&json!([]), JobKind::Transcript),
            Err(MalformedJob::EmptyList)
        ));
        assert!(matches!(
            decode(&json!(42), JobKind::Transcript),
            Err(MalformedJob::UnsupportedShape("number"))
        ));
        assert!(matches!(
            decode(&json!({ "company": "Acme" }), JobKind::Transcript),
            Err(MalformedJob::InvalidFields { .. })
        ));
        assert!(matches!(
            decode(&json!({ "type": "email", "to": "x" }), JobKind::Transcript),
            Err(MalformedJob::UnknownKind(_))
        ));
        assert!(matches!(
            decode(
                &json!({ "job_id": "nope", "name": "Ada", "linkedin_bio": "bio" }),
                JobKind::Icebreaker
            ),
            Err(MalformedJob::InvalidId(_))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let mut raw = json!({ "name": "Ada", "linkedin_bio": "bio" });
        for _ in 0..MAX_DEPTH {
            raw = json!([raw]);
        }
        assert!(matches!(
            decode(&raw, JobKind::Icebreaker),
            Err(MalformedJob::TooDeep)
        ));
    }
}
