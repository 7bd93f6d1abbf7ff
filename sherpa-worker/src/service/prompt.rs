//! Prompt templates for each job kind

use sherpa_core::domain::job::{IcebreakerPayload, TranscriptPayload};

/// Meeting review prompt
pub fn transcript(payload: &TranscriptPayload) -> String {
    format!(
        "Review the following meeting transcript and provide an analysis with:\n\
         1. Key Points Discussed\n\
         2. What Went Well\n\
         3. Areas for Improvement\n\
         4. Action Items\n\
         5. Meeting Effectiveness Score (1-10)\n\
         \n\
         Company: {}\n\
         Attendees: {}\n\
         Date: {}\n\
         \n\
         Transcript:\n{}",
        payload.company,
        payload.attendees.join(", "),
        payload.date,
        payload.transcript
    )
}

/// Opening message prompt
pub fn icebreaker(payload: &IcebreakerPayload) -> String {
    let pitch = payload.pitch_deck_text.as_deref().unwrap_or("(none provided)");
    format!(
        "Write a short opening message to {name}. Do not call it an icebreaker; \
         reply with the message text only.\n\
         Start with \"Hey {name}\" or \"Hi {name}\", keep it to 3-4 sentences, \
         and make it engaging and relevant to the pitch deck.\n\
         \n\
         LinkedIn bio:\n{bio}\n\
         \n\
         Pitch deck:\n{pitch}",
        name = payload.name,
        bio = payload.linkedin_bio,
        pitch = pitch
    )
}
