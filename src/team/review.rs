//! Artifact review gate.
//!
//! Architecture and plan drafts pass through an evaluation gate before the
//! team acts on them: a reviewer generation either contains the `ACCEPTED`
//! token or yields rejection feedback, and a rejected draft is redone with
//! that feedback until the retry budget runs out. On exhaustion the last
//! draft is used as-is; the gate degrades, it never aborts a run.

use crate::error::Result;

/// Token a reviewer writes to accept an artifact.
const ACCEPTED_TOKEN: &str = "ACCEPTED";

/// Marker introducing rejection feedback in reviewer output.
const FEEDBACK_MARKER: &str = "Feedback:";

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(String),
}

/// A rejected draft plus the feedback it earned, fed into the redraft.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub previous: String,
    pub feedback: String,
}

/// The artifact that came out of the gate.
#[derive(Debug, Clone)]
pub struct Gated {
    pub text: String,
    /// False when the retry budget ran out and the last draft was kept.
    pub accepted: bool,
    /// Evaluations performed.
    pub rounds: u32,
}

/// Parse a reviewer generation into a verdict.
///
/// Any output containing `ACCEPTED` accepts. Otherwise the text after the
/// first `Feedback:` marker is the feedback; without the marker the whole
/// output is taken as feedback, so a free-form complaint still rejects
/// usefully.
pub fn parse_verdict(raw: &str) -> Verdict {
    if raw.contains(ACCEPTED_TOKEN) {
        return Verdict::Accepted;
    }
    let feedback = match raw.split_once(FEEDBACK_MARKER) {
        Some((_, after)) => after.trim(),
        None => raw.trim(),
    };
    if feedback.is_empty() {
        Verdict::Rejected("(the reviewer rejected the result without feedback)".to_string())
    } else {
        Verdict::Rejected(feedback.to_string())
    }
}

/// Run a draft through the evaluation gate.
///
/// `retries` bounds the number of evaluations. The first draft sees no
/// rejection; each redraft sees the previous draft and its feedback. A
/// rejection on the final allowed evaluation keeps the rejected draft
/// (degrade, never abort); `retries == 0` skips evaluation entirely.
pub fn gate<D, R>(retries: u32, mut draft: D, mut review: R) -> Result<Gated>
where
    D: FnMut(Option<&Rejection>) -> Result<String>,
    R: FnMut(&str) -> Result<Verdict>,
{
    let mut text = draft(None)?;

    for round in 1..=retries {
        match review(&text)? {
            Verdict::Accepted => {
                return Ok(Gated {
                    text,
                    accepted: true,
                    rounds: round,
                });
            }
            Verdict::Rejected(feedback) => {
                if round == retries {
                    return Ok(Gated {
                        text,
                        accepted: false,
                        rounds: round,
                    });
                }
                let rejection = Rejection {
                    previous: std::mem::take(&mut text),
                    feedback,
                };
                text = draft(Some(&rejection))?;
            }
        }
    }

    Ok(Gated {
        text,
        accepted: false,
        rounds: 0,
    })
}
