//! Line-prefix scanner for the transcript protocol.
//!
//! Parsing is a small finite-state scan over marker-prefixed lines rather
//! than whole-blob regex matching, so ambiguity is bounded to one line at a
//! time. Payloads may span multiple lines: continuation lines attach to the
//! most recent marker.

use super::{ParseError, ProtocolEvent};

/// The marker that introduces each protocol event.
const THOUGHT: &str = "Thought:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const ARESULT: &str = "AResult:";
const FINAL_RESULT: &str = "Final Result:";

/// What the scanner is currently accumulating lines into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Nothing yet; leading free text becomes an implicit thought.
    Preamble,
    Thought,
    ActionName,
    ActionInput,
    ActionResult,
}

/// Parse one raw generation into ordered protocol events.
///
/// `allowed_actions` is the current capability set (tool names plus
/// delegatable sub-agent names). An action naming anything else yields
/// [`ParseError::UnknownAction`], which the loop treats as correctable.
///
/// Guarantees:
/// - events come back in transcript order;
/// - text after `Final Result:` is the terminal payload, byte-for-byte
///   (minus the single separating space after the marker and one trailing
///   newline);
/// - a generation with neither an action nor a final result is rejected.
pub fn parse(raw: &str, allowed_actions: &[String]) -> Result<Vec<ProtocolEvent>, ParseError> {
    let mut scanner = Scanner::new(allowed_actions);

    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let stripped = line.strip_suffix('\n').unwrap_or(line);
        let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);

        if let Some(rest) = marker_payload(stripped, FINAL_RESULT) {
            // Everything after the marker, including subsequent lines, is
            // the terminal payload. Splice the marker line's remainder with
            // the untouched raw tail so inner newlines survive byte-for-byte.
            let tail = raw[offset + line.len()..].trim_end_matches('\n');
            let payload = if tail.is_empty() {
                rest.to_string()
            } else {
                format!("{}\n{}", rest, tail)
            };
            scanner.finish_with_final(payload)?;
            return scanner.into_events();
        }

        if let Some(rest) = marker_payload(stripped, ACTION_INPUT) {
            scanner.begin_action_input(rest)?;
        } else if let Some(rest) = marker_payload(stripped, ACTION) {
            scanner.begin_action(rest)?;
        } else if let Some(rest) = marker_payload(stripped, THOUGHT) {
            scanner.begin_thought(rest)?;
        } else if let Some(rest) = marker_payload(stripped, ARESULT) {
            scanner.begin_result(rest)?;
        } else {
            scanner.continuation(stripped);
        }

        offset += line.len();
    }

    scanner.finish()?;
    scanner.into_events()
}

/// If `line` starts with `marker` (ignoring leading whitespace), return the
/// payload after the marker with a single separating space stripped.
fn marker_payload<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix(marker)?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

struct Scanner<'a> {
    allowed: &'a [String],
    events: Vec<ProtocolEvent>,
    section: Section,
    buffer: String,
    /// An `Action:` whose `Action Input:` has not been seen yet.
    pending_action: Option<String>,
}

impl<'a> Scanner<'a> {
    fn new(allowed: &'a [String]) -> Self {
        Self {
            allowed,
            events: Vec::new(),
            section: Section::Preamble,
            buffer: String::new(),
            pending_action: None,
        }
    }

    fn begin_thought(&mut self, rest: &str) -> Result<(), ParseError> {
        self.flush()?;
        self.section = Section::Thought;
        self.buffer = rest.to_string();
        Ok(())
    }

    fn begin_action(&mut self, rest: &str) -> Result<(), ParseError> {
        self.flush()?;
        self.section = Section::ActionName;
        self.buffer = rest.to_string();
        Ok(())
    }

    fn begin_action_input(&mut self, rest: &str) -> Result<(), ParseError> {
        self.flush()?;
        if self.pending_action.is_none() {
            return Err(ParseError::InputWithoutAction);
        }
        self.section = Section::ActionInput;
        self.buffer = rest.to_string();
        Ok(())
    }

    fn begin_result(&mut self, rest: &str) -> Result<(), ParseError> {
        self.flush()?;
        // A result is only meaningful after a completed action. After a
        // bare thought (or nothing at all) the model fabricated it.
        match self.events.last() {
            Some(ProtocolEvent::Action { .. }) => {
                self.section = Section::ActionResult;
                self.buffer = rest.to_string();
                Ok(())
            }
            _ => Err(ParseError::ResultWithoutAction),
        }
    }

    fn continuation(&mut self, line: &str) {
        match self.section {
            Section::Preamble => {
                if !line.trim().is_empty() || !self.buffer.is_empty() {
                    if !self.buffer.is_empty() {
                        self.buffer.push('\n');
                    }
                    self.buffer.push_str(line);
                }
            }
            _ => {
                if !self.buffer.is_empty() {
                    self.buffer.push('\n');
                }
                self.buffer.push_str(line);
            }
        }
    }

    /// Close the current section, emitting its event.
    fn flush(&mut self) -> Result<(), ParseError> {
        let text = std::mem::take(&mut self.buffer);
        match self.section {
            Section::Preamble => {
                let text = text.trim_end().to_string();
                if !text.is_empty() {
                    self.events.push(ProtocolEvent::Thought(text));
                }
            }
            Section::Thought => {
                self.events
                    .push(ProtocolEvent::Thought(text.trim_end().to_string()));
            }
            Section::ActionName => {
                if let Some(open) = self.pending_action.take() {
                    return Err(ParseError::MissingActionInput { name: open });
                }
                let name = text.trim().to_string();
                if !self.allowed.iter().any(|a| a == &name) {
                    return Err(ParseError::UnknownAction {
                        name,
                        allowed: self.allowed.join(", "),
                    });
                }
                self.pending_action = Some(name);
            }
            Section::ActionInput => {
                let name = self
                    .pending_action
                    .take()
                    .ok_or(ParseError::InputWithoutAction)?;
                self.events.push(ProtocolEvent::Action {
                    name,
                    input: text.trim_end().to_string(),
                });
            }
            Section::ActionResult => {
                self.events
                    .push(ProtocolEvent::ActionResult(text.trim_end().to_string()));
            }
        }
        self.section = Section::Preamble;
        Ok(())
    }

    fn finish_with_final(&mut self, payload: String) -> Result<(), ParseError> {
        self.flush()?;
        self.require_no_open_action()?;
        self.events.push(ProtocolEvent::FinalResult(payload));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.flush()?;
        self.require_no_open_action()?;
        let has_outcome = self.events.iter().any(|e| {
            matches!(
                e,
                ProtocolEvent::Action { .. } | ProtocolEvent::FinalResult(_)
            )
        });
        if !has_outcome {
            return Err(ParseError::MissingAction);
        }
        Ok(())
    }

    fn require_no_open_action(&mut self) -> Result<(), ParseError> {
        if let Some(name) = self.pending_action.take() {
            return Err(ParseError::MissingActionInput { name });
        }
        Ok(())
    }

    fn into_events(self) -> Result<Vec<ProtocolEvent>, ParseError> {
        Ok(self.events)
    }
}
