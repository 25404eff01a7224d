//! Terminal rendering of stream events.

use std::io::{self, Write};

use crate::sse::StreamEvent;

/// Writes events to an output as they arrive.
///
/// Write failures cannot be returned from the event callback, so the first
/// one is kept and reported by [`EventRenderer::finish`]; later events are
/// dropped once an error is recorded.
pub struct EventRenderer<W: Write> {
    out: W,
    raw: bool,
    error: Option<io::Error>,
}

impl<W: Write> EventRenderer<W> {
    pub fn new(out: W, raw: bool) -> Self {
        Self {
            out,
            raw,
            error: None,
        }
    }

    pub fn handle(&mut self, event: &StreamEvent) {
        if self.error.is_some() {
            return;
        }
        let result = if self.raw {
            self.write_json(event)
        } else {
            self.write_text(event)
        };
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            self.error = Some(e);
        }
    }

    /// Return the output, or the first write error.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn write_json(&mut self, event: &StreamEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)
    }

    fn write_text(&mut self, event: &StreamEvent) -> io::Result<()> {
        match event {
            StreamEvent::Delta { content } => write!(self.out, "{}", content),
            StreamEvent::ToolStart { tool } => writeln!(self.out, "\n[{}] running", tool),
            StreamEvent::ToolResult { tool, error, .. } => {
                if error.unwrap_or(false) {
                    writeln!(self.out, "[{}] failed", tool)
                } else {
                    writeln!(self.out, "[{}] done", tool)
                }
            }
            StreamEvent::Final { payload } => {
                writeln!(self.out, "\n\n-- {}", payload.agent)?;
                if let Some(assumptions) = &payload.assumptions {
                    for assumption in assumptions {
                        writeln!(self.out, "assumed: {}", assumption)?;
                    }
                }
                for action in &payload.next_actions {
                    writeln!(self.out, "next: {}", action)?;
                }
                Ok(())
            }
        }
    }
}
