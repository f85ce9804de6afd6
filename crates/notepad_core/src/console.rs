//! Line-oriented console used by record prompts.
//!
//! # Responsibility
//! - Give record kinds a blocking prompt API over any reader/writer pair.
//! - Provide the kind-selection loop used before a record reads itself.
//!
//! # Invariants
//! - End of input is reported as `RecordError::InputClosed`, never as a
//!   silently empty required value.

use crate::model::record::{Record, RecordError};
use crate::model::registry::RecordRegistry;
use log::warn;
use std::io::{BufRead, Write};

/// Prompt/answer channel over borrowed input and output streams.
pub struct Console<'io> {
    input: &'io mut dyn BufRead,
    output: &'io mut dyn Write,
}

impl<'io> Console<'io> {
    pub fn new(input: &'io mut dyn BufRead, output: &'io mut dyn Write) -> Self {
        Self { input, output }
    }

    /// Writes one line of output.
    pub fn say(&mut self, line: &str) -> Result<(), RecordError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Prints `prompt` and reads one line; `None` at end of input.
    ///
    /// The returned line has its trailing newline removed.
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>, RecordError> {
        if !prompt.is_empty() {
            self.say(prompt)?;
        }
        self.output.flush()?;
        self.read_line()
    }

    /// Like [`Console::ask`], but re-prompts until a non-blank answer arrives.
    pub fn ask_required(&mut self, prompt: &str) -> Result<String, RecordError> {
        loop {
            match self.ask(prompt)? {
                None => return Err(RecordError::InputClosed),
                Some(line) if line.trim().is_empty() => {
                    self.say("A value is required.")?;
                }
                Some(line) => return Ok(line.trim().to_string()),
            }
        }
    }

    /// Reads lines until one equals `terminator` (after trimming) or input ends.
    ///
    /// Fails with `InputClosed` only when input ends before any line arrives.
    pub fn read_block(
        &mut self,
        prompt: &str,
        terminator: &str,
    ) -> Result<Vec<String>, RecordError> {
        self.say(prompt)?;
        self.output.flush()?;

        let mut lines = Vec::new();
        loop {
            match self.read_line()? {
                Some(line) if line.trim() == terminator => return Ok(lines),
                Some(line) => lines.push(line),
                None if lines.is_empty() => return Err(RecordError::InputClosed),
                None => return Ok(lines),
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, RecordError> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        let trimmed_len = buffer.trim_end_matches(['\n', '\r']).len();
        buffer.truncate(trimmed_len);
        Ok(Some(buffer))
    }
}

/// Presents registered kinds by index and creates the chosen one.
///
/// Re-prompts on non-numeric input, out-of-range indices and kinds the
/// registry refuses to create.
pub fn choose_kind(
    console: &mut Console<'_>,
    registry: &RecordRegistry,
) -> Result<Box<dyn Record>, RecordError> {
    let kinds = registry.kinds_available();

    loop {
        console.say("What would you like to record?")?;
        for (index, kind) in kinds.iter().enumerate() {
            console.say(&format!("\t{index}. {kind}"))?;
        }

        let Some(answer) = console.ask("")? else {
            return Err(RecordError::InputClosed);
        };
        let Some(kind) = answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| kinds.get(index))
        else {
            continue;
        };

        match registry.create(kind) {
            Ok(record) => return Ok(record),
            Err(err) => warn!("event=choose_kind module=console status=retry error={err}"),
        }
    }
}
