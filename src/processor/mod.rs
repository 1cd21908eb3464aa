//! Command Interpreter.
//!
//! Commands run strictly in order against one `ModelState`. The first
//! failing command stops the run; its error is tagged with the command's
//! 1-based position in the program. Nothing is rolled back.
pub mod greenshields;
pub mod verbs;

use std::io::Write;

use tracing::{debug, warn};

use crate::cli::Settings;
use crate::error::{DslError, Result};
use crate::model::{Command, ModelState};
use verbs::Verb;

pub struct Interpreter<'s, W: Write> {
    settings: &'s Settings,
    out: W,
}

impl<'s, W: Write> Interpreter<'s, W> {
    /// `out` receives the per-command report lines and the summary.
    pub fn new(settings: &'s Settings, out: W) -> Self {
        Self { settings, out }
    }

    pub fn execute(&mut self, commands: &[Command], state: &mut ModelState) -> Result<()> {
        for (i, cmd) in commands.iter().enumerate() {
            let line = i + 1;
            self.step(cmd, line, state).map_err(|e| e.at_line(line))?;
        }
        Ok(())
    }

    fn step(&mut self, cmd: &Command, line: usize, state: &mut ModelState) -> Result<()> {
        let report = match Verb::from_keyword(&cmd.verb) {
            Some(verb) => {
                debug!(line, %verb, operands = ?cmd.operands, "dispatch");
                verb.handler()(&cmd.operands, state, self.settings)?
            }
            None => {
                warn!(line, verb = %cmd.verb, "unknown command skipped");
                format!("[WARNING] Unknown command: {}", cmd.verb)
            }
        };
        self.emit(&report)
    }

    fn emit(&mut self, report: &str) -> Result<()> {
        writeln!(self.out, "{report}").map_err(DslError::Report)
    }
}

/// Run `commands` on a fresh state and return it.
pub fn execute<W: Write>(commands: &[Command], settings: &Settings, out: W) -> Result<ModelState> {
    let mut state = ModelState::new();
    Interpreter::new(settings, out).execute(commands, &mut state)?;
    Ok(state)
}
