use std::io::Stdout;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use storyline_engine::{Prompter, Selection, StatusTarget, SurfaceHost};

use crate::view::{Prompt, View, ui};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// The terminal side of the editing surface.
///
/// Sinks land in the [`View`]: the value sink becomes the Markdown preview
/// pane and the status target becomes the status line. Prompts run a nested
/// event loop on the input bar.
pub struct TerminalHost {
    terminal: Term,
    pub view: View,
}

impl TerminalHost {
    pub fn new(terminal: Term, view: View) -> Self {
        Self { terminal, view }
    }

    pub fn draw(&mut self) -> Result<()> {
        self.terminal.draw(|f| ui(f, &self.view))?;
        Ok(())
    }

    pub fn terminal_mut(&mut self) -> &mut Term {
        &mut self.terminal
    }

    fn read_prompt(&mut self, message: &str, default: &str) -> Result<Option<String>> {
        self.view.prompt = Some(Prompt {
            message: message.to_string(),
            input: default.to_string(),
        });
        let answer = self.prompt_loop();
        self.view.prompt = None;
        answer
    }

    fn prompt_loop(&mut self) -> Result<Option<String>> {
        loop {
            self.draw()?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(prompt) = self.view.prompt.as_mut() else {
                return Ok(None);
            };
            match key.code {
                KeyCode::Enter => return Ok(Some(prompt.input.clone())),
                KeyCode::Esc => return Ok(None),
                KeyCode::Backspace => {
                    prompt.input.pop();
                }
                KeyCode::Char(c) => prompt.input.push(c),
                _ => {}
            }
        }
    }
}

impl Prompter for TerminalHost {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        match self.read_prompt(message, default) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("prompt failed: {e}");
                None
            }
        }
    }
}

impl SurfaceHost for TerminalHost {
    fn apply_selection(&mut self, selection: Selection) {
        self.view.selection = Some(selection);
    }

    fn write_value(&mut self, _sink: &str, markdown: &str) {
        self.view.preview = markdown.to_string();
    }

    fn write_reactive(&mut self, sink: &str, markdown: &str) {
        log::trace!("{sink}: {} bytes", markdown.len());
    }

    fn notify_input(&mut self, _sink: &str) {
        self.view.syncs += 1;
    }

    fn write_status(&mut self, _target: &StatusTarget, text: &str) {
        self.view.status = text.to_string();
    }
}
