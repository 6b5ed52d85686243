// Shared by several integration test files; each uses a different subset
#![allow(dead_code)]

use std::collections::VecDeque;

use storyline_engine::editing::{Prompter, Selection};
use storyline_engine::surface::{StatusTarget, SurfaceHost};

/// Host that records everything the surface pushes to it
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub selection: Option<Selection>,
    pub values: Vec<(String, String)>,
    pub reactive: Vec<(String, String)>,
    pub notified: Vec<String>,
    pub statuses: Vec<(StatusTarget, String)>,
    pub prompts: Vec<String>,
    pub answers: VecDeque<Option<String>>,
}

impl RecordingHost {
    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            ..Self::default()
        }
    }

    pub fn last_value(&self) -> Option<&str> {
        self.values.last().map(|(_, markdown)| markdown.as_str())
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(|(_, text)| text.as_str())
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.reactive.clear();
        self.notified.clear();
        self.statuses.clear();
    }
}

impl Prompter for RecordingHost {
    fn prompt(&mut self, message: &str, _default: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.answers.pop_front().flatten()
    }
}

impl SurfaceHost for RecordingHost {
    fn apply_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    fn write_value(&mut self, sink: &str, markdown: &str) {
        self.values.push((sink.to_string(), markdown.to_string()));
    }

    fn write_reactive(&mut self, sink: &str, markdown: &str) {
        self.reactive.push((sink.to_string(), markdown.to_string()));
    }

    fn notify_input(&mut self, sink: &str) {
        self.notified.push(sink.to_string());
    }

    fn write_status(&mut self, target: &StatusTarget, text: &str) {
        self.statuses.push((target.clone(), text.to_string()));
    }
}

pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}
