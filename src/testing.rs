//! In-memory collaborators for unit tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::{
    git::{GitCommand, GitError, GitRunner},
    progress::Reporter,
    prompt::Prompter,
};

/// Scripted [`GitRunner`]. Commands are keyed by their rendered form
/// (`git branch --list template`); unscripted commands succeed with no output.
#[derive(Default)]
pub struct FakeGit {
    script: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command: &str, stdout: &str) -> Self {
        self.script.insert(command.to_string(), Ok(stdout.to_string()));
        self
    }

    pub fn fail(mut self, command: &str, stderr: &str) -> Self {
        self.script.insert(command.to_string(), Err(stderr.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| *c == command).count()
    }
}

#[async_trait]
impl GitRunner for FakeGit {
    async fn run(&self, command: &GitCommand) -> Result<String, GitError> {
        let rendered = command.to_string();
        self.calls.lock().unwrap().push(rendered.clone());
        match self.script.get(&rendered) {
            Some(Ok(out)) => Ok(out.trim().to_string()),
            Some(Err(stderr)) => Err(GitError::Failed {
                command: rendered,
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(String),
    Succeed(String),
    Fail(String),
    Warn(String),
    Detail(String),
    Stop,
}

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn has(&self, event: &Event) -> bool {
        self.events().contains(event)
    }

    pub fn details(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Detail(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn start(&self, message: &str) {
        self.push(Event::Start(message.to_string()));
    }

    fn succeed(&self, message: &str) {
        self.push(Event::Succeed(message.to_string()));
    }

    fn fail(&self, message: &str) {
        self.push(Event::Fail(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.push(Event::Warn(message.to_string()));
    }

    fn detail(&self, message: &str) {
        self.push(Event::Detail(message.to_string()));
    }

    fn stop(&self) {
        self.push(Event::Stop);
    }
}

/// [`Prompter`] answering from queues; running out of answers is an error.
#[derive(Default)]
pub struct ScriptedPrompter {
    inputs: RefCell<VecDeque<String>>,
    selections: RefCell<VecDeque<usize>>,
    confirms: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(self, answer: &str) -> Self {
        self.inputs.borrow_mut().push_back(answer.to_string());
        self
    }

    pub fn with_selection(self, index: usize) -> Self {
        self.selections.borrow_mut().push_back(index);
        self
    }

    pub fn with_confirm(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    /// Every prompt shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        match self.inputs.borrow_mut().pop_front() {
            Some(answer) if answer.is_empty() => Ok(default.unwrap_or_default().to_string()),
            Some(answer) => Ok(answer),
            None => bail!("unexpected input prompt: {}", prompt),
        }
    }

    fn select(&self, prompt: &str, items: &[String]) -> Result<usize> {
        self.asked.borrow_mut().push(prompt.to_string());
        match self.selections.borrow_mut().pop_front() {
            Some(index) if index < items.len() => Ok(index),
            Some(index) => bail!("selection {} out of range", index),
            None => bail!("unexpected select prompt: {}", prompt),
        }
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        match self.confirms.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("unexpected confirm prompt: {}", prompt),
        }
    }
}
