//! Line-oriented terminal prompts

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read from terminal: {0}")]
    Io(#[from] io::Error),

    #[error("input closed before an answer was given")]
    Closed,
}

/// Two-way conversation with the person running the tool
pub trait Prompter {
    /// Show one line of output
    fn say(&mut self, line: &str);

    /// Show `question` and return the trimmed answer
    fn ask(&mut self, question: &str) -> Result<String, PromptError>;
}

/// Prompter backed by stdin and stdout
#[derive(Debug, Default)]
pub struct StdioPrompter;

impl StdioPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdioPrompter {
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        print!("{}", question);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(PromptError::Closed);
        }

        Ok(input.trim().to_string())
    }
}

/// Prompter that replays canned answers and records everything shown
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Lines passed to `say`, plus each question asked
    pub transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Whether any line of the transcript contains `needle`
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        self.transcript.push(question.to_string());
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or(PromptError::Closed)
    }
}

/// Whether an answer means yes ("y" or "yes", any case)
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
