//! Interactive prompts.
//!
//! Input validation is kept in pure functions ([`parse_choice`], [`is_affirmative`])
//! so the retry-until-valid loops can be tested without a terminal.

use std::io::{self, BufRead, Write};

use crate::error::{HardsubError, Result};

/// Source of answers for interactive questions
pub trait Prompter {
    /// Show `message` and return the answer with the trailing newline removed
    fn ask(&mut self, message: &str) -> Result<String>;
}

/// Reads answers from standard input
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdinPrompter {
    fn ask(&mut self, message: &str) -> Result<String> {
        print!("{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(HardsubError::InputClosed);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Why a menu answer was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange,
}

impl ChoiceError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotANumber => "Invalid input. Please enter a number.",
            Self::OutOfRange => "Invalid choice.",
        }
    }
}

/// Validate a 1-based menu answer against `1..=max`
pub fn parse_choice(input: &str, max: usize) -> std::result::Result<usize, ChoiceError> {
    let choice: usize = input.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
    if (1..=max).contains(&choice) {
        Ok(choice)
    } else {
        Err(ChoiceError::OutOfRange)
    }
}

/// `y` or `Y`, nothing else
pub fn is_affirmative(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

/// Ask until the answer is a number in `1..=max`
pub fn choose_number(prompter: &mut dyn Prompter, message: &str, max: usize) -> Result<usize> {
    loop {
        let answer = prompter.ask(message)?;
        match parse_choice(&answer, max) {
            Ok(choice) => return Ok(choice),
            Err(e) => println!("{}", e.message()),
        }
    }
}

pub fn confirm(prompter: &mut dyn Prompter, message: &str) -> Result<bool> {
    let answer = prompter.ask(message)?;
    Ok(is_affirmative(&answer))
}

/// Replays canned answers; runs out with [`HardsubError::InputClosed`]
#[cfg(test)]
pub(crate) struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        self.answers.pop_front().ok_or(HardsubError::InputClosed)
    }
}
