//! Parser for VM commands.
//!
//! Strips comments and whitespace up front, then caches the whitespace-split
//! parts of the current command so `arg1`/`arg2` don't reparse on every call.

use crate::error::VmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

pub struct Parser {
    lines: Vec<String>,
    current_line: usize,
    current_command: String,
    cached_parts: Vec<String>,
}

impl Parser {
    pub fn from_lines(lines: Vec<String>) -> Self {
        let lines = lines
            .into_iter()
            .map(|line| {
                let line = match line.find("//") {
                    Some(pos) => &line[..pos],
                    None => &line,
                };
                line.trim().to_string()
            })
            .filter(|line| !line.is_empty())
            .collect();

        Parser {
            lines,
            current_line: 0,
            current_command: String::new(),
            cached_parts: Vec::new(),
        }
    }

    #[inline]
    pub fn has_more_commands(&self) -> bool {
        self.current_line < self.lines.len()
    }

    pub fn advance(&mut self) {
        if self.has_more_commands() {
            std::mem::swap(
                &mut self.current_command,
                &mut self.lines[self.current_line],
            );
            self.cached_parts.clear();
            self.cached_parts.extend(
                self.current_command
                    .split_whitespace()
                    .map(str::to_string),
            );
            self.current_line += 1;
        }
    }

    pub fn command_type(&self) -> Result<CommandType, VmError> {
        let keyword = self
            .cached_parts
            .first()
            .ok_or(VmError::NoCurrentCommand("command_type"))?;

        Ok(match keyword.as_str() {
            "push" => CommandType::Push,
            "pop" => CommandType::Pop,
            "label" => CommandType::Label,
            "goto" => CommandType::Goto,
            "if-goto" => CommandType::If,
            "function" => CommandType::Function,
            "return" => CommandType::Return,
            "call" => CommandType::Call,
            _ => CommandType::Arithmetic,
        })
    }

    pub fn arg1(&self) -> Result<&str, VmError> {
        match self.command_type()? {
            CommandType::Arithmetic => self
                .cached_parts
                .first()
                .map(String::as_str)
                .ok_or(VmError::NoCurrentCommand("arg1")),
            CommandType::Return => Err(VmError::MalformedCommand(
                "arg1 is not defined for return".into(),
            )),
            _ => self
                .cached_parts
                .get(1)
                .map(String::as_str)
                .ok_or_else(|| VmError::MalformedCommand(self.current_command.clone())),
        }
    }

    pub fn arg2(&self) -> Result<i32, VmError> {
        match self.command_type()? {
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => {
                let raw = self
                    .cached_parts
                    .get(2)
                    .ok_or_else(|| VmError::MalformedCommand(self.current_command.clone()))?;
                raw.parse()
                    .map_err(|_| VmError::MalformedCommand(self.current_command.clone()))
            }
            _ => Err(VmError::MalformedCommand(
                "arg2 is not defined for this command type".into(),
            )),
        }
    }

    /// The raw command line, used for the `// source` comment the code
    /// writer emits above each translation.
    pub fn current_command(&self) -> &str {
        &self.current_command
    }
}
