//! Job grammar parser
//!
//! Decoding functions for the line-oriented job format.
//!
//! ## Grammar
//!
//! ```text
//! WRITE [(k1,v1)(k2,v2)...]     one pair group per (key,value)
//! READ [k1,k2,...]              comma-separated key list
//! DELETE [k1,k2,...]            comma-separated key list
//! SHOW
//! WAIT <delay_ms>
//! BACKUP
//! HELP
//! ```
//!
//! Blank lines parse to `Empty`; anything else parses to `Invalid`.
//! Keys and values are non-empty and contain neither whitespace nor any of
//! `, ( ) [ ]`. An empty bracket list is structurally valid and left for
//! the interpreter to reject with a diagnostic.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::{Command, CommandSource};

// =============================================================================
// Line Parsing
// =============================================================================

/// Parse one line of a job file into a command
pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    // Split the keyword from its argument text
    let split_at = trimmed
        .find(|c: char| c.is_whitespace() || c == '[')
        .unwrap_or(trimmed.len());
    let (keyword, rest) = trimmed.split_at(split_at);
    let rest = rest.trim();

    match keyword {
        "WRITE" => parse_write(rest),
        "READ" => parse_key_list(rest)
            .map(|keys| Command::Read { keys })
            .unwrap_or(Command::Invalid),
        "DELETE" => parse_key_list(rest)
            .map(|keys| Command::Delete { keys })
            .unwrap_or(Command::Invalid),
        "SHOW" if rest.is_empty() => Command::Show,
        "WAIT" => parse_wait(rest),
        "BACKUP" if rest.is_empty() => Command::Backup,
        "HELP" if rest.is_empty() => Command::Help,
        _ => Command::Invalid,
    }
}

/// Parse a WRITE pair list: `[(k1,v1)(k2,v2)...]`
fn parse_write(rest: &str) -> Command {
    let Some(body) = strip_brackets(rest) else {
        return Command::Invalid;
    };

    let mut pairs = Vec::new();
    let mut cursor = body.trim();

    while !cursor.is_empty() {
        let Some(after_open) = cursor.strip_prefix('(') else {
            return Command::Invalid;
        };
        let Some(close) = after_open.find(')') else {
            return Command::Invalid;
        };

        let Some((key, value)) = after_open[..close].split_once(',') else {
            return Command::Invalid;
        };
        if !is_token(key) || !is_token(value) {
            return Command::Invalid;
        }
        pairs.push((key.to_string(), value.to_string()));

        // Pair groups may be adjacent or comma/space separated
        cursor = after_open[close + 1..]
            .trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }

    Command::Write { pairs }
}

/// Parse a READ/DELETE key list: `[k1,k2,...]`
fn parse_key_list(rest: &str) -> Option<Vec<String>> {
    let body = strip_brackets(rest)?;
    if body.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut keys = Vec::new();
    for segment in body.split(',') {
        let key = segment.trim();
        if !is_token(key) {
            return None;
        }
        keys.push(key.to_string());
    }
    Some(keys)
}

/// Parse a WAIT delay in milliseconds
fn parse_wait(rest: &str) -> Command {
    match rest.parse::<u64>() {
        Ok(delay_ms) => Command::Wait { delay_ms },
        Err(_) => Command::Invalid,
    }
}

fn strip_brackets(rest: &str) -> Option<&str> {
    rest.strip_prefix('[')?.strip_suffix(']')
}

/// Keys and values: non-empty, no grammar delimiters, no whitespace
fn is_token(text: &str) -> bool {
    !text.is_empty()
        && !text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '[' | ']'))
}

// =============================================================================
// File-backed Command Source
// =============================================================================

/// Command source reading the line grammar from any buffered reader
pub struct LineCommandSource<R> {
    reader: R,
    done: bool,
}

impl LineCommandSource<BufReader<File>> {
    /// Open a job file as a command source
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> LineCommandSource<R> {
    /// Wrap an already-open reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: BufRead> CommandSource for LineCommandSource<R> {
    /// Yield the next command; `End` exactly once at stream exhaustion.
    ///
    /// A mid-stream read error ends the stream: the remaining bytes cannot
    /// be trusted to line up with the grammar.
    fn next_command(&mut self) -> Command {
        if self.done {
            return Command::End;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.done = true;
                Command::End
            }
            Ok(_) => parse_line(&line),
            Err(e) => {
                tracing::warn!("Failed to read command line: {}", e);
                self.done = true;
                Command::End
            }
        }
    }
}
