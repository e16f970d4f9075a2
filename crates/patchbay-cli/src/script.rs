//! Postfix patch language.
//!
//! A script is a whitespace-separated sequence of words, read left to right
//! against the patch's construction stack. A word starting with `#` begins a
//! comment that runs to the end of the line; a `#` inside a word (such as a
//! `wavout:` path) is part of the word.
//!
//! ```text
//! # 440 Hz sine at half amplitude, lowpassed, written to disk
//! 440 0.5 sine
//! 800 butlp
//! wavout:tone.wav
//! drop
//! ```
//!
//! | Word | Effect |
//! |------|--------|
//! | number | push a constant |
//! | registry word (`sine`, `butlp`, ...) | build the node on the stack |
//! | `dup`, `drop` | duplicate or discard the top entry |
//! | `hold:NAME` | pop the top entry and keep it under `NAME` |
//! | `get:NAME` | push the buffer held under `NAME` |
//! | `unhold:NAME` | release the buffer held under `NAME` |
//! | `wavout:PATH` | write the top entry to a WAV file, passing it through |
//!
//! Two phases: [`parse`] turns text into [`Statement`]s without touching a
//! patch, then [`execute`] runs them against one.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use patchbay_core::{BufferId, Patch, PatchError};
use patchbay_io::wavout;
use patchbay_nodes::NodeRegistry;

/// Line and column of a word, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number.
    pub line: usize,
    /// Column of the word's first character.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One parsed word.
#[derive(Debug, Clone, PartialEq)]
pub enum Word {
    /// Numeric literal.
    Number(f32),
    /// `dup`
    Dup,
    /// `drop`
    Drop,
    /// `hold:NAME`
    Hold(String),
    /// `get:NAME`
    Get(String),
    /// `unhold:NAME`
    Unhold(String),
    /// `wavout:PATH`
    Wavout(PathBuf),
    /// Any other word, resolved against the node registry.
    Node(String),
}

/// A word and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The word.
    pub word: Word,
    /// Its source text.
    pub text: String,
    /// Its position in the script.
    pub pos: Position,
}

/// Errors from parsing or running a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// `hold:`, `get:`, `unhold:` or `wavout:` without an argument.
    #[error("{pos}: '{word}' needs an argument after ':'")]
    MissingArgument {
        /// The offending word.
        word: String,
        /// Where it appeared.
        pos: Position,
    },
    /// A word that is neither built in nor registered.
    #[error("{pos}: unknown word '{word}'")]
    UnknownWord {
        /// The offending word.
        word: String,
        /// Where it appeared.
        pos: Position,
    },
    /// `get:` or `unhold:` for a name with no live hold.
    #[error("{pos}: nothing is held under '{name}'")]
    UnknownHold {
        /// The slot name.
        name: String,
        /// Where it appeared.
        pos: Position,
    },
    /// `hold:` for a name that is already in use.
    #[error("{pos}: '{name}' is already held")]
    DuplicateHold {
        /// The slot name.
        name: String,
        /// Where it appeared.
        pos: Position,
    },
    /// The patch rejected the operation.
    #[error("{pos}: '{word}' failed")]
    Patch {
        /// The word being executed.
        word: String,
        /// Where it appeared.
        pos: Position,
        /// What the patch reported.
        #[source]
        source: PatchError,
    },
}

impl ScriptError {
    /// Position of the word that caused the error.
    pub fn position(&self) -> Position {
        match self {
            Self::MissingArgument { pos, .. }
            | Self::UnknownWord { pos, .. }
            | Self::UnknownHold { pos, .. }
            | Self::DuplicateHold { pos, .. }
            | Self::Patch { pos, .. } => *pos,
        }
    }
}

/// What a script left behind after running.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Words executed.
    pub statements: usize,
    /// `wavout` sinks created.
    pub sinks: usize,
    /// Stack entries dropped at the end.
    pub leftover_entries: usize,
    /// Holds never released, sorted by name.
    pub leftover_holds: Vec<String>,
}

/// Splits a script into statements.
pub fn parse(source: &str) -> Result<Vec<Statement>, ScriptError> {
    let mut statements = Vec::new();
    for (line_idx, line) in source.lines().enumerate() {
        let mut rest = line;
        let mut offset = 0;
        while let Some(start) = rest.find(|c: char| !c.is_whitespace()) {
            let tail = &rest[start..];
            let len = tail.find(char::is_whitespace).unwrap_or(tail.len());
            let text = &tail[..len];
            if text.starts_with('#') {
                break;
            }
            let pos = Position {
                line: line_idx + 1,
                column: line[..offset + start].chars().count() + 1,
            };
            statements.push(Statement {
                word: parse_word(text, pos)?,
                text: text.to_string(),
                pos,
            });
            offset += start + len;
            rest = &tail[len..];
        }
    }
    Ok(statements)
}

fn parse_word(text: &str, pos: Position) -> Result<Word, ScriptError> {
    if looks_numeric(text) {
        if let Ok(v) = text.parse::<f32>() {
            return Ok(Word::Number(v));
        }
    }

    if let Some((head, arg)) = text.split_once(':') {
        let make: fn(String) -> Word = match head {
            "hold" => Word::Hold,
            "get" => Word::Get,
            "unhold" => Word::Unhold,
            "wavout" => |arg| Word::Wavout(PathBuf::from(arg)),
            _ => {
                return Err(ScriptError::UnknownWord {
                    word: text.to_string(),
                    pos,
                });
            }
        };
        if arg.is_empty() {
            return Err(ScriptError::MissingArgument {
                word: head.to_string(),
                pos,
            });
        }
        return Ok(make(arg.to_string()));
    }

    Ok(match text {
        "dup" => Word::Dup,
        "drop" => Word::Drop,
        other => Word::Node(other.to_string()),
    })
}

// Keeps `inf` and `nan` out of the number syntax.
fn looks_numeric(text: &str) -> bool {
    let body = text.trim_start_matches(['-', '+']);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

/// Runs parsed statements against a patch in its building state.
///
/// Entries left on the stack are logged and dropped; unreleased holds are
/// logged and released. Both leave the patch ready to start.
pub fn execute(
    statements: &[Statement],
    patch: &mut Patch,
    registry: &NodeRegistry,
) -> Result<ScriptSummary, ScriptError> {
    let mut holds: HashMap<String, BufferId> = HashMap::new();
    let mut summary = ScriptSummary::default();

    for stmt in statements {
        let failed = |source: PatchError| ScriptError::Patch {
            word: stmt.text.clone(),
            pos: stmt.pos,
            source,
        };
        match &stmt.word {
            Word::Number(v) => {
                patch.push_constant(*v).map_err(failed)?;
            }
            Word::Dup => patch.dup().map_err(failed)?,
            Word::Drop => patch.drop().map_err(failed)?,
            Word::Hold(name) => {
                if holds.contains_key(name) {
                    return Err(ScriptError::DuplicateHold {
                        name: name.clone(),
                        pos: stmt.pos,
                    });
                }
                let buf = patch.hold_top().map_err(failed)?;
                holds.insert(name.clone(), buf);
            }
            Word::Get(name) => {
                let buf = lookup(&holds, name, stmt.pos)?;
                patch.push(buf).map_err(failed)?;
            }
            Word::Unhold(name) => {
                let buf = lookup(&holds, name, stmt.pos)?;
                patch.unhold(buf).map_err(failed)?;
                holds.remove(name);
            }
            Word::Wavout(path) => {
                wavout(patch, path).map_err(failed)?;
                summary.sinks += 1;
            }
            Word::Node(name) => match registry.build(name, patch) {
                Some(result) => {
                    result.map_err(failed)?;
                }
                None => {
                    return Err(ScriptError::UnknownWord {
                        word: name.clone(),
                        pos: stmt.pos,
                    });
                }
            },
        }
        summary.statements += 1;
    }

    let cleanup = |source: PatchError| ScriptError::Patch {
        word: "<end of script>".to_string(),
        pos: statements.last().map_or(Position { line: 1, column: 1 }, |s| s.pos),
        source,
    };

    summary.leftover_entries = patch.depth();
    if summary.leftover_entries > 0 {
        tracing::warn!(
            entries = summary.leftover_entries,
            "stack not empty at end of script; dropping leftovers"
        );
        while !patch.is_empty() {
            patch.drop().map_err(cleanup)?;
        }
    }

    let mut leftover: Vec<_> = holds.into_iter().collect();
    leftover.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, buf) in leftover {
        tracing::warn!(name = %name, "hold never released; releasing it");
        patch.unhold(buf).map_err(cleanup)?;
        summary.leftover_holds.push(name);
    }

    Ok(summary)
}

fn lookup(
    holds: &HashMap<String, BufferId>,
    name: &str,
    pos: Position,
) -> Result<BufferId, ScriptError> {
    holds
        .get(name)
        .copied()
        .ok_or_else(|| ScriptError::UnknownHold {
            name: name.to_string(),
            pos,
        })
}

/// Parses and runs a script in one step.
pub fn load(
    source: &str,
    patch: &mut Patch,
    registry: &NodeRegistry,
) -> Result<ScriptSummary, ScriptError> {
    let statements = parse(source)?;
    execute(&statements, patch, registry)
}
