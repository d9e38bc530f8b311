// src/command.rs
//! The selection command language.
//!
//! A command line is split on whitespace; each token is one command, applied
//! left to right against the line numbers of the most recent render.
//!
//! | token    | target    | effect                                          |
//! |----------|-----------|-------------------------------------------------|
//! | `+N`     | directory | select direct child files                       |
//! | `+N*`    | directory | select all descendant files                     |
//! | `-N`     | directory | deselect direct child files                     |
//! | `-N*`    | directory | deselect all descendant files                   |
//! | `N-E`    | directory | flip direct child files with extension #E       |
//! | `N-E*`   | directory | flip descendant files with extension #E         |
//! | `N`      | directory | flip direct child files                         |
//! | `N*`     | directory | flip all descendant files                       |
//! | `N`/`N*` | file      | toggle the file                                 |

use crate::{
    error::CommandError,
    node::{
        BulkOp,
        Node,
        Reach
    },
    tree_view::LineIndex
};

/// One parsed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `+N[*]` / `-N[*]`
    Force { line: usize, select: bool, reach: Reach },
    /// `N-E[*]`
    FlipExtension { line: usize, ext: usize, reach: Reach },
    /// `N[*]`
    Flip { line: usize, reach: Reach },
}

impl Command {
    pub fn line(&self) -> usize {
        match *self {
            Command::Force { line, .. }
            | Command::FlipExtension { line, .. }
            | Command::Flip { line, .. } => line,
        }
    }
}

/// Parse a single token. Forms are tried in order: `+`/`-` prefix, `N-E`, plain `N`.
pub fn parse_token(token: &str) -> Result<Command, CommandError> {
    let malformed = || CommandError::Malformed(token.to_string());

    for (sign, select) in [('+', true), ('-', false)] {
        if let Some(rest) = token.strip_prefix(sign) {
            let (body, reach) = split_star(rest);
            let line = number(body).ok_or_else(malformed)?;
            return Ok(Command::Force { line, select, reach });
        }
    }

    if let Some((line, ext)) = token.split_once('-') {
        let (ext, reach) = split_star(ext);
        let line = number(line).ok_or_else(malformed)?;
        let ext = number(ext).ok_or_else(malformed)?;
        return Ok(Command::FlipExtension { line, ext, reach });
    }

    let (body, reach) = split_star(token);
    let line = number(body).ok_or_else(malformed)?;
    Ok(Command::Flip { line, reach })
}

/// Apply one parsed command. Nothing is mutated when an error is returned.
pub fn apply_command(
    tree: &mut Node,
    index: &LineIndex,
    token: &str,
    cmd: Command,
) -> Result<(), CommandError> {
    let line = cmd.line();
    let node = index
        .get(line)
        .and_then(|addr| tree.node_at_mut(addr))
        .ok_or(CommandError::NoSuchLine(line))?;

    match cmd {
        Command::Force { select, reach, .. } => {
            require_dir(node, line, token)?;
            let op = if select { BulkOp::Select } else { BulkOp::Deselect };
            node.apply(op, reach, None);
        }
        Command::FlipExtension { ext, reach, .. } => {
            require_dir(node, line, token)?;
            let target = node
                .extension_at(ext)
                .map(str::to_owned)
                .ok_or_else(|| CommandError::ExtensionOutOfRange {
                    line,
                    index: ext,
                    available: node.extensions().len(),
                })?;
            node.apply(BulkOp::Flip, reach, Some(&target));
        }
        Command::Flip { reach, .. } => {
            if node.is_file() {
                node.toggle();
            } else {
                node.apply(BulkOp::Flip, reach, None);
            }
        }
    }
    Ok(())
}

/// Run a whole command line. Bad tokens are reported and skipped; the rest
/// still apply. Returns one diagnostic per rejected token.
pub fn interpret(tree: &mut Node, index: &LineIndex, input: &str) -> Vec<CommandError> {
    let mut diagnostics = Vec::new();
    for token in input.split_whitespace() {
        let outcome = parse_token(token).and_then(|cmd| apply_command(tree, index, token, cmd));
        if let Err(e) = outcome {
            log::debug!("rejected token {token:?}: {e}");
            diagnostics.push(e);
        }
    }
    diagnostics
}

fn require_dir(node: &Node, line: usize, token: &str) -> Result<(), CommandError> {
    if node.is_dir() {
        Ok(())
    } else {
        Err(CommandError::NotADirectory { line, token: token.to_string() })
    }
}

fn split_star(s: &str) -> (&str, Reach) {
    match s.strip_suffix('*') {
        Some(body) => (body, Reach::Descendants),
        None => (s, Reach::Children),
    }
}

/// ASCII digits only; `usize::from_str` would also take a leading `+`.
fn number(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
