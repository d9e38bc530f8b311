// src/session.rs
//! Interactive loop: render, read a command line, interpret, repeat until an
//! empty line or end of input.

use std::{
    io::{
        self,
        BufRead,
        Write
    },
    path::PathBuf
};
use crate::{
    command,
    node::Node,
    tree_view::{
        self,
        LineIndex
    }
};

pub const INSTRUCTIONS: &str = "\
Selection commands:
- N       file line: toggle the file
- N       directory line: flip every file directly inside it
- N*      directory line: flip every file below it, recursively (e.g. '9*')
- +N      select all files directly inside directory N (e.g. '+9')
- -N      deselect all files directly inside directory N (e.g. '-9')
- +N*     select all files below directory N, recursively
- -N*     deselect all files below directory N, recursively
- N-E     flip files in directory N with extension #E (e.g. '1-1')
- N-E*    same, recursively (e.g. '1-1*')
- Several commands may be given on one line, separated by spaces
- Press Enter on an empty line to continue
";

const PROMPT: &str = "select > ";

/// Print `prompt`, then read one line. `None` means end of input.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn show<W: Write>(tree: &mut Node, out: &mut W) -> io::Result<LineIndex> {
    let rendered = tree_view::render(tree);
    writeln!(out, "\n--- Interactive file selection ---\n")?;
    rendered.write_to(out)?;
    writeln!(out)?;
    Ok(rendered.index)
}

/// Drive the selection loop and return the chosen files in tree order.
pub fn run_session<R: BufRead, W: Write>(
    tree: &mut Node,
    input: &mut R,
    out: &mut W,
) -> io::Result<Vec<PathBuf>> {
    let mut index = show(tree, out)?;
    write!(out, "{INSTRUCTIONS}")?;
    writeln!(out)?;

    loop {
        let Some(line) = prompt_line(input, out, PROMPT)? else {
            writeln!(out, "\n\nInput finished.")?;
            break;
        };
        if line.is_empty() {
            break;
        }
        for diag in command::interpret(tree, &index, &line) {
            writeln!(out, "error: {diag}")?;
        }
        writeln!(out, "\nUpdated tree:")?;
        index = show(tree, out)?;
    }

    Ok(tree.selected_paths())
}
