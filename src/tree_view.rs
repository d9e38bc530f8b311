// src/tree_view.rs

use std::io::{
    self,
    Write
};
use unicode_width::UnicodeWidthStr;
use crate::node::{
    Node,
    NodeAddr
};

const LAST: &str = "└── ";
const MID: &str = "├── ";
const BLANK: &str = "    ";
const PIPE: &str = "│   ";
const EXT_GAP: usize = 4;

/// Line number → node mapping produced by one render pass.
/// Line `n` (1-based) lives at `addrs[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    addrs: Vec<NodeAddr>,
}

impl LineIndex {
    pub fn get(&self, line: usize) -> Option<&[usize]> {
        line.checked_sub(1)
            .and_then(|i| self.addrs.get(i))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

/// Output of a render: printable lines plus the fresh index.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub lines: Vec<String>,
    pub index: LineIndex,
}

impl Rendered {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for l in &self.lines {
            writeln!(out, "{l}")?;
        }
        Ok(())
    }
}

struct Row {
    base: String,
    exts: Option<String>,
}

/// Number every node in pre-order (root = 1) and lay out the annotated tree.
///
/// Example (directory extension lists are aligned past the widest line):
/// ```text
///   1  [.]   └── proj             [1:.txt]
///   2  [X]       ├── a.txt
///   3  [.]       └── sub          [1:.txt]
///   4  [ ]           └── c.txt
/// ```
pub fn render(tree: &mut Node) -> Rendered {
    let mut rows = Vec::new();
    let mut addrs = Vec::new();
    let mut addr = Vec::new();
    collect(tree, &mut addr, "", true, &mut rows, &mut addrs);

    let widest = rows.iter().map(|r| r.base.width()).max().unwrap_or(0);
    let lines = rows
        .into_iter()
        .map(|r| match r.exts {
            Some(list) => {
                let pad = widest - r.base.width() + EXT_GAP;
                format!("{}{}[{}]", r.base, " ".repeat(pad), list)
            }
            None => r.base,
        })
        .collect();

    Rendered { lines, index: LineIndex { addrs } }
}

fn collect(
    node: &mut Node,
    addr: &mut NodeAddr,
    prefix: &str,
    is_last: bool,
    rows: &mut Vec<Row>,
    addrs: &mut Vec<NodeAddr>,
) {
    let line = addrs.len() + 1;
    node.line_number = Some(line);
    addrs.push(addr.clone());

    // The root is drawn as a last child.
    let (connector, next_prefix) = if is_last {
        (LAST, format!("{prefix}{BLANK}"))
    } else {
        (MID, format!("{prefix}{PIPE}"))
    };
    let base = format!("{line:>3}  [{}]   {prefix}{connector}{}", node.marker(), node.name);
    let exts = if node.extensions().is_empty() {
        None
    } else {
        Some(
            node.extensions()
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}:{e}", i + 1))
                .collect::<Vec<_>>()
                .join(", "),
        )
    };
    rows.push(Row { base, exts });

    let count = node.children.len();
    for (i, child) in node.children.iter_mut().enumerate() {
        addr.push(i);
        collect(child, addr, &next_prefix, i + 1 == count, rows, addrs);
        addr.pop();
    }
}
