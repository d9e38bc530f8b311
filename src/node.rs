// src/node.rs
//! The selection tree. Each `Node` owns its children; files are leaves and
//! carry the only mutable state (the `selected` flag).

use std::path::PathBuf;
use crate::util::dotted_extension;

/// File vs directory, with the per-kind payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File { selected: bool },
    /// Distinct lowercase extensions found anywhere below this directory,
    /// sorted. Position `i` is shown to the operator as index `i + 1`.
    Directory { extensions: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub path: PathBuf,
    pub kind: NodeKind,
    pub children: Vec<Node>,
    /// Assigned by the renderer on each pass.
    pub line_number: Option<usize>,
}

/// What a bulk operation does to each targeted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOp {
    Select,
    Deselect,
    Flip,
}

/// How far below a directory a bulk operation reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Children,
    Descendants,
}

/// Child-index path from the root to a node. The root is the empty address.
pub type NodeAddr = Vec<usize>;

impl Node {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File { selected: false },
            children: Vec::new(),
            line_number: None,
        }
    }

    pub fn dir(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory { extensions: Vec::new() },
            children: Vec::new(),
            line_number: None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Always false for directories.
    pub fn is_selected(&self) -> bool {
        matches!(self.kind, NodeKind::File { selected: true })
    }

    pub fn set_selected(&mut self, value: bool) {
        if let NodeKind::File { selected } = &mut self.kind {
            *selected = value;
        }
    }

    /// Flip a file's flag; no-op on directories.
    pub fn toggle(&mut self) {
        if let NodeKind::File { selected } = &mut self.kind {
            *selected = !*selected;
        }
    }

    /// One-character state marker: `X` selected, space unselected, `.` directory.
    pub fn marker(&self) -> char {
        match self.kind {
            NodeKind::File { selected: true } => 'X',
            NodeKind::File { selected: false } => ' ',
            NodeKind::Directory { .. } => '.',
        }
    }

    /// Lowercase dotted extension of this node's path (`""` if none).
    pub fn extension(&self) -> String {
        dotted_extension(&self.path)
    }

    pub fn extensions(&self) -> &[String] {
        match &self.kind {
            NodeKind::Directory { extensions } => extensions,
            NodeKind::File { .. } => &[],
        }
    }

    /// Extension by its 1-based index.
    pub fn extension_at(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.extensions().get(i))
            .map(String::as_str)
    }

    /// Recompute this directory's extension index from its (finalised) children.
    pub(crate) fn compute_extensions(&mut self) {
        let mut set = std::collections::BTreeSet::new();
        for child in &self.children {
            match &child.kind {
                NodeKind::File { .. } => {
                    set.insert(child.extension());
                }
                NodeKind::Directory { extensions } => {
                    set.extend(extensions.iter().cloned());
                }
            }
        }
        if let NodeKind::Directory { extensions } = &mut self.kind {
            *extensions = set.into_iter().collect();
        }
    }

    /// Apply `op` to the files under this directory.
    ///
    /// With `ext` set, only files whose lowercase extension equals it are
    /// touched (`""` matches extension-less files). Returns how many files
    /// were affected.
    pub fn apply(&mut self, op: BulkOp, reach: Reach, ext: Option<&str>) -> usize {
        let mut touched = 0;
        for child in &mut self.children {
            if child.is_dir() {
                if reach == Reach::Descendants {
                    touched += child.apply(op, reach, ext);
                }
                continue;
            }
            if ext.is_some_and(|e| child.extension() != e) {
                continue;
            }
            if let NodeKind::File { selected } = &mut child.kind {
                *selected = match op {
                    BulkOp::Select => true,
                    BulkOp::Deselect => false,
                    BulkOp::Flip => !*selected,
                };
                touched += 1;
            }
        }
        touched
    }

    pub fn node_at(&self, addr: &[usize]) -> Option<&Node> {
        let mut cur = self;
        for &i in addr {
            cur = cur.children.get(i)?;
        }
        Some(cur)
    }

    pub fn node_at_mut(&mut self, addr: &[usize]) -> Option<&mut Node> {
        let mut cur = self;
        for &i in addr {
            cur = cur.children.get_mut(i)?;
        }
        Some(cur)
    }

    /// Pre-order visit of this node and everything below it.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Selected file paths in tree (pre-order) order.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if n.is_selected() {
                out.push(n.path.clone());
            }
        });
        out
    }

    /// Paths of all files below (and including) this node.
    #[cfg(test)]
    pub fn file_paths(&self) -> Vec<&std::path::Path> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if n.is_file() {
                out.push(n.path.as_path());
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // root/
    //   a.txt
    //   b.md
    //   sub/
    //     c.txt
    //     Makefile
    //     deep/
    //       d.TXT
    fn sample() -> Node {
        let mut deep = Node::dir("deep", "root/sub/deep");
        deep.children.push(Node::file("d.TXT", "root/sub/deep/d.TXT"));
        deep.compute_extensions();

        let mut sub = Node::dir("sub", "root/sub");
        sub.children.push(Node::file("c.txt", "root/sub/c.txt"));
        sub.children.push(Node::file("Makefile", "root/sub/Makefile"));
        sub.children.push(deep);
        sub.compute_extensions();

        let mut root = Node::dir("root", "root");
        root.children.push(Node::file("a.txt", "root/a.txt"));
        root.children.push(Node::file("b.md", "root/b.md"));
        root.children.push(sub);
        root.compute_extensions();
        root
    }

    #[test]
    fn extensions_are_transitive_and_sorted() {
        let root = sample();
        assert_eq!(root.extensions(), &[".md".to_string(), ".txt".to_string()][..]);
        let sub = root.node_at(&[2]).unwrap();
        assert_eq!(sub.extensions(), &["".to_string(), ".txt".to_string()][..]);
        assert_eq!(sub.extension_at(1), Some(""));
        assert_eq!(sub.extension_at(2), Some(".txt"));
        assert_eq!(sub.extension_at(0), None);
        assert_eq!(sub.extension_at(3), None);
    }

    #[test]
    fn toggle_twice_restores() {
        let mut root = sample();
        let f = root.node_at_mut(&[0]).unwrap();
        let before = f.is_selected();
        f.toggle();
        f.toggle();
        assert_eq!(f.is_selected(), before);
    }

    #[test]
    fn select_children_only() {
        let mut root = sample();
        let n = root.apply(BulkOp::Select, Reach::Children, None);
        assert_eq!(n, 2);
        assert_eq!(root.selected_paths(), vec![PathBuf::from("root/a.txt"), PathBuf::from("root/b.md")]);
    }

    #[test]
    fn select_then_deselect_recursive_clears_everything() {
        let mut root = sample();
        root.apply(BulkOp::Select, Reach::Descendants, None);
        assert_eq!(root.selected_paths().len(), 5);
        root.apply(BulkOp::Deselect, Reach::Descendants, None);
        assert!(root.selected_paths().is_empty());
    }

    #[test]
    fn flip_inverts_each_file_independently() {
        let mut root = sample();
        root.node_at_mut(&[0]).unwrap().set_selected(true);
        root.apply(BulkOp::Flip, Reach::Children, None);
        assert!(!root.node_at(&[0]).unwrap().is_selected());
        assert!(root.node_at(&[1]).unwrap().is_selected());
    }

    #[test]
    fn extension_filter_is_case_insensitive_and_recursive() {
        let mut root = sample();
        let sub = root.node_at_mut(&[2]).unwrap();
        assert_eq!(sub.apply(BulkOp::Flip, Reach::Children, Some(".txt")), 1);
        assert_eq!(sub.apply(BulkOp::Flip, Reach::Descendants, Some(".txt")), 2);
        // c.txt flipped twice, d.TXT once
        assert_eq!(root.selected_paths(), vec![PathBuf::from("root/sub/deep/d.TXT")]);
    }

    #[test]
    fn empty_extension_matches_extensionless_files() {
        let mut root = sample();
        let sub = root.node_at_mut(&[2]).unwrap();
        sub.apply(BulkOp::Flip, Reach::Children, Some(""));
        assert_eq!(root.selected_paths(), vec![PathBuf::from("root/sub/Makefile")]);
    }

    #[test]
    fn markers() {
        let mut root = sample();
        assert_eq!(root.marker(), '.');
        let f = root.node_at_mut(&[0]).unwrap();
        assert_eq!(f.marker(), ' ');
        f.toggle();
        assert_eq!(f.marker(), 'X');
    }

    #[test]
    fn directories_ignore_toggle() {
        let mut root = sample();
        root.toggle();
        assert!(!root.is_selected());
        assert_eq!(root.file_paths().len(), 5);
    }
}
