// src/scan.rs
//! Builds the filtered selection tree from a root directory.
//!
//! - hidden entries (name starts with `.`) are skipped
//! - any directory whose root-relative path has a `build` component is skipped whole
//! - files must pass [`classify::is_text`]
//! - directories left without children are pruned (except the root)

use log::debug;
use std::{
    collections::BTreeSet,
    path::{
        Component,
        Path
    }
};
use walkdir::{
    DirEntry,
    WalkDir
};
use crate::{
    classify,
    error::BuildError,
    node::Node,
    util
};

/// Extensions pre-selected at the root level when the operator does not override them.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".cpp", ".cxx", ".c++", ".cc", ".mm", ".c", ".h", ".hh", ".hpp", ".qml", ".txt",
];

const SKIPPED_DIR_COMPONENT: &str = "build";

pub fn default_extensions() -> BTreeSet<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect()
}

/// Walk `root` depth-first and return the pruned tree.
///
/// Unreadable directories are treated as empty. Files directly under the root
/// whose extension is in `default_exts` start selected; deeper files never do.
pub fn build_tree(root: &Path, default_exts: &BTreeSet<String>) -> Result<Node, BuildError> {
    if !root.exists() {
        return Err(BuildError::RootMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(BuildError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| keep_entry(root, e));

    // Directories still being filled, innermost last. stack[0] is the root.
    let mut stack: Vec<Node> = Vec::new();

    for dent in walker {
        let dent = match dent {
            Ok(d) => d,
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                continue;
            }
        };

        let depth = dent.depth();
        if depth == 0 {
            stack.push(Node::dir(util::dir_display_name(root), root));
            continue;
        }
        while stack.len() > depth {
            close_dir(&mut stack);
        }

        let name = dent.file_name().to_string_lossy().into_owned();
        let ft = dent.file_type();
        if ft.is_dir() {
            stack.push(Node::dir(name, dent.path()));
        } else if !ft.is_file() {
            debug!("skipping special file {}", dent.path().display());
        } else if classify::is_text(dent.path()) {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(Node::file(name, dent.path()));
            }
        } else {
            debug!("skipping non-text file {}", dent.path().display());
        }
    }

    while stack.len() > 1 {
        close_dir(&mut stack);
    }
    let mut tree = stack
        .pop()
        .unwrap_or_else(|| Node::dir(util::dir_display_name(root), root));
    tree.compute_extensions();

    if tree.children.is_empty() {
        return Err(BuildError::NoTextFiles(root.to_path_buf()));
    }

    for child in &mut tree.children {
        if child.is_file() && default_exts.contains(&child.extension()) {
            child.set_selected(true);
        }
    }

    Ok(tree)
}

/// Finalise the innermost open directory and attach it to its parent if it
/// kept any children.
fn close_dir(stack: &mut Vec<Node>) {
    let Some(mut done) = stack.pop() else { return };
    if done.children.is_empty() {
        debug!("pruning empty directory {}", done.path.display());
        return;
    }
    done.compute_extensions();
    if let Some(parent) = stack.last_mut() {
        parent.children.push(done);
    }
}

fn keep_entry(root: &Path, e: &DirEntry) -> bool {
    if e.depth() == 0 {
        return true;
    }
    if e.file_name().to_string_lossy().starts_with('.') {
        return false;
    }
    if e.file_type().is_dir() && has_build_component(root, e.path()) {
        debug!("skipping build directory {}", e.path().display());
        return false;
    }
    true
}

fn has_build_component(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .any(|c| matches!(c, Component::Normal(s) if s == SKIPPED_DIR_COMPONENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn names(n: &Node) -> Vec<String> {
        let mut out = Vec::new();
        n.walk(&mut |x| out.push(x.name.clone()));
        out
    }

    fn example_a() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha\n").unwrap();
        fs::write(dir.path().join("b.bin"), [0xffu8, 0xfe, 0xfd]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.txt"), "gamma\n").unwrap();
        dir
    }

    #[test]
    fn builds_example_tree() {
        let dir = example_a();
        let tree = build_tree(dir.path(), &default_extensions()).unwrap();
        let root_name = util::dir_display_name(dir.path());
        assert_eq!(names(&tree), vec![root_name, "a.txt".into(), "sub".into(), "c.txt".into()]);
        let sub = tree.node_at(&[1]).unwrap();
        assert_eq!(sub.extensions(), &[".txt".to_string()][..]);
    }

    #[test]
    fn root_level_defaults_only() {
        let dir = example_a();
        let tree = build_tree(dir.path(), &default_extensions()).unwrap();
        assert_eq!(tree.selected_paths(), vec![dir.path().join("a.txt")]);
        assert!(!tree.node_at(&[1, 0]).unwrap().is_selected());
    }

    #[test]
    fn binary_only_directory_is_pruned() {
        let dir = example_a();
        fs::create_dir(dir.path().join("blobs")).unwrap();
        fs::write(dir.path().join("blobs/x.bin"), [0x80u8, 0x81]).unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        let tree = build_tree(dir.path(), &default_extensions()).unwrap();
        let all = names(&tree);
        assert!(!all.contains(&"blobs".to_string()));
        assert!(!all.contains(&"empty".to_string()));
        assert!(!all.contains(&"nested".to_string()));
    }

    #[test]
    fn hidden_and_build_entries_are_skipped() {
        let dir = example_a();
        fs::write(dir.path().join(".env"), "SECRET=1\n").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config"), "[core]\n").unwrap();
        fs::create_dir_all(dir.path().join("sub/build/out")).unwrap();
        fs::write(dir.path().join("sub/build/out/gen.txt"), "gen\n").unwrap();
        fs::write(dir.path().join("build.txt"), "kept\n").unwrap();
        let tree = build_tree(dir.path(), &default_extensions()).unwrap();
        let all = names(&tree);
        assert!(!all.iter().any(|n| n.starts_with('.')));
        assert!(!all.contains(&"build".to_string()));
        assert!(all.contains(&"build.txt".to_string()));
    }

    #[test]
    fn children_sorted_case_sensitively() {
        let dir = TempDir::new().unwrap();
        for n in ["b.txt", "B.txt", "a.txt"] {
            fs::write(dir.path().join(n), "x\n").unwrap();
        }
        let tree = build_tree(dir.path(), &default_extensions()).unwrap();
        let kids: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(kids, vec!["B.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn file_paths_stay_under_root() {
        let dir = example_a();
        let tree = build_tree(dir.path(), &default_extensions()).unwrap();
        for p in tree.file_paths() {
            assert!(p.starts_with(dir.path()), "{} escaped root", p.display());
        }
    }

    #[test]
    fn extensionless_default_requires_empty_entry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Makefile"), "all:\n").unwrap();
        let tree = build_tree(dir.path(), &default_extensions()).unwrap();
        assert!(tree.selected_paths().is_empty());

        let mut exts = default_extensions();
        exts.insert(String::new());
        let tree = build_tree(dir.path(), &exts).unwrap();
        assert_eq!(tree.selected_paths(), vec![dir.path().join("Makefile")]);
    }

    #[test]
    fn empty_root_reports_no_text_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.bin"), [0xc3u8, 0x28]).unwrap();
        let err = build_tree(dir.path(), &default_extensions()).unwrap_err();
        assert!(matches!(err, BuildError::NoTextFiles(_)));
    }

    #[test]
    fn missing_root_and_file_root() {
        let dir = example_a();
        let missing = dir.path().join("nope");
        assert!(matches!(build_tree(&missing, &default_extensions()), Err(BuildError::RootMissing(_))));
        let file = dir.path().join("a.txt");
        assert!(matches!(build_tree(&file, &default_extensions()), Err(BuildError::NotADirectory(_))));
    }

    /// Runs the build on a worker so a blocking open fails the test instead of hanging it.
    #[cfg(unix)]
    fn build_with_deadline(root: &Path) -> Node {
        use std::sync::mpsc;
        use std::time::Duration;

        let (tx, rx) = mpsc::channel();
        let root = root.to_path_buf();
        std::thread::spawn(move || {
            let _ = tx.send(build_tree(&root, &default_extensions()));
        });
        rx.recv_timeout(Duration::from_secs(5))
            .expect("build finished in time")
            .unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn fifo_is_skipped_without_blocking() {
        let dir = example_a();
        let made = std::process::Command::new("mkfifo")
            .arg(dir.path().join("pipe"))
            .status();
        if !matches!(made, Ok(s) if s.success()) {
            return;
        }
        let tree = build_with_deadline(dir.path());
        let all = names(&tree);
        assert!(!all.contains(&"pipe".to_string()));
        assert!(all.contains(&"a.txt".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_pruned() {
        use std::os::unix::fs::PermissionsExt;

        let dir = example_a();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), "x\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores the mode bits
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }
        let built = build_tree(dir.path(), &default_extensions());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let tree = built.unwrap();
        let root_name = util::dir_display_name(dir.path());
        assert_eq!(names(&tree), vec![root_name, "a.txt".into(), "sub".into(), "c.txt".into()]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_and_dangling_link_are_skipped() {
        use std::os::unix::fs::symlink;

        let dir = example_a();
        symlink(dir.path(), dir.path().join("sub/loop")).unwrap();
        symlink(dir.path().join("gone.txt"), dir.path().join("dangling.txt")).unwrap();

        let tree = build_with_deadline(dir.path());
        let root_name = util::dir_display_name(dir.path());
        assert_eq!(names(&tree), vec![root_name, "a.txt".into(), "sub".into(), "c.txt".into()]);
    }

    #[test]
    fn build_component_is_root_relative() {
        let root = PathBuf::from("/work/build/proj");
        assert!(!has_build_component(&root, &root.join("src")));
        assert!(has_build_component(&root, &root.join("src/build")));
    }
}
