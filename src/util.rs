// src/util.rs

use std::path::{
    Component,
    Path,
    PathBuf
};

/// Compact, filesystem-safe local timestamp, e.g. `20250810_140359`.
pub fn now_ts_compact() -> String {
    use chrono::{Local, Datelike, Timelike};
    let dt = Local::now();
    format!("{:04}{:02}{:02}_{:02}{:02}{:02}",
        dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute(), dt.second())
}

/// Lowercase extension including the leading dot (`".txt"`), or `""` when the
/// file has none. `"notes."` counts as having no extension.
pub fn dotted_extension(path: &Path) -> String {
    match path.extension().map(|e| e.to_string_lossy()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => String::new(),
    }
}

/// Normalise a user-supplied extension: `"RS"`, `"rs"` and `".rs"` all become `".rs"`.
/// An empty (or lone `"."`) value stays empty and means "no extension".
pub fn normalize_extension(raw: &str) -> String {
    let t = raw.trim().trim_start_matches('.');
    if t.is_empty() {
        String::new()
    } else {
        format!(".{}", t.to_lowercase())
    }
}

/// Display name for a directory: its own last component after canonicalisation,
/// so `.` shows up as the real directory name.
pub fn dir_display_name(p: &Path) -> String {
    // canonicalize when possible, but don't fail the whole call if it errors
    let canon: PathBuf = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
    canon
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| canon.display().to_string())
}

/// Plain directory names of a path, dropping root/prefix/`.` components.
pub fn normal_components(p: &Path) -> Vec<String> {
    p.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Keep alphanumerics, space, `-`, `_` and `.`; drop everything else, then trim
/// trailing whitespace.
pub fn sanitize_file_stem(s: &str) -> String {
    let kept: String = s
        .chars()
        .filter(|&ch| ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '_' | '.'))
        .collect();
    kept.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_lowercased_with_dot() {
        assert_eq!(dotted_extension(Path::new("a/B.TXT")), ".txt");
        assert_eq!(dotted_extension(Path::new("Makefile")), "");
        assert_eq!(dotted_extension(Path::new("weird.")), "");
        assert_eq!(dotted_extension(Path::new("x.tar.GZ")), ".gz");
    }

    #[test]
    fn normalize_accepts_any_spelling() {
        assert_eq!(normalize_extension("RS"), ".rs");
        assert_eq!(normalize_extension(".Rs"), ".rs");
        assert_eq!(normalize_extension(""), "");
        assert_eq!(normalize_extension("."), "");
    }

    #[test]
    fn sanitize_drops_separators() {
        assert_eq!(sanitize_file_stem("a/b:c-d_e.f  "), "abc-d_e.f");
    }

    #[test]
    fn normal_components_skip_root() {
        let parts = normal_components(Path::new("/home/user/proj"));
        assert_eq!(parts, vec!["home", "user", "proj"]);
    }

    #[test]
    fn compact_stamp_shape() {
        let ts = now_ts_compact();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
    }
}
