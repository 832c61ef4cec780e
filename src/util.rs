use std::fs;
use std::path::{Component, Path, PathBuf};

/// Expands a leading `~` in a configured path to the user's home directory.
/// Relative paths are resolved against `root`.
pub fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let expanded = if path.starts_with("~/") || path == "~" {
        match dirs::home_dir() {
            Some(home) if path.len() > 2 => home.join(&path[2..]),
            Some(home) => home,
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    };

    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

/// Resolves `.` and `..` components, then follows symlinks through the
/// deepest ancestor that exists. Used to compare paths that may not exist
/// yet.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut lexical = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match lexical.components().next_back() {
                Some(Component::Normal(_)) => {
                    lexical.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => lexical.push(".."),
            },
            other => lexical.push(other.as_os_str()),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return lexical,
        }
    }

    match existing.canonicalize() {
        Ok(mut resolved) => {
            resolved.extend(missing.iter().rev());
            resolved
        }
        Err(_) => lexical,
    }
}

/// Turns a site path into the `./`-prefixed relative form used by the
/// service worker. Backslashes become forward slashes; leading `./` and `/`
/// are dropped before the prefix is added.
pub fn to_relative_url(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let mut rest = unified.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    if rest.is_empty() || rest == "." {
        "./".to_string()
    } else {
        format!("./{rest}")
    }
}

/// Writes `contents` to `target`, creating parent directories first.
pub fn write_file(target: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, contents)
}

/// Copies `source` to `target`, creating parent directories first.
pub fn copy_file(source: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target).map(|_| ())
}

/// Escapes text for use inside XML/HTML element content or attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Recursively lists every file under `dir`, relative to `dir`, sorted.
pub fn collect_files(dir: &Path) -> Vec<PathBuf> {
    fn walk(base: &Path, dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(base, &path, files);
                } else if let Ok(rel) = path.strip_prefix(base) {
                    files.push(rel.to_path_buf());
                }
            }
        }
    }

    let mut files = Vec::new();
    walk(dir, dir, &mut files);
    files.sort();
    files
}
