use anyhow::Context;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The scan target does not exist. Carried inside [`anyhow::Error`] so callers
/// can tell it apart from other I/O failures with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNotFound(pub PathBuf);

impl fmt::Display for PathNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path does not exist: {}", self.0.display())
    }
}

impl std::error::Error for PathNotFound {}

/// Breadth-first walk used for configuration inputs such as rule
/// directories. Symlinks and unreadable entries are skipped.
pub fn visit<F, C>(path: &Path, excludes: &F, callback: &mut C) -> anyhow::Result<()>
where
    F: Fn(&Path) -> bool,
    C: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut pending: VecDeque<PathBuf> = VecDeque::from([path.to_path_buf()]);
    let mut visited: HashSet<PathBuf> = HashSet::new();

    while let Some(current) = pending.pop_front() {
        if !visited.insert(current.clone()) || excludes(&current) {
            continue;
        }
        let Some(metadata) = readable(fs::symlink_metadata(&current), &current)? else {
            continue;
        };
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            debug!(path = %current.display(), "Symlink skipped");
        } else if file_type.is_file() {
            callback(&current)?;
        } else if file_type.is_dir() {
            let Some(entries) = readable(fs::read_dir(&current), &current)? else {
                continue;
            };
            let mut children = Vec::new();
            for entry in entries {
                if let Some(entry) = readable(entry, &current)? {
                    children.push(entry.path());
                }
            }
            // Stable order so rule ids clash the same way on every platform.
            children.sort();
            pending.extend(children);
        }
    }

    Ok(())
}

/// Treats permission errors as "skip this entry".
fn readable<T>(res: io::Result<T>, path: &Path) -> anyhow::Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %path.display(), "Permission denied");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Files under a scan target, produced lazily in directory order.
///
/// Created by [`paths`]. Directories are walked depth-first, each in the
/// order the OS lists it. Linked files are listed, linked directories are
/// not walked. I/O failures are
/// yielded as `Err` items.
pub struct Paths {
    single: Option<PathBuf>,
    stack: Vec<(PathBuf, fs::ReadDir)>,
    extensions: Vec<String>,
    exclude: Vec<String>,
}

/// Lists the files under `start` whose path ends with `.<ext>` for one of
/// `extensions` (every file when empty) and contains none of the `exclude`
/// substrings.
///
/// Fails with [`PathNotFound`] when `start` does not exist.
pub fn paths(start: &Path, extensions: &[String], exclude: &[String]) -> anyhow::Result<Paths> {
    let metadata = match fs::metadata(start) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PathNotFound(start.to_path_buf()).into())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", start.display()))
        }
    };
    let mut walk = Paths {
        single: None,
        stack: Vec::new(),
        extensions: extensions.to_vec(),
        exclude: exclude.to_vec(),
    };
    if walk.is_excluded(start) {
        debug!(path = %start.display(), "Path excluded");
    } else if metadata.is_dir() {
        let entries = fs::read_dir(start)
            .with_context(|| format!("Failed to read directory {}", start.display()))?;
        walk.stack.push((start.to_path_buf(), entries));
    } else if walk.has_extension(start) {
        walk.single = Some(start.to_path_buf());
    }
    Ok(walk)
}

impl Paths {
    fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.exclude.iter().any(|x| text.contains(x.as_str()))
    }

    fn has_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let text = path.to_string_lossy();
        self.extensions
            .iter()
            .any(|ext| text.ends_with(&format!(".{ext}")))
    }
}

impl Iterator for Paths {
    type Item = anyhow::Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(file) = self.single.take() {
            return Some(Ok(file));
        }
        loop {
            let (dir, entries) = self.stack.last_mut()?;
            let entry = match entries.next() {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    let dir = dir.display().to_string();
                    self.stack.pop();
                    return Some(Err(e).with_context(|| format!("Failed to list {dir}")));
                }
            };
            let path = entry.path();
            if self.is_excluded(&path) {
                debug!(path = %path.display(), "Path excluded");
                continue;
            }
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    return Some(
                        Err(e).with_context(|| format!("Failed to stat {}", path.display())),
                    )
                }
            };
            if file_type.is_symlink() {
                // Linked files are scanned, linked directories are not walked
                match fs::metadata(&path) {
                    Ok(target) if target.is_file() && self.has_extension(&path) => {
                        debug!(path = %path.display(), "File discovered");
                        return Some(Ok(path));
                    }
                    Ok(_) => debug!(path = %path.display(), "Symlink skipped"),
                    Err(e) => debug!(path = %path.display(), error = %e, "Dangling symlink"),
                }
            } else if file_type.is_dir() {
                match fs::read_dir(&path) {
                    Ok(children) => self.stack.push((path, children)),
                    Err(e) => {
                        return Some(Err(e).with_context(|| {
                            format!("Failed to read directory {}", path.display())
                        }))
                    }
                }
            } else if file_type.is_file() && self.has_extension(&path) {
                debug!(path = %path.display(), "File discovered");
                return Some(Ok(path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{paths, visit, PathNotFound};
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        fs::create_dir_all(base.join("src/util")).unwrap();
        fs::create_dir_all(base.join("build/gen")).unwrap();
        fs::write(base.join("README.txt"), b"").unwrap();
        fs::write(base.join("src/App.java"), b"").unwrap();
        fs::write(base.join("src/util/Io.java"), b"").unwrap();
        fs::write(base.join("build/gen/Stub.java"), b"").unwrap();
        tmp
    }

    fn collect(base: &Path, extensions: &[&str], exclude: &[&str]) -> BTreeSet<PathBuf> {
        let extensions: Vec<String> = extensions.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        paths(base, &extensions, &exclude)
            .unwrap()
            .map(|p| p.unwrap().strip_prefix(base).unwrap().to_path_buf())
            .collect()
    }

    #[test]
    fn visits_nested_directories() {
        let tmp = tree();
        let base = tmp.path();
        let mut seen = BTreeSet::new();
        let mut cb = |p: &Path| {
            seen.insert(p.strip_prefix(base).unwrap().to_path_buf());
            Ok(())
        };
        visit(base, &|_| false, &mut cb).unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen.contains(Path::new("src/util/Io.java")));
    }

    #[test]
    fn filters_by_extension() {
        let tmp = tree();
        let found = collect(tmp.path(), &["java"], &[]);
        let expected: BTreeSet<PathBuf> = [
            PathBuf::from("src/App.java"),
            PathBuf::from("src/util/Io.java"),
            PathBuf::from("build/gen/Stub.java"),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
        assert_eq!(collect(tmp.path(), &[], &[]).len(), 4);
    }

    #[test]
    fn excluded_substrings_prune_whole_subtrees() {
        let tmp = tree();
        let found = collect(tmp.path(), &["java"], &["build"]);
        assert!(found.iter().all(|p| !p.starts_with("build")));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn single_file_respects_filters() {
        let tmp = tree();
        let file = tmp.path().join("src/App.java");
        let ext = vec!["java".to_string()];
        assert_eq!(paths(&file, &ext, &[]).unwrap().count(), 1);
        assert_eq!(paths(&file, &["cs".to_string()], &[]).unwrap().count(), 0);
        assert_eq!(paths(&file, &ext, &["App".to_string()]).unwrap().count(), 0);
    }

    #[test]
    fn extension_is_a_path_suffix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Main.java"), b"").unwrap();
        fs::write(tmp.path().join("Main.javascript"), b"").unwrap();
        let found = collect(tmp.path(), &["java"], &[]);
        assert_eq!(found, BTreeSet::from([PathBuf::from("Main.java")]));
    }

    #[test]
    fn missing_path_fails_up_front() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = paths(&missing, &[], &[]).err().unwrap();
        assert_eq!(
            err.downcast_ref::<PathNotFound>(),
            Some(&PathNotFound(missing))
        );
    }

    #[cfg(unix)]
    #[test]
    fn linked_files_are_listed() {
        use std::os::unix::fs as unix_fs;

        let elsewhere = TempDir::new().unwrap();
        fs::write(elsewhere.path().join("Real.java"), b"").unwrap();
        let tmp = TempDir::new().unwrap();
        unix_fs::symlink(
            elsewhere.path().join("Real.java"),
            tmp.path().join("Link.java"),
        )
        .unwrap();
        unix_fs::symlink(tmp.path().join("Gone.java"), tmp.path().join("Dangling.java")).unwrap();
        let found = collect(tmp.path(), &["java"], &[]);
        assert_eq!(found, BTreeSet::from([PathBuf::from("Link.java")]));
        assert!(collect(tmp.path(), &["cs"], &[]).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_not_followed() {
        use std::os::unix::fs as unix_fs;

        let tmp = tree();
        let base = tmp.path();
        unix_fs::symlink(base.join("src"), base.join("src/util/loop")).unwrap();
        let found = collect(base, &["java"], &["build"]);
        assert_eq!(found.len(), 2);
    }
}
