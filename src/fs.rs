//! Filesystem helpers that create cache directories through ambient
//! capability handles.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use color_eyre::eyre::{Context, Result};
use std::io::ErrorKind;

/// Resolves a path to an ambient directory handle paired with the relative path component.
///
/// Absolute paths are opened relative to the ambient root; relative paths reuse the current
/// working directory.
pub(crate) fn ambient_dir_and_path(path: &Utf8Path) -> Result<(Dir, Utf8PathBuf)> {
    if path.has_root() {
        let stripped = path
            .strip_prefix("/")
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());
        let dir = Dir::open_ambient_dir("/", ambient_authority())
            .context("open ambient root directory")?;
        Ok((dir, stripped))
    } else {
        let dir = Dir::open_ambient_dir(".", ambient_authority())
            .context("open ambient working directory")?;
        Ok((dir, path.to_path_buf()))
    }
}

/// Ensures the provided path exists, creating intermediate directories when required.
pub(crate) fn ensure_dir_exists(path: &Utf8Path) -> Result<()> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }

    dir.create_dir_all(relative.as_std_path())
        .or_else(|err| {
            if err.kind() == ErrorKind::AlreadyExists {
                Ok(())
            } else {
                Err(err)
            }
        })
        .with_context(|| format!("create {}", path.as_str()))
}

/// Reports whether `path` lies inside `root`.
///
/// Relative paths are taken from the current directory. The deepest existing
/// ancestor of each path is canonicalised, so symlinks into `root` count even
/// before the cache directory itself exists.
pub(crate) fn is_within(path: &Utf8Path, root: &Utf8Path) -> bool {
    resolve(path).starts_with(resolve(root))
}

fn resolve(path: &Utf8Path) -> Utf8PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .ok()
            .and_then(|cwd| Utf8PathBuf::from_path_buf(cwd).ok())
            .map_or_else(|| path.to_path_buf(), |cwd| cwd.join(path))
    };
    absolute
        .ancestors()
        .find_map(|ancestor| {
            let real = ancestor.canonicalize_utf8().ok()?;
            let rest = absolute.strip_prefix(ancestor).ok()?;
            Some(real.join(rest))
        })
        .unwrap_or_else(|| absolute.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path)
            .unwrap_or_else(|p| panic!("temp path should be UTF-8: {}", p.display()))
    }

    #[test]
    fn ensure_dir_exists_creates_nested_directories() {
        let temp = tempdir().expect("create temp dir");
        let nested = utf8(temp.path().join("a/b/c"));

        ensure_dir_exists(&nested).expect("create nested directories");

        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dir_exists_tolerates_existing_directory() {
        let temp = tempdir().expect("create temp dir");
        let root = utf8(temp.path().to_path_buf());

        ensure_dir_exists(&root).expect("first call succeeds");
        ensure_dir_exists(&root).expect("second call succeeds");
    }

    #[test]
    fn ensure_dir_exists_fails_when_a_file_blocks_the_path() {
        let temp = tempdir().expect("create temp dir");
        let file = utf8(temp.path().join("occupied"));
        std::fs::write(&file, b"x").expect("write blocking file");

        let err = ensure_dir_exists(&file.join("child")).expect_err("file blocks creation");
        assert!(format!("{err:#}").contains("occupied"));
    }

    #[test]
    fn is_within_compares_path_components() {
        let root = Utf8Path::new("/opt/tool");
        assert!(is_within(Utf8Path::new("/opt/tool/cache"), root));
        assert!(is_within(root, root));
        assert!(!is_within(Utf8Path::new("/opt/toolbox"), root));
    }

    #[test]
    fn is_within_resolves_relative_paths_from_the_current_directory() {
        let cwd = utf8(std::env::current_dir().expect("current dir"));
        assert!(is_within(Utf8Path::new("not-yet-created/cache"), &cwd));
        assert!(!is_within(
            Utf8Path::new("not-yet-created"),
            Utf8Path::new("/nonexistent-root")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn is_within_follows_symlinks_into_the_root() {
        let temp = tempdir().expect("create temp dir");
        let real = utf8(temp.path().join("install"));
        std::fs::create_dir(&real).expect("create install dir");
        let link = utf8(temp.path().join("alias"));
        std::os::unix::fs::symlink(&real, &link).expect("create symlink");

        assert!(is_within(&link.join("cache"), &real));
        assert!(is_within(&real.join("cache"), &link));
        assert!(!is_within(&utf8(temp.path().join("elsewhere")), &real));
    }
}
