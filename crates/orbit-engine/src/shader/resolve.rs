use std::path::{Path, PathBuf};

/// Parent prefixes tried in order, from the working directory up to five levels.
pub const SEARCH_PREFIXES: [&str; 6] = [
    "",
    "../",
    "../../",
    "../../../",
    "../../../../",
    "../../../../../",
];

/// Resolves `relative` against the working directory and its parents.
///
/// Returns the first candidate that is an existing regular file.
pub fn resolve_shader_path(relative: impl AsRef<Path>) -> Option<PathBuf> {
    resolve_shader_path_in(Path::new(""), relative)
}

/// Like [`resolve_shader_path`] but rooted at `base` instead of the working directory.
pub fn resolve_shader_path_in(base: &Path, relative: impl AsRef<Path>) -> Option<PathBuf> {
    let relative = relative.as_ref();
    SEARCH_PREFIXES
        .iter()
        .map(|prefix| base.join(prefix).join(relative))
        .find(|candidate| candidate.is_file())
        .inspect(|found| log::debug!("resolved shader {} -> {}", relative.display(), found.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Builds `root/a/b/c/d/e` and returns `(root, deepest)`.
    fn nested() -> (TempDir, PathBuf) {
        let root = TempDir::new().unwrap();
        let deepest = root.path().join("a/b/c/d/e");
        fs::create_dir_all(&deepest).unwrap();
        (root, deepest)
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn finds_file_in_base() {
        let (_root, deepest) = nested();
        touch(&deepest.join("shaders/vs.bin"));
        let found = resolve_shader_path_in(&deepest, "shaders/vs.bin").unwrap();
        assert_eq!(found, deepest.join("shaders/vs.bin"));
    }

    #[test]
    fn walks_up_to_five_levels() {
        let (root, deepest) = nested();
        touch(&root.path().join("shaders/vs.bin"));
        let found = resolve_shader_path_in(&deepest, "shaders/vs.bin").unwrap();
        assert_eq!(found, deepest.join("../../../../../shaders/vs.bin"));
        assert!(found.is_file());
    }

    #[test]
    fn shortest_prefix_wins() {
        let (root, deepest) = nested();
        touch(&root.path().join("shaders/vs.bin"));
        touch(&root.path().join("a/b/c/shaders/vs.bin"));
        let found = resolve_shader_path_in(&deepest, "shaders/vs.bin").unwrap();
        assert_eq!(found, deepest.join("../../shaders/vs.bin"));
    }

    #[test]
    fn none_beyond_the_sixth_candidate() {
        let root = TempDir::new().unwrap();
        let deepest = root.path().join("a/b/c/d/e/f");
        fs::create_dir_all(&deepest).unwrap();
        // Six levels up from `deepest`: out of reach.
        touch(&root.path().join("shaders/vs.bin"));
        assert!(resolve_shader_path_in(&deepest, "shaders/vs.bin").is_none());
    }

    #[test]
    fn none_when_missing() {
        let (_root, deepest) = nested();
        assert!(resolve_shader_path_in(&deepest, "shaders/missing.bin").is_none());
    }

    #[test]
    fn directories_are_not_matches() {
        let (_root, deepest) = nested();
        fs::create_dir_all(deepest.join("shaders/vs.bin")).unwrap();
        assert!(resolve_shader_path_in(&deepest, "shaders/vs.bin").is_none());
    }
}
