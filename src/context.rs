use std::path::PathBuf;

/// Resolution of logical site paths to absolute filesystem paths.
///
/// The build pipeline hands steps logical names like `"images"` or
/// `"photo.jpg"`; only the context knows where those live on disk.
/// `None` means the target does not exist in the build output.
pub trait BuildContext {
    fn resolve_file(&self, path: &str) -> Option<PathBuf>;
    fn resolve_folder(&self, path: &str) -> Option<PathBuf>;
}

/// Context rooted at a site resources directory.
pub struct DirectoryContext {
    root: PathBuf,
}

impl DirectoryContext {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        DirectoryContext { root: root.into() }
    }
}

impl BuildContext for DirectoryContext {
    fn resolve_file(&self, path: &str) -> Option<PathBuf> {
        let candidate = self.root.join(path);
        if candidate.is_file() {
            Some(candidate)
        } else {
            None
        }
    }

    fn resolve_folder(&self, path: &str) -> Option<PathBuf> {
        let candidate = self.root.join(path);
        if candidate.is_dir() {
            Some(candidate)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    #[test]
    fn resolves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("photo.jpg")).unwrap();

        let context = DirectoryContext::new(dir.path());
        let resolved = context.resolve_file("photo.jpg").unwrap();
        assert_eq!(resolved, dir.path().join("photo.jpg"));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let context = DirectoryContext::new(dir.path());
        assert!(context.resolve_file("photo.jpg").is_none());
    }

    #[test]
    fn folder_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();

        let context = DirectoryContext::new(dir.path());
        assert!(context.resolve_file("images").is_none());
        assert_eq!(
            context.resolve_folder("images").unwrap(),
            dir.path().join("images")
        );
    }

    #[test]
    fn resolves_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets/images")).unwrap();
        File::create(dir.path().join("assets/images/cover.png")).unwrap();

        let context = DirectoryContext::new(dir.path());
        assert!(context.resolve_folder("assets/images").is_some());
        assert!(context.resolve_file("assets/images/cover.png").is_some());
    }
}
