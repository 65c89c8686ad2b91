use std::path::{Component, Path, PathBuf};

/// Maps a logical sound name to a file below the asset directory.
///
/// A name is first tried as a file name as-is. Failing that, its extension (if any) is dropped
/// and every configured extension is tried in order, so `ding`, `ding.wav` and `ding.mp3` can all
/// resolve to `ding.ogg`.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ResourceResolver {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let confined = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if name.is_empty() || !confined {
            return None;
        }

        let exact = self.root.join(relative);
        if exact.is_file() {
            return Some(exact);
        }

        let stem = self.root.join(relative.with_extension(""));
        self.extensions
            .iter()
            .map(|ext| {
                let mut candidate = stem.clone().into_os_string();
                candidate.push(".");
                candidate.push(ext);
                PathBuf::from(candidate)
            })
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn resolver(root: &Path) -> ResourceResolver {
        ResourceResolver::new(root, vec!["wav".to_string(), "ogg".to_string()])
    }

    #[test]
    fn exact_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ding.wav"), b"").unwrap();
        assert_eq!(
            resolver(dir.path()).resolve("ding.wav"),
            Some(dir.path().join("ding.wav"))
        );
    }

    #[test]
    fn name_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ding.ogg"), b"").unwrap();
        assert_eq!(
            resolver(dir.path()).resolve("ding"),
            Some(dir.path().join("ding.ogg"))
        );
    }

    #[test]
    fn extension_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ding.ogg"), b"").unwrap();
        fs::write(dir.path().join("ding.wav"), b"").unwrap();
        assert_eq!(
            resolver(dir.path()).resolve("ding.mp3"),
            Some(dir.path().join("ding.wav"))
        );
    }

    #[test]
    fn nested_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("ui")).unwrap();
        fs::write(dir.path().join("ui").join("click.wav"), b"").unwrap();
        assert_eq!(
            resolver(dir.path()).resolve("ui/click"),
            Some(dir.path().join("ui").join("click.wav"))
        );
    }

    #[test]
    fn missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolver(dir.path()).resolve("ding"), None);
        assert_eq!(resolver(dir.path()).resolve(""), None);
    }

    #[test]
    fn escaping_names_never_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("sounds");
        fs::create_dir(&inner).unwrap();
        fs::write(dir.path().join("secret.wav"), b"").unwrap();
        let resolver = resolver(&inner);
        assert_eq!(resolver.resolve("../secret.wav"), None);
        let absolute = dir.path().join("secret.wav");
        assert_eq!(resolver.resolve(absolute.to_str().unwrap()), None);
    }
}
