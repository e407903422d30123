use std::path::PathBuf;

/// Deletes the wrapped path on drop. Used for scratch files handed to ffmpeg.
pub(crate) struct TempFileGuard(pub(crate) Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Unique scratch path in the system temp directory.
pub(crate) fn scratch_path(prefix: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}.{ext}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_removes_file_on_drop() {
        let path = scratch_path("slatecast_guard_test", "bin");
        std::fs::write(&path, b"scratch").unwrap();
        assert!(path.exists());
        drop(TempFileGuard(Some(path.clone())));
        assert!(!path.exists());
    }

    #[test]
    fn guard_tolerates_missing_file() {
        let path = scratch_path("slatecast_guard_missing", "bin");
        drop(TempFileGuard(Some(path)));
    }
}
