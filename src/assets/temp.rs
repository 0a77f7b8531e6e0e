use std::path::{Path, PathBuf};

/// Deletes the wrapped file when dropped.
#[derive(Debug, Default)]
pub(crate) struct TempFileGuard(Option<PathBuf>);

impl TempFileGuard {
    /// Reserve a unique path in the system temp dir. Nothing is created yet.
    pub(crate) fn reserve(prefix: &str, ext: &str) -> Self {
        Self(Some(unique_temp_path(prefix, ext)))
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.0.as_deref()
    }

    /// Remove the file now. Safe to call more than once.
    pub(crate) fn release(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        self.release();
    }
}

fn unique_temp_path(prefix: &str, ext: &str) -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static SEQ: AtomicU64 = AtomicU64::new(0);

    std::env::temp_dir().join(format!(
        "promoreel_{prefix}_{}_{}_{}.{ext}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
        SEQ.fetch_add(1, Ordering::Relaxed),
    ))
}
