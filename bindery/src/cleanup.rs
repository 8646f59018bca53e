//! Per-request registry of deferred release actions.

use std::fmt;
use std::io;
use std::path::PathBuf;

type CleanupAction = Box<dyn FnOnce() -> io::Result<()> + Send>;

/// Collects release actions for one request and runs them exactly once.
///
/// Actions run in registration order when [`CleanupRegistry::cleanup`] is
/// called or when the registry is dropped, whichever comes first. This makes
/// every exit path of a handler release its temporary files, including early
/// returns through `?`. Failures are logged and do not stop the remaining
/// actions.
///
/// ## Examples
///
/// ```
/// use bindery::CleanupRegistry;
///
/// let file = tempfile::NamedTempFile::new().unwrap();
/// let (_, path) = file.keep().unwrap();
///
/// {
///     let mut cleanup = CleanupRegistry::new();
///     cleanup.remove_file(&path);
/// }
///
/// assert!(!path.exists());
/// ```
#[derive(Default)]
pub struct CleanupRegistry {
    actions: Vec<CleanupAction>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an arbitrary release action.
    pub fn add<F>(&mut self, action: F)
    where
        F: FnOnce() -> io::Result<()> + Send + 'static,
    {
        self.actions.push(Box::new(action));
    }

    /// Registers deletion of a file. A file that is already gone counts as released.
    pub fn remove_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add(move || match std::fs::remove_file(&path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        });
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs all pending actions and returns how many failed.
    ///
    /// Calling it again only runs actions registered since the last call.
    pub fn cleanup(&mut self) -> usize {
        let mut failures = 0;
        for action in self.actions.drain(..) {
            if let Err(e) = action() {
                failures += 1;
                tracing::warn!(error = %e, "cleanup action failed");
            }
        }
        failures
    }
}

impl Drop for CleanupRegistry {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("pending", &self.actions.len())
            .finish()
    }
}
