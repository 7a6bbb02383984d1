//! Common test utilities and harness for console integration tests.

use assetry_client::{Gateway, MemoryStore, RemoteStore};
use assetry_console::Console;
use assetry_storage::{CacheBackend, FileCache};
use std::sync::Arc;
use tempfile::TempDir;

/// Test harness: a console over a memory remote and a temp-dir cache.
pub struct TestHarness {
    /// The simulated remote store
    pub remote: Arc<MemoryStore>,
    /// Cache directory, removed on drop
    pub dir: TempDir,
    /// Console under test
    pub console: Console,
}

impl TestHarness {
    /// Creates a harness with empty remote tables and an empty cache.
    pub fn new() -> Self {
        let remote = Arc::new(MemoryStore::new());
        let dir = TempDir::new().expect("temp dir");
        let console = Self::open(&remote, &dir);
        Self {
            remote,
            dir,
            console,
        }
    }

    /// Opens a second console over the same remote and cache, as after a
    /// restart.
    pub fn reopen(&self) -> Console {
        Self::open(&self.remote, &self.dir)
    }

    /// Remote calls made so far.
    pub fn calls(&self) -> usize {
        self.remote.calls()
    }

    fn open(remote: &Arc<MemoryStore>, dir: &TempDir) -> Console {
        let store: Arc<dyn RemoteStore> = remote.clone();
        let cache: Arc<dyn CacheBackend> = Arc::new(FileCache::new(dir.path()));
        Console::new(Gateway::new(store), cache)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
