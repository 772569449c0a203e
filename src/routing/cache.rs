//! Process-wide route table memoization.
//!
//! # Design Decisions
//! - Single-flight: the first build runs under a mutex, concurrent first
//!   requests wait for it instead of scanning the directory again
//! - A failed build is not cached; the next request retries
//! - Caching can be switched off, restoring a rebuild per request

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::config::AppConfig;
use crate::routing::error::RoutingError;
use crate::routing::table::RouteTable;

/// Shared source of the route table.
#[derive(Debug)]
pub struct RouteTableCache {
    controller_dir: PathBuf,
    extension: String,
    enabled: bool,
    table: OnceLock<Arc<RouteTable>>,
    build_lock: Mutex<()>,
}

impl RouteTableCache {
    pub fn new(controller_dir: impl Into<PathBuf>, extension: impl Into<String>, enabled: bool) -> Self {
        Self {
            controller_dir: controller_dir.into(),
            extension: extension.into(),
            enabled,
            table: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.paths.controller_dir.clone(),
            config.paths.controller_extension.clone(),
            config.routing.cache_route_table,
        )
    }

    /// Return the route table, building it on first use.
    pub fn get(&self) -> Result<Arc<RouteTable>, RoutingError> {
        if !self.enabled {
            return self.build();
        }

        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        // A poisoned lock only means another builder panicked; the guard holds no data.
        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        let table = self.build()?;
        let _ = self.table.set(Arc::clone(&table));
        tracing::info!(
            dir = %self.controller_dir.display(),
            controllers = table.len(),
            "Route table cached"
        );
        Ok(table)
    }

    /// True once a table has been memoized.
    pub fn is_warm(&self) -> bool {
        self.table.get().is_some()
    }

    fn build(&self) -> Result<Arc<RouteTable>, RoutingError> {
        RouteTable::build(&self.controller_dir, &self.extension).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;

    fn controllers() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("TestsController.php"),
            "<?php class TestsController { public function index() {} }",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_cached_table_is_shared() {
        let dir = controllers();
        let cache = RouteTableCache::new(dir.path(), "php", true);
        assert!(!cache.is_warm());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(cache.is_warm());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_ignores_later_changes() {
        let dir = controllers();
        let cache = RouteTableCache::new(dir.path(), "php", true);
        cache.get().unwrap();

        fs::write(dir.path().join("UsersController.php"), "<?php class UsersController {}").unwrap();
        assert_eq!(cache.get().unwrap().len(), 1);
    }

    #[test]
    fn test_disabled_cache_rebuilds() {
        let dir = controllers();
        let cache = RouteTableCache::new(dir.path(), "php", false);
        let first = cache.get().unwrap();

        fs::write(dir.path().join("UsersController.php"), "<?php class UsersController {}").unwrap();
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
        assert!(!cache.is_warm());
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("controllers");
        let cache = RouteTableCache::new(&missing, "php", true);
        assert!(cache.get().is_err());

        fs::create_dir(&missing).unwrap();
        fs::write(missing.join("TestsController.php"), "<?php class TestsController {}").unwrap();
        assert_eq!(cache.get().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_first_requests_share_one_table() {
        let dir = controllers();
        let cache = Arc::new(RouteTableCache::new(dir.path(), "php", true));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get().unwrap())
            })
            .collect();

        let tables: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tables.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }
}
