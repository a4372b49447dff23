//! Application context shared by every tool

use crate::config::Config;
use crate::db::Database;
use crate::feed::{Change, ChangeFeed};
use crate::nutrition::RecipeScaling;

/// Handles built once in `main` and passed to every operation
#[derive(Clone)]
pub struct AppContext {
    pub database: Database,
    pub feed: ChangeFeed,
    pub config: Config,
}

impl AppContext {
    pub fn new(database: Database, config: Config) -> Self {
        Self {
            feed: ChangeFeed::new(config.feed_capacity),
            database,
            config,
        }
    }

    pub fn scaling(&self) -> RecipeScaling {
        self.config.recipe_scaling
    }

    pub fn publish(&self, change: Change) {
        self.feed.publish(change);
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> (tempfile::TempDir, AppContext) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nutrilog.db");
    let database = Database::open_migrated(&path).expect("database");
    let config = Config::from_lookup(|var| {
        (var == crate::config::DATABASE_PATH_VAR).then(|| path.display().to_string())
    })
    .expect("config");
    (dir, AppContext::new(database, config))
}
