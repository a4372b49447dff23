//! Change notifications
//!
//! Writers publish a `Change` after every successful store write. Readers
//! that keep a view of a day subscribe through a `DayWatch` and get a fresh
//! `DailySummary` whenever something affecting that day changed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::db::{Database, DbResult};
use crate::nutrition::RecipeScaling;
use crate::summary::{daily_summary, DailySummary};

/// Default number of changes buffered per subscriber
pub const DEFAULT_CAPACITY: usize = 64;

/// What part of the store changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Change {
    /// An ingredient was added, edited, relabeled or removed
    Ingredients,
    /// A recipe, its ingredient lines or its labels changed
    Recipe(i64),
    /// Diary entries on this date changed
    Diary(NaiveDate),
    Shopping,
}

impl Change {
    /// True if this change can alter the nutrition of `date`
    pub fn affects_day(&self, date: NaiveDate) -> bool {
        match self {
            Change::Ingredients | Change::Recipe(_) => true,
            Change::Diary(d) => *d == date,
            Change::Shopping => false,
        }
    }
}

/// Publish/subscribe channel for store changes
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<Change>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Announce a change; having no subscribers is fine
    pub fn publish(&self, change: Change) {
        match self.sender.send(change) {
            Ok(receivers) => debug!(?change, receivers, "published change"),
            Err(_) => debug!(?change, "published change with no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.sender.subscribe()
    }

    /// Watch the summary of one date
    pub fn watch_day(&self, database: Database, date: NaiveDate, scaling: RecipeScaling) -> DayWatch {
        DayWatch {
            date,
            database,
            scaling,
            receiver: self.subscribe(),
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Live view of one date's summary
pub struct DayWatch {
    date: NaiveDate,
    database: Database,
    scaling: RecipeScaling,
    receiver: broadcast::Receiver<Change>,
}

impl DayWatch {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Compute the summary as it is right now
    pub fn current(&self) -> DbResult<DailySummary> {
        let (date, scaling) = (self.date, self.scaling);
        self.database.with_conn(|conn| daily_summary(conn, date, scaling))
    }

    /// `current` run on the blocking pool, for use from async code
    pub async fn snapshot(&self) -> DbResult<DailySummary> {
        let (database, date, scaling) = (self.database.clone(), self.date, self.scaling);
        tokio::task::spawn_blocking(move || database.with_conn(|conn| daily_summary(conn, date, scaling))).await?
    }

    /// Wait for the next relevant change and return a fresh summary
    ///
    /// Returns `None` once the feed has been dropped. A subscriber that fell
    /// behind skips the missed changes and recomputes.
    pub async fn changed(&mut self) -> Option<DbResult<DailySummary>> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.affects_day(self.date) => return Some(self.snapshot().await),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(date = %self.date, skipped, "day watch lagged, resynchronizing");
                    return Some(self.snapshot().await);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
