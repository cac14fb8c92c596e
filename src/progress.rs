//! Typed access to saved progress
use crate::daily::DailyKey;
use crate::store::Store;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const CLASSIC_HIGH_SCORE_KEY: &str = "classic_high_score";
const PLAYED_TUTORIAL_KEY: &str = "has_played_tutorial";

/// Saved state of one day's puzzle
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyRecord {
    /// Fruits eaten
    pub(crate) score: u32,
    /// Times the player has died (or been penalized)
    pub(crate) lives: u32,
    /// Play time in whole seconds
    pub(crate) elapsed_time: u64,
    pub(crate) kiwi_count: u32,
    pub(crate) completed: bool,
    pub(crate) target_fruits: u32,
    pub(crate) total_kiwis: u32,
}

/// Saved progress on top of an arbitrary [`Store`].
///
/// Nothing here fails: values that are missing or can't be parsed read as
/// absent, and failed writes are logged and dropped.
#[derive(Debug)]
pub(crate) struct Progress {
    store: Box<dyn Store>,
}

impl Progress {
    pub(crate) fn new<S: Store + 'static>(store: S) -> Progress {
        Progress {
            store: Box::new(store),
        }
    }

    pub(crate) fn daily(&self, key: DailyKey) -> Option<DailyRecord> {
        self.get(&key.storage_key())
    }

    pub(crate) fn save_daily(&mut self, key: DailyKey, record: &DailyRecord) {
        log::debug!("Saving progress for {key}: {record:?}");
        self.set(&key.storage_key(), record);
    }

    pub(crate) fn classic_high_score(&self) -> u32 {
        self.get(CLASSIC_HIGH_SCORE_KEY).unwrap_or_default()
    }

    /// Record a finished Classic run.  Returns `true` if it set a new high
    /// score.
    pub(crate) fn record_classic_score(&mut self, points: u32) -> bool {
        if points > self.classic_high_score() {
            log::info!("New Classic high score: {points}");
            self.set(CLASSIC_HIGH_SCORE_KEY, &points);
            true
        } else {
            false
        }
    }

    pub(crate) fn has_played_tutorial(&self) -> bool {
        self.get(PLAYED_TUTORIAL_KEY).unwrap_or_default()
    }

    pub(crate) fn set_played_tutorial(&mut self) {
        self.set(PLAYED_TUTORIAL_KEY, &true);
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let src = self.store.get(key)?;
        match serde_json::from_str(&src) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unparseable saved value for {key:?}: {e}");
                None
            }
        }
    }

    fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let src = match serde_json::to_string(value) {
            Ok(src) => src,
            Err(e) => {
                log::warn!("Failed to serialize value for {key:?}: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(key, src) {
            log::warn!("{:#}", anyhow::Error::from(e));
        }
    }
}
