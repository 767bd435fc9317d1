//! Once-per-day selection from a fixed list

use bookfinder_storage::PersistentStore;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Calendar day string stored next to a selection
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Index picked on `date` from a list of `len` candidates
///
/// The day of year counts January 1 as 1. `len` must be non-zero.
pub fn rotation_index(date: NaiveDate, len: usize) -> usize {
    date.ordinal() as usize % len
}

/// An item together with the day it was selected for
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub date_stamp: String,
    pub item: T,
}

/// Picks one candidate per calendar day and remembers the pick
///
/// The pick is persisted as a pair of keys: the date stamp and the item.
/// Within one day the stored item is returned as is, even if the candidate
/// list changed in between.
pub struct DailyRotationSelector<T> {
    store: PersistentStore,
    date_key: &'static str,
    item_key: &'static str,
    _item: PhantomData<fn() -> T>,
}

impl<T> DailyRotationSelector<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: PersistentStore, date_key: &'static str, item_key: &'static str) -> Self {
        Self {
            store,
            date_key,
            item_key,
            _item: PhantomData,
        }
    }

    /// Selection for `date`
    ///
    /// Returns `None` and persists nothing when `candidates` is empty.
    pub fn select_for(&self, date: NaiveDate, candidates: &[T]) -> Option<Selection<T>> {
        if candidates.is_empty() {
            return None;
        }

        let today = date_stamp(date);
        if let Some(item) = self.cached(&today) {
            return Some(Selection {
                date_stamp: today,
                item,
            });
        }

        let index = rotation_index(date, candidates.len());
        let item = candidates[index].clone();
        debug!("Selected candidate {} for {}", index, today);

        // Item before stamp: a stamp never points at an older item
        let written = self
            .store
            .set(self.item_key, &item)
            .and_then(|()| self.store.set(self.date_key, &today));
        if let Err(e) = written {
            warn!("Daily selection for {} not saved: {}", today, e);
        }

        Some(Selection {
            date_stamp: today,
            item,
        })
    }

    fn cached(&self, today: &str) -> Option<T> {
        let stamp: String = self.store.load_or_default(self.date_key);
        if stamp != today {
            return None;
        }
        self.store.load_or_default::<Option<T>>(self.item_key)
    }
}
