//! Halt lists and the registry that owns one list per (line, route).
//!
//! A [`HaltList`] keeps its stations in travel order (ascending on UP,
//! descending on DOWN), holds no duplicates and never grows past
//! [`MAX_HALTS`]. Those invariants are enforced here, not by callers.

use core::ops::Index;

use heapless::Vec;

use crate::catalog::{Line, RouteKey, StationRef};
use crate::config::{HALT_BLOCK_SIZE, MAX_HALTS};
use crate::error::Error;
use crate::storage::{self, ByteStore};

/// Result of toggling one station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Toggle {
    /// Inserted at this position.
    Added(usize),
    /// Removed from this position.
    Removed(usize),
    /// List already holds `MAX_HALTS` stations; nothing changed.
    Full,
}

/// Ordered, capacity-bounded list of halts for one (line, route).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HaltList {
    stops: Vec<StationRef, MAX_HALTS>,
}

impl HaltList {
    pub const fn new() -> Self {
        Self { stops: Vec::new() }
    }

    /// Build a list from stations in any order; duplicates and anything
    /// past capacity are dropped.
    pub fn from_stations(line: Line, stations: &[StationRef]) -> Self {
        let mut list = Self::new();
        for &station in stations {
            if !list.contains(station) {
                let pos = list.insertion_point(line, station);
                let _ = list.insert_at(pos, station);
            }
        }
        list
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.stops.is_full()
    }

    pub fn as_slice(&self) -> &[StationRef] {
        &self.stops
    }

    pub fn get(&self, position: usize) -> Option<StationRef> {
        self.stops.get(position).copied()
    }

    pub fn contains(&self, station: StationRef) -> bool {
        self.stops.contains(&station)
    }

    pub fn position(&self, station: StationRef) -> Option<usize> {
        self.stops.iter().position(|&s| s == station)
    }

    /// Insert at `position`, shifting later entries right.
    ///
    /// Hands the station back if the list is full or `position` is past
    /// the end.
    pub fn insert_at(&mut self, position: usize, station: StationRef) -> Result<(), StationRef> {
        if position > self.stops.len() {
            return Err(station);
        }
        self.stops.insert(position, station)
    }

    /// Remove at `position`, compacting the remaining entries.
    pub fn remove_at(&mut self, position: usize) -> Option<StationRef> {
        if position < self.stops.len() {
            Some(self.stops.remove(position))
        } else {
            None
        }
    }

    /// Position right after the last entry passed before `station`.
    pub fn insertion_point(&self, line: Line, station: StationRef) -> usize {
        self.stops
            .iter()
            .rposition(|&s| line.precedes(s, station))
            .map_or(0, |i| i + 1)
    }

    /// Add `station` if absent (keeping travel order) or remove it if present.
    pub fn toggle(&mut self, line: Line, station: StationRef) -> Toggle {
        if let Some(pos) = self.position(station) {
            self.remove_at(pos);
            return Toggle::Removed(pos);
        }
        let pos = self.insertion_point(line, station);
        match self.insert_at(pos, station) {
            Ok(()) => Toggle::Added(pos),
            Err(_) => Toggle::Full,
        }
    }

    /// True when entries are strictly in `line`'s travel order.
    pub fn is_in_travel_order(&self, line: Line) -> bool {
        self.stops.windows(2).all(|w| line.precedes(w[0], w[1]))
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// Append without ordering checks. Used when decoding stored blocks.
    pub(crate) fn push_raw(&mut self, station: StationRef) -> bool {
        self.stops.push(station).is_ok()
    }
}

const EMPTY: HaltList = HaltList::new();

/// The six halt lists, keyed by [`RouteKey`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaltRegistry {
    lists: [HaltList; RouteKey::COUNT],
}

impl Default for HaltRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HaltRegistry {
    pub const fn new() -> Self {
        Self {
            lists: [EMPTY; RouteKey::COUNT],
        }
    }

    pub fn get(&self, key: RouteKey) -> &HaltList {
        &self.lists[key.slot()]
    }

    pub fn get_mut(&mut self, key: RouteKey) -> &mut HaltList {
        &mut self.lists[key.slot()]
    }

    /// Toggle the named station in `key`'s list.
    ///
    /// Returns the catalog's name for the station so callers can report it.
    pub fn toggle(&mut self, key: RouteKey, station: &str) -> Result<(Toggle, &'static str), Error> {
        let index = key.route.index_of(station)?;
        let name = key.route.station(index).ok_or(Error::UnknownStation)?;
        let outcome = self.get_mut(key).toggle(key.line, index);
        match outcome {
            Toggle::Added(pos) => debug!("halt added: {} at {}", name, pos),
            Toggle::Removed(pos) => debug!("halt removed: {} from {}", name, pos),
            Toggle::Full => warn!("halt list full, {} not added", name),
        }
        Ok((outcome, name))
    }

    /// Empty all six lists (memory only; stored copies are untouched).
    pub fn clear_all(&mut self) {
        for list in self.lists.iter_mut() {
            list.clear();
        }
    }

    /// Write `key`'s list to its block and commit the store.
    pub fn persist(&self, key: RouteKey, store: &mut impl ByteStore) -> Result<(), Error> {
        let list = self.get(key);
        let block = storage::encode_block(list);
        store.write(key.storage_offset(), &block)?;
        store.commit()?;
        info!("persisted {} halts for {}", list.len(), key);
        Ok(())
    }

    /// Replace `key`'s list with the stored copy.
    ///
    /// Unreadable or corrupt storage yields an empty or clamped list instead
    /// of an error.
    pub fn load(&mut self, key: RouteKey, store: &impl ByteStore) {
        let mut block = [0u8; HALT_BLOCK_SIZE];
        let list = match store.read(key.storage_offset(), &mut block) {
            Ok(()) => storage::decode_block(&block, key.station_count()),
            Err(e) => {
                warn!("halt block read failed: {}", e);
                HaltList::new()
            }
        };
        info!("loaded {} halts for {}", list.len(), key);
        *self.get_mut(key) = list;
    }
}

impl Index<RouteKey> for HaltRegistry {
    type Output = HaltList;

    fn index(&self, key: RouteKey) -> &HaltList {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Route;
    use crate::storage::MemStore;

    const UP_KALYAN: RouteKey = RouteKey::new(Line::Up, Route::Kalyan);
    const DOWN_KHOPOLI: RouteKey = RouteKey::new(Line::Down, Route::Khopoli);

    #[test]
    fn toggle_twice_restores_the_list() {
        let mut list = HaltList::from_stations(Line::Up, &[1, 10, 15]);
        let before = list.clone();
        for station in 0..16 {
            list.toggle(Line::Up, station);
            list.toggle(Line::Up, station);
            assert_eq!(list, before);
        }
    }

    #[test]
    fn up_list_stays_ascending() {
        let mut list = HaltList::new();
        for station in [10, 1, 15, 5, 0, 12] {
            assert!(matches!(list.toggle(Line::Up, station), Toggle::Added(_)));
        }
        assert_eq!(list.as_slice(), &[0, 1, 5, 10, 12, 15]);
        assert!(list.is_in_travel_order(Line::Up));
    }

    #[test]
    fn down_list_stays_descending() {
        let mut list = HaltList::new();
        for station in [3, 20, 7, 29, 0] {
            list.toggle(Line::Down, station);
        }
        assert_eq!(list.as_slice(), &[29, 20, 7, 3, 0]);
        assert!(list.is_in_travel_order(Line::Down));
    }

    #[test]
    fn removal_keeps_relative_order() {
        let mut list = HaltList::from_stations(Line::Up, &[2, 4, 6, 8]);
        assert_eq!(list.toggle(Line::Up, 4), Toggle::Removed(1));
        assert_eq!(list.as_slice(), &[2, 6, 8]);
    }

    #[test]
    fn thirty_first_add_is_rejected() {
        let mut list = HaltList::new();
        for station in 0..30 {
            list.toggle(Line::Up, station);
        }
        assert!(list.is_full());
        let before = list.clone();
        assert_eq!(list.toggle(Line::Up, 30), Toggle::Full);
        assert_eq!(list, before);
        assert_eq!(list.len(), MAX_HALTS);
    }

    #[test]
    fn insert_and_remove_at_bounds() {
        let mut list = HaltList::new();
        assert_eq!(list.insert_at(1, 5), Err(5));
        assert_eq!(list.insert_at(0, 5), Ok(()));
        assert_eq!(list.remove_at(3), None);
        assert_eq!(list.remove_at(0), Some(5));
        assert!(list.is_empty());
    }

    #[test]
    fn registry_toggles_by_station_name() {
        let mut registry = HaltRegistry::new();
        assert_eq!(
            registry.toggle(UP_KALYAN, "Thane"),
            Ok((Toggle::Added(0), "Thane"))
        );
        assert_eq!(registry[UP_KALYAN].as_slice(), &[10]);
        assert!(registry[DOWN_KHOPOLI].is_empty());
    }

    #[test]
    fn unknown_station_changes_nothing() {
        let mut registry = HaltRegistry::new();
        assert_eq!(
            registry.toggle(UP_KALYAN, "Kasara"),
            Err(Error::UnknownStation)
        );
        assert!(registry[UP_KALYAN].is_empty());
    }

    #[test]
    fn persist_then_load_round_trips() {
        let mut store = MemStore::new();
        let mut registry = HaltRegistry::new();
        for name in ["Lowjee", "Thane", "Karjat"] {
            registry.toggle(DOWN_KHOPOLI, name).unwrap();
        }
        registry.persist(DOWN_KHOPOLI, &mut store).unwrap();

        let mut reloaded = HaltRegistry::new();
        reloaded.load(DOWN_KHOPOLI, &store);
        assert_eq!(reloaded[DOWN_KHOPOLI], registry[DOWN_KHOPOLI]);
        assert_eq!(reloaded[DOWN_KHOPOLI].as_slice(), &[28, 24, 10]);
    }

    #[test]
    fn empty_list_round_trips() {
        let mut store = MemStore::new();
        let registry = HaltRegistry::new();
        registry.persist(UP_KALYAN, &mut store).unwrap();

        let mut reloaded = HaltRegistry::new();
        reloaded.get_mut(UP_KALYAN).toggle(Line::Up, 3);
        reloaded.load(UP_KALYAN, &store);
        assert!(reloaded[UP_KALYAN].is_empty());
    }

    #[test]
    fn clear_all_empties_every_list() {
        let mut registry = HaltRegistry::new();
        for key in RouteKey::ALL {
            registry.toggle(key, "Dadar").unwrap();
        }
        registry.clear_all();
        assert!(RouteKey::ALL.iter().all(|&k| registry[k].is_empty()));
    }
}
