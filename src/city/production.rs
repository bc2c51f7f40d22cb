//! Production queue - advances the head item each turn
//!
//! Only the head of the queue accrues production. When it reaches its cost
//! it is removed and reported; the next item becomes current. Production
//! beyond the cost is discarded.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::unit_type::UnitType;
use crate::city::building::BuildingType;

/// Something a city can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildItem {
    Unit(UnitType),
    Building(BuildingType),
}

impl BuildItem {
    pub fn cost(self) -> i32 {
        match self {
            BuildItem::Unit(unit_type) => unit_type.cost(),
            BuildItem::Building(building) => building.cost(),
        }
    }
}

impl fmt::Display for BuildItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildItem::Unit(unit_type) => write!(f, "{}", unit_type.name()),
            BuildItem::Building(building) => write!(f, "{}", building.name()),
        }
    }
}

/// A queued item with its accrued progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedItem {
    pub item: BuildItem,
    pub progress: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductionQueue {
    items: VecDeque<QueuedItem>,
}

impl ProductionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: BuildItem) {
        self.items.push_back(QueuedItem { item, progress: 0 });
    }

    /// Put an item back at the head, keeping its progress
    pub fn push_front(&mut self, queued: QueuedItem) {
        self.items.push_front(queued);
    }

    /// The item currently accruing production
    pub fn current(&self) -> Option<&QueuedItem> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedItem> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove a queued item by position
    pub fn remove(&mut self, index: usize) -> Option<QueuedItem> {
        self.items.remove(index)
    }

    /// Add this turn's production to the head item
    ///
    /// Returns the item if it completed.
    pub fn advance(&mut self, production: i32) -> Option<BuildItem> {
        let head = self.items.front_mut()?;
        head.progress += production.max(0);
        if head.progress < head.item.cost() {
            return None;
        }
        self.items.pop_front().map(|q| q.item)
    }
}
