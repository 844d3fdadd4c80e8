//! The settlement's shared resource store.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::constants::{BASE_STORAGE_CAPACITY, STARTING_FOOD, STARTING_STONE, STARTING_WOOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Wood,
    Stone,
    Food,
    Gold,
}

impl ResourceKind {
    pub const fn name(&self) -> &'static str {
        match self {
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Food => "food",
            ResourceKind::Gold => "gold",
        }
    }
}

/// One line of a price tag: `amount` units of `kind`. Cost lists hold
/// at most one entry per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    pub kind: ResourceKind,
    pub amount: u32,
}

impl Cost {
    pub const fn new(kind: ResourceKind, amount: u32) -> Self {
        Self { kind, amount }
    }
}

/// The settlement-wide resource store. Every producer and consumer in
/// the world goes through this one resource.
#[derive(Resource, Debug, Clone)]
pub struct Storage {
    stored: HashMap<ResourceKind, u32>,
    capacity: u32,
}

impl Default for Storage {
    /// A fresh settlement's starting reserves.
    fn default() -> Self {
        let mut storage = Self::empty(BASE_STORAGE_CAPACITY);
        storage.add(ResourceKind::Wood, STARTING_WOOD);
        storage.add(ResourceKind::Stone, STARTING_STONE);
        storage.add(ResourceKind::Food, STARTING_FOOD);
        storage
    }
}

impl Storage {
    pub fn empty(capacity: u32) -> Self {
        Self {
            stored: HashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        *self.stored.get(&kind).unwrap_or(&0)
    }

    /// Deposits up to `amount` units, clamped to the per-resource
    /// capacity. Returns how many units actually fit.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let current = self.get(kind);
        let added = amount.min(self.capacity.saturating_sub(current));
        if added > 0 {
            self.stored.insert(kind, current + added);
        }
        added
    }

    /// True when every cost entry is covered.
    pub fn has(&self, costs: &[Cost]) -> bool {
        costs.iter().all(|cost| self.get(cost.kind) >= cost.amount)
    }

    /// Pays `costs` in full or not at all. Returns false, changing
    /// nothing, when any entry is short.
    pub fn consume(&mut self, costs: &[Cost]) -> bool {
        if !self.has(costs) {
            return false;
        }
        for cost in costs {
            let current = self.get(cost.kind);
            self.stored.insert(cost.kind, current - cost.amount);
        }
        true
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Raises the per-resource cap (storage buildings do this).
    pub fn add_capacity(&mut self, amount: u32) {
        self.capacity += amount;
    }

    /// Lowers the cap. Stock above the new cap is kept; it just blocks
    /// further deposits until spent down.
    pub fn remove_capacity(&mut self, amount: u32) {
        self.capacity = self.capacity.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposits_clamp_at_capacity() {
        let mut s = Storage::empty(100);
        assert_eq!(s.add(ResourceKind::Wood, 80), 80);
        assert_eq!(s.add(ResourceKind::Wood, 50), 20);
        assert_eq!(s.get(ResourceKind::Wood), 100);
        // Each resource has its own headroom.
        assert_eq!(s.add(ResourceKind::Stone, 50), 50);
    }

    #[test]
    fn spending_is_all_or_nothing() {
        let mut s = Storage::empty(100);
        s.add(ResourceKind::Wood, 50);
        s.add(ResourceKind::Stone, 20);

        let affordable = [Cost::new(ResourceKind::Wood, 40)];
        assert!(s.has(&affordable));
        assert!(s.consume(&affordable));
        assert_eq!(s.get(ResourceKind::Wood), 10);

        let too_much = [
            Cost::new(ResourceKind::Wood, 5),
            Cost::new(ResourceKind::Stone, 25),
        ];
        assert!(!s.has(&too_much));
        assert!(!s.consume(&too_much));
        assert_eq!(s.get(ResourceKind::Wood), 10); // Untouched
        assert_eq!(s.get(ResourceKind::Stone), 20);
    }

    #[test]
    fn capacity_can_shrink_below_current_stock() {
        let mut s = Storage::empty(100);
        s.add(ResourceKind::Food, 90);

        s.remove_capacity(40);
        assert_eq!(s.capacity(), 60);
        assert_eq!(s.get(ResourceKind::Food), 90); // Overstock kept
        assert_eq!(s.add(ResourceKind::Food, 1), 0);

        // Spending back below the cap reopens room.
        assert!(s.consume(&[Cost::new(ResourceKind::Food, 40)]));
        assert_eq!(s.add(ResourceKind::Food, 5), 5);
    }

    #[test]
    fn default_storage_carries_starting_reserves() {
        let s = Storage::default();
        assert_eq!(s.get(ResourceKind::Wood), STARTING_WOOD);
        assert_eq!(s.get(ResourceKind::Stone), STARTING_STONE);
        assert_eq!(s.get(ResourceKind::Food), STARTING_FOOD);
        assert_eq!(s.get(ResourceKind::Gold), 0);
    }
}
