//! Per-project counters for bookable units and officer seats.
//!
//! Both ledgers are plain values owned by their [`Project`](super::domain::Project). The
//! service mutates them only while holding the store lock, so each check-then-decrement
//! below is a single atomic step from the caller's point of view.

use serde::{Deserialize, Serialize};

use super::domain::FlatType;

/// Remaining units for each flat type in a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInventory {
    two_room: u32,
    three_room: u32,
}

impl UnitInventory {
    pub fn new(two_room: u32, three_room: u32) -> Self {
        Self {
            two_room,
            three_room,
        }
    }

    pub fn available(&self, flat_type: FlatType) -> u32 {
        match flat_type {
            FlatType::TwoRoom => self.two_room,
            FlatType::ThreeRoom => self.three_room,
        }
    }

    /// Consume one unit if any remain. Returns `false` when the tier is sold out; that is
    /// an expected outcome, not a fault.
    pub fn try_reserve(&mut self, flat_type: FlatType) -> bool {
        let counter = self.counter_mut(flat_type);
        if *counter == 0 {
            return false;
        }
        *counter -= 1;
        true
    }

    /// Return a unit previously taken by [`try_reserve`](Self::try_reserve).
    pub(crate) fn release(&mut self, flat_type: FlatType) {
        let counter = self.counter_mut(flat_type);
        *counter = counter.saturating_add(1);
    }

    pub(crate) fn set(&mut self, flat_type: FlatType, units: u32) {
        *self.counter_mut(flat_type) = units;
    }

    fn counter_mut(&mut self, flat_type: FlatType) -> &mut u32 {
        match flat_type {
            FlatType::TwoRoom => &mut self.two_room,
            FlatType::ThreeRoom => &mut self.three_room,
        }
    }
}

/// Officer seats for a project, bounded by the allocation made at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerSlots {
    allocated: u32,
    remaining: u32,
}

impl OfficerSlots {
    pub fn new(allocated: u32) -> Self {
        Self {
            allocated,
            remaining: allocated,
        }
    }

    pub fn allocated(&self) -> u32 {
        self.allocated
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn try_claim(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_stops_at_zero() {
        let mut units = UnitInventory::new(1, 0);

        assert!(units.try_reserve(FlatType::TwoRoom));
        assert!(!units.try_reserve(FlatType::TwoRoom));
        assert!(!units.try_reserve(FlatType::ThreeRoom));
        assert_eq!(units.available(FlatType::TwoRoom), 0);
        assert_eq!(units.available(FlatType::ThreeRoom), 0);
    }

    #[test]
    fn release_restores_reserved_unit() {
        let mut units = UnitInventory::new(2, 3);

        assert!(units.try_reserve(FlatType::ThreeRoom));
        units.release(FlatType::ThreeRoom);

        assert_eq!(units, UnitInventory::new(2, 3));
    }

    #[test]
    fn officer_slots_never_exceed_allocation() {
        let mut slots = OfficerSlots::new(2);

        assert!(slots.try_claim());
        assert!(slots.try_claim());
        assert!(!slots.try_claim());
        assert_eq!(slots.remaining(), 0);
        assert_eq!(slots.allocated(), 2);
    }
}
