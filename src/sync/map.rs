//! Register address layout.
//!
//! The four register kinds live in one 16-bit address space, each at its
//! own linear offset.  Item `n` of the device map uses address
//! `offset + n` in whichever ranges its kind touches.  An offset of 0 for
//! every kind would also work with a transport that keeps separate banks,
//! but distinct offsets keep the ranges apart in a shared one.

use serde::{Deserialize, Serialize};

use crate::error::MapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMap {
    pub coil_offset: u16,
    pub discrete_offset: u16,
    pub input_offset: u16,
    pub holding_offset: u16,
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self {
            coil_offset: 0,
            discrete_offset: 10_000,
            input_offset: 30_000,
            holding_offset: 40_000,
        }
    }
}

impl RegisterMap {
    pub fn coil(&self, base: u16) -> u16 {
        self.coil_offset.wrapping_add(base)
    }

    pub fn discrete(&self, base: u16) -> u16 {
        self.discrete_offset.wrapping_add(base)
    }

    pub fn input(&self, base: u16) -> u16 {
        self.input_offset.wrapping_add(base)
    }

    pub fn holding(&self, base: u16) -> u16 {
        self.holding_offset.wrapping_add(base)
    }

    /// Offset of the range a register kind reports through.  Coils also
    /// use the holding range for their extended word.

    /// Check that `count` registers per kind fit without colliding.
    pub fn validate(&self, count: u16) -> Result<(), MapError> {
        let mut ranges = [
            self.coil_offset,
            self.discrete_offset,
            self.input_offset,
            self.holding_offset,
        ];

        for &start in &ranges {
            if u32::from(start) + u32::from(count) > 0x1_0000 {
                return Err(MapError::OutOfRange);
            }
        }

        ranges.sort_unstable();
        for pair in ranges.windows(2) {
            if u32::from(pair[0]) + u32::from(count) > u32::from(pair[1]) {
                return Err(MapError::Overlap);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid_for_a_full_table() {
        assert_eq!(RegisterMap::default().validate(64), Ok(()));
    }

    #[test]
    fn addresses_are_offset_by_kind() {
        let map = RegisterMap::default();
        assert_eq!(map.coil(3), 3);
        assert_eq!(map.discrete(3), 10_003);
        assert_eq!(map.input(3), 30_003);
        assert_eq!(map.holding(3), 40_003);
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let map = RegisterMap {
            coil_offset: 0,
            discrete_offset: 8,
            input_offset: 100,
            holding_offset: 200,
        };
        assert_eq!(map.validate(8), Ok(()));
        assert_eq!(map.validate(9), Err(MapError::Overlap));
    }

    #[test]
    fn ranges_past_the_address_space_are_rejected() {
        let map = RegisterMap {
            holding_offset: 65_530,
            ..RegisterMap::default()
        };
        assert_eq!(map.validate(6), Ok(()));
        assert_eq!(map.validate(7), Err(MapError::OutOfRange));
    }
}
