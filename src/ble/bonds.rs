//! Security keys filed by wireless profile.
//!
//! Each profile owns exactly one slot. Pairing a profile overwrites only
//! that profile's keys, and clearing a profile forgets only its own, so
//! the other bonded hosts keep reconnecting without re-pairing.

/// Fixed table of per-profile bond records.
pub struct BondTable<T, const N: usize> {
    slots: [Option<T>; N],
}

impl<T, const N: usize> BondTable<T, N> {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// File `bond` under profile `index`, replacing whatever that profile
    /// held before. Returns `false` for an index past the table.
    pub fn store(&mut self, index: usize, bond: T) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(bond);
                true
            }
            None => false,
        }
    }

    /// Drop the keys of profile `index`.
    pub fn forget(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index)?.take()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    /// First stored bond for which `f` yields a value.
    pub fn find_map<R>(&self, f: impl FnMut(&T) -> Option<R>) -> Option<R> {
        self.slots.iter().flatten().find_map(f)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const N: usize> Default for BondTable<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
