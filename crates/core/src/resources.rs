//! Resource bundles (metal, crystal, gas) and unit manifests.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A bundle of the three storable resources.
///
/// Quantities are continuous; production accrues fractions per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub metal: f64,
    pub crystal: f64,
    pub gas: f64,
}

impl Resources {
    pub const ZERO: Resources = Resources {
        metal: 0.0,
        crystal: 0.0,
        gas: 0.0,
    };

    pub fn new(metal: f64, crystal: f64, gas: f64) -> Self {
        Self {
            metal,
            crystal,
            gas,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.metal == 0.0 && self.crystal == 0.0 && self.gas == 0.0
    }

    /// Sum of all three resources, used as the normalized cost equivalent.
    pub fn total(&self) -> f64 {
        self.metal + self.crystal + self.gas
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.metal * factor, self.crystal * factor, self.gas * factor)
    }

    /// Replace any negative component with zero.
    pub fn clamp_non_negative(&self) -> Self {
        Self::new(self.metal.max(0.0), self.crystal.max(0.0), self.gas.max(0.0))
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(self, rhs: Resources) -> Resources {
        Resources::new(
            self.metal + rhs.metal,
            self.crystal + rhs.crystal,
            self.gas + rhs.gas,
        )
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        *self = *self + rhs;
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Counts (or levels) keyed by a unit-kind enum.
///
/// Absent keys read as zero. Counts are never negative: every mutator
/// floors at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest<K: Ord>(BTreeMap<K, i64>);

impl<K: Ord + Copy> Manifest<K> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, kind: K) -> i64 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Set a count, dropping the entry when it is zero or negative.
    pub fn set(&mut self, kind: K, count: i64) {
        if count > 0 {
            self.0.insert(kind, count);
        } else {
            self.0.remove(&kind);
        }
    }

    pub fn add(&mut self, kind: K, count: i64) {
        let current = self.get(kind);
        self.set(kind, current.saturating_add(count));
    }

    pub fn merge(&mut self, other: &Manifest<K>) {
        for (kind, count) in other.iter() {
            self.add(kind, count);
        }
    }

    /// Subtract `losses` from this manifest, flooring each kind at zero.
    pub fn subtract_floored(&self, losses: &Manifest<K>) -> Manifest<K> {
        let mut out = self.clone();
        for (kind, lost) in losses.iter() {
            out.set(kind, self.get(kind).saturating_sub(lost));
        }
        out
    }

    /// Cap every count at the matching count in `limit`.
    pub fn capped_by(&self, limit: &Manifest<K>) -> Manifest<K> {
        self.iter()
            .map(|(kind, count)| (kind, count.min(limit.get(kind))))
            .collect()
    }

    /// `true` when every kind has a count of zero.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&count| count <= 0)
    }

    pub fn total_units(&self) -> i64 {
        self.0.values().sum()
    }

    /// Iterate over kinds with a positive count.
    pub fn iter(&self) -> impl Iterator<Item = (K, i64)> + '_ {
        self.0
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&kind, &count)| (kind, count))
    }
}

impl<K: Ord + Copy> Default for Manifest<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy> FromIterator<(K, i64)> for Manifest<K> {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut manifest = Manifest::new();
        for (kind, count) in iter {
            manifest.add(kind, count);
        }
        manifest
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
