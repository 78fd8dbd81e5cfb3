//! Two-player side identification and per-side data storage.
//!
//! ## Side
//!
//! A Blotto game always has exactly two seats. `Side` identifies a seat
//! (not a person): external player identities map onto sides when a game
//! is created, and every rule in the engine is written in terms of sides.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`. The engine keeps pools, round
//! wins, and in-flight commitments in `SideMap`s so that "the other player"
//! is always `side.opponent()` rather than an id comparison.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }

    /// The raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player1 => 0,
            Side::Player2 => 1,
        }
    }

    /// Both sides, player 1 first.
    ///
    /// The ordering here is the canonical move-application order used by
    /// round resolution, so it must stay stable.
    pub fn both() -> impl Iterator<Item = Side> {
        [Side::Player1, Side::Player2].into_iter()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player1 => write!(f, "player1"),
            Side::Player2 => write!(f, "player2"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use blotto::core::{Side, SideMap};
///
/// let mut pools: SideMap<u32> = SideMap::with_value(100);
///
/// pools[Side::Player2] -= 40;
/// assert_eq!(pools[Side::Player1], 100);
/// assert_eq!(pools[Side::Player2], 60);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Player1), factory(Side::Player2)],
        }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SideMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs, player 1 first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::both().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
