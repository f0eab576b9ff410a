//! Stale-data tracking for the recompute pipeline.
//!
//! Producers union flags in with [`DirtyTracker::set_dirty`]; consumers use
//! [`DirtyTracker::is_dirty_clear`], which tests and clears one flag under a
//! single lock so a check can never race with its own clear.

use std::fmt;

use parking_lot::Mutex;

/// A category of derived data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DirtyFlag {
    /// The raw point set.
    Vertices = 1 << 0,
    /// Triangle buffers, palette, centroids and dual edges.
    Mesh = 1 << 1,
    /// Cell elevations, noise colors and the noise raster.
    ElevationNoise = 1 << 2,
    /// Contours, coast segments and the water table.
    WaterLevel = 1 << 3,
}

impl DirtyFlag {
    /// All flags in recompute order.
    pub const ORDER: [DirtyFlag; 4] = [
        DirtyFlag::Vertices,
        DirtyFlag::Mesh,
        DirtyFlag::ElevationNoise,
        DirtyFlag::WaterLevel,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        self as u8
    }
}

/// A set of [`DirtyFlag`]s.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct DirtyFlags(u8);

impl DirtyFlags {
    pub const EMPTY: DirtyFlags = DirtyFlags(0);
    pub const ALL: DirtyFlags = DirtyFlags(0b1111);

    #[inline]
    pub const fn contains(self, flag: DirtyFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, flag: DirtyFlag) {
        self.0 |= flag.bit();
    }

    #[inline]
    pub fn remove(&mut self, flag: DirtyFlag) {
        self.0 &= !flag.bit();
    }

    #[inline]
    pub const fn union(self, other: DirtyFlags) -> DirtyFlags {
        DirtyFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in recompute order.
    pub fn iter(self) -> impl Iterator<Item = DirtyFlag> {
        DirtyFlag::ORDER.into_iter().filter(move |&f| self.contains(f))
    }
}

impl From<DirtyFlag> for DirtyFlags {
    #[inline]
    fn from(flag: DirtyFlag) -> Self {
        DirtyFlags(flag.bit())
    }
}

impl FromIterator<DirtyFlag> for DirtyFlags {
    fn from_iter<I: IntoIterator<Item = DirtyFlag>>(iter: I) -> Self {
        let mut set = DirtyFlags::EMPTY;
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl fmt::Debug for DirtyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Mutex-guarded pending set.
#[derive(Default)]
pub struct DirtyTracker {
    pending: Mutex<DirtyFlags>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `flag` into the pending set. Idempotent.
    #[inline]
    pub fn set_dirty(&self, flag: DirtyFlag) {
        self.pending.lock().insert(flag);
    }

    /// Union several flags at once.
    pub fn set_all(&self, flags: DirtyFlags) {
        let mut pending = self.pending.lock();
        *pending = pending.union(flags);
    }

    /// If `flag` is pending, clear it and return `true`.
    ///
    /// Other flags are left alone.
    pub fn is_dirty_clear(&self, flag: DirtyFlag) -> bool {
        let mut pending = self.pending.lock();
        if pending.contains(flag) {
            pending.remove(flag);
            true
        } else {
            false
        }
    }

    /// Peek without clearing.
    #[inline]
    pub fn is_dirty(&self, flag: DirtyFlag) -> bool {
        self.pending.lock().contains(flag)
    }

    #[inline]
    pub fn pending(&self) -> DirtyFlags {
        *self.pending.lock()
    }
}

impl fmt::Debug for DirtyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyTracker")
            .field("pending", &self.pending())
            .finish()
    }
}
