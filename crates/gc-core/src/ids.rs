//! Strongly typed identifier wrappers.
//!
//! Both IDs are `Copy + Ord + Hash` so they work as cache keys and give a
//! stable ordering for result vectors.  The inner integer is `pub` so the
//! road graph can index its CSR arrays with `id.0 as usize`; prefer
//! `.index()` for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifier of a grid cell.  Assigned sequentially in tiling order, so
    /// a demand group (one per occupied cell) shares its cell's id.
    pub struct CellId(u32);
}

typed_id! {
    /// Opaque vertex id of the road graph.  Only ever obtained from a
    /// nearest-vertex lookup, never constructed by the engine itself.
    pub struct NodeId(u32);
}
