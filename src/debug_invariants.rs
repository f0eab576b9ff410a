//! Invariant checks for meshes and derived buffers.
//!
//! Construction paths call [`debug_invariants!`](crate::debug_invariants) so
//! malformed meshes are caught right where they are built in debug builds,
//! while [`DebugInvariants::validate_invariants`] stays available as a
//! fallible check in release builds.

use crate::mesh_error::MapgenError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "invariant check failed");
    }
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MapgenError>;
}

/// Check that a per-cell buffer holds `per_cell` entries for each of
/// `cells` cells.
pub fn ensure_len(
    buffer: &'static str,
    cells: usize,
    per_cell: usize,
    got: usize,
) -> Result<(), MapgenError> {
    let expected = cells * per_cell;
    if expected != got {
        return Err(MapgenError::BufferLengthMismatch {
            buffer,
            expected,
            got,
        });
    }
    Ok(())
}

/// Run a fallible check and panic on error when invariant checking is
/// enabled (debug builds, `strict-invariants` or `check-invariants`).
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_len_reports_expected_and_actual() {
        assert!(ensure_len("colors", 4, 3, 12).is_ok());
        assert_eq!(
            ensure_len("colors", 4, 3, 11),
            Err(MapgenError::BufferLengthMismatch {
                buffer: "colors",
                expected: 12,
                got: 11
            })
        );
    }
}
