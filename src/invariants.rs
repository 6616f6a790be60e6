//! Runtime invariant assertions for the hyphenation scan.
//!
//! Debug-build checks for the laws the scan must uphold; in release
//! builds they compile to no-ops.

/// Asserts the output length law: a word of `word_units` UTF-16 code
/// units yields `max(0, word_units - 1)` priority slots.
///
/// # Panics
///
/// Panics in debug builds if the law is violated.
#[inline]
pub(crate) fn assert_scan_postconditions(word_units: usize, levels: &[u8]) {
    #[cfg(debug_assertions)]
    {
        debug_assert_eq!(
            levels.len(),
            word_units.saturating_sub(1),
            "invariant violation: {} slots for a {word_units}-unit word",
            levels.len()
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (word_units, levels);
    }
}

/// Asserts that every reported hyphenation point indexes a real
/// inter-letter slot with an odd priority.
///
/// # Panics
///
/// Panics in debug builds if a point is out of range or even.
#[inline]
pub(crate) fn assert_points_in_bounds(points: &[usize], levels: &[u8]) {
    #[cfg(debug_assertions)]
    {
        for &point in points {
            debug_assert!(
                point < levels.len(),
                "invariant violation: point {point} outside {} slots",
                levels.len()
            );
            debug_assert!(
                levels[point] % 2 == 1,
                "invariant violation: point {point} has even priority {}",
                levels[point]
            );
        }
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (points, levels);
    }
}
