//! Synthetic fingerprint builders shared by unit tests across the crate.
//!
//! Fingerprint extraction itself is out of scope for this crate (see
//! [crate::collaborators::AudioTool]), so tests exercise the comparison and
//! selection algorithms against deterministic pseudo-random streams instead
//! of real decoded audio.

/// Generates a deterministic pseudo-random fingerprint stream of `len`
/// elements. The same `seed` always produces the same stream; different
/// seeds produce streams with no meaningful relationship to one another.
pub fn synthetic_stream(len: usize, seed: u32) -> Vec<u32> {
    let mut state = seed.wrapping_mul(2654435761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            state
        })
        .collect()
}
