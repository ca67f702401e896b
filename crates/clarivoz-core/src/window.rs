//! Precomputed grain envelope tables.
//!
//! Grain synthesis multiplies every resynthesized sample by a symmetric
//! raised-cosine (Hann) envelope so overlapping grains crossfade smoothly.
//! The table is computed once at construction and shared read-only across
//! all grain syntheses.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;
use libm::cosf;

/// Immutable Hann window table for grain synthesis.
///
/// # Example
///
/// ```rust
/// use clarivoz_core::GrainWindow;
///
/// let window = GrainWindow::hann(1024);
/// assert_eq!(window.len(), 1024);
/// assert!(window.value(0) < 1e-6);           // endpoints at zero
/// assert!((window.value(512) - 1.0).abs() < 0.001); // peak at center
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GrainWindow {
    values: Vec<f32>,
}

impl GrainWindow {
    /// Build a symmetric Hann window of the given length.
    ///
    /// # Panics
    ///
    /// Panics if `len < 2`; a shorter table cannot describe an envelope.
    pub fn hann(len: usize) -> Self {
        assert!(len >= 2, "Grain window length must be >= 2");
        let values = (0..len)
            .map(|i| {
                let phase = i as f32 / (len - 1) as f32;
                0.5 * (1.0 - cosf(core::f32::consts::TAU * phase))
            })
            .collect();
        Self { values }
    }

    /// Window length in samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the table is empty (never the case for a constructed window).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Envelope value at position `index`.
    #[inline]
    pub fn value(&self, index: usize) -> f32 {
        self.values[index]
    }

    /// The whole table as a slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_is_symmetric() {
        let window = GrainWindow::hann(256);
        for i in 0..128 {
            let a = window.value(i);
            let b = window.value(255 - i);
            assert!((a - b).abs() < 1e-6, "asymmetry at {i}: {a} vs {b}");
        }
    }

    #[test]
    fn hann_endpoints_are_zero() {
        let window = GrainWindow::hann(64);
        assert!(window.value(0).abs() < 1e-6);
        assert!(window.value(63).abs() < 1e-6);
    }

    #[test]
    fn hann_bounded_zero_to_one() {
        let window = GrainWindow::hann(100);
        assert!(window.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    #[should_panic]
    fn hann_too_short_panics() {
        let _ = GrainWindow::hann(1);
    }
}
