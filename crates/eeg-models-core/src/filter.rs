//! Transfer-function filtering
//!
//! Provides:
//! - Direct Form II transposed filtering with optional initial state
//! - Steady-state initial conditions for a step input
//! - Zero-phase forward-backward filtering with odd edge extension
//! - IIR decimation (Chebyshev I anti-aliasing + downsampling)

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::design::cheby1_lowpass;
use crate::error::DspError;

/// Order of the Chebyshev anti-aliasing filter used for decimation
pub const DECIMATION_ORDER: u32 = 8;

/// Pass-band ripple of the anti-aliasing filter in dB
pub const DECIMATION_RIPPLE_DB: f64 = 0.05;

/// Largest factor for which the order-8 anti-aliasing filter stays
/// numerically well behaved in transfer-function form
pub const MAX_STABLE_DECIMATION_FACTOR: usize = 13;

// ============================================================================
// Filter Coefficients
// ============================================================================

/// IIR filter in transfer-function form.
///
/// Coefficients are normalized so that `a[0] == 1` and `b`, `a` have equal
/// length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    /// Numerator coefficients [b0, b1, ...]
    b: Vec<f64>,
    /// Denominator coefficients [a0=1, a1, ...]
    a: Vec<f64>,
}

impl FilterCoefficients {
    /// Create a filter from numerator and denominator coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::InvalidCoefficients`] if either sequence is empty
    /// or `a[0]` is zero.
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> Result<Self, DspError> {
        if b.is_empty() {
            return Err(DspError::InvalidCoefficients { reason: "empty numerator" });
        }
        let a0 = match a.first() {
            Some(&a0) if a0 != 0.0 => a0,
            Some(_) => {
                return Err(DspError::InvalidCoefficients {
                    reason: "leading denominator coefficient is zero",
                })
            }
            None => return Err(DspError::InvalidCoefficients { reason: "empty denominator" }),
        };

        let taps = b.len().max(a.len());
        let normalize = |c: Vec<f64>| -> Vec<f64> {
            let mut c: Vec<f64> = c.into_iter().map(|v| v / a0).collect();
            c.resize(taps, 0.0);
            c
        };

        Ok(Self { b: normalize(b), a: normalize(a) })
    }

    /// Anti-aliasing low-pass used by [`decimate`] for `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::InvalidFactor`] if `factor` is zero.
    pub fn decimation_lowpass(factor: usize) -> Result<Self, DspError> {
        if factor == 0 {
            return Err(DspError::InvalidFactor { factor });
        }
        cheby1_lowpass(DECIMATION_ORDER, DECIMATION_RIPPLE_DB, 0.8 / factor as f64)
    }

    /// Numerator coefficients
    #[must_use]
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Denominator coefficients
    #[must_use]
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Number of coefficients in each of `b` and `a`
    #[must_use]
    pub fn num_taps(&self) -> usize {
        self.b.len()
    }

    /// Edge padding applied by [`Self::filtfilt`]
    #[must_use]
    pub fn padlen(&self) -> usize {
        3 * self.num_taps()
    }

    /// Filter `x` starting from a zero state.
    #[must_use]
    pub fn lfilter(&self, x: &[f64]) -> Vec<f64> {
        let mut state = vec![0.0; self.num_taps() - 1];
        self.run(x, &mut state)
    }

    /// Filter `x` from initial state `zi`, returning the output and the
    /// final state.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::StateLength`] if `zi` does not have
    /// `num_taps() - 1` elements.
    pub fn lfilter_with_state(&self, x: &[f64], zi: &[f64]) -> Result<(Vec<f64>, Vec<f64>), DspError> {
        let expected = self.num_taps() - 1;
        if zi.len() != expected {
            return Err(DspError::StateLength { got: zi.len(), expected });
        }

        let mut state = zi.to_vec();
        let y = self.run(x, &mut state);
        Ok((y, state))
    }

    /// Initial state corresponding to the steady state of a unit step.
    ///
    /// Scale by the first input sample to start filtering without a
    /// transient.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::SingularSystem`] if `I - A` is not invertible.
    pub fn lfilter_zi(&self) -> Result<Vec<f64>, DspError> {
        let m = self.num_taps() - 1;
        if m == 0 {
            return Ok(Vec::new());
        }

        // I - companion(a)^T
        let i_minus_a = DMatrix::from_fn(m, m, |r, c| {
            let identity = if r == c { 1.0 } else { 0.0 };
            let companion_t = if c == 0 {
                -self.a[r + 1]
            } else if c == r + 1 {
                1.0
            } else {
                0.0
            };
            identity - companion_t
        });
        let rhs = DVector::from_fn(m, |r, _| self.b[r + 1] - self.a[r + 1] * self.b[0]);

        let zi = i_minus_a.lu().solve(&rhs).ok_or(DspError::SingularSystem)?;
        Ok(zi.iter().copied().collect())
    }

    /// Zero-phase filtering: forward pass, then backward pass over the
    /// reversed output.
    ///
    /// The input is extended at both ends by [`Self::padlen`] samples of
    /// odd reflection and each pass starts from the steady state of its
    /// first sample. Output has the same length as `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::SignalTooShort`] if `x.len() <= padlen()`.
    pub fn filtfilt(&self, x: &[f64]) -> Result<Vec<f64>, DspError> {
        let padlen = self.padlen();
        if x.len() <= padlen {
            return Err(DspError::SignalTooShort { len: x.len(), padlen });
        }

        let extended = odd_extend(x, padlen);
        let zi = self.lfilter_zi()?;

        let mut state: Vec<f64> = zi.iter().map(|z| z * extended[0]).collect();
        let forward = self.run(&extended, &mut state);

        let last = forward.last().copied().unwrap_or_default();
        let mut state: Vec<f64> = zi.iter().map(|z| z * last).collect();
        let reversed: Vec<f64> = forward.into_iter().rev().collect();
        let mut backward = self.run(&reversed, &mut state);
        backward.reverse();

        Ok(backward[padlen..backward.len() - padlen].to_vec())
    }

    /// Zero-phase filter `x`, then keep every `factor`-th sample starting
    /// at index 0.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::InvalidFactor`] or the errors of
    /// [`Self::filtfilt`].
    pub fn decimate(&self, x: &[f64], factor: usize) -> Result<Vec<f64>, DspError> {
        if factor == 0 {
            return Err(DspError::InvalidFactor { factor });
        }
        let filtered = self.filtfilt(x)?;
        Ok(filtered.into_iter().step_by(factor).collect())
    }

    /// Direct Form II transposed recursion.
    fn run(&self, x: &[f64], state: &mut [f64]) -> Vec<f64> {
        let n = self.num_taps();

        x.iter()
            .map(|&xi| {
                let yi = self.b[0] * xi + state.first().copied().unwrap_or(0.0);
                for j in 0..n.saturating_sub(2) {
                    state[j] = self.b[j + 1] * xi + state[j + 1] - self.a[j + 1] * yi;
                }
                if n > 1 {
                    state[n - 2] = self.b[n - 1] * xi - self.a[n - 1] * yi;
                }
                yi
            })
            .collect()
    }
}

// ============================================================================
// Decimation
// ============================================================================

/// Downsample `x` by an integer factor after zero-phase anti-aliasing.
///
/// Uses an order-8 Chebyshev type I low-pass (0.05 dB ripple) with cutoff
/// `0.8 / factor` of Nyquist. Output length is `ceil(x.len() / factor)`.
/// A factor of 1 still filters, so `x` must be longer than the pad length.
///
/// # Errors
///
/// Returns [`DspError::InvalidFactor`] if `factor` is zero, or
/// [`DspError::SignalTooShort`] if `x` is too short to filter.
pub fn decimate(x: &[f64], factor: usize) -> Result<Vec<f64>, DspError> {
    FilterCoefficients::decimation_lowpass(factor)?.decimate(x, factor)
}

/// Extend `x` by `n` samples of odd reflection about each end point.
fn odd_extend(x: &[f64], n: usize) -> Vec<f64> {
    let first = x[0];
    let last = x[x.len() - 1];

    let mut out = Vec::with_capacity(x.len() + 2 * n);
    out.extend((1..=n).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=n).map(|i| 2.0 * last - x[x.len() - 1 - i]));
    out
}

// ============================================================================
// Tests
// ============================================================================
