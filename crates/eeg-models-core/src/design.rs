//! IIR filter design
//!
//! Filters are designed from an analog prototype in zero-pole-gain form,
//! frequency-transformed, mapped to the z-plane with the bilinear transform
//! and finally expanded into transfer-function coefficients `(b, a)`.
//!
//! Cutoffs are normalized to Nyquist (`1.0` == half the sampling rate).

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::DspError;
use crate::filter::FilterCoefficients;

/// Sampling rate of the normalized frequency axis (Nyquist == 1).
const NORMALIZED_FS: f64 = 2.0;

// ============================================================================
// Zero-Pole-Gain Representation
// ============================================================================

/// Filter in zero-pole-gain form.
#[derive(Clone, Debug, PartialEq)]
pub struct Zpk {
    /// Zeros of the transfer function
    pub zeros: Vec<Complex64>,
    /// Poles of the transfer function
    pub poles: Vec<Complex64>,
    /// System gain
    pub gain: f64,
}

impl Zpk {
    /// Analog Butterworth low-pass prototype with unit cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`DspError::InvalidOrder`] if `order` is zero.
    pub fn butterworth_prototype(order: u32) -> Result<Self, DspError> {
        if order == 0 {
            return Err(DspError::InvalidOrder { order });
        }

        let n = f64::from(order);
        let poles = prototype_angles(order)
            .map(|m| -Complex64::new(0.0, PI * m / (2.0 * n)).exp())
            .collect();

        Ok(Self { zeros: Vec::new(), poles, gain: 1.0 })
    }

    /// Analog Chebyshev type I low-pass prototype with unit cutoff.
    ///
    /// # Arguments
    ///
    /// * `order` - Filter order
    /// * `ripple_db` - Maximum pass-band ripple in dB
    ///
    /// # Errors
    ///
    /// Returns [`DspError::InvalidOrder`] or [`DspError::InvalidRipple`].
    pub fn chebyshev1_prototype(order: u32, ripple_db: f64) -> Result<Self, DspError> {
        if order == 0 {
            return Err(DspError::InvalidOrder { order });
        }
        if !(ripple_db.is_finite() && ripple_db > 0.0) {
            return Err(DspError::InvalidRipple { ripple_db });
        }

        let n = f64::from(order);
        let eps = (10f64.powf(0.1 * ripple_db) - 1.0).sqrt();
        let mu = (1.0 / eps).asinh() / n;

        let poles: Vec<Complex64> = prototype_angles(order)
            .map(|m| -Complex64::new(mu, PI * m / (2.0 * n)).sinh())
            .collect();

        let mut gain = poles.iter().fold(Complex64::new(1.0, 0.0), |acc, &p| acc * -p).re;
        // Even orders start the pass band at the bottom of the ripple
        if order % 2 == 0 {
            gain /= (1.0 + eps * eps).sqrt();
        }

        Ok(Self { zeros: Vec::new(), poles, gain })
    }

    /// Number of poles in excess of zeros.
    fn relative_degree(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }

    /// Move a unit-cutoff low-pass prototype to cutoff `wo` (rad/s).
    #[must_use]
    pub fn lowpass_to_lowpass(self, wo: f64) -> Self {
        let degree = self.relative_degree();

        Self {
            zeros: self.zeros.iter().map(|&z| z * wo).collect(),
            poles: self.poles.iter().map(|&p| p * wo).collect(),
            gain: self.gain * wo.powi(degree as i32),
        }
    }

    /// Turn a unit-cutoff low-pass prototype into a band-pass centred on
    /// `wo` with bandwidth `bw` (both in rad/s).
    #[must_use]
    pub fn lowpass_to_bandpass(self, wo: f64, bw: f64) -> Self {
        let degree = self.relative_degree();
        let split = |roots: &[Complex64]| -> Vec<Complex64> {
            let scaled: Vec<Complex64> = roots.iter().map(|&r| r * bw / 2.0).collect();
            let offsets: Vec<Complex64> =
                scaled.iter().map(|&r| (r * r - wo * wo).sqrt()).collect();

            scaled
                .iter()
                .zip(&offsets)
                .map(|(&r, &o)| r + o)
                .chain(scaled.iter().zip(&offsets).map(|(&r, &o)| r - o))
                .collect()
        };

        let mut zeros = split(&self.zeros);
        zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

        Self {
            zeros,
            poles: split(&self.poles),
            gain: self.gain * bw.powi(degree as i32),
        }
    }

    /// Map an analog filter to the z-plane with the bilinear transform.
    #[must_use]
    pub fn bilinear(self, fs: f64) -> Self {
        let degree = self.relative_degree();
        let fs2 = Complex64::new(2.0 * fs, 0.0);

        let mut zeros: Vec<Complex64> = self.zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
        let poles = self.poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

        // Zeros at infinity move to Nyquist
        zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

        let num = self.zeros.iter().fold(Complex64::new(1.0, 0.0), |acc, &z| acc * (fs2 - z));
        let den = self.poles.iter().fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));

        Self { zeros, poles, gain: self.gain * (num / den).re }
    }

    /// Expand into transfer-function coefficients.
    ///
    /// # Errors
    ///
    /// Propagates [`FilterCoefficients::new`] validation.
    pub fn to_coefficients(&self) -> Result<FilterCoefficients, DspError> {
        let b = poly(&self.zeros).into_iter().map(|c| c.re * self.gain).collect();
        let a = poly(&self.poles).into_iter().map(|c| c.re).collect();
        FilterCoefficients::new(b, a)
    }
}

// ============================================================================
// Digital Designs
// ============================================================================

/// Butterworth band-pass in zero-pole-gain form.
///
/// `low` and `high` are fractions of Nyquist.
///
/// # Errors
///
/// Returns [`DspError::InvalidOrder`] or [`DspError::InvalidCutoff`].
pub fn butter_bandpass_zpk(order: u32, low: f64, high: f64) -> Result<Zpk, DspError> {
    if !(low.is_finite() && high.is_finite() && 0.0 < low && low < high && high < 1.0) {
        return Err(DspError::InvalidCutoff { low, high });
    }

    let warped_low = prewarp(low);
    let warped_high = prewarp(high);
    let bw = warped_high - warped_low;
    let wo = (warped_low * warped_high).sqrt();

    Ok(Zpk::butterworth_prototype(order)?
        .lowpass_to_bandpass(wo, bw)
        .bilinear(NORMALIZED_FS))
}

/// Butterworth band-pass transfer function.
///
/// # Errors
///
/// See [`butter_bandpass_zpk`].
pub fn butter_bandpass(order: u32, low: f64, high: f64) -> Result<FilterCoefficients, DspError> {
    let coeffs = butter_bandpass_zpk(order, low, high)?.to_coefficients()?;
    tracing::debug!(order, low, high, taps = coeffs.num_taps(), "designed Butterworth band-pass");
    Ok(coeffs)
}

/// Chebyshev type I low-pass in zero-pole-gain form.
///
/// # Errors
///
/// Returns [`DspError::InvalidOrder`], [`DspError::InvalidRipple`] or
/// [`DspError::InvalidLowpass`].
pub fn cheby1_lowpass_zpk(order: u32, ripple_db: f64, cutoff: f64) -> Result<Zpk, DspError> {
    if !(cutoff.is_finite() && 0.0 < cutoff && cutoff < 1.0) {
        return Err(DspError::InvalidLowpass { cutoff });
    }

    Ok(Zpk::chebyshev1_prototype(order, ripple_db)?
        .lowpass_to_lowpass(prewarp(cutoff))
        .bilinear(NORMALIZED_FS))
}

/// Chebyshev type I low-pass transfer function.
///
/// # Errors
///
/// See [`cheby1_lowpass_zpk`].
pub fn cheby1_lowpass(
    order: u32,
    ripple_db: f64,
    cutoff: f64,
) -> Result<FilterCoefficients, DspError> {
    let coeffs = cheby1_lowpass_zpk(order, ripple_db, cutoff)?.to_coefficients()?;
    tracing::debug!(order, ripple_db, cutoff, "designed Chebyshev I low-pass");
    Ok(coeffs)
}

// ============================================================================
// Helpers
// ============================================================================

/// Odd offsets `-(n-1), -(n-3), ..., n-1` used to place prototype poles.
fn prototype_angles(order: u32) -> impl Iterator<Item = f64> {
    let n = i64::from(order);
    (1 - n..n).step_by(2).map(|m| m as f64)
}

/// Pre-warp a normalized digital frequency for the bilinear transform.
fn prewarp(wn: f64) -> f64 {
    2.0 * NORMALIZED_FS * (PI * wn / NORMALIZED_FS).tan()
}

/// Polynomial coefficients (highest power first) with the given roots.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            coeffs[i] = coeffs[i] - root * coeffs[i - 1];
        }
    }
    coeffs
}

// ============================================================================
// Tests
// ============================================================================
