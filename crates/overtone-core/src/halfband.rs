//! Polyphase half-band IIR filters for 2× sample-rate conversion.
//!
//! A half-band low-pass can be split into two parallel allpass branches that
//! each run at the *low* rate:
//!
//! ```text
//! H(z) = ½ · [ A0(z²) + z⁻¹ · A1(z²) ]
//! ```
//!
//! Each branch is a cascade of first-order allpass sections in `z⁻²`:
//!
//! ```text
//! A(z²) = (a + z⁻²) / (1 + a·z⁻²)      y[n] = a·(x[n] − y[n−1]) + x[n−1]
//! ```
//!
//! Coefficients are produced by an elliptic half-band design that trades
//! transition width against stopband attenuation for a given section count.
//! Even-indexed coefficients belong to branch 0, odd-indexed to branch 1.
//!
//! The structure costs one multiply per coefficient per *low-rate* sample in
//! each direction and has no passband ripple beyond the elliptic design's.
//!
//! Reference: Valenzuela & Constantinides, "Digital signal processing schemes
//! for efficient interpolation and decimation", IEE Proc. 130 (1983).

use core::f64::consts::PI;
use libm::{cos, pow, sin, sqrt, tan};

/// Designs half-band allpass coefficients for `N` sections.
///
/// # Arguments
/// * `transition` - Normalized transition bandwidth in (0, 0.5). The passband
///   edge sits at `(0.25 − transition/2) × fs` and the stopband edge at
///   `(0.25 + transition/2) × fs`, where `fs` is the high rate.
///
/// # Returns
/// Coefficients in (0, 1), sorted ascending.
///
/// # Example
///
/// ```rust
/// use overtone_core::halfband::design_coefficients;
///
/// let coefs: [f64; 4] = design_coefficients(0.1);
/// assert!((coefs[0] - 0.079_866).abs() < 1e-5);
/// ```
pub fn design_coefficients<const N: usize>(transition: f64) -> [f64; N] {
    let (k, q) = transition_params(transition);
    let order = (N * 2 + 1) as f64;

    let mut coefs = [0.0; N];
    for (index, coef) in coefs.iter_mut().enumerate() {
        let c = (index + 1) as f64;
        let ww = numerator_sum(q, order, c) * pow(q, 0.25) / (denominator_sum(q, order, c) + 0.5);
        let ww2 = ww * ww;
        let x = sqrt((1.0 - ww2 * k) * (1.0 - ww2 / k)) / (1.0 + ww2);
        *coef = (1.0 - x) / (1.0 + x);
    }
    coefs
}

/// Selectivity `k` and nome `q` of the elliptic design.
fn transition_params(transition: f64) -> (f64, f64) {
    let k = tan((1.0 - transition * 2.0) * PI / 4.0);
    let k = k * k;
    let kk = pow(1.0 - k * k, 0.25);
    let e = 0.5 * (1.0 - kk) / (1.0 + kk);
    let e4 = e * e * e * e;
    let q = e * (1.0 + e4 * (2.0 + e4 * (15.0 + 150.0 * e4)));
    (k, q)
}

/// Theta-function numerator series.
fn numerator_sum(q: f64, order: f64, c: f64) -> f64 {
    let mut acc = 0.0;
    let mut sign = 1.0;
    let mut i = 0.0;
    loop {
        let q_pow = pow(q, i * (i + 1.0));
        acc += sign * q_pow * sin((i * 2.0 + 1.0) * c * PI / order);
        if q_pow <= 1e-100 {
            return acc;
        }
        sign = -sign;
        i += 1.0;
    }
}

/// Theta-function denominator series.
fn denominator_sum(q: f64, order: f64, c: f64) -> f64 {
    let mut acc = 0.0;
    let mut sign = -1.0;
    let mut i = 1.0;
    loop {
        let q_pow = pow(q, i * i);
        acc += sign * q_pow * cos(i * 2.0 * c * PI / order);
        if q_pow <= 1e-100 {
            return acc;
        }
        sign = -sign;
        i += 1.0;
    }
}

/// DC group delay of one first-order `z⁻²` allpass section, in high-rate samples.
fn section_delay(a: f64) -> f64 {
    2.0 * (1.0 - a) / (1.0 + a)
}

/// Allpass register pairs for one direction (up or down).
#[derive(Debug, Clone, Copy)]
struct AllpassRegisters<const N: usize> {
    x: [f32; N],
    y: [f32; N],
}

impl<const N: usize> AllpassRegisters<N> {
    const CLEARED: Self = Self {
        x: [0.0; N],
        y: [0.0; N],
    };

    /// Runs one branch (`path` 0 or 1) of the cascade on a single sample.
    #[inline]
    fn run_branch(&mut self, coefs: &[f32; N], path: usize, mut sample: f32) -> f32 {
        let mut i = path;
        while i < N {
            let out = coefs[i] * (sample - self.y[i]) + self.x[i];
            self.x[i] = sample;
            self.y[i] = out;
            sample = out;
            i += 2;
        }
        sample
    }

    fn flush_denormals(&mut self) {
        for v in self.x.iter_mut().chain(self.y.iter_mut()) {
            *v = crate::flush_denormal(*v);
        }
    }

    fn is_cleared(&self) -> bool {
        self.x.iter().chain(self.y.iter()).all(|&v| v == 0.0)
    }
}

/// One 2× half-band stage with independent upsampling and downsampling state.
///
/// `N` is the total number of allpass coefficients across both branches.
#[derive(Debug, Clone)]
pub struct HalfBandStage<const N: usize> {
    coefs: [f32; N],
    group_delay: f64,
    up: AllpassRegisters<N>,
    down: AllpassRegisters<N>,
}

impl<const N: usize> HalfBandStage<N> {
    /// Designs a stage for the given normalized transition bandwidth.
    pub fn new(transition: f64) -> Self {
        let designed: [f64; N] = design_coefficients(transition);

        let mut branch_delay = [0.0, 0.0];
        for (i, &a) in designed.iter().enumerate() {
            branch_delay[i & 1] += section_delay(a);
        }
        // Branch 1 carries the extra z⁻¹ of the polyphase split.
        let group_delay = 0.5 * (branch_delay[0] + 1.0 + branch_delay[1]);

        Self {
            coefs: designed.map(|a| a as f32),
            group_delay,
            up: AllpassRegisters::CLEARED,
            down: AllpassRegisters::CLEARED,
        }
    }

    /// Allpass coefficients, even indices on branch 0.
    pub fn coefficients(&self) -> &[f32; N] {
        &self.coefs
    }

    /// DC group delay of one filter pass, in high-rate samples.
    pub fn group_delay(&self) -> f64 {
        self.group_delay
    }

    /// Interpolates `input` by 2 into `output`.
    ///
    /// # Panics
    /// Panics if `output` is shorter than `2 × input.len()`.
    pub fn upsample(&mut self, input: &[f32], output: &mut [f32]) {
        let output = &mut output[..input.len() * 2];
        for (&x, pair) in input.iter().zip(output.chunks_exact_mut(2)) {
            pair[0] = self.up.run_branch(&self.coefs, 0, x);
            pair[1] = self.up.run_branch(&self.coefs, 1, x);
        }
    }

    /// Low-pass filters and decimates `input` by 2 into `output`.
    ///
    /// `input.len()` must be even.
    ///
    /// # Panics
    /// Panics if `output` is shorter than `input.len() / 2`.
    pub fn downsample(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert!(input.len() % 2 == 0, "downsample input must be even");
        let output = &mut output[..input.len() / 2];
        for (pair, y) in input.chunks_exact(2).zip(output.iter_mut()) {
            let a0 = self.down.run_branch(&self.coefs, 0, pair[1]);
            let a1 = self.down.run_branch(&self.coefs, 1, pair[0]);
            *y = 0.5 * (a0 + a1);
        }
    }

    /// Clears all delay registers.
    pub fn reset(&mut self) {
        self.up = AllpassRegisters::CLEARED;
        self.down = AllpassRegisters::CLEARED;
    }

    /// Flushes subnormal register values to zero.
    pub fn flush_denormals(&mut self) {
        self.up.flush_denormals();
        self.down.flush_denormals();
    }

    /// Returns `true` if every register is zero.
    pub fn is_reset(&self) -> bool {
        self.up.is_cleared() && self.down.is_cleared()
    }
}
