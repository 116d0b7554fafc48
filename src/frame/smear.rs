//! Gaussian smearing along the tick axis.
//!
//! The kernel is laid out for a length-`nticks` buffer: its non-negative half
//! at the front and its negative half wrapped to the back. Each waveform is
//! linearly convolved with that buffer and truncated to `nticks` samples, so
//! away from the first few ticks charge only spreads forward in time.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::{Frame, FrameError};

/// Kernel half-width in units of sigma
pub const DEFAULT_NSIGMA: f64 = 6.0;

/// Build the wrapped Gaussian kernel for `nticks` samples.
///
/// Sample offsets run from `-sigma*nsigma` in steps of one tick up to (not
/// including) `sigma*nsigma`; an odd count drops its last offset.
pub fn gaussian_kernel(sigma: f64, nsigma: f64, nticks: usize) -> Result<Vec<f64>, FrameError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FrameError::InvalidSmear(format!(
            "sigma must be positive, got {}",
            sigma
        )));
    }
    if !nsigma.is_finite() || nsigma <= 0.0 {
        return Err(FrameError::InvalidSmear(format!(
            "nsigma must be positive, got {}",
            nsigma
        )));
    }

    let start = -sigma * nsigma;
    let mut count = (2.0 * sigma * nsigma).ceil() as usize;
    if count % 2 == 1 {
        count -= 1;
    }
    let half_width = count / 2;
    if half_width == 0 {
        return Err(FrameError::InvalidSmear(format!(
            "sigma {} x nsigma {} spans less than one tick",
            sigma, nsigma
        )));
    }
    if half_width > nticks {
        return Err(FrameError::KernelTooWide { half_width, nticks });
    }

    let mut gauss: Vec<f64> = (0..count)
        .map(|k| {
            let x = (start + k as f64) / sigma;
            (-0.5 * x * x).exp()
        })
        .collect();
    let norm: f64 = gauss.iter().sum();
    for g in gauss.iter_mut() {
        *g /= norm;
    }

    let mut kernel = vec![0.0; nticks];
    kernel[..half_width].copy_from_slice(&gauss[half_width..]);
    kernel[nticks - half_width..].copy_from_slice(&gauss[..half_width]);
    Ok(kernel)
}

/// FFT convolution of waveforms with one fixed kernel
pub struct TickConvolver {
    nticks: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    kernel_spectrum: Vec<Complex<f64>>,
    buffer: Vec<Complex<f64>>,
}

impl TickConvolver {
    /// Prepare a convolver for waveforms of `kernel.len()` samples
    pub fn new(kernel: &[f64]) -> Self {
        let nticks = kernel.len();
        // Full linear convolution needs 2n - 1 points
        let size = (2 * nticks).saturating_sub(1).max(1).next_power_of_two();

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        let mut kernel_spectrum = vec![Complex::new(0.0, 0.0); size];
        for (slot, &k) in kernel_spectrum.iter_mut().zip(kernel) {
            *slot = Complex::new(k, 0.0);
        }
        forward.process(&mut kernel_spectrum);

        Self {
            nticks,
            forward,
            inverse,
            kernel_spectrum,
            buffer: vec![Complex::new(0.0, 0.0); size],
        }
    }

    /// Convolve `wave` in place, keeping its first `nticks` samples
    pub fn convolve<'a, I>(&mut self, wave: I)
    where
        I: IntoIterator<Item = &'a mut f64>,
    {
        let mut samples: Vec<&mut f64> = wave.into_iter().collect();
        debug_assert_eq!(samples.len(), self.nticks);

        for slot in self.buffer.iter_mut() {
            *slot = Complex::new(0.0, 0.0);
        }
        for (slot, value) in self.buffer.iter_mut().zip(samples.iter()) {
            *slot = Complex::new(**value, 0.0);
        }

        self.forward.process(&mut self.buffer);
        for (b, k) in self.buffer.iter_mut().zip(&self.kernel_spectrum) {
            *b *= *k;
        }
        self.inverse.process(&mut self.buffer);

        let norm = 1.0 / self.buffer.len() as f64;
        for (value, b) in samples.iter_mut().zip(&self.buffer) {
            **value = b.re * norm;
        }
    }
}

/// Smear every channel of `frame` with a Gaussian of `sigma` ticks
pub fn smear_ticks(frame: &mut Frame, sigma: f64, nsigma: f64) -> Result<(), FrameError> {
    log::info!("smear: tot sig {}", frame.total());

    let kernel = gaussian_kernel(sigma, nsigma, frame.nticks())?;
    let mut convolver = TickConvolver::new(&kernel);
    for mut row in frame.samples_mut().rows_mut() {
        convolver.convolve(row.iter_mut());
    }

    log::debug!("smear: tot sig after {}", frame.total());
    Ok(())
}
