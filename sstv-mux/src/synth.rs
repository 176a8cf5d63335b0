//! Sample synthesis
//!
//! Renders a [`SymbolSequence`] into 16-bit PCM in one pass. A single
//! [`Oscillator`] is shared by all symbols, so every tone or sweep starts at
//! the phase the previous one ended on.

use std::{
    collections::TryReserveError,
    f64::consts::TAU,
};

use crate::symbol::{
    AudioSymbol,
    SymbolSequence,
};

/// Largest sample magnitude written to the output.
pub const FULL_SCALE: f64 = i16::MAX as f64;

/// Maximum number of samples a single render may produce.
///
/// The RIFF chunk size of a mono 16-bit WAV file is `36 + 2 * num_samples`
/// and has to fit into a `u32`.
pub const MAX_SAMPLES: u64 = (u32::MAX as u64 - 36) / 2;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no symbols to render")]
    Empty,
    #[error("total duration of the symbol sequence is zero")]
    ZeroLength,
    #[error("{num_samples} samples exceed the limit of {limit} samples")]
    TooManySamples { num_samples: u64, limit: u64 },
    #[error("could not allocate sample buffer")]
    Allocation(#[from] TryReserveError),
}

#[inline]
fn step_from_frequency_and_sample_rate(frequency: f64, sample_rate: f64) -> f64 {
    TAU * frequency / sample_rate
}

#[inline]
fn quantize(value: f64) -> i16 {
    (value * FULL_SCALE).round().clamp(-FULL_SCALE, FULL_SCALE) as i16
}

/// Phase-continuous sine oscillator.
#[derive(Clone, Copy, Debug)]
pub struct Oscillator {
    sample_rate: f64,
    phase: f64,
}

impl Oscillator {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: f64::from(sample_rate),
            phase: 0.0,
        }
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase.rem_euclid(TAU);
        self
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Fills `output` with a constant tone.
    ///
    /// The phase is computed in closed form from the start phase, and only
    /// advanced once at the end.
    pub fn tone(&mut self, output: &mut [i16], frequency: f64, amplitude: f64, phase_offset: f64) {
        if output.is_empty() {
            return;
        }

        let step = step_from_frequency_and_sample_rate(frequency, self.sample_rate);
        let start_phase = (self.phase + phase_offset).rem_euclid(TAU);

        for (j, sample) in output.iter_mut().enumerate() {
            *sample = quantize(amplitude * (j as f64 * step + start_phase).sin());
        }

        self.phase = (start_phase + output.len() as f64 * step).rem_euclid(TAU);
    }

    /// Fills `output` with a linear frequency sweep.
    ///
    /// `num_samples` is the nominal length of the sweep, which determines the
    /// slope of the frequency ramp. It may be larger than `output` when the
    /// symbol was truncated.
    pub fn sweep(
        &mut self,
        output: &mut [i16],
        start_frequency: f64,
        end_frequency: f64,
        amplitude: f64,
        phase_offset: f64,
        num_samples: usize,
    ) {
        if output.is_empty() {
            return;
        }

        let frequency_delta = end_frequency - start_frequency;
        let mut phase = (self.phase + phase_offset).rem_euclid(TAU);

        for (j, sample) in output.iter_mut().enumerate() {
            let frequency = start_frequency + frequency_delta * j as f64 / num_samples as f64;
            *sample = quantize(amplitude * phase.sin());
            phase = (phase + step_from_frequency_and_sample_rate(frequency, self.sample_rate))
                .rem_euclid(TAU);
        }

        self.phase = phase;
    }
}

/// Rendered mono 16-bit PCM.
#[derive(Clone, derive_more::Debug, PartialEq, Eq)]
pub struct Pcm {
    #[debug(skip)]
    samples: Vec<i16>,
    sample_rate: u32,
    truncated_symbols: usize,
}

impl Pcm {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            truncated_symbols: 0,
        }
    }

    #[inline]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of symbols that didn't fit into the buffer completely.
    #[inline]
    pub fn truncated_symbols(&self) -> usize {
        self.truncated_symbols
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub num_samples: usize,
    pub truncated_symbols: usize,
}

/// Renders `sequence` into a freshly allocated buffer.
pub fn render(sequence: &SymbolSequence, sample_rate: u32) -> Result<Pcm, RenderError> {
    if sequence.is_empty() {
        tracing::error!("no symbols to render");
        return Err(RenderError::Empty);
    }

    let num_samples = sequence.num_samples(sample_rate);
    if num_samples == 0 {
        tracing::error!(num_symbols = sequence.len(), "total duration is zero");
        return Err(RenderError::ZeroLength);
    }
    let too_many_samples = || {
        tracing::error!(num_samples, limit = MAX_SAMPLES, "too many samples");
        RenderError::TooManySamples {
            num_samples,
            limit: MAX_SAMPLES,
        }
    };
    if num_samples > MAX_SAMPLES {
        return Err(too_many_samples());
    }
    let num_samples = usize::try_from(num_samples).map_err(|_| too_many_samples())?;

    let mut samples = Vec::new();
    samples.try_reserve_exact(num_samples).map_err(|error| {
        tracing::error!(num_samples, "could not allocate sample buffer");
        error
    })?;
    samples.resize(num_samples, 0);

    tracing::debug!(num_symbols = sequence.len(), num_samples, sample_rate, "rendering");

    let mut oscillator = Oscillator::new(sample_rate);
    let summary = render_into(sequence, &mut oscillator, &mut samples, sample_rate);
    samples.truncate(summary.num_samples);

    Ok(Pcm {
        samples,
        sample_rate,
        truncated_symbols: summary.truncated_symbols,
    })
}

/// Renders `sequence` into a pre-sized buffer.
///
/// Symbols that don't fit are truncated to the remaining space. Nothing is
/// ever written past the end of `output`.
pub fn render_into(
    sequence: &SymbolSequence,
    oscillator: &mut Oscillator,
    output: &mut [i16],
    sample_rate: u32,
) -> RenderSummary {
    let mut summary = RenderSummary::default();

    for (index, symbol) in sequence.iter().enumerate() {
        let nominal = usize::try_from(symbol.num_samples(sample_rate)).unwrap_or(usize::MAX);
        let remaining = output.len() - summary.num_samples;

        let count = if nominal > remaining {
            tracing::warn!(
                index,
                num_samples = nominal,
                remaining,
                "sample buffer full, truncating symbol"
            );
            summary.truncated_symbols += 1;
            remaining
        }
        else {
            nominal
        };

        let buffer = &mut output[summary.num_samples..][..count];
        match *symbol {
            AudioSymbol::Silence { .. } => buffer.fill(0),
            AudioSymbol::Tone {
                frequency,
                amplitude,
                phase_offset,
                ..
            } => oscillator.tone(buffer, frequency, amplitude, phase_offset),
            AudioSymbol::LinearSweep {
                start_frequency,
                end_frequency,
                amplitude,
                phase_offset,
                ..
            } => {
                oscillator.sweep(
                    buffer,
                    start_frequency,
                    end_frequency,
                    amplitude,
                    phase_offset,
                    nominal,
                )
            }
        }

        summary.num_samples += count;
    }

    summary
}
