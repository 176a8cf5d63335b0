//! Audio symbols
//!
//! A transmission is described as a flat sequence of [`AudioSymbol`]s before
//! any samples are synthesized. Symbols are plain values: once constructed
//! they are never modified, only collected into a [`SymbolSequence`].

use std::{
    collections::TryReserveError,
    slice,
    vec,
};

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum SymbolError {
    #[error("invalid symbol duration: {duration} s")]
    Duration { duration: f64 },
    #[error("invalid symbol frequency: {frequency} Hz")]
    Frequency { frequency: f64 },
    #[error("symbol amplitude out of range: {amplitude}")]
    Amplitude { amplitude: f64 },
    #[error("invalid symbol phase offset: {phase_offset} rad")]
    PhaseOffset { phase_offset: f64 },
}

/// A single synthesizable audio event.
///
/// Durations are in seconds, frequencies in Hz, phase offsets in radians.
/// The phase offset is added to the oscillator phase carried over from the
/// previous symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioSymbol {
    Silence {
        duration: f64,
    },
    Tone {
        duration: f64,
        frequency: f64,
        amplitude: f64,
        phase_offset: f64,
    },
    LinearSweep {
        duration: f64,
        start_frequency: f64,
        end_frequency: f64,
        amplitude: f64,
        phase_offset: f64,
    },
}

impl AudioSymbol {
    pub fn silence(duration: f64) -> Result<Self, SymbolError> {
        check_duration(duration)?;
        Ok(Self::Silence { duration })
    }

    pub fn tone(
        duration: f64,
        frequency: f64,
        amplitude: f64,
        phase_offset: f64,
    ) -> Result<Self, SymbolError> {
        check_duration(duration)?;
        check_frequency(frequency)?;
        check_amplitude(amplitude)?;
        check_phase_offset(phase_offset)?;
        Ok(Self::Tone {
            duration,
            frequency,
            amplitude,
            phase_offset,
        })
    }

    pub fn sweep(
        duration: f64,
        start_frequency: f64,
        end_frequency: f64,
        amplitude: f64,
        phase_offset: f64,
    ) -> Result<Self, SymbolError> {
        check_duration(duration)?;
        check_frequency(start_frequency)?;
        check_frequency(end_frequency)?;
        check_amplitude(amplitude)?;
        check_phase_offset(phase_offset)?;
        Ok(Self::LinearSweep {
            duration,
            start_frequency,
            end_frequency,
            amplitude,
            phase_offset,
        })
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        match self {
            Self::Silence { duration } => *duration,
            Self::Tone { duration, .. } => *duration,
            Self::LinearSweep { duration, .. } => *duration,
        }
    }

    /// Number of samples this symbol renders to: `round(duration * sample_rate)`.
    #[inline]
    pub fn num_samples(&self, sample_rate: u32) -> u64 {
        // float-to-int casts saturate, so absurd durations end up at u64::MAX
        (self.duration() * f64::from(sample_rate)).round() as u64
    }
}

#[inline]
fn check_duration(duration: f64) -> Result<(), SymbolError> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(())
    }
    else {
        Err(SymbolError::Duration { duration })
    }
}

#[inline]
fn check_frequency(frequency: f64) -> Result<(), SymbolError> {
    if frequency.is_finite() && frequency > 0.0 {
        Ok(())
    }
    else {
        Err(SymbolError::Frequency { frequency })
    }
}

#[inline]
fn check_amplitude(amplitude: f64) -> Result<(), SymbolError> {
    if (0.0..=1.0).contains(&amplitude) {
        Ok(())
    }
    else {
        Err(SymbolError::Amplitude { amplitude })
    }
}

#[inline]
fn check_phase_offset(phase_offset: f64) -> Result<(), SymbolError> {
    if phase_offset.is_finite() {
        Ok(())
    }
    else {
        Err(SymbolError::PhaseOffset { phase_offset })
    }
}

/// Owned, ordered list of symbols.
///
/// Sequences are built by one generator and then either rendered or appended
/// into a larger sequence. Dropping a sequence releases all of its symbols.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolSequence {
    symbols: Vec<AudioSymbol>,
}

impl SymbolSequence {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence with room for exactly `capacity` symbols.
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut symbols = Vec::new();
        symbols.try_reserve_exact(capacity)?;
        Ok(Self { symbols })
    }

    #[inline]
    pub fn push(&mut self, symbol: AudioSymbol) {
        self.symbols.push(symbol);
    }

    /// Moves all symbols of `other` to the end of this sequence.
    pub fn append(&mut self, other: SymbolSequence) -> Result<(), TryReserveError> {
        self.symbols.try_reserve(other.len())?;
        self.symbols.extend(other.symbols);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[AudioSymbol] {
        &self.symbols
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, AudioSymbol> {
        self.symbols.iter()
    }

    pub fn total_duration(&self) -> f64 {
        self.symbols.iter().map(AudioSymbol::duration).sum()
    }

    /// Sum of the per-symbol sample counts, saturating at `u64::MAX`.
    pub fn num_samples(&self, sample_rate: u32) -> u64 {
        self.symbols.iter().fold(0u64, |total, symbol| {
            total.saturating_add(symbol.num_samples(sample_rate))
        })
    }
}

impl FromIterator<AudioSymbol> for SymbolSequence {
    fn from_iter<T: IntoIterator<Item = AudioSymbol>>(iter: T) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SymbolSequence {
    type Item = AudioSymbol;
    type IntoIter = vec::IntoIter<AudioSymbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

impl<'a> IntoIterator for &'a SymbolSequence {
    type Item = &'a AudioSymbol;
    type IntoIter = slice::Iter<'a, AudioSymbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
