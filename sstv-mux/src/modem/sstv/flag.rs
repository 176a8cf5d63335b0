//! Flag row encoding
//!
//! A flag segment is a short sub-scanline that carries one row of the flag
//! image. It is bracketed by two sync tones, and its pixels are plain tones
//! in a frequency band that is narrower than the cover's.

use std::collections::TryReserveError;

use crate::{
    modem::sstv::ProtocolConfig,
    symbol::{
        AudioSymbol,
        SymbolError,
        SymbolSequence,
    },
};

/// Share of the segment taken by each of the two sync tones.
pub const SYNC_FRACTION: f64 = 0.15;

/// Share of the segment taken by the pixel tones together.
pub const PIXEL_FRACTION: f64 = 0.70;

#[derive(Debug, thiserror::Error)]
pub enum FlagError {
    #[error("flag row has no pixels")]
    EmptyRow,
    #[error("invalid flag symbol")]
    Symbol(#[from] SymbolError),
    #[error("could not allocate flag row")]
    Allocation(#[from] TryReserveError),
}

/// Encodes one flag row into `pixels.len() + 2` symbols spanning
/// `segment_time` seconds.
pub fn encode_row(
    pixels: &[u8],
    segment_time: f64,
    config: &ProtocolConfig,
) -> Result<SymbolSequence, FlagError> {
    if pixels.is_empty() {
        tracing::error!("flag row has no pixels");
        return Err(FlagError::EmptyRow);
    }

    encode_segment(pixels, segment_time, config)
        .inspect_err(|error| tracing::error!(?error, segment_time, "could not encode flag row"))
}

fn encode_segment(
    pixels: &[u8],
    segment_time: f64,
    config: &ProtocolConfig,
) -> Result<SymbolSequence, FlagError> {
    let sync_time = segment_time * SYNC_FRACTION;
    let pixel_time = segment_time * PIXEL_FRACTION / pixels.len() as f64;

    let sync = AudioSymbol::tone(sync_time, config.flag_sync_tone, config.amplitude, 0.0)?;

    let mut symbols = SymbolSequence::with_capacity(pixels.len() + 2)?;
    symbols.push(sync);
    for value in pixels {
        symbols.push(AudioSymbol::tone(
            pixel_time,
            config.flag_frequency(*value),
            config.amplitude,
            0.0,
        )?);
    }
    symbols.push(sync);

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        modem::sstv::{
            ProtocolConfig,
            flag::{
                FlagError,
                encode_row,
            },
        },
        symbol::AudioSymbol,
    };

    fn frequency(symbol: &AudioSymbol) -> f64 {
        match symbol {
            AudioSymbol::Tone { frequency, .. } => *frequency,
            _ => panic!("expected tone, got {symbol:?}"),
        }
    }

    #[test]
    fn it_returns_two_more_symbols_than_pixels() {
        let config = ProtocolConfig::DEFAULT;
        for width in [1, 2, 7, 16, 100] {
            let pixels = vec![42u8; width];
            let symbols = encode_row(&pixels, 0.0464, &config).unwrap();
            assert_eq!(symbols.len(), width + 2);
            assert_abs_diff_eq!(symbols.total_duration(), 0.0464, epsilon = 1e-12);
        }
    }

    #[test]
    fn it_splits_the_segment_15_70_15() {
        let config = ProtocolConfig::DEFAULT;
        let symbols = encode_row(&[0; 16], 0.0464, &config).unwrap();
        let symbols = symbols.as_slice();

        assert_abs_diff_eq!(symbols[0].duration(), 0.0464 * 0.15, epsilon = 1e-15);
        assert_abs_diff_eq!(symbols[17].duration(), 0.0464 * 0.15, epsilon = 1e-15);
        for symbol in &symbols[1..17] {
            assert_abs_diff_eq!(symbol.duration(), 0.0464 * 0.7 / 16.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn pixels_map_into_the_flag_band() {
        let config = ProtocolConfig::DEFAULT;
        let symbols = encode_row(&[0, 128, 255], 0.0464, &config).unwrap();
        let frequencies = symbols.iter().map(frequency).collect::<Vec<_>>();

        assert_eq!(frequencies[0], 2300.0);
        assert_eq!(frequencies[1], 1550.0);
        assert_abs_diff_eq!(frequencies[2], 1550.0 + 700.0 * 128.0 / 255.0, epsilon = 1e-9);
        assert_eq!(frequencies[3], 2250.0);
        assert_eq!(frequencies[4], 2300.0);
    }

    #[test]
    fn empty_row_is_rejected() {
        assert!(matches!(
            encode_row(&[], 0.0464, &ProtocolConfig::DEFAULT),
            Err(FlagError::EmptyRow)
        ));
    }

    #[test]
    fn invalid_segment_time_is_rejected() {
        assert!(matches!(
            encode_row(&[1, 2, 3], -0.0464, &ProtocolConfig::DEFAULT),
            Err(FlagError::Symbol(_))
        ));
    }

    #[test]
    fn invalid_pixel_tone_is_rejected() {
        let config = ProtocolConfig {
            flag_low_tone: 0.0,
            ..ProtocolConfig::DEFAULT
        };
        assert!(matches!(
            encode_row(&[0, 255], 0.0464, &config),
            Err(FlagError::Symbol(_))
        ));
    }
}
