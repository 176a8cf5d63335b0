//! Frame assembly
//!
//! Each cover line is sent as three channel scanlines. A channel scanline is
//!
//! ```plain
//! sync | porch | sweep(p0 -> p1) | ... | sweep(p[w-2] -> p[w-1]) | porch
//! ```
//!
//! and is followed by a flag segment if the line lies inside the flag band.

use std::collections::TryReserveError;

use crate::{
    modem::sstv::{
        ProtocolConfig,
        flag::{
            FlagError,
            encode_row,
        },
        image::{
            Channel,
            FrameBuffer,
        },
    },
    symbol::{
        AudioSymbol,
        SymbolError,
        SymbolSequence,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid frame symbol")]
    Symbol(#[from] SymbolError),
    #[error("could not encode flag row {row}")]
    FlagRow {
        row: usize,
        #[source]
        source: FlagError,
    },
    #[error("could not allocate frame symbols")]
    Allocation(#[from] TryReserveError),
}

/// Number of symbols [`assemble_frame`] produces for `config`.
///
/// Flag lines past the last cover line are never sent, so they don't count.
pub fn max_frame_symbols(config: &ProtocolConfig) -> usize {
    let num_channels = Channel::ALL.len();

    // sync, leading porch, sweeps, trailing porch
    let scanline = 3 + config.cover_width.saturating_sub(1);

    let flag_rows = config.flag_rows();
    let num_flag_lines = flag_rows.end.min(config.cover_height)
        - flag_rows.start.min(config.cover_height);
    let flag_segment = config.flag_width + 2;

    config.cover_height * num_channels * scanline + num_flag_lines * num_channels * flag_segment
}

/// Builds the image data part of the transmission.
///
/// `cover` is scanned with the geometry from `config`, regardless of its own
/// size. Pixels outside of the cover or flag image read as 0.
pub fn assemble_frame<C, F>(
    cover: &C,
    flag: &F,
    config: &ProtocolConfig,
) -> Result<SymbolSequence, FrameError>
where
    C: FrameBuffer,
    F: FrameBuffer,
{
    assemble_frame_inner(cover, flag, config)
        .inspect_err(|error| tracing::error!(?error, "frame assembly failed"))
}

fn assemble_frame_inner<C, F>(
    cover: &C,
    flag: &F,
    config: &ProtocolConfig,
) -> Result<SymbolSequence, FrameError>
where
    C: FrameBuffer,
    F: FrameBuffer,
{
    let capacity = max_frame_symbols(config);
    let mut symbols = SymbolSequence::with_capacity(capacity)?;

    let pixel_time = config.pixel_time();
    let sync = AudioSymbol::tone(config.sync_time, config.sync_tone, config.amplitude, 0.0)?;
    let porch = AudioSymbol::tone(config.porch_time(), config.porch_tone, config.amplitude, 0.0)?;

    // covers with less than 3 channels repeat their last channel
    let last_channel = cover.channel_count().saturating_sub(1);

    let mut flag_pixels = Vec::new();
    flag_pixels.try_reserve_exact(config.flag_width)?;

    for y in 0..config.cover_height {
        for channel in Channel::ALL {
            let channel = channel.index().min(last_channel);
            let intensity = |x| cover.sample(x, y, channel).unwrap_or(0);

            symbols.push(sync);
            symbols.push(porch);

            let mut previous = intensity(0);
            for x in 1..config.cover_width {
                let next = intensity(x);
                symbols.push(AudioSymbol::sweep(
                    pixel_time,
                    config.channel_frequency(previous),
                    config.channel_frequency(next),
                    config.amplitude,
                    0.0,
                )?);
                previous = next;
            }

            symbols.push(porch);

            if let Some(row) = config.flag_row(y) {
                flag_pixels.clear();
                flag_pixels
                    .extend((0..config.flag_width).map(|x| flag.sample(x, row, 0).unwrap_or(0)));

                let segment = encode_row(&flag_pixels, config.flag_segment_time, config)
                    .map_err(|source| FrameError::FlagRow { row, source })?;
                symbols.append(segment)?;
            }
        }
    }

    assert!(
        symbols.len() <= capacity,
        "frame has {} symbols, but the bound is {capacity}",
        symbols.len()
    );
    tracing::debug!(num_symbols = symbols.len(), capacity, "assembled frame");

    Ok(symbols)
}
