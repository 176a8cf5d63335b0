use std::collections::TryReserveError;

use crate::{
    modem::sstv::{
        ProtocolConfig,
        frame::{
            FrameError,
            assemble_frame,
        },
        header::{
            eof_tones,
            vis_header,
            vox_tones,
        },
        image::FrameBuffer,
    },
    symbol::{
        AudioSymbol,
        SymbolError,
        SymbolSequence,
    },
    synth::{
        Pcm,
        RenderError,
        render,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum TransmissionError {
    #[error("invalid header symbol")]
    Symbol(#[from] SymbolError),
    #[error("frame assembly failed")]
    Frame(#[from] FrameError),
    #[error("rendering failed")]
    Render(#[from] RenderError),
    #[error("could not allocate transmission")]
    Allocation(#[from] TryReserveError),
}

/// Builds the complete symbol sequence:
///
/// ```plain
/// silence | vox | vis | frame | eof | silence
/// ```
pub fn build_transmission<C, F>(
    cover: &C,
    flag: &F,
    config: &ProtocolConfig,
) -> Result<SymbolSequence, TransmissionError>
where
    C: FrameBuffer,
    F: FrameBuffer,
{
    build_transmission_inner(cover, flag, config)
        .inspect_err(|error| tracing::error!(?error, "could not build transmission"))
}

fn build_transmission_inner<C, F>(
    cover: &C,
    flag: &F,
    config: &ProtocolConfig,
) -> Result<SymbolSequence, TransmissionError>
where
    C: FrameBuffer,
    F: FrameBuffer,
{
    let silence = AudioSymbol::silence(config.silence_time)?;
    let vox = vox_tones(config)?;
    let vis = vis_header(config)?;
    let frame = assemble_frame(cover, flag, config)?;
    let eof = eof_tones(config)?;

    let mut transmission =
        SymbolSequence::with_capacity(vox.len() + vis.len() + frame.len() + eof.len() + 2)?;
    transmission.push(silence);
    transmission.append(vox)?;
    transmission.append(vis)?;
    transmission.append(frame)?;
    transmission.append(eof)?;
    transmission.push(silence);

    tracing::info!(
        num_symbols = transmission.len(),
        duration = transmission.total_duration(),
        "built transmission"
    );

    Ok(transmission)
}

/// Builds and renders the complete transmission.
pub fn encode_transmission<C, F>(
    cover: &C,
    flag: &F,
    config: &ProtocolConfig,
) -> Result<Pcm, TransmissionError>
where
    C: FrameBuffer,
    F: FrameBuffer,
{
    let transmission = build_transmission(cover, flag, config)?;
    let pcm = render(&transmission, config.sample_rate)?;

    if pcm.truncated_symbols() > 0 {
        tracing::warn!(
            truncated_symbols = pcm.truncated_symbols(),
            "some symbols were truncated"
        );
    }
    tracing::info!(
        num_samples = pcm.len(),
        duration = pcm.duration(),
        "rendered transmission"
    );

    Ok(pcm)
}

#[cfg(test)]
mod tests {
    use crate::{
        modem::sstv::{
            ProtocolConfig,
            frame::max_frame_symbols,
            image::Raster,
            transmission::{
                TransmissionError,
                build_transmission,
                encode_transmission,
            },
        },
        symbol::AudioSymbol,
    };

    fn small_config() -> ProtocolConfig {
        ProtocolConfig {
            sample_rate: 8000,
            cover_width: 16,
            cover_height: 8,
            flag_width: 4,
            flag_height: 4,
            flag_top: 2,
            ..ProtocolConfig::DEFAULT
        }
    }

    #[test]
    fn it_concatenates_all_parts() {
        let config = small_config();
        let cover = Raster::filled(16, 8, 3, 200);
        let flag = Raster::filled(4, 4, 1, 50);

        let transmission = build_transmission(&cover, &flag, &config).unwrap();
        let frame_len = max_frame_symbols(&config);
        assert_eq!(transmission.len(), 1 + 8 + 15 + frame_len + 4 + 1);

        let symbols = transmission.as_slice();
        assert_eq!(symbols[0], AudioSymbol::Silence { duration: 0.1 });
        assert_eq!(symbols[symbols.len() - 1], AudioSymbol::Silence { duration: 0.1 });

        // last vis tone is the stop bit, followed by the first line sync
        assert!(matches!(
            symbols[1 + 8 + 14],
            AudioSymbol::Tone { frequency, duration, .. } if frequency == 1200.0 && duration == 0.01
        ));
        assert!(matches!(
            symbols[1 + 8 + 15],
            AudioSymbol::Tone { frequency, duration, .. } if frequency == 1200.0 && duration == 0.009
        ));
    }

    #[test]
    fn encoding_is_deterministic() {
        let config = small_config();
        let cover = Raster::from_fn(16, 8, 3, |x, y, c| (x * 13 + y * 7 + c * 50) as u8);
        let flag = Raster::from_fn(4, 4, 1, |x, y, _| (x * 60 + y) as u8);

        let a = encode_transmission(&cover, &flag, &config).unwrap();
        let b = encode_transmission(&cover, &flag, &config).unwrap();
        assert_eq!(a.samples(), b.samples());
        assert_eq!(a.truncated_symbols(), 0);

        let transmission = build_transmission(&cover, &flag, &config).unwrap();
        assert_eq!(
            a.len() as u64,
            transmission.num_samples(config.sample_rate)
        );
    }

    #[test]
    fn invalid_silence_time_is_rejected() {
        let config = ProtocolConfig {
            silence_time: f64::NAN,
            ..small_config()
        };
        let cover = Raster::filled(16, 8, 3, 0);
        let flag = Raster::filled(4, 4, 1, 0);

        assert!(matches!(
            build_transmission(&cover, &flag, &config),
            Err(TransmissionError::Symbol(_))
        ));
        assert!(matches!(
            encode_transmission(&cover, &flag, &config),
            Err(TransmissionError::Symbol(_))
        ));
    }

    #[test]
    fn frame_errors_are_propagated() {
        let config = ProtocolConfig {
            flag_width: 0,
            ..small_config()
        };
        let cover = Raster::filled(16, 8, 3, 0);
        let flag = Raster::filled(4, 4, 1, 0);

        assert!(matches!(
            build_transmission(&cover, &flag, &config),
            Err(TransmissionError::Frame(_))
        ));
    }
}
