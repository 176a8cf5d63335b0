use crate::{
    modem::sstv::{
        HeaderTone,
        ProtocolConfig,
    },
    symbol::{
        AudioSymbol,
        SymbolError,
        SymbolSequence,
    },
};

/// Dual-tone activation burst sent before the header.
pub fn vox_tones(config: &ProtocolConfig) -> Result<SymbolSequence, SymbolError> {
    tone_burst(config.vox_tones, config.amplitude)
}

/// Mode identification header.
pub fn vis_header(config: &ProtocolConfig) -> Result<SymbolSequence, SymbolError> {
    tone_burst(config.vis_tones, config.amplitude)
}

/// End-of-frame burst sent after the last scanline.
pub fn eof_tones(config: &ProtocolConfig) -> Result<SymbolSequence, SymbolError> {
    tone_burst(config.eof_tones, config.amplitude)
}

fn tone_burst(table: &[HeaderTone], amplitude: f64) -> Result<SymbolSequence, SymbolError> {
    table
        .iter()
        .map(|tone| AudioSymbol::tone(tone.duration, tone.frequency, amplitude, 0.0))
        .collect::<Result<SymbolSequence, _>>()
        .inspect_err(|error| tracing::error!(?error, "invalid header tone"))
}
