//! Encodes a cover image with an embedded flag image as a color SSTV
//! transmission.
//!
//! The transmission is first described as a [`SymbolSequence`] of tones,
//! sweeps and silences, which is then rendered into 16-bit PCM in one go.
//!
//! ```no_run
//! use sstv_mux::{
//!     modem::sstv::{
//!         ProtocolConfig,
//!         image::{
//!             load_cover,
//!             load_flag,
//!         },
//!         transmission::encode_transmission,
//!     },
//!     sink::file::write_wav,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProtocolConfig::DEFAULT;
//! let cover = load_cover("input1.png", &config)?;
//! let flag = load_flag("input2.png", &config)?;
//! let pcm = encode_transmission(&cover, &flag, &config)?;
//! write_wav("output_aprimorado.wav", &pcm)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`SymbolSequence`]: symbol::SymbolSequence

pub mod modem;
pub mod sink;
pub mod symbol;
pub mod synth;
pub mod util;
