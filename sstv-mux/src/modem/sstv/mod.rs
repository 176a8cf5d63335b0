//! Color SSTV encoder with an embedded flag image.
//!
//! The cover image is sent line by line, one scanline per color channel. A
//! band of cover lines additionally carries one row of the flag image after
//! each channel scanline.
//!
//! # References
//!
//! - <http://lionel.cordesses.free.fr/gpages/sstv.html>
//! - <http://www.barberdsp.com/downloads/Dayton%20Paper.pdf>

pub mod config;
pub mod flag;
pub mod frame;
pub mod header;
pub mod image;
pub mod transmission;

pub use config::{
    HeaderTone,
    ProtocolConfig,
};

pub const SAMPLE_RATE: u32 = 96000;

pub const LEADER_TONE: f64 = 1900.0;

pub const VOX_LOW_TONE: f64 = 1500.0;
pub const VOX_HIGH_TONE: f64 = 2300.0;
pub const VOX_TONE_TIME: f64 = 0.1;

pub const VIS_BIT_TIME: f64 = 0.030;
pub const VIS_SHORT_TIME: f64 = 0.010;
pub const VIS_LOW_TONE: f64 = 1300.0;
pub const VIS_HIGH_TONE: f64 = 1100.0;

pub const EOF_TONE_TIME: f64 = 0.1;

pub const SILENCE_TIME: f64 = 0.1;

// sync, leader break, vis start/stop
pub const SYNC_TONE: f64 = 1200.0;
pub const SYNC_TIME: f64 = 0.009;

pub const PORCH_TONE: f64 = 1500.0;

pub const CHANNEL_LOW_TONE: f64 = 1500.0;
pub const CHANNEL_HIGH_TONE: f64 = 2300.0;
pub const SCANLINE_TIME: f64 = 0.13974;

pub const FLAG_SYNC_TONE: f64 = 2300.0;
pub const FLAG_LOW_TONE: f64 = 1550.0;
pub const FLAG_HIGH_TONE: f64 = 2250.0;
pub const FLAG_SEGMENT_TIME: f64 = 0.0464;
