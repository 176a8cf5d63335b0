//! Protocol configuration
//!
//! All timing, frequency and geometry constants of the encoder are collected
//! in [`ProtocolConfig`], which is passed by reference into every component.
//! [`ProtocolConfig::DEFAULT`] is the single mode this crate transmits.

use std::ops::Range;

use crate::{
    modem::sstv::{
        CHANNEL_HIGH_TONE,
        CHANNEL_LOW_TONE,
        EOF_TONE_TIME,
        FLAG_HIGH_TONE,
        FLAG_LOW_TONE,
        FLAG_SEGMENT_TIME,
        FLAG_SYNC_TONE,
        LEADER_TONE,
        PORCH_TONE,
        SAMPLE_RATE,
        SCANLINE_TIME,
        SILENCE_TIME,
        SYNC_TIME,
        SYNC_TONE,
        VIS_BIT_TIME,
        VIS_HIGH_TONE,
        VIS_LOW_TONE,
        VIS_SHORT_TIME,
        VOX_HIGH_TONE,
        VOX_LOW_TONE,
        VOX_TONE_TIME,
    },
    util::intensity_to_frequency,
};

/// One entry of a fixed header or trailer tone table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderTone {
    pub frequency: f64,
    pub duration: f64,
}

impl HeaderTone {
    #[inline]
    pub const fn new(frequency: f64, duration: f64) -> Self {
        Self {
            frequency,
            duration,
        }
    }
}

pub const VOX_TONES: [HeaderTone; 8] = [
    HeaderTone::new(LEADER_TONE, VOX_TONE_TIME),
    HeaderTone::new(VOX_LOW_TONE, VOX_TONE_TIME),
    HeaderTone::new(LEADER_TONE, VOX_TONE_TIME),
    HeaderTone::new(VOX_LOW_TONE, VOX_TONE_TIME),
    HeaderTone::new(VOX_HIGH_TONE, VOX_TONE_TIME),
    HeaderTone::new(VOX_LOW_TONE, VOX_TONE_TIME),
    HeaderTone::new(VOX_HIGH_TONE, VOX_TONE_TIME),
    HeaderTone::new(VOX_LOW_TONE, VOX_TONE_TIME),
];

/// Leader, break, leader, start bit, 10 data bits, stop bit.
pub const VIS_TONES: [HeaderTone; 15] = [
    HeaderTone::new(LEADER_TONE, VIS_BIT_TIME),
    HeaderTone::new(SYNC_TONE, VIS_SHORT_TIME),
    HeaderTone::new(LEADER_TONE, VIS_BIT_TIME),
    HeaderTone::new(SYNC_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_HIGH_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_LOW_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_HIGH_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_LOW_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_HIGH_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_LOW_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_HIGH_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_LOW_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_HIGH_TONE, VIS_BIT_TIME),
    HeaderTone::new(VIS_LOW_TONE, VIS_BIT_TIME),
    HeaderTone::new(SYNC_TONE, VIS_SHORT_TIME),
];

pub const EOF_TONES: [HeaderTone; 4] = [
    HeaderTone::new(LEADER_TONE, EOF_TONE_TIME),
    HeaderTone::new(VOX_LOW_TONE, EOF_TONE_TIME),
    HeaderTone::new(LEADER_TONE, EOF_TONE_TIME),
    HeaderTone::new(VOX_LOW_TONE, EOF_TONE_TIME),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProtocolConfig {
    pub sample_rate: u32,
    pub amplitude: f64,
    pub silence_time: f64,

    /// Geometry the frame is assembled for, independent of the size of the
    /// image that was actually loaded.
    pub cover_width: usize,
    pub cover_height: usize,
    pub scanline_time: f64,
    pub sync_tone: f64,
    pub sync_time: f64,
    pub porch_tone: f64,
    pub channel_low_tone: f64,
    pub channel_high_tone: f64,

    pub flag_width: usize,
    pub flag_height: usize,
    /// First cover line that carries a flag row.
    pub flag_top: usize,
    pub flag_segment_time: f64,
    pub flag_sync_tone: f64,
    pub flag_low_tone: f64,
    pub flag_high_tone: f64,

    pub vox_tones: &'static [HeaderTone],
    pub vis_tones: &'static [HeaderTone],
    pub eof_tones: &'static [HeaderTone],
}

impl ProtocolConfig {
    pub const DEFAULT: Self = Self {
        sample_rate: SAMPLE_RATE,
        amplitude: 1.0,
        silence_time: SILENCE_TIME,
        cover_width: 320,
        cover_height: 256,
        scanline_time: SCANLINE_TIME,
        sync_tone: SYNC_TONE,
        sync_time: SYNC_TIME,
        porch_tone: PORCH_TONE,
        channel_low_tone: CHANNEL_LOW_TONE,
        channel_high_tone: CHANNEL_HIGH_TONE,
        flag_width: 16,
        flag_height: 16,
        flag_top: 44,
        flag_segment_time: FLAG_SEGMENT_TIME,
        flag_sync_tone: FLAG_SYNC_TONE,
        flag_low_tone: FLAG_LOW_TONE,
        flag_high_tone: FLAG_HIGH_TONE,
        vox_tones: &VOX_TONES,
        vis_tones: &VIS_TONES,
        eof_tones: &EOF_TONES,
    };

    /// Duration of one cover pixel within a channel scanline.
    #[inline]
    pub fn pixel_time(&self) -> f64 {
        self.scanline_time / self.cover_width as f64
    }

    #[inline]
    pub fn porch_time(&self) -> f64 {
        self.pixel_time() / 2.0
    }

    /// Cover lines that carry a flag row.
    #[inline]
    pub fn flag_rows(&self) -> Range<usize> {
        self.flag_top..self.flag_top.saturating_add(self.flag_height)
    }

    /// Flag row carried by cover line `y`, if any.
    #[inline]
    pub fn flag_row(&self, y: usize) -> Option<usize> {
        self.flag_rows().contains(&y).then(|| y - self.flag_top)
    }

    #[inline]
    pub fn channel_frequency(&self, value: u8) -> f64 {
        intensity_to_frequency(value, self.channel_low_tone, self.channel_high_tone)
    }

    #[inline]
    pub fn flag_frequency(&self, value: u8) -> f64 {
        intensity_to_frequency(value, self.flag_low_tone, self.flag_high_tone)
    }
}

impl Default for ProtocolConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::modem::sstv::config::ProtocolConfig;

    #[test]
    fn flag_band_is_mapped_to_flag_rows() {
        let config = ProtocolConfig::DEFAULT;
        assert_eq!(config.flag_rows(), 44..60);
        assert_eq!(config.flag_row(43), None);
        assert_eq!(config.flag_row(44), Some(0));
        assert_eq!(config.flag_row(59), Some(15));
        assert_eq!(config.flag_row(60), None);
    }

    #[test]
    fn derived_timings() {
        let config = ProtocolConfig::DEFAULT;
        assert_abs_diff_eq!(config.pixel_time(), 0.13974 / 320.0);
        assert_abs_diff_eq!(config.porch_time(), 0.13974 / 640.0);
    }

    #[test]
    fn header_tables_have_fixed_lengths() {
        let config = ProtocolConfig::default();
        assert_eq!(config.vox_tones.len(), 8);
        assert_eq!(config.vis_tones.len(), 15);
        assert_eq!(config.eof_tones.len(), 4);
    }
}
