/// Maps an 8-bit intensity linearly onto the frequency band `[low, high]`.
///
/// 0 maps to `low` and 255 maps to `high`.
#[inline(always)]
pub fn intensity_to_frequency(value: u8, low: f64, high: f64) -> f64 {
    low + (high - low) * f64::from(value) / 255.0
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::util::intensity_to_frequency;

    #[test]
    fn it_maps_band_edges_exactly() {
        assert_eq!(intensity_to_frequency(0, 1500.0, 2300.0), 1500.0);
        assert_eq!(intensity_to_frequency(255, 1500.0, 2300.0), 2300.0);
        assert_eq!(intensity_to_frequency(0, 1550.0, 2250.0), 1550.0);
        assert_eq!(intensity_to_frequency(255, 1550.0, 2250.0), 2250.0);
    }

    #[test]
    fn it_maps_linearly() {
        assert_abs_diff_eq!(
            intensity_to_frequency(128, 1500.0, 2300.0),
            1500.0 + 800.0 * 128.0 / 255.0,
            epsilon = 1e-9
        );

        let frequencies = (0..=255u8)
            .map(|value| intensity_to_frequency(value, 1500.0, 2300.0))
            .collect::<Vec<_>>();
        for pair in frequencies.windows(2) {
            assert!(pair[1] > pair[0]);
            assert_abs_diff_eq!(pair[1] - pair[0], 800.0 / 255.0, epsilon = 1e-9);
        }
    }
}
