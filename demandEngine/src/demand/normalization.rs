use crate::config::constants::NORMALIZED_MAX;

/// Compresses a raw demand onto 0..=100 against the decade maximum:
/// `round(100 * (raw / max_raw)^exponent)`.
pub fn normalize(raw: f64, max_raw: f64, exponent: f64) -> u8 {
    if !(raw > 0.0 && max_raw > 0.0) {
        return 0;
    }
    let ratio = (raw / max_raw).min(1.0);
    (NORMALIZED_MAX * ratio.powf(exponent)).round().clamp(0.0, NORMALIZED_MAX) as u8
}

/// Normalized value, or `None` when it falls below `threshold`.
pub fn normalize_above(raw: f64, max_raw: f64, exponent: f64, threshold: u8) -> Option<u8> {
    let value = normalize(raw, max_raw, exponent);
    (value >= threshold && value > 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximum_maps_to_hundred() {
        assert_eq!(normalize(42.5, 42.5, 0.25), 100);
        assert_eq!(normalize(1e-300, 1e-300, 0.25), 100);
    }

    #[test]
    fn test_fourth_root_compression() {
        // (1/16)^0.25 = 0.5
        assert_eq!(normalize(1.0, 16.0, 0.25), 50);
        // (1/10000)^0.25 = 0.1
        assert_eq!(normalize(1.0, 10_000.0, 0.25), 10);
        assert_eq!(normalize(0.0, 10.0, 0.25), 0);
    }

    #[test]
    fn test_threshold_drops_small_values() {
        // (1e-8)^0.25 = 0.01 -> 1
        assert_eq!(normalize_above(1.0, 1e8, 0.25, 3), None);
        // (1e-6)^0.25 ~ 0.0316 -> 3
        assert_eq!(normalize_above(1.0, 1e6, 0.25, 3), Some(3));
        assert_eq!(normalize_above(0.0, 1e6, 0.25, 0), None);
    }
}
