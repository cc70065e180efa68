//! Display colors for the threshold buckets. Fixed values, never
//! interpolated, so regions render identically across requests.

pub const GREEN: &str = "#4caf50";
pub const LIGHT_GREEN: &str = "#8bc34a";
pub const PALE_YELLOW: &str = "#fff176";
pub const ORANGE: &str = "#ff9800";

/// Bucketed display color for a threshold in minutes.
pub const fn color_for(threshold_minutes: u32) -> &'static str {
    match threshold_minutes {
        0..=15 => GREEN,
        16..=30 => LIGHT_GREEN,
        31..=45 => PALE_YELLOW,
        _ => ORANGE,
    }
}

#[test]
fn color_buckets_test() {
    assert_eq!(color_for(5), GREEN);
    assert_eq!(color_for(15), GREEN);
    assert_eq!(color_for(16), LIGHT_GREEN);
    assert_eq!(color_for(30), LIGHT_GREEN);
    assert_eq!(color_for(31), PALE_YELLOW);
    assert_eq!(color_for(45), PALE_YELLOW);
    assert_eq!(color_for(46), ORANGE);
    assert_eq!(color_for(60), ORANGE);
}
