/// Lower bound of the PHI-to-ESV multiplier. Also returned for scores <= 0.
pub const MULTIPLIER_FLOOR: f64 = -0.30;

/// Upper bound of the PHI-to-ESV multiplier.
pub const MULTIPLIER_CEILING: f64 = 0.50;

/// Score at which the multiplier's base term vanishes.
pub const MULTIPLIER_PIVOT: f64 = 50.0;

/// Upper bound of every 0-100 score.
pub const SCORE_CEILING: f64 = 100.0;

/// Years reported on the value trajectory.
pub const PROJECTION_YEARS: [u32; 4] = [0, 1, 3, 5];

/// Horizon of the cumulative carbon series (years 1..=HORIZON).
pub const CARBON_HORIZON_YEARS: u32 = 5;

/// Grade/color used when nothing could be scored.
pub const UNAVAILABLE_COLOR: &str = "#95a5a6";

/// Standard sea-level pressure in hPa.
pub const STANDARD_PRESSURE_HPA: f64 = 1013.25;
