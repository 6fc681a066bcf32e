//! Distance estimate from a raw echo pulse width

/// Centimeters of sound travel per tick of the echo counter.
///
/// 343 m/s with a 1 MHz counter.
pub const TICK_RESOLUTION_FACTOR: f32 = 0.0343;

/// Converts an echo pulse width in counter ticks to centimeters.
///
/// The pulse covers the way to the obstacle and back, hence the halving.
pub fn to_distance_cm(ticks: u16) -> f32 {
    f32::from(ticks) * TICK_RESOLUTION_FACTOR / 2.0
}
