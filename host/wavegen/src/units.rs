//! Conversions between the units people type and the fixed-point units the
//! peripheral stores. Float-to-integer casts saturate, so absurd inputs land on
//! the engine's own range checks.

use eyre::{ensure, Result};

/// Device frequency steps per hertz (100 µHz resolution).
pub const STEPS_PER_HZ: f64 = 10_000.0;
/// Device amplitude/offset steps per volt (100 µV resolution).
pub const STEPS_PER_VOLT: f64 = 10_000.0;
/// Device phase steps per degree.
pub const STEPS_PER_DEGREE: f64 = 100.0;
/// Duty cycle register value at 100 %.
pub const DUTY_CYCLE_FULL: f64 = 65_535.0;

pub fn frequency_from_hz(hz: f64) -> Result<u32> {
    ensure!(
        hz.is_finite() && hz >= 0.0,
        "frequency must be a non-negative number of hertz, got {hz}"
    );
    Ok((hz * STEPS_PER_HZ).round() as u32)
}

pub fn amplitude_from_volts(volts: f64) -> Result<u32> {
    ensure!(
        volts.is_finite() && volts >= 0.0,
        "amplitude must be a non-negative number of volts, got {volts}"
    );
    Ok((volts * STEPS_PER_VOLT).round() as u32)
}

pub fn offset_from_volts(volts: f64) -> Result<i32> {
    ensure!(volts.is_finite(), "offset must be a number of volts, got {volts}");
    Ok((volts * STEPS_PER_VOLT).round() as i32)
}

/// Percentages outside 0 to 100 are pulled back to the nearest bound.
pub fn duty_cycle_from_percent(percent: f64) -> Result<u32> {
    ensure!(percent.is_finite(), "duty cycle must be a percentage, got {percent}");
    let percent = percent.clamp(0.0, 100.0);
    Ok((percent * DUTY_CYCLE_FULL / 100.0).round() as u32)
}

pub fn phase_from_degrees(degrees: f64) -> Result<i32> {
    ensure!(degrees.is_finite(), "phase offset must be a number of degrees, got {degrees}");
    Ok((degrees * STEPS_PER_DEGREE).round() as i32)
}

pub fn hz(frequency: u32) -> f64 {
    f64::from(frequency) / STEPS_PER_HZ
}

pub fn volts(steps: i32) -> f64 {
    f64::from(steps) / STEPS_PER_VOLT
}

pub fn percent(duty_cycle: u16) -> f64 {
    f64::from(duty_cycle) * 100.0 / DUTY_CYCLE_FULL
}

pub fn degrees(phase_offset: i16) -> f64 {
    f64::from(phase_offset) / STEPS_PER_DEGREE
}
