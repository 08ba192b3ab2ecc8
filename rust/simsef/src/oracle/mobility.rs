use crate::errors::UnsupportedDataError;
use crate::models::ImagingFrame;
use crate::utils::TupleRange;

/// Fits a feature's mobility range into the isolation window limits.
///
/// A range whose width is within `[min_width, max_width]` is kept. Otherwise a
/// window of `min_width` (too narrow) or `max_width` (too wide) is centred on
/// `center`. The result is always clamped to the instrument bounds.
pub fn adjust_mobility_range(
    center: f32,
    raw: TupleRange<f32>,
    min_width: f32,
    max_width: f32,
    bounds: TupleRange<f32>,
) -> TupleRange<f32> {
    let width = raw.width();
    let target_width = if width < min_width {
        min_width
    } else if width > max_width {
        max_width
    } else {
        return raw.clamp_to(bounds);
    };

    let half = target_width / 2.0;
    match TupleRange::try_new(center - half, center + half) {
        Ok(window) => window.clamp_to(bounds),
        // non-finite center, keep what the feature says
        Err(_) => raw.clamp_to(bounds),
    }
}

/// Mobility distance the quadrupole travels while switching between two precursors.
///
/// The number of mobility scans that elapse during `switch_time_ms` times the
/// smallest mobility step of `frame`.
pub fn mobility_distance_for_switch_time(
    frame: &ImagingFrame,
    ramp_time_ms: f64,
    switch_time_ms: f64,
) -> Result<f32, UnsupportedDataError> {
    let num_scans = frame.mobility_scans.len();
    let delta = frame
        .smallest_mobility_delta()
        .ok_or(UnsupportedDataError::EmptyRepresentativeFrame(frame.id))?;

    let time_per_scan = ramp_time_ms / num_scans as f64;
    if !(time_per_scan > 0.0) {
        return Err(UnsupportedDataError::EmptyRepresentativeFrame(frame.id));
    }
    let scans_during_switch = (switch_time_ms / time_per_scan).ceil();
    Ok(delta * scans_during_switch as f32)
}
