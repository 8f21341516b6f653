//! Length unit conversion.
//!
//! All shape geometry in PresentationML is expressed in English Metric Units
//! (EMU). These helpers convert the inch and point values used when laying out
//! slides.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;

/// Hundredths of a point, the unit of the `sz` attribute on text runs.
pub const CENTIPOINTS_PER_PT: u32 = 100;

/// Convert inches to EMU.
#[inline]
pub fn inches(value: f64) -> i64 {
    (value * EMUS_PER_INCH as f64).round() as i64
}

/// Convert points to EMU.
#[inline]
pub fn points(value: f64) -> i64 {
    (value * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

/// Convert a point size to the centipoint value written in `a:rPr/@sz`.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * CENTIPOINTS_PER_PT as f64).round().max(0.0) as u32
}

/// Scale a pixel extent to EMU so that it keeps the aspect ratio of
/// `px_w` × `px_h` at the given target width.
#[inline]
pub fn scaled_height(px_w: u32, px_h: u32, target_width: i64) -> i64 {
    if px_w == 0 {
        return 0;
    }
    ((px_h as f64) * (target_width as f64) / (px_w as f64)).round() as i64
}
