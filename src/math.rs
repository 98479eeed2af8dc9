use rand::Rng;

pub(crate) const EPSILON: f32 = 1.0e-6;

/// Signed offset of `hue` from `base` in the wrapping [0, 1) hue space.
/// Always lands in [-0.5, 0.5).
pub(crate) fn wrapped_hue_offset(hue: f32, base: f32) -> f32 {
    (hue - base + 0.5).rem_euclid(1.0) - 0.5
}

/// Uniform draw over `[-half_range, +half_range]`. A non-positive half range
/// collapses to zero instead of handing an empty range to the sampler.
pub(crate) fn uniform_symmetric<R: Rng>(rng: &mut R, half_range: f32) -> f32 {
    if half_range <= 0.0 {
        return 0.0;
    }
    rng.random_range(-half_range..=half_range)
}

pub(crate) fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, max)
}
