//! Easing curves on normalized time: input and output both in `[0, 1]`.

/// Identity curve; constant-velocity motion.
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Symmetric cubic ease-in-out: slow start, fast middle, slow settle.
/// The default feel for indicator convergence.
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}
