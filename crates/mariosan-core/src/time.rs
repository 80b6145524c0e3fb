/// Largest frame step the simulation will integrate in one tick.
pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

/// Clamp a host frame delta to `[0, max]`. Non-finite or negative deltas
/// (clock jumps, paused tabs) become zero.
pub fn clamp_frame_dt(dt: f32, max: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitches_are_clamped() {
        assert_eq!(clamp_frame_dt(0.5, MAX_FRAME_DT), MAX_FRAME_DT);
    }

    #[test]
    fn normal_frames_pass_through() {
        let dt = 1.0 / 60.0;
        assert_eq!(clamp_frame_dt(dt, MAX_FRAME_DT), dt);
    }

    #[test]
    fn degenerate_deltas_become_zero() {
        assert_eq!(clamp_frame_dt(f32::NAN, MAX_FRAME_DT), 0.0);
        assert_eq!(clamp_frame_dt(f32::INFINITY, MAX_FRAME_DT), 0.0);
        assert_eq!(clamp_frame_dt(-0.1, MAX_FRAME_DT), 0.0);
    }
}
