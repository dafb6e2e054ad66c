//! Easing curves for animated scrolls.

/// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Cubic ease-out: `1 - (1 - t)^3`.
    #[default]
    CubicOut,
    /// Quintic ease-out: `1 - (1 - t)^5`.
    QuinticOut,
}

impl Easing {
    /// Apply the curve. Input is clamped to `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuinticOut => 1.0 - (1.0 - t).powi(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for easing in [Easing::Linear, Easing::CubicOut, Easing::QuinticOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-1.0), 0.0);
        assert_eq!(Easing::CubicOut.apply(3.0), 1.0);
    }

    #[test]
    fn ease_out_leads_linear() {
        assert!(Easing::CubicOut.apply(0.5) > Easing::Linear.apply(0.5));
        assert!(Easing::QuinticOut.apply(0.5) > Easing::CubicOut.apply(0.5));
    }

    #[test]
    fn cubic_midpoint() {
        assert!((Easing::CubicOut.apply(0.5) - 0.875).abs() < 1e-12);
    }
}
