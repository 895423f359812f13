/// Saturation/value pair driving the favorite heart. Every row owns its own copy.
///
/// The widget draws `v` as the heart's opacity and `s` as a CSS saturation
/// filter quantized to `SATURATION_STEPS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoriteVisual {
    pub s: f32,
    pub v: f32,
}

/// Number of saturation levels between grey and full color.
pub const SATURATION_STEPS: u8 = 10;

impl FavoriteVisual {
    pub const FAVORITED: Self = Self { s: 1.0, v: 1.0 };
    pub const UNFAVORITED: Self = Self { s: 0.0, v: 0.5 };

    pub fn for_state(favorite: bool) -> Self {
        if favorite {
            Self::FAVORITED
        } else {
            Self::UNFAVORITED
        }
    }

    pub fn is_favorited(self) -> bool {
        self == Self::FAVORITED
    }

    /// `s` on a `0..=SATURATION_STEPS` scale.
    pub fn saturation_step(self) -> u8 {
        let steps = f32::from(SATURATION_STEPS);
        (self.s.clamp(0.0, 1.0) * steps).round() as u8
    }
}

impl Default for FavoriteVisual {
    fn default() -> Self {
        Self::UNFAVORITED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturation_steps() {
        assert_eq!(FavoriteVisual::FAVORITED.saturation_step(), SATURATION_STEPS);
        assert_eq!(FavoriteVisual::UNFAVORITED.saturation_step(), 0);
        assert_eq!(FavoriteVisual { s: 0.34, v: 1.0 }.saturation_step(), 3);
        assert_eq!(FavoriteVisual { s: 1.5, v: 1.0 }.saturation_step(), SATURATION_STEPS);
        assert_eq!(FavoriteVisual { s: -1.0, v: 1.0 }.saturation_step(), 0);
    }

    #[test]
    fn test_presets_follow_state() {
        assert_eq!(FavoriteVisual::for_state(true), FavoriteVisual { s: 1.0, v: 1.0 });
        assert_eq!(FavoriteVisual::for_state(false), FavoriteVisual { s: 0.0, v: 0.5 });
        assert!(!FavoriteVisual::default().is_favorited());
    }
}
