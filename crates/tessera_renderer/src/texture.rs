//! Albedo textures for diffuse surfaces.

use tessera_math::{Color, Vec3};

/// Spatial frequency used by [`Texture::checker`].
pub const DEFAULT_CHECKER_SCALE: f32 = 10.0;

/// A color source evaluated at a hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Texture {
    /// Constant color everywhere.
    Solid(Color),
    /// Solid 3D checker pattern: `odd` where
    /// `sin(scale*x) * sin(scale*y) * sin(scale*z)` is negative, `even` elsewhere.
    Checker { even: Color, odd: Color, scale: f32 },
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Self::Solid(color)
    }

    pub fn checker(even: Color, odd: Color) -> Self {
        Self::Checker {
            even,
            odd,
            scale: DEFAULT_CHECKER_SCALE,
        }
    }

    /// Texture color at surface coordinates (u, v) and world point p.
    pub fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        match *self {
            Texture::Solid(color) => color,
            Texture::Checker { even, odd, scale } => {
                let sines = (scale * p.x).sin() * (scale * p.y).sin() * (scale * p.z).sin();
                if sines < 0.0 {
                    odd
                } else {
                    even
                }
            }
        }
    }

    /// Largest channel value this texture can return.
    pub fn max_channel(&self) -> f32 {
        match *self {
            Texture::Solid(color) => color.max_element(),
            Texture::Checker { even, odd, .. } => even.max_element().max(odd.max_element()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_ignores_position() {
        let texture = Texture::solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(texture.value(0.0, 0.0, Vec3::ZERO), Color::new(0.1, 0.2, 0.3));
        assert_eq!(
            texture.value(0.7, 0.2, Vec3::new(5.0, -3.0, 2.0)),
            Color::new(0.1, 0.2, 0.3)
        );
    }

    #[test]
    fn test_checker_parity() {
        let even = Color::new(0.2, 0.3, 0.1);
        let odd = Color::new(0.9, 0.9, 0.9);
        let texture = Texture::checker(even, odd);

        // All three sines positive
        let p = Vec3::splat(0.1);
        assert_eq!(texture.value(0.0, 0.0, p), even);

        // Flip one axis: product turns negative
        let q = Vec3::new(-0.1, 0.1, 0.1);
        assert_eq!(texture.value(0.0, 0.0, q), odd);
    }

    #[test]
    fn test_max_channel() {
        let texture = Texture::checker(Color::new(0.2, 0.3, 0.1), Color::new(0.4, 0.9, 0.5));
        assert_eq!(texture.max_channel(), 0.9);
    }
}
