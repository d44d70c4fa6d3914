// Re-export glam for convenience
pub use glam::*;

// Tessera math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Linear RGB color, one `f32` per channel.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_componentwise() {
        let attenuation = Color::new(0.5, 0.25, 1.0);
        let incoming = Color::new(0.8, 0.8, 0.8);
        assert_eq!(attenuation * incoming, Color::new(0.4, 0.2, 0.8));
    }
}
