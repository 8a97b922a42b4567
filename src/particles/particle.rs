use glam::{Mat4, Vec3};

/// Individual particle living in an emitter pool slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in world space
    pub position: Vec3,
    /// Depth under the transform of the last sort (scratch value)
    pub camera_space_z: f32,
    /// Seconds elapsed since birth
    pub alive_time: f32,
    /// Visual variant, an integer value in `[0, styles_count)`
    pub style_number: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            camera_space_z: 0.0,
            alive_time: 0.0,
            style_number: 0.0,
        }
    }
}

impl Particle {
    /// Depth of this particle under `view`, i.e. the third row of the
    /// transform applied to the homogeneous position.
    #[inline]
    pub fn depth_under(&self, view: &Mat4) -> f32 {
        view.row(2).dot(self.position.extend(1.0))
    }

    /// Whether the particle has outlived `life_length` seconds.
    /// The comparison is strict: a particle aged exactly `life_length` is alive.
    #[inline]
    pub fn is_expired(&self, life_length: f32) -> bool {
        self.alive_time > life_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_under_identity_is_z() {
        let particle = Particle {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Default::default()
        };
        assert_eq!(particle.depth_under(&Mat4::IDENTITY), 3.0);
    }

    #[test]
    fn test_depth_includes_translation() {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));
        let particle = Particle {
            position: Vec3::new(5.0, 5.0, 4.0),
            ..Default::default()
        };
        assert_eq!(particle.depth_under(&view), -6.0);
    }

    #[test]
    fn test_expiry_is_strict() {
        let mut particle = Particle {
            alive_time: 8.0,
            ..Default::default()
        };
        assert!(!particle.is_expired(8.0));
        particle.alive_time = 8.001;
        assert!(particle.is_expired(8.0));
    }
}
