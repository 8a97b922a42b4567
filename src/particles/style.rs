use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Visual variant selected by a particle's style number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleStyle {
    /// RGB tint
    pub color: Vec3,
    /// Multiplier applied to the base billboard size
    pub size_scale: f32,
}

impl ParticleStyle {
    pub const fn new(color: Vec3, size_scale: f32) -> Self {
        Self { color, size_scale }
    }

    /// Packed as the shader reads it: rgb in xyz, size scale in w
    pub fn color_and_size_scale(&self) -> Vec4 {
        self.color.extend(self.size_scale)
    }
}

/// One style per style number, indexed by `style_number`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StylePalette {
    styles: Vec<ParticleStyle>,
}

impl StylePalette {
    pub fn new(styles: Vec<ParticleStyle>) -> Self {
        Self { styles }
    }

    /// Small red, large red and full-size blue
    pub fn fountain() -> Self {
        Self::new(vec![
            ParticleStyle::new(Vec3::new(1.0, 0.0, 0.0), 0.5),
            ParticleStyle::new(Vec3::new(1.0, 0.0, 0.0), 0.8),
            ParticleStyle::new(Vec3::new(0.0, 0.0, 1.0), 1.0),
        ])
    }

    /// Red, green and blue in growing sizes
    pub fn column() -> Self {
        Self::new(vec![
            ParticleStyle::new(Vec3::new(1.0, 0.0, 0.0), 0.5),
            ParticleStyle::new(Vec3::new(0.0, 1.0, 0.0), 0.8),
            ParticleStyle::new(Vec3::new(0.0, 0.0, 1.0), 1.0),
        ])
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style for a particle's `style_number`
    pub fn get(&self, style_number: f32) -> Option<&ParticleStyle> {
        if style_number < 0.0 {
            return None;
        }
        self.styles.get(style_number as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticleStyle> {
        self.styles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_color_and_size() {
        let style = ParticleStyle::new(Vec3::new(0.25, 0.5, 0.75), 0.8);
        assert_eq!(style.color_and_size_scale(), Vec4::new(0.25, 0.5, 0.75, 0.8));
    }

    #[test]
    fn test_lookup_by_style_number() {
        let palette = StylePalette::fountain();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get(2.0).map(|s| s.size_scale), Some(1.0));
        assert!(palette.get(3.0).is_none());
        assert!(palette.get(-1.0).is_none());
    }
}
