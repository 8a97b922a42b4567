use glam::Mat4;

use crate::particles::uniform::{UniformError, UniformLayout};
use crate::particles::{Emitter, EmitterSettings, EmitterStats, StylePalette};

/// Result of preparing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleUpdate {
    /// Pool activity during the step
    pub stats: EmitterStats,
    /// Instances to draw in both passes
    pub instance_count: usize,
}

/// Drives one emitter through a frame and packs its state for the two
/// passes that draw it: the final color pass (sorted for the camera) and
/// the shadow-map pass (sorted for the light).
pub struct ParticleSystem {
    emitter: Emitter,
    palette: StylePalette,
    layout: UniformLayout,
    final_render: Vec<u8>,
    shadow_map: Vec<u8>,
}

impl ParticleSystem {
    /// Build a system around `emitter`; `palette` must hold one style per
    /// style number the emitter can produce.
    pub fn new(emitter: Emitter, palette: StylePalette) -> Result<Self, UniformError> {
        let layout = UniformLayout::for_emitter(&emitter);
        if palette.len() != layout.styles_count {
            return Err(UniformError::StyleCountMismatch {
                expected: layout.styles_count,
                actual: palette.len(),
            });
        }

        let size = layout.size_in_bytes();
        log::debug!("Particle uniform block: {} bytes per pass", size);

        Ok(Self {
            emitter,
            palette,
            layout,
            final_render: vec![0; size],
            shadow_map: vec![0; size],
        })
    }

    pub fn from_settings(settings: EmitterSettings, palette: StylePalette) -> Result<Self, UniformError> {
        Self::new(Emitter::new(settings)?, palette)
    }

    /// Step the emitter and refresh both uniform blocks.
    pub fn update(
        &mut self,
        time_delta_seconds: f32,
        camera_view: &Mat4,
        light_view: &Mat4,
    ) -> Result<ParticleUpdate, UniformError> {
        let stats = self.emitter.update(time_delta_seconds)?;

        self.emitter.sort(camera_view);
        self.layout
            .write(&self.emitter, &self.palette, &mut self.final_render)?;

        self.emitter.sort(light_view);
        self.layout
            .write(&self.emitter, &self.palette, &mut self.shadow_map)?;

        Ok(ParticleUpdate {
            stats,
            instance_count: self.emitter.alive_particles_count(),
        })
    }

    /// Uniform block sorted for the camera
    pub fn final_render_uniform(&self) -> &[u8] {
        &self.final_render
    }

    /// Uniform block sorted for the light
    pub fn shadow_map_uniform(&self) -> &[u8] {
        &self.shadow_map
    }

    pub fn layout(&self) -> UniformLayout {
        self.layout
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn palette(&self) -> &StylePalette {
        &self.palette
    }
}
