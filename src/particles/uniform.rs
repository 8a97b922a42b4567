use crate::particles::particle_data::BYTES_PER_PARTICLE;
use crate::particles::{Emitter, EmitterError, StylePalette};

/// One entry of the style table
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct StyleGpuData {
    color_and_size_scale: [f32; 4],
}

/// Trailing scalar block, padded to a full vec4
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct LifeLengthGpuData {
    life_length: f32,
    _padding: [f32; 3],
}

/// Byte layout of the per-pass particle uniform block:
///
/// ```text
/// positions:            vec4[max_particles]   (x, y, z, 0)
/// time_and_style:       vec4[max_particles]   (age, style, 0, 0)
/// color_and_size_scale: vec4[styles_count]
/// life_length:          f32 + 12 bytes padding
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLayout {
    pub max_particles: usize,
    pub styles_count: usize,
}

impl UniformLayout {
    pub fn for_emitter(emitter: &Emitter) -> Self {
        Self {
            max_particles: emitter.max_particles(),
            styles_count: emitter.styles_count() as usize,
        }
    }

    pub fn positions_offset(&self) -> usize {
        0
    }

    pub fn time_and_style_offset(&self) -> usize {
        self.max_particles * BYTES_PER_PARTICLE
    }

    pub fn styles_offset(&self) -> usize {
        2 * self.max_particles * BYTES_PER_PARTICLE
    }

    pub fn life_length_offset(&self) -> usize {
        self.styles_offset() + self.styles_count * std::mem::size_of::<StyleGpuData>()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.life_length_offset() + std::mem::size_of::<LifeLengthGpuData>()
    }

    /// Pack the emitter's current output buffers, `palette` and the particle
    /// lifetime into `out`. Slots past the live count are zeroed.
    pub fn write(
        &self,
        emitter: &Emitter,
        palette: &StylePalette,
        out: &mut [u8],
    ) -> Result<(), UniformError> {
        if palette.len() != self.styles_count {
            return Err(UniformError::StyleCountMismatch {
                expected: self.styles_count,
                actual: palette.len(),
            });
        }
        if emitter.alive_particles_count() > self.max_particles {
            return Err(UniformError::TooManyParticles {
                alive: emitter.alive_particles_count(),
                capacity: self.max_particles,
            });
        }
        let required = self.size_in_bytes();
        if out.len() < required {
            return Err(UniformError::BufferTooSmall {
                required,
                actual: out.len(),
            });
        }

        let block_size = self.max_particles * BYTES_PER_PARTICLE;
        write_block(
            &mut out[self.positions_offset()..self.positions_offset() + block_size],
            emitter.positions_bytes(),
        );
        write_block(
            &mut out[self.time_and_style_offset()..self.time_and_style_offset() + block_size],
            emitter.behaviors_bytes(),
        );

        let style_size = std::mem::size_of::<StyleGpuData>();
        for (slot, style) in palette.iter().enumerate() {
            let entry = StyleGpuData {
                color_and_size_scale: style.color_and_size_scale().to_array(),
            };
            let start = self.styles_offset() + slot * style_size;
            out[start..start + style_size].copy_from_slice(bytemuck::bytes_of(&entry));
        }

        let life_length = LifeLengthGpuData {
            life_length: emitter.life_length_seconds(),
            _padding: [0.0; 3],
        };
        let start = self.life_length_offset();
        out[start..start + std::mem::size_of::<LifeLengthGpuData>()]
            .copy_from_slice(bytemuck::bytes_of(&life_length));

        Ok(())
    }
}

fn write_block(block: &mut [u8], live: &[u8]) {
    let (head, tail) = block.split_at_mut(live.len());
    head.copy_from_slice(live);
    tail.fill(0);
}

/// Uniform packing errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("Palette has {actual} styles, uniform expects {expected}")]
    StyleCountMismatch { expected: usize, actual: usize },

    #[error("Uniform buffer too small: {required} bytes required, {actual} available")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("{alive} live particles do not fit a uniform sized for {capacity}")]
    TooManyParticles { alive: usize, capacity: usize },

    #[error(transparent)]
    Emitter(#[from] EmitterError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::EmitterSettings;

    fn read_f32(bytes: &[u8], offset: usize) -> f32 {
        f32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_layout_offsets() {
        let layout = UniformLayout {
            max_particles: 200,
            styles_count: 3,
        };
        assert_eq!(layout.time_and_style_offset(), 3200);
        assert_eq!(layout.styles_offset(), 6400);
        assert_eq!(layout.life_length_offset(), 6448);
        assert_eq!(layout.size_in_bytes(), 6464);
    }

    #[test]
    fn test_write_packs_live_particles_and_zeroes_rest() {
        let settings = EmitterSettings {
            max_particles: 8,
            ..EmitterSettings::fountain()
        };
        let mut emitter = Emitter::with_seed(settings, 4).unwrap();
        emitter.update(0.13).unwrap();
        assert_eq!(emitter.alive_particles_count(), 3);

        let layout = UniformLayout::for_emitter(&emitter);
        let mut out = vec![0xAA; layout.size_in_bytes()];
        layout.write(&emitter, &StylePalette::fountain(), &mut out).unwrap();

        let live_bytes = 3 * BYTES_PER_PARTICLE;
        assert_eq!(&out[..live_bytes], emitter.positions_bytes());
        assert!(out[live_bytes..layout.time_and_style_offset()].iter().all(|&b| b == 0));

        let behaviors = layout.time_and_style_offset();
        assert_eq!(&out[behaviors..behaviors + live_bytes], emitter.behaviors_bytes());

        // Second style: red, size 0.8
        let style = layout.styles_offset() + 16;
        assert_eq!(read_f32(&out, style), 1.0);
        assert_eq!(read_f32(&out, style + 12), 0.8);

        assert_eq!(read_f32(&out, layout.life_length_offset()), 8.0);
    }

    #[test]
    fn test_write_validates_inputs() {
        let emitter = Emitter::with_seed(EmitterSettings::fountain(), 1).unwrap();
        let layout = UniformLayout::for_emitter(&emitter);

        let mut small = vec![0; layout.size_in_bytes() - 1];
        assert!(matches!(
            layout.write(&emitter, &StylePalette::fountain(), &mut small),
            Err(UniformError::BufferTooSmall { .. })
        ));

        let mut out = vec![0; layout.size_in_bytes()];
        let palette = StylePalette::new(Vec::new());
        assert_eq!(
            layout.write(&emitter, &palette, &mut out),
            Err(UniformError::StyleCountMismatch { expected: 3, actual: 0 })
        );
    }
}
