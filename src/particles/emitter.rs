use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::particles::particle_data::InstanceBuffer;
use crate::particles::{EmitterSettings, Particle};

/// Emitter construction and stepping errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmitterError {
    #[error("Invalid emitter configuration: {field} {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Invalid time delta {0}: must be finite and non-negative")]
    InvalidTimeDelta(f32),
}

impl EmitterError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfiguration { field, reason }
    }
}

/// What a single `update` did to the pool
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmitterStats {
    /// Particles alive after the step
    pub alive: usize,
    /// Births this step (`reused + appended`)
    pub spawned: usize,
    /// Births written over a slot whose particle expired this step
    pub reused: usize,
    /// Births that grew the pool
    pub appended: usize,
    /// Expired particles whose slots were removed
    pub retired: usize,
    /// Births requested by the emission rate but refused by the capacity limit
    pub dropped: usize,
}

/// Fixed-capacity particle pool fed at a constant emission rate.
///
/// The pool never grows past `max_particles`. `update` and the accessors
/// never allocate after construction; `sort` may use scratch space. Births
/// are scheduled from accumulated time so the spawn rate stays exact
/// regardless of how frame times are quantized.
#[derive(Debug, Clone)]
pub struct Emitter {
    settings: EmitterSettings,
    particles: Vec<Particle>,
    /// Indices of slots expired this step, ascending
    dead: Vec<usize>,
    positions: InstanceBuffer,
    behaviors: InstanceBuffer,
    /// Leftover time not yet converted into births, `[0, emit_period)`
    time_rest: f32,
    rng: StdRng,
}

impl Emitter {
    /// Create an emitter seeded from system entropy
    pub fn new(settings: EmitterSettings) -> Result<Self, EmitterError> {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Create an emitter with a reproducible random sequence
    pub fn with_seed(settings: EmitterSettings, seed: u64) -> Result<Self, EmitterError> {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: EmitterSettings, rng: StdRng) -> Result<Self, EmitterError> {
        settings.validate()?;

        let capacity = settings.max_particles;
        log::debug!(
            "Created particle emitter: {} slots, {} styles, {} particles/s",
            capacity,
            settings.styles_count,
            settings.particles_per_second
        );

        Ok(Self {
            particles: Vec::with_capacity(capacity),
            dead: Vec::with_capacity(capacity),
            positions: InstanceBuffer::new(capacity),
            behaviors: InstanceBuffer::new(capacity),
            time_rest: 0.0,
            rng,
            settings,
        })
    }

    /// Advance the simulation by `time_delta_seconds`.
    ///
    /// Ages every particle, gives expired slots to new births while the
    /// frame's spawn budget lasts, appends the remaining births and retires
    /// whatever expired without being reused. A zero delta does nothing.
    pub fn update(&mut self, time_delta_seconds: f32) -> Result<EmitterStats, EmitterError> {
        if !time_delta_seconds.is_finite() || time_delta_seconds < 0.0 {
            return Err(EmitterError::InvalidTimeDelta(time_delta_seconds));
        }

        if time_delta_seconds == 0.0 {
            return Ok(EmitterStats {
                alive: self.particles.len(),
                ..Default::default()
            });
        }

        self.dead.clear();

        let period = self.settings.emit_period();
        let life_length = self.settings.life_length_seconds;
        let step = self.settings.velocity * time_delta_seconds;

        let effective_time_delta =
            time_delta_seconds.min(self.settings.max_time_delta) + self.time_rest;
        let requested = (effective_time_delta * self.settings.particles_per_second).floor() as usize;
        self.time_rest = (effective_time_delta - requested as f32 * period).max(0.0);

        let free = self.settings.max_particles - self.particles.len();
        let mut to_emit = requested.min(free);
        let dropped = requested - to_emit;
        if dropped > 0 {
            log::trace!("Emitter saturated: dropped {} of {} births", dropped, requested);
        }

        let mut reused = 0;
        for index in 0..self.particles.len() {
            let particle = &mut self.particles[index];
            particle.alive_time += time_delta_seconds;

            if !particle.is_expired(life_length) {
                particle.position += step;
            } else if to_emit > 0 {
                self.emit_particle(index, (to_emit - 1) as f32 * period);
                to_emit -= 1;
                reused += 1;
            } else {
                self.dead.push(index);
            }
        }

        let appended = to_emit;
        let retired = self.dead.len();

        if to_emit > 0 {
            debug_assert!(self.dead.is_empty(), "pool grows only when nothing retired");

            while to_emit > 0 {
                let index = self.particles.len();
                self.particles.push(Particle::default());
                self.emit_particle(index, (to_emit - 1) as f32 * period);
                to_emit -= 1;
            }
        } else {
            self.remove_dead_particles();
        }

        debug_assert!(self.particles.len() <= self.settings.max_particles);

        self.write_output();

        Ok(EmitterStats {
            alive: self.particles.len(),
            spawned: reused + appended,
            reused,
            appended,
            retired,
            dropped,
        })
    }

    /// Order particles by ascending depth under `viewer_frame`.
    ///
    /// The sort is stable. Output buffers follow the new order; sort again
    /// with another transform (e.g. a light view) before reading them for a
    /// different pass.
    pub fn sort(&mut self, viewer_frame: &Mat4) {
        for particle in &mut self.particles {
            particle.camera_space_z = particle.depth_under(viewer_frame);
        }

        self.particles
            .sort_by(|left, right| left.camera_space_z.total_cmp(&right.camera_space_z));

        self.write_output();
    }

    /// Number of live particles
    pub fn alive_particles_count(&self) -> usize {
        self.particles.len()
    }

    /// `(x, y, z, 0)` per live particle in current pool order
    pub fn positions(&self) -> &[f32] {
        self.positions.as_slice()
    }

    /// `(alive_time, style_number, 0, 0)` per live particle in current pool order
    pub fn behaviors(&self) -> &[f32] {
        self.behaviors.as_slice()
    }

    pub fn positions_bytes(&self) -> &[u8] {
        self.positions.as_bytes()
    }

    pub fn behaviors_bytes(&self) -> &[u8] {
        self.behaviors.as_bytes()
    }

    /// Live particles in current pool order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    pub fn max_particles(&self) -> usize {
        self.settings.max_particles
    }

    pub fn styles_count(&self) -> u32 {
        self.settings.styles_count
    }

    pub fn life_length_seconds(&self) -> f32 {
        self.settings.life_length_seconds
    }

    /// Time carried into the next update
    pub fn time_rest(&self) -> f32 {
        self.time_rest
    }

    /// Birth in place. `start_time` is how long the particle has already
    /// lived when this frame ends; it moves along the velocity by that much.
    fn emit_particle(&mut self, index: usize, start_time: f32) {
        debug_assert!(index < self.particles.len());

        let half_size = self.settings.emit_cube_half_size;
        let shift = Vec3::new(
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
        ) * half_size;
        let style_number = self.rng.gen_range(0..self.settings.styles_count) as f32;

        let particle = &mut self.particles[index];
        particle.alive_time = start_time;
        particle.style_number = style_number;
        particle.position = self.settings.origin + shift + self.settings.velocity * start_time;
    }

    /// Swap-remove dead slots, highest index first so lower indices stay valid
    fn remove_dead_particles(&mut self) {
        debug_assert!(self.dead.windows(2).all(|pair| pair[0] < pair[1]));

        for &index in self.dead.iter().rev() {
            self.particles.swap_remove(index);
        }
    }

    fn write_output(&mut self) {
        self.positions.clear();
        self.behaviors.clear();

        for particle in &self.particles {
            let position = particle.position;
            self.positions.push([position.x, position.y, position.z, 0.0]);
            self.behaviors.push([particle.alive_time, particle.style_number, 0.0, 0.0]);
        }
    }
}
