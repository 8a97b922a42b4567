pub mod particle;
pub mod particle_data;
pub mod emitter;
pub mod settings;
pub mod style;
pub mod uniform;
pub mod particle_system;

pub use particle::Particle;
pub use particle_data::{InstanceBuffer, FLOATS_PER_PARTICLE, BYTES_PER_PARTICLE, MAX_PARTICLES};
pub use emitter::{Emitter, EmitterError, EmitterStats};
pub use settings::{EmitterSettings, SettingsError};
pub use style::{ParticleStyle, StylePalette};
pub use uniform::{UniformLayout, UniformError};
pub use particle_system::{ParticleSystem, ParticleUpdate};
