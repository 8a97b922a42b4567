pub mod particles;

pub use particles::{
    Emitter, EmitterError, EmitterSettings, EmitterStats, Particle, ParticleStyle, MAX_PARTICLES,
    ParticleSystem, ParticleUpdate, SettingsError, StylePalette, UniformError, UniformLayout,
};
