use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::particles::particle_data::MAX_PARTICLES;
use crate::particles::EmitterError;

/// Runtime parameters of a particle emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterSettings {
    /// Pool capacity, also the instance count GPU buffers must hold
    pub max_particles: usize,
    /// Number of visual variants a particle can be born with
    pub styles_count: u32,
    /// Emission rate (particles per second)
    pub particles_per_second: f32,
    /// Lifetime of every particle (seconds)
    pub life_length_seconds: f32,
    /// Center of the spawn cube in world space
    pub origin: Vec3,
    /// Half the edge length of the spawn cube
    pub emit_cube_half_size: f32,
    /// Constant velocity shared by all particles
    pub velocity: Vec3,
    /// Upper bound applied to a single frame's time delta
    pub max_time_delta: f32,
}

impl Default for EmitterSettings {
    fn default() -> Self {
        Self::fountain()
    }
}

impl EmitterSettings {
    /// Rising fountain in front of the default camera: red and blue
    /// particles drifting upward for eight seconds.
    pub fn fountain() -> Self {
        Self {
            max_particles: 200,
            styles_count: 3,
            particles_per_second: 25.0,
            life_length_seconds: 8.0,
            origin: Vec3::new(0.0, -1.0, 30.0),
            emit_cube_half_size: 1.5,
            velocity: Vec3::new(0.0, 4.0, 0.0),
            max_time_delta: 0.4,
        }
    }

    /// Thin, sparse column beside the scene origin
    pub fn column() -> Self {
        Self {
            max_particles: 200,
            styles_count: 3,
            particles_per_second: 10.0,
            life_length_seconds: 4.0,
            origin: Vec3::new(10.0, 0.0, 0.0),
            emit_cube_half_size: 0.5,
            velocity: Vec3::new(0.0, 4.0, 0.0),
            max_time_delta: 0.4,
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "fountain" => Some(Self::fountain()),
            "column" => Some(Self::column()),
            _ => None,
        }
    }

    /// Seconds between two consecutive births
    #[inline]
    pub fn emit_period(&self) -> f32 {
        1.0 / self.particles_per_second
    }

    /// Check every parameter the emitter relies on
    pub fn validate(&self) -> Result<(), EmitterError> {
        if self.max_particles == 0 {
            return Err(EmitterError::invalid("max_particles", "must be positive"));
        }
        if self.max_particles > MAX_PARTICLES {
            return Err(EmitterError::invalid("max_particles", "must not exceed 1000000"));
        }
        if self.styles_count == 0 {
            return Err(EmitterError::invalid("styles_count", "must be positive"));
        }
        if !(self.particles_per_second.is_finite() && self.particles_per_second > 0.0) {
            return Err(EmitterError::invalid(
                "particles_per_second",
                "must be finite and positive",
            ));
        }
        if !(self.life_length_seconds.is_finite() && self.life_length_seconds > 0.0) {
            return Err(EmitterError::invalid(
                "life_length_seconds",
                "must be finite and positive",
            ));
        }
        if !(self.max_time_delta.is_finite() && self.max_time_delta > 0.0) {
            return Err(EmitterError::invalid(
                "max_time_delta",
                "must be finite and positive",
            ));
        }
        // Births are aged by at most max_time_delta
        if self.max_time_delta >= self.life_length_seconds {
            return Err(EmitterError::invalid(
                "max_time_delta",
                "must be shorter than life_length_seconds",
            ));
        }
        if !(self.emit_cube_half_size.is_finite() && self.emit_cube_half_size >= 0.0) {
            return Err(EmitterError::invalid(
                "emit_cube_half_size",
                "must be finite and non-negative",
            ));
        }
        if !self.origin.is_finite() {
            return Err(EmitterError::invalid("origin", "must be finite"));
        }
        if !self.velocity.is_finite() {
            return Err(EmitterError::invalid("velocity", "must be finite"));
        }

        Ok(())
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let settings = Self::from_toml_str(&raw)?;
        log::info!("Loaded emitter settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Emitter settings loading errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] EmitterError),
}
