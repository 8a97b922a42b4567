/// Maximum number of particles a single emitter can hold
pub const MAX_PARTICLES: usize = 1_000_000;

/// Floats written per particle into each GPU instance buffer (one vec4)
pub const FLOATS_PER_PARTICLE: usize = 4;

/// Bytes per particle per instance buffer
pub const BYTES_PER_PARTICLE: usize = FLOATS_PER_PARTICLE * std::mem::size_of::<f32>();

/// Fixed-capacity float buffer laid out as one vec4 per particle.
///
/// Storage is allocated once for `capacity` particles. Writing never
/// reallocates; only the logical particle count changes.
#[derive(Debug, Clone)]
pub struct InstanceBuffer {
    data: Box<[f32]>,
    len: usize,
}

impl InstanceBuffer {
    /// Create a zeroed buffer able to hold `capacity` particles
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity * FLOATS_PER_PARTICLE].into_boxed_slice(),
            len: 0,
        }
    }

    /// Maximum number of particles the buffer can hold
    pub fn capacity(&self) -> usize {
        self.data.len() / FLOATS_PER_PARTICLE
    }

    /// Number of particles currently written
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop all written particles; storage is kept
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append one particle's vec4
    #[inline]
    pub fn push(&mut self, element: [f32; FLOATS_PER_PARTICLE]) {
        debug_assert!(self.len < self.capacity(), "instance buffer overflow");

        let start = self.len * FLOATS_PER_PARTICLE;
        self.data[start..start + FLOATS_PER_PARTICLE].copy_from_slice(&element);
        self.len += 1;
    }

    /// Written floats, `4 * len()` of them
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..self.len * FLOATS_PER_PARTICLE]
    }

    /// Written floats as raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }
}
