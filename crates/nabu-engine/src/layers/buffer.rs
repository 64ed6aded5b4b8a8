use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::{LineVertex, STRIDE};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Packed vertices of every line layer of one tile batch.
///
/// The buffer starts and ends with one zeroed vertex. The even pass binds its
/// trailing attribute stream one stride before a layer's first block and the
/// odd pass binds its leading stream one stride past the last one; the padding
/// keeps both inside the allocation.
///
/// Immutable once built. `generation` is unique per buffer so GPU backends can
/// tell when a re-upload is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedVertexBuffer {
    vertices: Vec<LineVertex>,
    generation: u64,
}

impl SharedVertexBuffer {
    pub(crate) fn new(vertices: Vec<LineVertex>) -> Self {
        Self {
            vertices,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    pub fn byte_len(&self) -> u64 {
        self.vertices.len() as u64 * STRIDE
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
