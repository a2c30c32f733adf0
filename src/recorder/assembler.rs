//! Take assembly
//!
//! Joins a session's frames into the single contiguous stream a take plays
//! back from.

use super::state::RecordingSession;
use crate::project::schema::Take;
use uuid::Uuid;

/// Concatenate the session's frames, in arrival order, into a new take.
///
/// Frame `i` lands at byte offset `i * buffer_size`. A frame shorter than
/// `buffer_size` is zero-padded and a longer one truncated. The session's
/// buffers are left untouched so the caller can recycle them.
pub fn assemble(session: &RecordingSession) -> Take {
    let size = session.buffer_size;
    let mut record_stream = vec![0u8; session.frames.len() * size];

    for (chunk, frame) in record_stream.chunks_exact_mut(size.max(1)).zip(&session.frames) {
        let len = frame.len().min(size);
        chunk[..len].copy_from_slice(&frame[..len]);
    }

    Take {
        id: Uuid::new_v4(),
        name: session.name.clone(),
        created_at: session.started_at,
        buffer_size: size,
        locations: session.mappings.location_identifiers.clone(),
        blend_shape_names: session.mappings.blend_shape_names.clone(),
        record_stream,
    }
}
