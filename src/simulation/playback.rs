//! Frame sampling for playback
//!
//! Renderers rarely want every captured frame. Sampling takes every
//! `frame_jump`-th frame from the start and always ends on the final frame.

/// Stride that yields roughly `total_frames` frames out of `frame_count`
pub fn frame_stride(frame_count: usize, total_frames: usize) -> usize {
    frame_count / total_frames.max(1) + 1
}

/// Pick frames for playback.
///
/// With `frame_jump` unset the stride comes from [`frame_stride`]. A jump
/// of 0 is treated as 1. The last frame is appended when the stride skips it.
pub fn sample_frames<T>(frames: &[T], total_frames: usize, frame_jump: Option<usize>) -> Vec<&T> {
    let Some(last) = frames.last() else {
        return Vec::new();
    };

    let jump = frame_jump
        .unwrap_or_else(|| frame_stride(frames.len(), total_frames))
        .max(1);

    let mut sampled: Vec<&T> = frames.iter().step_by(jump).collect();
    if (frames.len() - 1) % jump != 0 {
        sampled.push(last);
    }
    sampled
}
