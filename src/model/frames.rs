use thiserror::Error;

/// Row stride (values per frame) did not divide the flat buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("flat buffer of {len} values cannot be split into frames of {entities} entities × 3")]
pub struct FrameShapeError {
    pub len: usize,
    pub entities: usize,
}

/// An ordered run of frames, each holding `entities` Cartesian positions.
///
/// Storage is a single row-major buffer of `frames × entities × 3` values, so a
/// frame is always a contiguous `entities * 3` slice in atom-major x, y, z order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSeq {
    entities: usize,
    data: Vec<f64>,
}

impl FrameSeq {
    pub fn new(entities: usize) -> Self {
        Self {
            entities,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(entities: usize, frames: usize) -> Self {
        Self {
            entities,
            data: Vec::with_capacity(frames * entities * 3),
        }
    }

    /// Wraps an existing flat buffer, checking that it splits into whole frames.
    pub fn from_flat(entities: usize, data: Vec<f64>) -> Result<Self, FrameShapeError> {
        let stride = entities * 3;
        if stride == 0 || data.len() % stride != 0 {
            return Err(FrameShapeError {
                len: data.len(),
                entities,
            });
        }
        Ok(Self { entities, data })
    }

    #[inline]
    pub fn entities(&self) -> usize {
        self.entities
    }

    #[inline]
    pub fn frame_len(&self) -> usize {
        self.entities * 3
    }

    #[inline]
    pub fn frames(&self) -> usize {
        if self.entities == 0 {
            0
        } else {
            self.data.len() / self.frame_len()
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat view of frame `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.frames()`.
    pub fn frame(&self, k: usize) -> &[f64] {
        let len = self.frame_len();
        &self.data[k * len..(k + 1) * len]
    }

    /// Position of entity `e` in frame `k`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn position(&self, k: usize, e: usize) -> [f64; 3] {
        assert!(e < self.entities, "entity index {e} out of range");
        let base = k * self.frame_len() + e * 3;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }

    /// Appends one frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame.len() != self.frame_len()`.
    pub fn push_frame(&mut self, frame: &[f64]) {
        assert_eq!(
            frame.len(),
            self.frame_len(),
            "frame length does not match entity count"
        );
        self.data.extend_from_slice(frame);
    }

    pub fn iter_frames(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size; an entity-less sequence
        // has no frames, so any non-zero size yields an empty iterator.
        self.data.chunks_exact(self.frame_len().max(1))
    }

    /// Keeps every `step`-th frame, starting with frame 0.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn strided(&self, step: usize) -> FrameSeq {
        assert!(step > 0, "stride must be positive");
        if step == 1 {
            return self.clone();
        }
        let mut out = FrameSeq::with_capacity(self.entities, self.frames().div_ceil(step));
        for frame in self.iter_frames().step_by(step) {
            out.push_frame(frame);
        }
        out
    }

    #[inline]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrameSeq {
        FrameSeq::from_flat(
            2,
            vec![
                0.0, 1.0, 2.0, 3.0, 4.0, 5.0, //
                6.0, 7.0, 8.0, 9.0, 10.0, 11.0, //
                12.0, 13.0, 14.0, 15.0, 16.0, 17.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn shape_accessors() {
        let seq = sample();
        assert_eq!(seq.entities(), 2);
        assert_eq!(seq.frames(), 3);
        assert_eq!(seq.frame(1), &[6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(seq.position(2, 1), [15.0, 16.0, 17.0]);
    }

    #[test]
    fn from_flat_rejects_partial_frames() {
        let err = FrameSeq::from_flat(2, vec![0.0; 7]).unwrap_err();
        assert_eq!(err, FrameShapeError { len: 7, entities: 2 });
        assert!(FrameSeq::from_flat(0, vec![]).is_err());
    }

    #[test]
    fn strided_keeps_first_frame() {
        let seq = sample().strided(2);
        assert_eq!(seq.frames(), 2);
        assert_eq!(seq.frame(0), sample().frame(0));
        assert_eq!(seq.frame(1), sample().frame(2));
    }

    #[test]
    #[should_panic(expected = "frame length does not match entity count")]
    fn push_frame_checks_length() {
        let mut seq = FrameSeq::new(2);
        seq.push_frame(&[1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_sequence_has_no_frames() {
        let seq = FrameSeq::new(0);
        assert_eq!(seq.frames(), 0);
        assert_eq!(seq.iter_frames().count(), 0);
    }
}
