use crate::model::frames::FrameSeq;
use crate::model::geometry::BoxGeometry;

/// Correction (0 or ±`length`) that maps a raw step `d` back to its minimum image.
#[inline(always)]
pub fn image_correction(d: f64, length: f64, half: f64) -> f64 {
    if d > half {
        -length
    } else if d < -half {
        length
    } else {
        0.0
    }
}

/// Removes periodic-boundary jumps from a chunk of wrapped positions.
///
/// Each step is corrected to its minimum image and the corrections are
/// accumulated per entity and axis, so
/// `out[k] = wrapped[0] + Σ_{j<k} corrected_step[j]`. Frame 0 is copied
/// verbatim and a trajectory that never jumps is returned unchanged. Assumes no
/// entity moves more than half a box length between two recorded frames.
pub fn unwrap(frames: &FrameSeq, geometry: &BoxGeometry) -> FrameSeq {
    let n_frames = frames.frames();
    let mut out = FrameSeq::with_capacity(frames.entities(), n_frames);
    if n_frames == 0 {
        return out;
    }

    out.push_frame(frames.frame(0));
    if n_frames == 1 {
        return out;
    }

    let lengths = geometry.lengths();
    let half = geometry.half_lengths();
    let width = frames.frame_len();

    let mut shifts = vec![0.0f64; width];
    let mut next = vec![0.0f64; width];

    for k in 1..n_frames {
        let prev = frames.frame(k - 1);
        let curr = frames.frame(k);

        for (i, ((&c, &p), shift)) in curr.iter().zip(prev).zip(shifts.iter_mut()).enumerate() {
            let axis = i % 3;
            *shift += image_correction(c - p, lengths[axis], half[axis]);
            next[i] = c + *shift;
        }

        out.push_frame(&next);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(l: f64) -> BoxGeometry {
        BoxGeometry::new(l, l, l).unwrap()
    }

    fn seq(entities: usize, data: Vec<f64>) -> FrameSeq {
        FrameSeq::from_flat(entities, data).unwrap()
    }

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn corrects_crossing_through_upper_face() {
        // 9.9 → 0.2 is a step of -9.7 < -L/2, i.e. +0.3 through the upper face.
        let wrapped = seq(1, vec![9.9, 5.0, 5.0, 0.2, 5.0, 5.0]);
        let out = unwrap(&wrapped, &cube(10.0));
        assert_close(out.as_flat(), &[9.9, 5.0, 5.0, 10.2, 5.0, 5.0]);
    }

    #[test]
    fn corrects_crossing_through_lower_face() {
        let wrapped = seq(1, vec![0.1, 1.0, 1.0, 9.8, 1.0, 1.0, 9.5, 1.0, 1.0]);
        let out = unwrap(&wrapped, &cube(10.0));
        assert_close(
            out.as_flat(),
            &[0.1, 1.0, 1.0, -0.2, 1.0, 1.0, -0.5, 1.0, 1.0],
        );
    }

    #[test]
    fn continuous_input_is_returned_exactly() {
        let wrapped = seq(
            2,
            vec![
                1.0, 2.0, 3.0, 7.0, 8.0, 9.0, //
                1.5, 2.25, 2.75, 6.5, 8.5, 9.25, //
                2.0, 2.5, 2.5, 6.0, 9.0, 9.5,
            ],
        );
        let out = unwrap(&wrapped, &cube(10.0));
        assert_eq!(out, wrapped);
    }

    #[test]
    fn first_frame_is_preserved() {
        let wrapped = seq(
            2,
            vec![
                9.7, 0.3, 5.0, 0.1, 9.9, 4.0, //
                0.4, 9.6, 5.0, 9.8, 0.2, 4.0,
            ],
        );
        let out = unwrap(&wrapped, &cube(10.0));
        assert_eq!(out.frame(0), wrapped.frame(0));
    }

    #[test]
    fn periodic_images_unwrap_identically() {
        // Frame 1 of `shifted` sits several box lengths away before being folded
        // back into the primary cell.
        let l = 10.0;
        let raw = [9.5, 1.0, 5.0, 10.5, -0.5, 5.0, 11.5, -1.0, 5.0];
        let mut shifted = raw;
        shifted[3] += 2.0 * l;
        shifted[4] -= l;
        shifted[5] += 3.0 * l;

        let fold = |v: &[f64]| seq(1, v.iter().map(|x| x.rem_euclid(l)).collect());
        let a = unwrap(&fold(&raw), &cube(l));
        let b = unwrap(&fold(&shifted), &cube(l));
        assert_close(a.as_flat(), b.as_flat());
        assert_close(a.as_flat(), &raw);
    }

    #[test]
    fn repeated_crossings_accumulate() {
        let l = 4.0;
        let path: Vec<f64> = (0..12).map(|k| 0.5 + 0.9 * k as f64).collect();
        let mut wrapped = Vec::new();
        for &x in &path {
            wrapped.extend_from_slice(&[x.rem_euclid(l), 1.0, 1.0]);
        }
        let out = unwrap(&seq(1, wrapped), &cube(l));
        for (k, &x) in path.iter().enumerate() {
            assert!((out.position(k, 0)[0] - x).abs() < 1e-9);
        }
    }

    #[test]
    fn axes_use_their_own_box_length() {
        let geom = BoxGeometry::new(10.0, 20.0, 30.0).unwrap();
        // y step of -8 is below L/2 for y (10) but would be a jump in x.
        let wrapped = seq(1, vec![1.0, 9.0, 29.0, 1.0, 1.0, 1.0]);
        let out = unwrap(&wrapped, &geom);
        assert_close(out.frame(1), &[1.0, 1.0, 31.0]);
    }

    #[test]
    fn half_box_step_is_not_corrected() {
        let wrapped = seq(1, vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0]);
        let out = unwrap(&wrapped, &cube(10.0));
        assert_eq!(out.frame(1), &[5.0, 0.0, 0.0]);
    }

    #[test]
    fn single_and_empty_chunks() {
        let single = seq(1, vec![3.0, 4.0, 5.0]);
        assert_eq!(unwrap(&single, &cube(10.0)), single);

        let empty = FrameSeq::new(3);
        assert!(unwrap(&empty, &cube(10.0)).is_empty());
    }
}
