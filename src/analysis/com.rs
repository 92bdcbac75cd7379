use super::error::Error;
use crate::model::frames::FrameSeq;
use crate::model::masses::MassVector;

/// Collapses per-atom positions into per-molecule centers of mass.
///
/// The input holds `num_mols` consecutive blocks of `masses.len()` atoms per
/// frame; every molecule uses the same mass profile and the total mass is taken
/// once from `masses`.
pub fn reduce_to_com(
    frames: &FrameSeq,
    masses: &MassVector,
    num_mols: usize,
) -> Result<FrameSeq, Error> {
    let num_atoms = masses.len();
    let expected = num_mols * num_atoms;
    if num_mols == 0 || frames.entities() != expected {
        return Err(Error::Shape {
            columns: frames.frame_len(),
            expected: expected * 3,
            num_mols,
            num_atoms,
        });
    }

    let weights = masses.as_slice();
    let total = masses.total();
    let block = num_atoms * 3;

    let mut out = FrameSeq::with_capacity(num_mols, frames.frames());
    let mut row = vec![0.0f64; num_mols * 3];

    for frame in frames.iter_frames() {
        for (molecule, com) in frame.chunks_exact(block).zip(row.chunks_exact_mut(3)) {
            let mut acc = [0.0f64; 3];
            for (atom, &m) in molecule.chunks_exact(3).zip(weights) {
                acc[0] += m * atom[0];
                acc[1] += m * atom[1];
                acc[2] += m * atom[2];
            }
            com[0] = acc[0] / total;
            com[1] = acc[1] / total;
            com[2] = acc[2] / total;
        }
        out.push_frame(&row);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masses(m: &[f64]) -> MassVector {
        MassVector::new(m.to_vec()).unwrap()
    }

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-12, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn two_equal_atoms_average_positions() {
        let frames = FrameSeq::from_flat(
            2,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
                2.0, 0.0, 0.0, 2.0, 0.0, 0.0,
            ],
        )
        .unwrap();
        let com = reduce_to_com(&frames, &masses(&[1.0, 1.0]), 1).unwrap();
        assert_eq!(com.entities(), 1);
        assert_eq!(com.as_flat(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn single_atom_molecule_is_identity() {
        let frames = FrameSeq::from_flat(
            3,
            vec![
                1.5, -2.0, 3.25, 4.0, 5.0, 6.0, -7.0, 8.5, 9.0, //
                1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0,
            ],
        )
        .unwrap();
        for m in [0.001, 1.0, 39.948] {
            let com = reduce_to_com(&frames, &masses(&[m]), 3).unwrap();
            assert_close(com.as_flat(), frames.as_flat());
        }
    }

    #[test]
    fn scaling_masses_leaves_com_unchanged() {
        let frames = FrameSeq::from_flat(
            6,
            vec![
                0.0, 0.0, 0.0, 0.96, 0.0, 0.0, -0.24, 0.93, 0.0, //
                5.0, 5.0, 5.0, 5.5, 5.7, 5.0, 4.6, 5.2, 5.9,
            ],
        )
        .unwrap();
        let base = reduce_to_com(&frames, &masses(&[15.999, 1.008, 1.008]), 2).unwrap();
        let scaled = reduce_to_com(&frames, &masses(&[31.998, 2.016, 2.016]), 2).unwrap();
        assert_close(base.as_flat(), scaled.as_flat());
    }

    #[test]
    fn water_com_is_mass_weighted() {
        let frames = FrameSeq::from_flat(3, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .unwrap();
        let m = masses(&[16.0, 1.0, 1.0]);
        let com = reduce_to_com(&frames, &m, 1).unwrap();
        assert_close(com.as_flat(), &[1.0 / 18.0, 1.0 / 18.0, 0.0]);
    }

    #[test]
    fn rejects_wrong_atom_count() {
        let frames = FrameSeq::from_flat(5, vec![0.0; 15]).unwrap();
        let err = reduce_to_com(&frames, &masses(&[1.0, 1.0, 1.0]), 2).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape {
                columns: 15,
                expected: 18,
                ..
            }
        ));
    }
}
