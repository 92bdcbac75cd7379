use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MassError {
    #[error("mass vector is empty: at least one atom per molecule is required")]
    Empty,

    #[error("mass of atom {index} must be finite and strictly positive, got {value}")]
    NonPositive { index: usize, value: f64 },
}

/// Per-atom masses of one molecule, shared by every molecule of the species.
#[derive(Debug, Clone, PartialEq)]
pub struct MassVector {
    masses: Vec<f64>,
    total: f64,
}

impl MassVector {
    pub fn new(masses: Vec<f64>) -> Result<Self, MassError> {
        if masses.is_empty() {
            return Err(MassError::Empty);
        }
        if let Some((index, &value)) = masses
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m <= 0.0)
        {
            return Err(MassError::NonPositive { index, value });
        }
        let total = masses.iter().sum();
        Ok(Self { masses, total })
    }

    /// Number of atoms per molecule.
    #[inline]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.masses
    }
}
