use std::fmt;
use thiserror::Error;

/// Field positions (0-indexed) of the a_x, b_y and c_z cell entries in an
/// extended-system (`.xsc`) record: `step a_x a_y a_z b_x b_y b_z c_x c_y c_z ...`.
pub const XSC_LENGTH_FIELDS: [usize; 3] = [1, 5, 9];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("box geometry record is empty: no data line found")]
    EmptyRecord,

    #[error("box geometry record has {found} fields, at least {required} are required")]
    MissingFields { required: usize, found: usize },

    #[error("box geometry field {index} ('{token}') is not a number")]
    NotNumeric { index: usize, token: String },

    #[error("box length along {axis} must be finite and strictly positive, got {value}")]
    NonPositive { axis: Axis, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Edge lengths of an axis-aligned rectangular simulation cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    lengths: [f64; 3],
}

impl BoxGeometry {
    pub fn new(lx: f64, ly: f64, lz: f64) -> Result<Self, GeometryError> {
        let lengths = [lx, ly, lz];
        for (axis, &value) in Axis::ALL.iter().zip(lengths.iter()) {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::NonPositive { axis: *axis, value });
            }
        }
        Ok(Self { lengths })
    }

    /// Builds the geometry from the whitespace-split tokens of the final
    /// extended-system record.
    pub fn from_xsc_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, GeometryError> {
        if fields.is_empty() {
            return Err(GeometryError::EmptyRecord);
        }
        let required = XSC_LENGTH_FIELDS[2] + 1;
        if fields.len() < required {
            return Err(GeometryError::MissingFields {
                required,
                found: fields.len(),
            });
        }

        let mut lengths = [0.0; 3];
        for (slot, &index) in lengths.iter_mut().zip(XSC_LENGTH_FIELDS.iter()) {
            let token = fields[index].as_ref();
            *slot = token
                .parse::<f64>()
                .map_err(|_| GeometryError::NotNumeric {
                    index,
                    token: token.to_string(),
                })?;
        }

        Self::new(lengths[0], lengths[1], lengths[2])
    }

    #[inline]
    pub fn lengths(&self) -> [f64; 3] {
        self.lengths
    }

    #[inline]
    pub fn half_lengths(&self) -> [f64; 3] {
        [
            self.lengths[0] / 2.0,
            self.lengths[1] / 2.0,
            self.lengths[2] / 2.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XSC_LINE: &str = "500000 48.2 0 0 0 47.9 0 0 0 51.3 0.1 -0.2 0.05";

    #[test]
    fn parses_cell_lengths_from_xsc_fields() {
        let fields: Vec<&str> = XSC_LINE.split_whitespace().collect();
        let geom = BoxGeometry::from_xsc_fields(&fields).unwrap();
        assert_eq!(geom.lengths(), [48.2, 47.9, 51.3]);
        assert_eq!(geom.half_lengths(), [24.1, 23.95, 25.65]);
    }

    #[test]
    fn rejects_short_record() {
        let fields = ["1", "10.0", "0", "0", "0", "10.0", "0", "0", "0"];
        let err = BoxGeometry::from_xsc_fields(&fields).unwrap_err();
        assert_eq!(
            err,
            GeometryError::MissingFields {
                required: 10,
                found: 9
            }
        );
    }

    #[test]
    fn rejects_empty_record() {
        let fields: [&str; 0] = [];
        assert_eq!(
            BoxGeometry::from_xsc_fields(&fields).unwrap_err(),
            GeometryError::EmptyRecord
        );
    }

    #[test]
    fn rejects_non_numeric_length() {
        let fields: Vec<&str> = "0 10 0 0 0 abc 0 0 0 10".split_whitespace().collect();
        let err = BoxGeometry::from_xsc_fields(&fields).unwrap_err();
        assert!(matches!(err, GeometryError::NotNumeric { index: 5, .. }));
    }

    #[test]
    fn rejects_non_positive_lengths() {
        let err = BoxGeometry::new(10.0, 0.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::NonPositive {
                axis: Axis::Y,
                ..
            }
        ));
        assert!(BoxGeometry::new(-1.0, 10.0, 10.0).is_err());
        assert!(BoxGeometry::new(10.0, 10.0, f64::NAN).is_err());
    }

    #[test]
    fn error_messages_are_readable() {
        let err = BoxGeometry::new(10.0, 10.0, -2.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "box length along z must be finite and strictly positive, got -2"
        );
    }
}
