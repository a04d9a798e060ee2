//! Encoded polyline decoding.
//!
//! The Directions service returns paths in the encoded polyline format:
//! each coordinate is a pair of zig-zag encoded deltas from the previous
//! point, at 1e-5 degree precision, split into 5-bit chunks offset by 63.

use crate::geo::{Coordinate, InvalidCoordinate};

/// Degrees per encoded unit.
const PRECISION: f64 = 1e5;

/// Error returned when decoding a malformed polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    #[error("polyline ends in the middle of a value")]
    Truncated,

    #[error("invalid polyline character at byte {position}")]
    InvalidCharacter { position: usize },

    #[error("polyline value overflows")]
    Overflow,

    #[error("polyline point out of range: {0}")]
    OutOfRange(#[from] InvalidCoordinate),
}

/// Decode an encoded polyline into coordinates.
///
/// # Examples
///
/// ```
/// use trip_planner::directions::decode_polyline;
///
/// let path = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path[0].latitude(), 38.5);
/// assert_eq!(path[0].longitude(), -120.2);
/// ```
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut idx = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut path = Vec::new();

    while idx < bytes.len() {
        lat = lat
            .checked_add(next_value(bytes, &mut idx)?)
            .ok_or(PolylineError::Overflow)?;
        lng = lng
            .checked_add(next_value(bytes, &mut idx)?)
            .ok_or(PolylineError::Overflow)?;
        path.push(Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION)?);
    }

    Ok(path)
}

/// Read one zig-zag encoded value starting at `idx`, advancing past it.
fn next_value(bytes: &[u8], idx: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let position = *idx;
        let byte = *bytes.get(position).ok_or(PolylineError::Truncated)?;
        *idx += 1;

        let chunk = i64::from(byte) - 63;
        if !(0..64).contains(&chunk) {
            return Err(PolylineError::InvalidCharacter { position });
        }

        if shift > 55 {
            return Err(PolylineError::Overflow);
        }

        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn decodes_reference_polyline() {
        let path = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(
            path,
            vec![c(38.5, -120.2), c(40.7, -120.95), c(43.252, -126.453)]
        );
    }

    #[test]
    fn empty_is_empty_path() {
        assert_eq!(decode("").unwrap(), Vec::new());
    }

    #[test]
    fn single_origin_point() {
        // Zero deltas encode as '?'
        assert_eq!(decode("??").unwrap(), vec![c(0.0, 0.0)]);
    }

    #[test]
    fn truncated_value_rejected() {
        // Continuation chunk with nothing after it
        assert_eq!(decode("_p~iF~ps|"), Err(PolylineError::Truncated));
        // Latitude without longitude
        assert_eq!(decode("_p~iF"), Err(PolylineError::Truncated));
    }

    #[test]
    fn invalid_character_rejected() {
        assert_eq!(
            decode("?\n"),
            Err(PolylineError::InvalidCharacter { position: 1 })
        );
    }

    #[test]
    fn endless_continuation_overflows() {
        let encoded = "~".repeat(20);
        assert_eq!(decode(&encoded), Err(PolylineError::Overflow));
    }
}
