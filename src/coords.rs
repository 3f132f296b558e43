use std::{error, fmt};

use derive_more::Display;

/// The largest axis index the letter encoding can express: `a`..`z` cover
/// 1..26 and `A`..`Z` cover 27..52.
pub const MAX_AXIS: u8 = 52;

/// A single board coordinate, 1-based on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An error raised when an axis index falls outside the supported board
/// extent of [MAX_AXIS].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display("axis index {} outside the supported board extent 1..=52", index)]
pub struct RangeError {
    pub index: u8,
}

impl error::Error for RangeError {}

/// An error raised when a coordinate value is neither a two-letter point,
/// a `xx:yy` rectangle, nor empty.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("malformed point value {:?}", raw)]
pub struct InvalidPointError {
    pub raw: String,
}

impl InvalidPointError {
    fn new(raw: &str) -> Self {
        InvalidPointError {
            raw: raw.to_owned(),
        }
    }
}

impl error::Error for InvalidPointError {}

/// Decode a single axis letter into its 1-based index.
pub fn decode_axis(character: char) -> Result<u8, InvalidPointError> {
    match character {
        'a'..='z' => Ok(1 + character as u8 - b'a'),
        'A'..='Z' => Ok(27 + character as u8 - b'A'),
        _ => Err(InvalidPointError::new(&character.to_string())),
    }
}

/// Encode a 1-based axis index into its letter. The exact inverse of
/// [decode_axis].
pub fn encode_axis(index: u8) -> Result<char, RangeError> {
    match index {
        1..=26 => Ok((b'a' + index - 1) as char),
        27..=MAX_AXIS => Ok((b'A' + index - 27) as char),
        _ => Err(RangeError { index }),
    }
}

/// Decode a two-letter value into a point.
pub fn decode_point(raw: &str) -> Result<Point, InvalidPointError> {
    let mut chars = raw.chars();
    if let (Some(x), Some(y), None) = (chars.next(), chars.next(), chars.next()) {
        Ok(Point {
            x: decode_axis(x).map_err(|_| InvalidPointError::new(raw))?,
            y: decode_axis(y).map_err(|_| InvalidPointError::new(raw))?,
        })
    } else {
        Err(InvalidPointError::new(raw))
    }
}

/// Decode a value holding either a single point or a `xx:yy` rectangle into
/// individual points. The rectangle is inclusive on both corners and is
/// enumerated outer x, inner y, the order the replay builder consumes.
pub fn decode_point_set(raw: &str) -> Result<Vec<Point>, InvalidPointError> {
    if let Some((from, to)) = raw.split_once(':') {
        let from = decode_point(from).map_err(|_| InvalidPointError::new(raw))?;
        let to = decode_point(to).map_err(|_| InvalidPointError::new(raw))?;
        let mut points = Vec::new();
        for x in from.x..=to.x {
            for y in from.y..=to.y {
                points.push(Point { x, y });
            }
        }
        Ok(points)
    } else {
        Ok(vec![decode_point(raw)?])
    }
}

/// Encode a point into its two-letter value text.
pub fn encode_point(point: Point) -> Result<String, RangeError> {
    let mut out = String::with_capacity(2);
    out.push(encode_axis(point.x)?);
    out.push(encode_axis(point.y)?);
    Ok(out)
}

/// Encode a list of points into value text: a single point becomes its two
/// letters, several points join with `][` so that bracketing the result
/// yields one value per point. Rectangle shorthand is never reconstructed on
/// output, even when decoding consumed one; the expansion is one-way.
pub fn encode_points(points: &[Point]) -> Result<String, RangeError> {
    let mut parts = Vec::with_capacity(points.len());
    for point in points {
        parts.push(encode_point(*point)?);
    }
    Ok(parts.join("]["))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_bijection() {
        for index in 1..=MAX_AXIS {
            assert_eq!(decode_axis(encode_axis(index).unwrap()).unwrap(), index);
        }
        assert_eq!(decode_axis('a').unwrap(), 1);
        assert_eq!(decode_axis('z').unwrap(), 26);
        assert_eq!(decode_axis('A').unwrap(), 27);
        assert_eq!(decode_axis('Z').unwrap(), 52);
    }

    #[test]
    fn test_axis_range() {
        assert_eq!(encode_axis(53).unwrap_err(), RangeError { index: 53 });
        assert_eq!(encode_axis(0).unwrap_err(), RangeError { index: 0 });
        assert!(decode_axis('5').is_err());
        assert!(decode_axis('é').is_err());
    }

    #[test]
    fn test_decode_point() {
        assert_eq!(decode_point("aa").unwrap(), Point { x: 1, y: 1 });
        assert_eq!(decode_point("pd").unwrap(), Point { x: 16, y: 4 });
        assert_eq!(decode_point("Az").unwrap(), Point { x: 27, y: 26 });
        assert!(decode_point("").is_err());
        assert!(decode_point("a").is_err());
        assert!(decode_point("abc").is_err());
        assert!(decode_point("a1").is_err());
    }

    #[test]
    fn test_decode_point_set() {
        assert_eq!(
            decode_point_set("aa").unwrap(),
            vec![Point { x: 1, y: 1 }]
        );
        // outer x, inner y
        assert_eq!(
            decode_point_set("bb:cc").unwrap(),
            vec![
                Point { x: 2, y: 2 },
                Point { x: 2, y: 3 },
                Point { x: 3, y: 2 },
                Point { x: 3, y: 3 },
            ]
        );
        assert!(decode_point_set("aa:").is_err());
        assert!(decode_point_set(":aa").is_err());
        assert!(decode_point_set("aa:bb:cc").is_err());
    }

    #[test]
    fn test_inverted_rectangle_is_empty() {
        assert!(decode_point_set("cc:aa").unwrap().is_empty());
    }

    #[test]
    fn test_encode_points() {
        assert_eq!(encode_point(Point { x: 1, y: 1 }).unwrap(), "aa");
        assert_eq!(encode_point(Point { x: 27, y: 52 }).unwrap(), "AZ");
        assert_eq!(
            encode_points(&[Point { x: 1, y: 1 }, Point { x: 2, y: 2 }]).unwrap(),
            "aa][bb"
        );
        assert_eq!(encode_points(&[]).unwrap(), "");
        assert!(encode_point(Point { x: 53, y: 1 }).is_err());
    }
}
