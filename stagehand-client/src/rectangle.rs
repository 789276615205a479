//! Rectangle value type
//!
//! Only what item layout and screen capture areas need: the four edges, the
//! derived size, and the two string forms the host speaks.

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Rectangle {
    /// Rectangle from its edges; right/bottom may not precede left/top
    pub fn from_coordinates(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        require_finite(&[left, top, right, bottom])?;
        if right < left {
            return Err(Error::InvalidParameters(
                "right must not be smaller than left".to_string(),
            ));
        }
        if bottom < top {
            return Err(Error::InvalidParameters(
                "bottom must not be smaller than top".to_string(),
            ));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Rectangle anchored at the origin
    pub fn from_dimensions(width: f64, height: f64) -> Result<Self> {
        require_finite(&[width, height])?;
        if width < 0.0 || height < 0.0 {
            return Err(Error::InvalidParameters(
                "dimensions must not be negative".to_string(),
            ));
        }
        Ok(Self {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        })
    }

    /// Parse `"left,top,right,bottom"`
    pub fn parse_coordinates(s: &str) -> Result<Self> {
        match parse_numbers(s)?.as_slice() {
            [l, t, r, b] => Self::from_coordinates(*l, *t, *r, *b),
            _ => Err(Error::InvalidParameters(format!(
                "expected four coordinates, got {:?}",
                s
            ))),
        }
    }

    /// Parse `"width,height"`
    pub fn parse_dimensions(s: &str) -> Result<Self> {
        match parse_numbers(s)?.as_slice() {
            [w, h] => Self::from_dimensions(*w, *h),
            _ => Err(Error::InvalidParameters(format!(
                "expected two dimensions, got {:?}",
                s
            ))),
        }
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn to_coordinate_string(&self) -> String {
        format!("{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }

    pub fn to_dimension_string(&self) -> String {
        format!("{},{}", self.width(), self.height())
    }
}

fn require_finite(values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(Error::InvalidParameters(format!("not a finite number: {}", v))),
        None => Ok(()),
    }
}

fn parse_numbers(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidParameters(format!("not a number: {:?}", part)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates() {
        let r = Rectangle::from_coordinates(0.25, 0.1, 0.75, 0.6).unwrap();
        assert_eq!(r.width(), 0.5);
        assert!((r.height() - 0.5).abs() < 1e-9);
        assert_eq!(r.to_coordinate_string(), "0.25,0.1,0.75,0.6");
    }

    #[test]
    fn test_rejects_inverted_edges() {
        assert!(Rectangle::from_coordinates(10.0, 0.0, 5.0, 5.0).is_err());
        assert!(Rectangle::from_coordinates(0.0, 10.0, 5.0, 5.0).is_err());
        assert!(Rectangle::from_dimensions(-1.0, 5.0).is_err());
    }

    #[test]
    fn test_parse_string_forms() {
        let r = Rectangle::parse_coordinates("0, 0, 1920, 1080").unwrap();
        assert_eq!(r.to_dimension_string(), "1920,1080");

        let d = Rectangle::parse_dimensions("640,480").unwrap();
        assert_eq!(d.right(), 640.0);
        assert_eq!(d.bottom(), 480.0);

        assert!(Rectangle::parse_coordinates("1,2,3").is_err());
        assert!(Rectangle::parse_dimensions("a,b").is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Rectangle::parse_coordinates("NaN,0,1,1").is_err());
        assert!(Rectangle::parse_coordinates("0,0,inf,1").is_err());
        assert!(Rectangle::parse_dimensions("640,-inf").is_err());
        assert!(Rectangle::from_coordinates(0.0, f64::NAN, 1.0, 1.0).is_err());
        assert!(Rectangle::from_dimensions(f64::INFINITY, 1.0).is_err());
    }
}
