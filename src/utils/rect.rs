use crate::{EstimateClose, Errors};
use anyhow::Result;
use nalgebra::Point2;

/// Region of interest in the format (x, y, width, height), pixel space
///
#[derive(Clone, Default, Debug, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Constructor
    ///
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the rect spanning two corners, the order of corners does not matter
    ///
    pub fn from_corners(a: &Point2<f32>, b: &Point2<f32>) -> Self {
        let (left, right) = (a.x.min(b.x), a.x.max(b.x));
        let (top, bottom) = (a.y.min(b.y), a.y.max(b.y));
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Half-open containment test: `x <= p.x < x + width` and `y <= p.y < y + height`
    ///
    pub fn contains(&self, p: &Point2<f32>) -> bool {
        self.x <= p.x && p.x < self.right() && self.y <= p.y && p.y < self.bottom()
    }

    /// Shrinks the rect around its center
    ///
    /// Every side is inset by `factor * dimension / 2`, so both dimensions are scaled by `1 - factor`.
    ///
    /// # Parameters
    /// * `factor` - shrink factor in `[0, 1)`
    ///
    pub fn shrink(&self, factor: f32) -> Result<Rect> {
        if !(0.0..1.0).contains(&factor) {
            return Err(Errors::InvalidShrinkFactor(factor).into());
        }
        Ok(Rect {
            x: self.x + factor * self.width / 2.0,
            y: self.y + factor * self.height / 2.0,
            width: self.width * (1.0 - factor),
            height: self.height * (1.0 - factor),
        })
    }
}

impl EstimateClose for Rect {
    fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self.x - other.x).abs() < eps
            && (self.y - other.y).abs() < eps
            && (self.width - other.width).abs() < eps
            && (self.height - other.height).abs() < eps
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::rect::Rect;
    use crate::{EstimateClose, EPS};
    use nalgebra::Point2;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(&Point2::new(10.0, 20.0)));
        assert!(r.contains(&Point2::new(39.9, 59.9)));
        assert!(!r.contains(&Point2::new(40.0, 30.0)));
        assert!(!r.contains(&Point2::new(20.0, 60.0)));
        assert!(!r.contains(&Point2::new(9.99, 30.0)));
    }

    #[test]
    fn shrink() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let s = r.shrink(0.1).unwrap();
        assert!(s.almost_same(&Rect::new(5.0, 2.5, 90.0, 45.0), EPS));
        assert!((s.right() - 95.0).abs() < EPS);
        assert!((s.bottom() - 47.5).abs() < EPS);

        assert!(r.shrink(0.0).unwrap().almost_same(&r, EPS));
        assert!(r.shrink(1.0).is_err());
        assert!(r.shrink(-0.1).is_err());
    }

    #[test]
    fn from_corners() {
        let r = Rect::from_corners(&Point2::new(30.0, 5.0), &Point2::new(10.0, 25.0));
        assert!(r.almost_same(&Rect::new(10.0, 5.0, 20.0, 20.0), EPS));
        assert!((r.area() - 400.0).abs() < EPS);
    }
}
