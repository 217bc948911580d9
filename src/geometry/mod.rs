//! Geometric primitives in PDF user space.
//!
//! Rectangles follow the PDF convention (ISO 32000-1:2008, Section 7.9.5):
//! lower-left and upper-right corners, y axis pointing up.

use crate::object::Object;

/// A 2D point in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle given by its lower-left and upper-right corners.
///
/// Always normalized so that `llx <= urx` and `lly <= ury`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Lower-left x
    pub llx: f64,
    /// Lower-left y
    pub lly: f64,
    /// Upper-right x
    pub urx: f64,
    /// Upper-right y
    pub ury: f64,
}

impl Rect {
    /// Create a rectangle from any two opposite corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_acroform::geometry::Rect;
    ///
    /// let rect = Rect::new(110.0, 70.0, 10.0, 20.0);
    /// assert_eq!(rect.llx, 10.0);
    /// assert_eq!(rect.ury, 70.0);
    /// assert_eq!(rect.width(), 100.0);
    /// ```
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    /// Build from a PDF rectangle array of four numbers.
    ///
    /// Returns `None` if the array does not hold exactly four numbers.
    pub fn from_array(arr: &[Object]) -> Option<Self> {
        if arr.len() != 4 {
            return None;
        }
        let nums: Option<Vec<f64>> = arr.iter().map(|o| o.as_number()).collect();
        let nums = nums?;
        Some(Self::new(nums[0], nums[1], nums[2], nums[3]))
    }

    /// Build from four numbers.
    pub fn from_numbers(values: &[f64]) -> Option<Self> {
        match values {
            [a, b, c, d] => Some(Self::new(*a, *b, *c, *d)),
            _ => None,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Check if the rectangle has zero area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Check whether a point lies inside (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.llx && p.x <= self.urx && p.y >= self.lly && p.y <= self.ury
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            llx: self.llx.min(other.llx),
            lly: self.lly.min(other.lly),
            urx: self.urx.max(other.urx),
            ury: self.ury.max(other.ury),
        }
    }

    /// Shrink by `amount` on every side. Collapses to the center if too small.
    pub fn inset(&self, amount: f64) -> Rect {
        let dx = amount.min(self.width() / 2.0);
        let dy = amount.min(self.height() / 2.0);
        Rect {
            llx: self.llx + dx,
            lly: self.lly + dy,
            urx: self.urx - dx,
            ury: self.ury - dy,
        }
    }

    /// Apply `RD` rectangle differences (left, bottom, right, top).
    pub fn apply_differences(&self, diff: &[f64; 4]) -> Rect {
        Rect::new(
            self.llx + diff[0],
            self.lly + diff[1],
            self.urx - diff[2],
            self.ury - diff[3],
        )
    }

    /// Convert to `[llx lly urx ury]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.llx, self.lly, self.urx, self.ury]
    }

    /// Convert to a PDF array object.
    pub fn to_object(&self) -> Object {
        Object::number_array(&self.to_array())
    }
}

/// Affine transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f64; 6]);

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// The identity matrix.
    pub fn identity() -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }

    /// Translation by `(tx, ty)`.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// Scaling by `(sx, sy)`.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Matrix([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// Counter-clockwise rotation by a multiple of 90 degrees.
    pub fn rotate_quarter_turns(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Matrix([0.0, 1.0, -1.0, 0.0, 0.0, 0.0]),
            180 => Matrix([-1.0, 0.0, 0.0, -1.0, 0.0, 0.0]),
            270 => Matrix([0.0, -1.0, 1.0, 0.0, 0.0, 0.0]),
            _ => Self::identity(),
        }
    }

    /// Build from a PDF array of six numbers.
    pub fn from_array(arr: &[Object]) -> Option<Self> {
        if arr.len() != 6 {
            return None;
        }
        let mut m = [0.0; 6];
        for (slot, obj) in m.iter_mut().zip(arr) {
            *slot = obj.as_number()?;
        }
        Some(Matrix(m))
    }

    /// Concatenate: apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    /// Transform a point.
    pub fn transform_point(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }

    /// Bounding box of the transformed rectangle corners.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.transform_point(Point::new(rect.llx, rect.lly)),
            self.transform_point(Point::new(rect.urx, rect.lly)),
            self.transform_point(Point::new(rect.urx, rect.ury)),
            self.transform_point(Point::new(rect.llx, rect.ury)),
        ];
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rect {
            llx: min_x,
            lly: min_y,
            urx: max_x,
            ury: max_y,
        }
    }

    /// Check for the identity matrix.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}
