//! Geometric primitives for viewport inference.
//!
//! # Overview
//!
//! - [`Rect`] - An axis-aligned rectangle, as reported by a rendering context
//! - [`ViewBox`] - The coordinate-space declaration written to a `viewBox` attribute
//!
//! Coordinates follow the SVG convention: origin at the top-left, X increasing
//! rightward and Y increasing downward.

use std::fmt;

/// An axis-aligned rectangle in user coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the x-coordinate of the origin.
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the origin.
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the width.
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height.
    pub fn height(self) -> f64 {
        self.height
    }
}

/// A `viewBox` value: `min-x min-y width height`.
///
/// # Examples
///
/// ```
/// # use svgsift_core::geometry::ViewBox;
/// let view_box = ViewBox::from_dimensions(100.0, 50.0);
/// assert_eq!(view_box.to_string(), "0 0 100 50");
///
/// let view_box = ViewBox::new(-2.5, 0.0, 24.0, 24.0);
/// assert_eq!(view_box.to_string(), "-2.5 0 24 24");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewBox {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
}

impl ViewBox {
    /// Creates a view box from its four components.
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Creates a view box anchored at the origin with the given size.
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Returns the x-coordinate of the top-left corner.
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the y-coordinate of the top-left corner.
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the width of the coordinate space.
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height of the coordinate space.
    pub fn height(self) -> f64 {
        self.height
    }
}

impl From<Rect> for ViewBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x(), rect.y(), rect.width(), rect.height())
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}
