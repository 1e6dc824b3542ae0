//! Canvas trait
//!
//! Defines the interface the simulation uses to draw and probe pixels.

/// Canvas access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanvasError {
    /// Coordinates outside the canvas
    OutOfBounds,
    /// Value cannot be stored (e.g. 2 on a 1-bit canvas)
    InvalidValue,
    /// Requested dimensions exceed the backing buffer
    TooLarge,
}

/// Pixel canvas
///
/// Coordinates are signed so callers can probe past the left and top edges;
/// such probes must report [`CanvasError::OutOfBounds`] rather than wrap.
/// `set` and `fill` accept the same values: anything the canvas cannot store
/// is rejected with [`CanvasError::InvalidValue`] and leaves it unchanged.
pub trait Canvas {
    /// Read the pixel value at (x, y)
    fn get(&self, x: i32, y: i32) -> Result<u8, CanvasError>;

    /// Write the pixel value at (x, y)
    fn set(&mut self, x: i32, y: i32, value: u8) -> Result<(), CanvasError>;

    /// Set every pixel to `value`
    fn fill(&mut self, value: u8) -> Result<(), CanvasError>;

    /// Get the canvas dimensions
    ///
    /// Returns (width, height) in pixels
    fn dimensions(&self) -> (u16, u16);

    /// Check whether (x, y) lies on the canvas
    fn contains(&self, x: i32, y: i32) -> bool {
        let (width, height) = self.dimensions();
        x >= 0 && y >= 0 && x < width as i32 && y < height as i32
    }

    /// Count pixels holding `value`
    fn count(&self, value: u8) -> usize {
        let (width, height) = self.dimensions();
        let mut total = 0;
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if self.get(x, y) == Ok(value) {
                    total += 1;
                }
            }
        }
        total
    }
}

impl<T: Canvas + ?Sized> Canvas for &mut T {
    fn get(&self, x: i32, y: i32) -> Result<u8, CanvasError> {
        (**self).get(x, y)
    }

    fn set(&mut self, x: i32, y: i32, value: u8) -> Result<(), CanvasError> {
        (**self).set(x, y, value)
    }

    fn fill(&mut self, value: u8) -> Result<(), CanvasError> {
        (**self).fill(value)
    }

    fn dimensions(&self) -> (u16, u16) {
        (**self).dimensions()
    }
}
