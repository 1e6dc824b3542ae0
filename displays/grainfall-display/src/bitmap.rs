//! Packed 1-bit framebuffer
//!
//! Pixels are stored row by row, eight to a byte, most significant bit
//! first. That is the layout memory LCDs expect on the wire, so a driver can
//! send [`Bitmap::row_bytes`] for each dirty row without repacking.

use heapless::Vec;

use crate::canvas::{Canvas, CanvasError};

/// Width of the Sharp memory LCD used on the handheld
pub const SHARP_WIDTH: u16 = 144;

/// Height of the Sharp memory LCD used on the handheld
pub const SHARP_HEIGHT: u16 = 168;

/// Maximum number of rows tracked for dirty-row refresh
pub const MAX_ROWS: usize = 256;

const DIRTY_WORDS: usize = MAX_ROWS / 32;

/// Bitmap sized for the Sharp 144x168 panel
pub type SharpBitmap = Bitmap<{ (SHARP_WIDTH as usize / 8) * SHARP_HEIGHT as usize }>;

/// 1-bit framebuffer with `N` bytes of backing storage
///
/// Width and height are chosen at runtime and must fit in `N` bytes with
/// each row padded to a whole byte.
#[derive(Debug, Clone)]
pub struct Bitmap<const N: usize> {
    width: u16,
    height: u16,
    /// Bytes per row (width rounded up to a multiple of 8)
    stride: usize,
    data: [u8; N],
    /// One bit per row, set when the row changed since the last flush
    dirty: [u32; DIRTY_WORDS],
}

impl<const N: usize> Bitmap<N> {
    /// Create a cleared bitmap
    pub fn new(width: u16, height: u16) -> Result<Self, CanvasError> {
        let stride = (width as usize + 7) / 8;
        if height as usize > MAX_ROWS || stride * height as usize > N {
            return Err(CanvasError::TooLarge);
        }

        Ok(Self {
            width,
            height,
            stride,
            data: [0; N],
            dirty: [0; DIRTY_WORDS],
        })
    }

    /// Packed bytes of one row, or None if `y` is out of range
    pub fn row_bytes(&self, y: u16) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        Some(&self.data[start..start + self.stride])
    }

    /// Check whether a row changed since the last flush
    pub fn is_row_dirty(&self, y: u16) -> bool {
        (y as usize) < MAX_ROWS && self.dirty[y as usize / 32] & (1 << (y % 32)) != 0
    }

    /// Check whether any row changed since the last flush
    pub fn is_dirty(&self) -> bool {
        self.dirty.iter().any(|&word| word != 0)
    }

    /// Collect the changed rows in ascending order and mark them clean
    pub fn take_dirty_rows(&mut self) -> Vec<u16, MAX_ROWS> {
        let mut rows = Vec::new();
        for y in 0..self.height {
            if self.is_row_dirty(y) {
                // Capacity is MAX_ROWS and height never exceeds it
                let _ = rows.push(y);
            }
        }
        self.dirty = [0; DIRTY_WORDS];
        rows
    }

    /// Mark every row dirty (forces a full refresh)
    pub fn mark_all_dirty(&mut self) {
        for y in 0..self.height {
            self.mark_row_dirty(y);
        }
    }

    fn mark_row_dirty(&mut self, y: u16) {
        self.dirty[y as usize / 32] |= 1 << (y % 32);
    }

    /// Byte index and bit mask for an in-bounds pixel
    fn locate(&self, x: i32, y: i32) -> Result<(usize, u8), CanvasError> {
        if !self.contains(x, y) {
            return Err(CanvasError::OutOfBounds);
        }
        let index = y as usize * self.stride + x as usize / 8;
        let mask = 0x80 >> (x as usize % 8);
        Ok((index, mask))
    }
}

impl<const N: usize> Canvas for Bitmap<N> {
    fn get(&self, x: i32, y: i32) -> Result<u8, CanvasError> {
        let (index, mask) = self.locate(x, y)?;
        Ok(u8::from(self.data[index] & mask != 0))
    }

    fn set(&mut self, x: i32, y: i32, value: u8) -> Result<(), CanvasError> {
        let (index, mask) = self.locate(x, y)?;
        let before = self.data[index];
        match value {
            0 => self.data[index] &= !mask,
            1 => self.data[index] |= mask,
            _ => return Err(CanvasError::InvalidValue),
        }
        if self.data[index] != before {
            self.mark_row_dirty(y as u16);
        }
        Ok(())
    }

    fn fill(&mut self, value: u8) -> Result<(), CanvasError> {
        let byte = match value {
            0 => 0x00,
            1 => 0xFF,
            _ => return Err(CanvasError::InvalidValue),
        };
        let used = self.stride * self.height as usize;
        self.data[..used].fill(byte);

        // Keep padding bits past the right edge clear
        let spare_bits = self.stride * 8 - self.width as usize;
        if byte != 0 && spare_bits > 0 {
            let tail_mask = 0xFFu8 << spare_bits;
            for y in 0..self.height as usize {
                self.data[y * self.stride + self.stride - 1] &= tail_mask;
            }
        }
        self.mark_all_dirty();
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

impl<const N: usize> PartialEq for Bitmap<N> {
    /// Compares pixels only; dirty-row state is ignored
    fn eq(&self, other: &Self) -> bool {
        let used = self.stride * self.height as usize;
        self.width == other.width
            && self.height == other.height
            && self.data[..used] == other.data[..used]
    }
}

impl<const N: usize> Eq for Bitmap<N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Small = Bitmap<64>;

    #[test]
    fn test_new_rejects_oversized() {
        assert!(Small::new(16, 32).is_ok());
        assert_eq!(Small::new(16, 33).map(|_| ()), Err(CanvasError::TooLarge));
        // 10 pixels still take 2 bytes per row
        assert!(Small::new(10, 32).is_ok());
        assert!(Small::new(10, 33).is_err());
        assert!(Bitmap::<1024>::new(1, 257).is_err());
        assert!(SharpBitmap::new(SHARP_WIDTH, SHARP_HEIGHT).is_ok());
    }

    #[test]
    fn test_set_get() {
        let mut bmp = Small::new(10, 10).unwrap();
        assert_eq!(bmp.get(3, 4), Ok(0));
        bmp.set(3, 4, 1).unwrap();
        assert_eq!(bmp.get(3, 4), Ok(1));
        assert_eq!(bmp.get(4, 3), Ok(0));
        bmp.set(3, 4, 0).unwrap();
        assert_eq!(bmp.get(3, 4), Ok(0));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut bmp = Small::new(10, 10).unwrap();
        assert_eq!(bmp.get(-1, 0), Err(CanvasError::OutOfBounds));
        assert_eq!(bmp.get(0, -1), Err(CanvasError::OutOfBounds));
        assert_eq!(bmp.get(10, 0), Err(CanvasError::OutOfBounds));
        assert_eq!(bmp.get(0, 10), Err(CanvasError::OutOfBounds));
        assert_eq!(bmp.set(10, 9, 1), Err(CanvasError::OutOfBounds));
        // Padding bits of the last byte are not addressable
        assert_eq!(bmp.get(12, 0), Err(CanvasError::OutOfBounds));
    }

    #[test]
    fn test_invalid_value() {
        let mut bmp = Small::new(8, 8).unwrap();
        assert_eq!(bmp.set(0, 0, 2), Err(CanvasError::InvalidValue));
        assert_eq!(bmp.get(0, 0), Ok(0));
    }

    #[test]
    fn test_msb_first_layout() {
        let mut bmp = Small::new(16, 2).unwrap();
        bmp.set(0, 1, 1).unwrap();
        bmp.set(9, 1, 1).unwrap();
        assert_eq!(bmp.row_bytes(0), Some(&[0u8, 0][..]));
        assert_eq!(bmp.row_bytes(1), Some(&[0x80u8, 0x40][..]));
        assert_eq!(bmp.row_bytes(2), None);
    }

    #[test]
    fn test_fill_keeps_padding_clear() {
        let mut bmp = Small::new(10, 3).unwrap();
        bmp.fill(1).unwrap();
        assert_eq!(bmp.count(1), 30);
        assert_eq!(bmp.row_bytes(0), Some(&[0xFFu8, 0xC0][..]));
        bmp.fill(0).unwrap();
        assert_eq!(bmp.count(1), 0);
    }

    #[test]
    fn test_fill_rejects_what_set_rejects() {
        let mut bmp = Small::new(8, 4).unwrap();
        bmp.set(2, 2, 1).unwrap();
        bmp.take_dirty_rows();

        assert_eq!(bmp.fill(2), Err(CanvasError::InvalidValue));
        assert_eq!(bmp.set(0, 0, 2), Err(CanvasError::InvalidValue));
        // Nothing changed
        assert_eq!(bmp.count(1), 1);
        assert_eq!(bmp.get(2, 2), Ok(1));
        assert!(!bmp.is_dirty());
    }

    #[test]
    fn test_dirty_rows() {
        let mut bmp = Small::new(8, 8).unwrap();
        assert!(!bmp.is_dirty());

        bmp.set(1, 5, 1).unwrap();
        bmp.set(2, 2, 1).unwrap();
        bmp.set(3, 5, 1).unwrap();
        // Writing an unchanged value does not dirty the row
        bmp.set(0, 7, 0).unwrap();

        let rows = bmp.take_dirty_rows();
        assert_eq!(rows.as_slice(), &[2, 5]);
        assert!(!bmp.is_dirty());
    }

    #[test]
    fn test_fill_marks_all_dirty() {
        let mut bmp = Small::new(8, 4).unwrap();
        bmp.fill(0).unwrap();
        assert_eq!(bmp.take_dirty_rows().as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_eq_ignores_dirty_state() {
        let mut a = Small::new(8, 4).unwrap();
        let mut b = Small::new(8, 4).unwrap();
        a.set(1, 1, 1).unwrap();
        b.set(1, 1, 1).unwrap();
        b.take_dirty_rows();
        assert_eq!(a, b);
        b.set(2, 1, 1).unwrap();
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_set_touches_one_pixel(x in 0i32..20, y in 0i32..20) {
            let mut bmp = Bitmap::<64>::new(20, 20).unwrap();
            bmp.set(x, y, 1).unwrap();
            prop_assert_eq!(bmp.count(1), 1);
            prop_assert_eq!(bmp.get(x, y), Ok(1));
            prop_assert!(bmp.is_row_dirty(y as u16));
        }
    }
}
