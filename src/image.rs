//! # Floating point images
//!
//! Grayscale `f32` images used as matcher input, and square patch views over them.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::path::Path;

use image::DynamicImage;

use crate::error::*;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A single channel floating point image stored row-major, with a stride equal to its width.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayFloatImage {
    width: usize,
    height: usize,
    data: Vec<f32>
}

/// A square window into an image.
///
/// The window covers columns `x..x + size` and rows `y..y + size` of the image, both
/// half-open. Construction does not clip, callers must keep the window inside the image.
#[derive(Debug, Clone, Copy)]
pub struct Patch<'a> {
    image: &'a GrayFloatImage,
    x: usize,
    y: usize,
    size: usize
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl GrayFloatImage {
    /// Create a new zero filled image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height]
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::BufferSize {
                expected: width * height,
                actual: data.len()
            });
        }

        Ok(Self { width, height, data })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32
    {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }

        Self { width, height, data }
    }

    /// Convert any dynamic image into luma, scaling 8 bit intensities into `[0, 1]`.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let luma = img.to_luma8();
        let data = luma.as_raw()
            .iter()
            .map(|&v| v as f32 / 255.0)
            .collect();

        Self {
            width: luma.width() as usize,
            height: luma.height() as usize,
            data
        }
    }

    /// Load an image from disk and convert it with [`GrayFloatImage::from_dynamic`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?;
        Ok(Self::from_dynamic(&img))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height) of the image.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn put(&mut self, x: usize, y: usize, val: f32) {
        self.data[y * self.width + x] = val;
    }

    /// Borrow row `y` as a slice.
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Square patch of `size` pixels whose top left corner is at (x, y).
    pub fn patch(&self, x: usize, y: usize, size: usize) -> Patch<'_> {
        Patch::new(self, x, y, size)
    }
}

impl<'a> Patch<'a> {
    pub fn new(image: &'a GrayFloatImage, x: usize, y: usize, size: usize) -> Self {
        debug_assert!(x + size <= image.width() && y + size <= image.height());

        Self { image, x, y, size }
    }

    /// Side length of the patch.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of samples in the patch.
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterate over the rows of the patch, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [f32]> + 'a {
        let image = self.image;
        let x = self.x;
        let size = self.size;

        (self.y..self.y + self.size).map(move |y| &image.row(y)[x..x + size])
    }

    /// Mean intensity over the patch.
    pub fn mean(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }

        let sum: f32 = self.rows()
            .map(|row| row.iter().sum::<f32>())
            .sum();

        sum / self.len() as f32
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_checks_length() {
        assert!(GrayFloatImage::from_vec(3, 2, vec![0.0; 6]).is_ok());

        match GrayFloatImage::from_vec(3, 2, vec![0.0; 5]) {
            Err(Error::BufferSize { expected, actual }) => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 5);
            }
            other => panic!("unexpected result: {:?}", other)
        }
    }

    #[test]
    fn row_major_layout() {
        let img = GrayFloatImage::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        assert_eq!(img.get(2, 0), 3.0);
        assert_eq!(img.get(0, 1), 4.0);
        assert_eq!(img.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn patch_rows_cover_inclusive_window() {
        // value encodes its own position: 10 * y + x
        let img = GrayFloatImage::from_fn(5, 5, |x, y| (10 * y + x) as f32);
        let patch = img.patch(1, 2, 3);

        let rows: Vec<&[f32]> = patch.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], &[21.0, 22.0, 23.0]);
        assert_eq!(rows[2], &[41.0, 42.0, 43.0]);
        assert_eq!(patch.len(), 9);
    }

    #[test]
    fn patch_mean() {
        let img = GrayFloatImage::from_fn(4, 4, |x, _| x as f32);

        assert_eq!(img.patch(0, 0, 3).mean(), 1.0);
        assert_eq!(img.patch(1, 1, 3).mean(), 2.0);
    }

    #[test]
    fn from_dynamic_normalises() {
        let mut gray = image::GrayImage::new(2, 1);
        gray.put_pixel(0, 0, image::Luma([0]));
        gray.put_pixel(1, 0, image::Luma([255]));

        let img = GrayFloatImage::from_dynamic(&DynamicImage::ImageLuma8(gray));
        assert_eq!(img.shape(), (2, 1));
        assert_eq!(img.get(0, 0), 0.0);
        assert_eq!(img.get(1, 0), 1.0);
    }
}
