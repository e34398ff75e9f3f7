use image::DynamicImage;
use serde::Deserialize;

use super::rgb::Rgb;

const BYTES_PER_PIXEL: usize = 4;

/// A user-selected point on the uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PixelCoordinate {
    pub x: u32,
    pub y: u32,
}

impl PixelCoordinate {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Flat RGBA8 pixel data, row-major.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Returns `None` if `data` is not exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn contains(&self, coordinate: PixelCoordinate) -> bool {
        coordinate.x < self.width && coordinate.y < self.height
    }

    pub fn pixel_at(&self, coordinate: PixelCoordinate) -> Option<Rgb> {
        if !self.contains(coordinate) {
            return None;
        }
        let index = (coordinate.y as usize * self.width as usize + coordinate.x as usize)
            * BYTES_PER_PIXEL;
        let pixel = self.data.get(index..index + 3)?;
        Some(Rgb::new(pixel[0], pixel[1], pixel[2]))
    }

    /// Iterates `(rgb, alpha)` for every pixel.
    pub fn pixels(&self) -> impl Iterator<Item = (Rgb, u8)> + '_ {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|p| (Rgb::new(p[0], p[1], p[2]), p[3]))
    }
}

impl From<DynamicImage> for PixelBuffer {
    fn from(image: DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }
}
