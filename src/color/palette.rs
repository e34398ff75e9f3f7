use std::cmp::Reverse;
use std::collections::HashMap;

use super::pixel_buffer::PixelBuffer;
use super::rgb::Rgb;

const DEFAULT_LEVELS: u8 = 16;
const MAX_SAMPLES: usize = 250_000;

#[derive(Debug, Default, Clone, Copy)]
struct Bin {
    count: u64,
    r: u64,
    g: u64,
    b: u64,
}

impl Bin {
    fn add(&mut self, rgb: Rgb) {
        self.count += 1;
        self.r += u64::from(rgb.r);
        self.g += u64::from(rgb.g);
        self.b += u64::from(rgb.b);
    }

    fn mean(&self) -> Rgb {
        Rgb::new(
            (self.r / self.count) as u8,
            (self.g / self.count) as u8,
            (self.b / self.count) as u8,
        )
    }
}

/// Ranks the colors of a whole image by frequency.
///
/// Pixels are bucketed on a coarse grid (`levels` steps per channel) so
/// near-identical shades count together; each bucket is reported as the
/// mean of the pixels that fell into it. Fully transparent pixels are
/// ignored.
#[derive(Debug, Clone)]
pub struct PaletteExtractor {
    size: usize,
    levels: u8,
}

impl PaletteExtractor {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            levels: DEFAULT_LEVELS,
        }
    }

    pub fn extract(&self, buffer: &PixelBuffer) -> Vec<Rgb> {
        let pixel_count = buffer.width() as usize * buffer.height() as usize;
        let step = pixel_count.div_ceil(MAX_SAMPLES).max(1);

        let mut bins: HashMap<(u8, u8, u8), Bin> = HashMap::new();
        for (rgb, alpha) in buffer.pixels().step_by(step) {
            if alpha == 0 {
                continue;
            }
            bins.entry(self.quantize(rgb)).or_default().add(rgb);
        }

        let mut ranked: Vec<_> = bins.into_iter().collect();
        ranked.sort_by_key(|&(key, bin)| (Reverse(bin.count), key));
        ranked
            .into_iter()
            .take(self.size)
            .map(|(_, bin)| bin.mean())
            .collect()
    }

    /// [`Self::extract`] formatted as `#rrggbb` strings.
    pub fn hex_palette(&self, buffer: &PixelBuffer) -> Vec<String> {
        self.extract(buffer).iter().map(Rgb::to_hex).collect()
    }

    fn quantize(&self, rgb: Rgb) -> (u8, u8, u8) {
        let step = (256 / u16::from(self.levels)).max(1);
        let bucket = |c: u8| (u16::from(c) / step) as u8;
        (bucket(rgb.r), bucket(rgb.g), bucket(rgb.b))
    }
}

/// First palette entry, or black for an empty palette.
pub fn dominant_color(palette: &[String]) -> String {
    palette
        .first()
        .cloned()
        .unwrap_or_else(|| Rgb::BLACK.to_hex())
}
