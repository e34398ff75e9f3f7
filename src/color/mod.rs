pub mod hsl;
pub mod palette;
pub mod pixel_buffer;
pub mod rgb;

pub use hsl::{Hsl, rgb_to_hsl};
pub use palette::{PaletteExtractor, dominant_color};
pub use pixel_buffer::{PixelBuffer, PixelCoordinate};
pub use rgb::Rgb;
