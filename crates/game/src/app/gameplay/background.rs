use handmade_platform::{PixelBuffer, Vec2, BYTES_PER_PIXEL};
use image::ImageFormat;

#[derive(Debug, Clone)]
pub(crate) struct BackgroundImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl BackgroundImage {
    pub(crate) fn decode_png(bytes: &[u8]) -> Result<Self, String> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|error| format!("decode png: {error}"))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(format!("decode png: empty image {width}x{height}"));
        }
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn draw(&self, buffer: &mut PixelBuffer) {
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        for (y, row) in buffer.rows_mut() {
            let src_start = (y % self.height) as usize * row_bytes;
            let src_row = &self.rgba[src_start..src_start + row_bytes];
            for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let src = (x % self.width as usize) * BYTES_PER_PIXEL;
                pixel.copy_from_slice(&src_row[src..src + BYTES_PER_PIXEL]);
            }
        }
    }
}

pub(crate) fn draw_gradient(buffer: &mut PixelBuffer, offset: Vec2) {
    for (y, row) in buffer.rows_mut() {
        for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            pixel.copy_from_slice(&gradient_pixel(x as u32, y, offset));
        }
    }
}

/// Blue follows x, green follows y; both wrap every 256 pixels.
pub(crate) fn gradient_pixel(x: u32, y: u32, offset: Vec2) -> [u8; 4] {
    let green = (i64::from(y) + offset.y as i64).rem_euclid(256) as u8;
    let blue = (i64::from(x) + offset.x as i64).rem_euclid(256) as u8;
    [0, green, blue, 255]
}
