pub const BUFFER_WIDTH: u32 = 960;
pub const BUFFER_HEIGHT: u32 = 540;
pub const BYTES_PER_PIXEL: usize = 4;
pub const BUFFER_STRIDE: usize = BUFFER_WIDTH as usize * BYTES_PER_PIXEL;

#[derive(Clone)]
pub struct PixelBuffer {
    bytes: Vec<u8>,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &BUFFER_WIDTH)
            .field("height", &BUFFER_HEIGHT)
            .finish()
    }
}

impl PixelBuffer {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; BUFFER_STRIDE * BUFFER_HEIGHT as usize],
        }
    }

    pub fn width(&self) -> u32 {
        BUFFER_WIDTH
    }

    pub fn height(&self) -> u32 {
        BUFFER_HEIGHT
    }

    pub fn stride(&self) -> usize {
        BUFFER_STRIDE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for pixel in self.bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgba);
        }
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= BUFFER_WIDTH || y >= BUFFER_HEIGHT {
            return;
        }
        let offset = y as usize * BUFFER_STRIDE + x as usize * BYTES_PER_PIXEL;
        self.bytes[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= BUFFER_WIDTH || y >= BUFFER_HEIGHT {
            return None;
        }
        let offset = y as usize * BUFFER_STRIDE + x as usize * BYTES_PER_PIXEL;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.bytes[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = (u32, &mut [u8])> {
        self.bytes
            .chunks_exact_mut(BUFFER_STRIDE)
            .enumerate()
            .map(|(y, row)| (y as u32, row))
    }
}
