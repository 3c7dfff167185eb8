use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::info;
use winit::window::Window;

use super::frame_buffer::{PixelBuffer, BUFFER_HEIGHT, BUFFER_WIDTH};

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("presentation surface is not attached")]
    NotAttached,
    #[error("failed to create presentation surface: {0}")]
    CreateSurface(#[source] pixels::Error),
    #[error("failed to resize presentation surface to {width}x{height}: {source}")]
    ResizeSurface {
        width: u32,
        height: u32,
        #[source]
        source: pixels::TextureError,
    },
    #[error("failed to present frame: {0}")]
    Render(#[source] pixels::Error),
}

/// Pushes finished frames to the screen. The scheduler only calls `present`
/// between a successful `attach` and the next `detach`.
pub trait Presenter {
    fn attach(&mut self) -> Result<(), PresentError>;

    fn detach(&mut self);

    fn resize(&mut self, _width: u32, _height: u32) -> Result<(), PresentError> {
        Ok(())
    }

    fn present(&mut self, buffer: &PixelBuffer) -> Result<(), PresentError>;
}

pub struct PixelsPresenter {
    window: Arc<Window>,
    pixels: Option<Pixels<'static>>,
}

impl PixelsPresenter {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pixels: None,
        }
    }

    fn build_pixels(window: Arc<Window>) -> Result<Pixels<'static>, PresentError> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        Pixels::new(BUFFER_WIDTH, BUFFER_HEIGHT, surface).map_err(PresentError::CreateSurface)
    }
}

impl Presenter for PixelsPresenter {
    fn attach(&mut self) -> Result<(), PresentError> {
        if self.pixels.is_none() {
            self.pixels = Some(Self::build_pixels(Arc::clone(&self.window))?);
            let size = self.window.inner_size();
            info!(
                surface_width = size.width,
                surface_height = size.height,
                "presenter_attached"
            );
        }
        Ok(())
    }

    fn detach(&mut self) {
        if self.pixels.take().is_some() {
            info!("presenter_detached");
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let Some(pixels) = self.pixels.as_mut() else {
            return Ok(());
        };
        pixels
            .resize_surface(width, height)
            .map_err(|source| PresentError::ResizeSurface {
                width,
                height,
                source,
            })
    }

    fn present(&mut self, buffer: &PixelBuffer) -> Result<(), PresentError> {
        let pixels = self.pixels.as_mut().ok_or(PresentError::NotAttached)?;
        pixels.frame_mut().copy_from_slice(buffer.as_bytes());
        pixels.render().map_err(PresentError::Render)
    }
}
