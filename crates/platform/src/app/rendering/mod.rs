mod frame_buffer;
mod presenter;

pub use frame_buffer::{PixelBuffer, BUFFER_HEIGHT, BUFFER_STRIDE, BUFFER_WIDTH, BYTES_PER_PIXEL};
pub use presenter::{PixelsPresenter, PresentError, Presenter};
