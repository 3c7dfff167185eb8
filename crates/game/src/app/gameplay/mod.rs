mod background;

use handmade_platform::{
    AssetReader, Button, FrameContext, FrameInput, PixelBuffer, Simulation, Vec2, BUFFER_HEIGHT,
    BUFFER_WIDTH,
};
use tracing::{debug, info, warn};

use background::{draw_gradient, BackgroundImage};

const BACKGROUND_ASSET: &str = "background.png";
const PLAYER_SPEED_PX_PER_SECOND: f32 = 240.0;
const PLAYER_SIZE_PX: u32 = 10;
const PLAYER_COLOR: [u8; 4] = [255, 255, 255, 255];
const GRADIENT_SCROLL_PX_PER_SECOND: f32 = 30.0;
const GREY_RAMP_HEIGHT_PX: u32 = 16;

#[derive(Debug)]
enum Background {
    Unloaded,
    Image(BackgroundImage),
    Gradient,
}

pub(crate) struct DemoSimulation {
    background: Background,
    gradient_offset: Vec2,
    player_position: Vec2,
    grey_ramp_enabled: bool,
    grey_ramp_counter: u8,
}

impl DemoSimulation {
    pub(crate) fn new() -> Self {
        Self {
            background: Background::Unloaded,
            gradient_offset: Vec2::ZERO,
            player_position: Vec2::new(
                (BUFFER_WIDTH - PLAYER_SIZE_PX) as f32 * 0.5,
                (BUFFER_HEIGHT - PLAYER_SIZE_PX) as f32 * 0.5,
            ),
            grey_ramp_enabled: false,
            grey_ramp_counter: 0,
        }
    }

    fn ensure_background(&mut self, assets: &dyn AssetReader) {
        if !matches!(self.background, Background::Unloaded) {
            return;
        }
        self.background = match assets.read_entire_file(BACKGROUND_ASSET) {
            Ok(bytes) => match BackgroundImage::decode_png(&bytes) {
                Ok(image) => {
                    info!(
                        asset = BACKGROUND_ASSET,
                        width = image.width(),
                        height = image.height(),
                        "background_loaded"
                    );
                    Background::Image(image)
                }
                Err(error) => {
                    warn!(asset = BACKGROUND_ASSET, error = %error, "background_fallback");
                    Background::Gradient
                }
            },
            Err(error) if error.is_not_found() => {
                info!(asset = BACKGROUND_ASSET, "background_fallback");
                Background::Gradient
            }
            Err(error) => {
                warn!(asset = BACKGROUND_ASSET, error = %error, "background_fallback");
                Background::Gradient
            }
        };
    }

    fn update(&mut self, frame: &FrameContext<'_>) {
        let delta = movement_delta(frame.new_input, frame.delta_seconds, PLAYER_SPEED_PX_PER_SECOND);
        // Stick y points up, buffer rows grow downward.
        self.player_position = clamp_player(Vec2::new(
            self.player_position.x + delta.x,
            self.player_position.y - delta.y,
        ));

        if action_pressed(frame.new_input, Button::ActionDown) {
            self.grey_ramp_enabled = !self.grey_ramp_enabled;
            debug!(enabled = self.grey_ramp_enabled, "grey_ramp_toggled");
        }
        if self.grey_ramp_enabled {
            self.grey_ramp_counter = self.grey_ramp_counter.wrapping_add(1);
        }

        let scroll = GRADIENT_SCROLL_PX_PER_SECOND * frame.delta_seconds;
        self.gradient_offset = Vec2::new(
            (self.gradient_offset.x + scroll) % 256.0,
            (self.gradient_offset.y + scroll * 0.5) % 256.0,
        );
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        match &self.background {
            Background::Image(image) => image.draw(buffer),
            Background::Gradient | Background::Unloaded => {
                draw_gradient(buffer, self.gradient_offset)
            }
        }

        if self.grey_ramp_enabled {
            let grey = self.grey_ramp_counter;
            for y in 0..GREY_RAMP_HEIGHT_PX {
                for x in 0..BUFFER_WIDTH {
                    buffer.put_pixel(x, y, [grey, grey, grey, 255]);
                }
            }
        }

        let left = self.player_position.x as u32;
        let top = self.player_position.y as u32;
        for y in top..top + PLAYER_SIZE_PX {
            for x in left..left + PLAYER_SIZE_PX {
                buffer.put_pixel(x, y, PLAYER_COLOR);
            }
        }
    }
}

impl Simulation for DemoSimulation {
    fn step(&mut self, frame: &FrameContext<'_>, buffer: &mut PixelBuffer) {
        self.ensure_background(frame.assets);
        self.update(frame);
        self.render(buffer);
    }

    fn shutdown(&mut self) {
        info!(
            player_x = self.player_position.x,
            player_y = self.player_position.y,
            "demo_shutdown"
        );
    }
}

fn movement_delta(input: &FrameInput, delta_seconds: f32, speed: f32) -> Vec2 {
    let is_down = |button: Button| {
        input
            .controllers()
            .any(|(_, controller)| controller.is_down(button))
    };

    let mut x = 0.0f32;
    let mut y = 0.0f32;
    if is_down(Button::MoveRight) {
        x += 1.0;
    }
    if is_down(Button::MoveLeft) {
        x -= 1.0;
    }
    if is_down(Button::MoveUp) {
        y += 1.0;
    }
    if is_down(Button::MoveDown) {
        y -= 1.0;
    }

    let len_sq = x * x + y * y;
    if len_sq > 0.0 {
        let inv_len = len_sq.sqrt().recip();
        x *= inv_len;
        y *= inv_len;
    }

    Vec2::new(x * speed * delta_seconds, y * speed * delta_seconds)
}

fn action_pressed(input: &FrameInput, button: Button) -> bool {
    input
        .controllers()
        .any(|(_, controller)| controller.button(button).was_pressed())
}

fn clamp_player(position: Vec2) -> Vec2 {
    let max_x = (BUFFER_WIDTH - PLAYER_SIZE_PX) as f32;
    let max_y = (BUFFER_HEIGHT - PLAYER_SIZE_PX) as f32;
    Vec2::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
}

#[cfg(test)]
mod tests;
