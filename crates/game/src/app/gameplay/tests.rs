use std::cell::Cell;
use std::collections::HashMap;
use std::io::Cursor;

use handmade_platform::{AssetError, ControllerSlot};
use image::{ImageFormat, Rgba, RgbaImage};

use super::background::gradient_pixel;
use super::*;

#[derive(Default)]
struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
    reads: Cell<u32>,
}

impl MemoryAssets {
    fn with_file(name: &str, bytes: Vec<u8>) -> Self {
        let mut assets = Self::default();
        assets.files.insert(name.to_string(), bytes);
        assets
    }
}

impl AssetReader for MemoryAssets {
    fn read_entire_file(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        self.reads.set(self.reads.get() + 1);
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                name: name.to_string(),
            })
    }
}

const DT: f32 = 1.0 / 30.0;

fn step(
    simulation: &mut DemoSimulation,
    assets: &dyn AssetReader,
    old: &FrameInput,
    new: &FrameInput,
    buffer: &mut PixelBuffer,
) {
    let frame = FrameContext {
        delta_seconds: DT,
        old_input: old,
        new_input: new,
        assets,
    };
    simulation.step(&frame, buffer);
}

fn input_with(slot: ControllerSlot, buttons: &[Button]) -> FrameInput {
    let mut input = FrameInput::default();
    for button in buttons {
        input.apply_edge(slot, *button, true);
    }
    input
}

fn held(input: &FrameInput) -> FrameInput {
    let mut next = *input;
    handmade_platform::begin_frame(input, &mut next);
    next
}

fn png_bytes(color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(4, 2, Rgba(color));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

#[test]
fn movement_magnitude_is_speed_times_dt() {
    let input = input_with(ControllerSlot::Keyboard, &[Button::MoveRight]);
    let delta = movement_delta(&input, 0.5, 10.0);

    assert!((delta.x - 5.0).abs() < 0.0001);
    assert_eq!(delta.y, 0.0);
}

#[test]
fn diagonal_is_normalized() {
    let input = input_with(ControllerSlot::Keyboard, &[Button::MoveUp, Button::MoveLeft]);
    let delta = movement_delta(&input, 1.0, 1.0);

    let length = (delta.x * delta.x + delta.y * delta.y).sqrt();
    assert!((length - 1.0).abs() < 0.0001);
    assert!(delta.x < 0.0 && delta.y > 0.0);
}

#[test]
fn opposite_directions_cancel() {
    let input = input_with(
        ControllerSlot::Keyboard,
        &[Button::MoveLeft, Button::MoveRight],
    );
    assert_eq!(movement_delta(&input, 1.0, 1.0), Vec2::ZERO);
}

#[test]
fn touch_stick_moves_player_like_keyboard() {
    let input = input_with(ControllerSlot::TouchGesture, &[Button::MoveDown]);
    let delta = movement_delta(&input, 1.0, 2.0);

    assert_eq!(delta, Vec2::new(0.0, -2.0));
}

#[test]
fn player_moves_down_the_buffer_when_stick_points_down() {
    let mut simulation = DemoSimulation::new();
    let assets = MemoryAssets::default();
    let mut buffer = PixelBuffer::new();
    let start = simulation.player_position;

    let old = FrameInput::default();
    let new = input_with(ControllerSlot::Keyboard, &[Button::MoveDown]);
    step(&mut simulation, &assets, &old, &new, &mut buffer);

    let expected = start.y + PLAYER_SPEED_PX_PER_SECOND * DT;
    assert!((simulation.player_position.y - expected).abs() < 0.001);
    assert_eq!(simulation.player_position.x, start.x);
}

#[test]
fn player_is_clamped_inside_buffer() {
    let clamped = clamp_player(Vec2::new(-50.0, 10_000.0));
    assert_eq!(clamped.x, 0.0);
    assert_eq!(clamped.y, (BUFFER_HEIGHT - PLAYER_SIZE_PX) as f32);
}

#[test]
fn player_square_is_drawn_at_position() {
    let mut simulation = DemoSimulation::new();
    let assets = MemoryAssets::default();
    let mut buffer = PixelBuffer::new();
    let input = FrameInput::default();

    step(&mut simulation, &assets, &input, &input, &mut buffer);

    let x = simulation.player_position.x as u32;
    let y = simulation.player_position.y as u32;
    assert_eq!(buffer.pixel(x, y), Some(PLAYER_COLOR));
    assert_eq!(
        buffer.pixel(x + PLAYER_SIZE_PX - 1, y + PLAYER_SIZE_PX - 1),
        Some(PLAYER_COLOR)
    );
}

#[test]
fn action_down_edge_toggles_grey_ramp_once_while_held() {
    let mut simulation = DemoSimulation::new();
    let assets = MemoryAssets::default();
    let mut buffer = PixelBuffer::new();

    let idle = FrameInput::default();
    let pressed = input_with(ControllerSlot::Keyboard, &[Button::ActionDown]);
    step(&mut simulation, &assets, &idle, &pressed, &mut buffer);
    assert!(simulation.grey_ramp_enabled);
    assert_eq!(buffer.pixel(0, 0), Some([1, 1, 1, 255]));

    let still_held = held(&pressed);
    step(&mut simulation, &assets, &pressed, &still_held, &mut buffer);
    assert!(simulation.grey_ramp_enabled);
    assert_eq!(buffer.pixel(0, 0), Some([2, 2, 2, 255]));

    let mut released = held(&still_held);
    released.apply_edge(ControllerSlot::Keyboard, Button::ActionDown, false);
    step(&mut simulation, &assets, &still_held, &released, &mut buffer);
    assert!(simulation.grey_ramp_enabled);

    let mut pressed_again = held(&released);
    pressed_again.apply_edge(ControllerSlot::Keyboard, Button::ActionDown, true);
    step(&mut simulation, &assets, &released, &pressed_again, &mut buffer);
    assert!(!simulation.grey_ramp_enabled);
}

#[test]
fn missing_background_falls_back_to_gradient_and_reads_once() {
    let mut simulation = DemoSimulation::new();
    let assets = MemoryAssets::default();
    let mut buffer = PixelBuffer::new();
    let input = FrameInput::default();

    step(&mut simulation, &assets, &input, &input, &mut buffer);
    step(&mut simulation, &assets, &input, &input, &mut buffer);

    assert!(matches!(simulation.background, Background::Gradient));
    assert_eq!(assets.reads.get(), 1);
    let row = BUFFER_HEIGHT - 1;
    assert_eq!(
        buffer.pixel(3, row),
        Some(gradient_pixel(3, row, simulation.gradient_offset))
    );
}

#[test]
fn png_background_is_tiled_into_buffer() {
    let mut simulation = DemoSimulation::new();
    let assets = MemoryAssets::with_file(BACKGROUND_ASSET, png_bytes([10, 20, 30, 255]));
    let mut buffer = PixelBuffer::new();
    let input = FrameInput::default();

    step(&mut simulation, &assets, &input, &input, &mut buffer);

    assert!(matches!(simulation.background, Background::Image(_)));
    assert_eq!(buffer.pixel(0, BUFFER_HEIGHT - 1), Some([10, 20, 30, 255]));
    assert_eq!(buffer.pixel(BUFFER_WIDTH - 1, 100), Some([10, 20, 30, 255]));
}

#[test]
fn corrupt_background_falls_back_to_gradient() {
    let mut simulation = DemoSimulation::new();
    let assets = MemoryAssets::with_file(BACKGROUND_ASSET, b"not a png".to_vec());
    let mut buffer = PixelBuffer::new();
    let input = FrameInput::default();

    step(&mut simulation, &assets, &input, &input, &mut buffer);

    assert!(matches!(simulation.background, Background::Gradient));
}

#[test]
fn gradient_scrolls_with_fixed_delta() {
    let mut simulation = DemoSimulation::new();
    let assets = MemoryAssets::default();
    let mut buffer = PixelBuffer::new();
    let input = FrameInput::default();

    step(&mut simulation, &assets, &input, &input, &mut buffer);

    let expected = GRADIENT_SCROLL_PX_PER_SECOND * DT;
    assert!((simulation.gradient_offset.x - expected).abs() < 0.0001);
}
