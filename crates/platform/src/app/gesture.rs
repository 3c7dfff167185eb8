use tracing::{debug, warn};

use super::math::Vec2;

pub const PAN_DEADZONE_PX: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionAction {
    Down,
    Up,
    Move,
    Cancel,
    PointerDown,
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: u64,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionEvent {
    pub action: MotionAction,
    pub pointers: Vec<Pointer>,
}

impl MotionEvent {
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanGestureState {
    pub active: bool,
    pub anchor_point: Vec2,
    pub virtual_stick: Vec2,
}

#[derive(Debug, Default)]
pub struct PanGesture {
    state: PanGestureState,
}

impl PanGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanGestureState {
        self.state
    }

    pub fn virtual_stick(&self) -> Vec2 {
        self.state.virtual_stick
    }

    pub fn on_motion_event(&mut self, event: &MotionEvent) -> bool {
        if ends_pan(event) {
            self.reset(event);
            return true;
        }

        let (first, second) = (event.pointers[0], event.pointers[1]);
        if first.id == second.id {
            warn!(pointer_id = first.id, "gesture_duplicate_pointer_id");
            return true;
        }
        if !first.position.is_finite() || !second.position.is_finite() {
            warn!(pointer_id = first.id, "gesture_non_finite_position");
            return true;
        }

        let center = Vec2::midpoint(first.position, second.position);
        if !self.state.active {
            debug!(
                pointer_0_x = first.position.x,
                pointer_0_y = first.position.y,
                pointer_1_x = second.position.x,
                pointer_1_y = second.position.y,
                center_x = center.x,
                center_y = center.y,
                "pan_started"
            );
            self.state = PanGestureState {
                active: true,
                anchor_point: center,
                virtual_stick: Vec2::ZERO,
            };
        }

        let stick = quantize_pan_offset(center - self.state.anchor_point);
        if stick != self.state.virtual_stick {
            debug!(stick_x = stick.x, stick_y = stick.y, "pan_stick_changed");
        }
        self.state.virtual_stick = stick;
        true
    }

    fn reset(&mut self, event: &MotionEvent) {
        if self.state.active {
            debug!(
                action = ?event.action,
                pointer_count = event.pointer_count(),
                "pan_ended"
            );
        }
        self.state = PanGestureState::default();
    }
}

fn ends_pan(event: &MotionEvent) -> bool {
    event.pointer_count() != 2
        || matches!(
            event.action,
            MotionAction::Up | MotionAction::Cancel | MotionAction::PointerUp
        )
}

/// Maps a pan offset to one of nine stick positions. Screen y grows
/// downward, so panning up yields a positive stick y.
pub fn quantize_pan_offset(offset: Vec2) -> Vec2 {
    let x = if offset.x.abs() > PAN_DEADZONE_PX {
        offset.x.signum()
    } else {
        0.0
    };
    let y = if offset.y.abs() > PAN_DEADZONE_PX {
        -offset.y.signum()
    } else {
        0.0
    };
    Vec2::new(x, y)
}
