use super::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ActionUp,
    ActionDown,
    ActionLeft,
    ActionRight,
    LeftShoulder,
    RightShoulder,
    Back,
    Start,
}

pub const BUTTON_COUNT: usize = 12;

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::MoveUp,
        Button::MoveDown,
        Button::MoveLeft,
        Button::MoveRight,
        Button::ActionUp,
        Button::ActionDown,
        Button::ActionLeft,
        Button::ActionRight,
        Button::LeftShoulder,
        Button::RightShoulder,
        Button::Back,
        Button::Start,
    ];

    const fn index(self) -> usize {
        match self {
            Button::MoveUp => 0,
            Button::MoveDown => 1,
            Button::MoveLeft => 2,
            Button::MoveRight => 3,
            Button::ActionUp => 4,
            Button::ActionDown => 5,
            Button::ActionLeft => 6,
            Button::ActionRight => 7,
            Button::LeftShoulder => 8,
            Button::RightShoulder => 9,
            Button::Back => 10,
            Button::Start => 11,
        }
    }
}

/// Final level of a button plus how many times the level flipped during the frame.
///
/// A fast tap inside one frame shows up as `is_down == false` with
/// `half_transition_count == 2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub is_down: bool,
    pub half_transition_count: u32,
}

impl ButtonState {
    pub fn was_pressed(&self) -> bool {
        self.half_transition_count > 1
            || (self.half_transition_count == 1 && self.is_down)
    }

    pub fn was_released(&self) -> bool {
        self.half_transition_count > 1
            || (self.half_transition_count == 1 && !self.is_down)
    }

    fn apply(&mut self, is_down_now: bool) {
        if self.is_down != is_down_now {
            self.is_down = is_down_now;
            self.half_transition_count = self.half_transition_count.wrapping_add(1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSlot {
    Keyboard,
    TouchGesture,
}

pub const CONTROLLER_COUNT: usize = 2;

impl ControllerSlot {
    pub const ALL: [ControllerSlot; CONTROLLER_COUNT] =
        [ControllerSlot::Keyboard, ControllerSlot::TouchGesture];

    const fn index(self) -> usize {
        match self {
            ControllerSlot::Keyboard => 0,
            ControllerSlot::TouchGesture => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    pub is_connected: bool,
    pub is_analog: bool,
    pub stick_average: Vec2,
    buttons: [ButtonState; BUTTON_COUNT],
}

impl ControllerInput {
    pub fn button(&self, button: Button) -> ButtonState {
        self.buttons[button.index()]
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.button(button).is_down
    }

    pub fn apply_edge(&mut self, button: Button, is_down_now: bool) {
        self.buttons[button.index()].apply(is_down_now);
    }

    fn carry_levels_from(&mut self, previous: &ControllerInput) {
        for (next, prev) in self.buttons.iter_mut().zip(previous.buttons.iter()) {
            next.is_down = prev.is_down;
            next.half_transition_count = 0;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub delta_seconds: f32,
    controllers: [ControllerInput; CONTROLLER_COUNT],
}

impl FrameInput {
    pub fn controller(&self, slot: ControllerSlot) -> &ControllerInput {
        &self.controllers[slot.index()]
    }

    pub fn controller_mut(&mut self, slot: ControllerSlot) -> &mut ControllerInput {
        &mut self.controllers[slot.index()]
    }

    pub fn controllers(&self) -> impl Iterator<Item = (ControllerSlot, &ControllerInput)> {
        ControllerSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.controller(slot)))
    }

    pub fn apply_edge(&mut self, slot: ControllerSlot, button: Button, is_down_now: bool) {
        self.controller_mut(slot).apply_edge(button, is_down_now);
    }
}

pub fn begin_frame(old: &FrameInput, new: &mut FrameInput) {
    for slot in ControllerSlot::ALL {
        let previous = old.controller(slot);
        let next = new.controller_mut(slot);
        next.carry_levels_from(previous);
        next.is_connected = true;
        next.is_analog = false;
        next.stick_average = Vec2::ZERO;
    }
}

#[derive(Debug, Default)]
pub struct InputBuffers {
    frames: [FrameInput; 2],
    new_index: usize,
}

impl InputBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn old(&self) -> &FrameInput {
        &self.frames[1 - self.new_index]
    }

    pub fn new_frame(&self) -> &FrameInput {
        &self.frames[self.new_index]
    }

    pub fn new_frame_mut(&mut self) -> &mut FrameInput {
        &mut self.frames[self.new_index]
    }

    pub fn split_mut(&mut self) -> (&FrameInput, &mut FrameInput) {
        let (first, second) = self.frames.split_at_mut(1);
        if self.new_index == 0 {
            (&second[0], &mut first[0])
        } else {
            (&first[0], &mut second[0])
        }
    }

    pub fn swap(&mut self) {
        self.new_index = 1 - self.new_index;
    }
}
