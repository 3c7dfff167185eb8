use std::collections::VecDeque;

use tracing::{debug, info};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use super::gesture::{MotionEvent, PanGesture};
use super::input::{Button, ControllerInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl KeyEvent {
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn released(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }

    fn is_down(&self) -> bool {
        self.state == ElementState::Pressed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    WindowCreated,
    WindowDestroyed,
    WindowResized { width: u32, height: u32 },
    FocusChanged(bool),
    AppTerminating,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Key(KeyEvent),
    Motion(MotionEvent),
    Lifecycle(LifecycleEvent),
    Unsupported { kind: &'static str },
}

pub trait EventSource {
    fn pump(&mut self) {}

    fn poll_event(&mut self) -> Option<HostEvent>;

    fn on_unconsumed(&mut self, _event: &HostEvent) {}
}

#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<HostEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HostEvent) {
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.pending.pop_front()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub drained: u32,
    pub keys: u32,
    pub motions: u32,
    pub dropped: u32,
    pub deferred: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Consumed,
    Dropped,
    Deferred,
}

pub fn drain_pending_events(
    source: &mut dyn EventSource,
    keyboard: &mut ControllerInput,
    gesture: &mut PanGesture,
    mut on_lifecycle: impl FnMut(LifecycleEvent),
) -> IngestStats {
    let mut stats = IngestStats::default();
    source.pump();

    while let Some(event) = source.poll_event() {
        stats.drained = stats.drained.saturating_add(1);
        let disposition = match &event {
            HostEvent::Key(key_event) => {
                stats.keys = stats.keys.saturating_add(1);
                route_key_event(key_event, keyboard)
            }
            HostEvent::Motion(motion_event) => {
                stats.motions = stats.motions.saturating_add(1);
                if gesture.on_motion_event(motion_event) {
                    Disposition::Consumed
                } else {
                    Disposition::Deferred
                }
            }
            HostEvent::Lifecycle(lifecycle) => {
                info!(event = ?lifecycle, "lifecycle_event");
                on_lifecycle(*lifecycle);
                Disposition::Consumed
            }
            HostEvent::Unsupported { kind } => {
                debug!(kind, "event_unsupported");
                Disposition::Dropped
            }
        };

        match disposition {
            Disposition::Consumed => {}
            Disposition::Dropped => stats.dropped = stats.dropped.saturating_add(1),
            Disposition::Deferred => {
                stats.deferred = stats.deferred.saturating_add(1);
                source.on_unconsumed(&event);
            }
        }
    }

    stats
}

fn route_key_event(key_event: &KeyEvent, keyboard: &mut ControllerInput) -> Disposition {
    if is_back_key(key_event.key) {
        return Disposition::Deferred;
    }
    if key_event.repeat {
        return Disposition::Consumed;
    }

    match button_for_key(key_event.key) {
        Some(button) => {
            keyboard.apply_edge(button, key_event.is_down());
            Disposition::Consumed
        }
        None => {
            debug!(
                key = ?key_event.key,
                is_down = key_event.is_down(),
                "key_unmapped"
            );
            Disposition::Dropped
        }
    }
}

pub fn is_back_key(key: PhysicalKey) -> bool {
    matches!(
        key,
        PhysicalKey::Code(KeyCode::Escape) | PhysicalKey::Code(KeyCode::BrowserBack)
    )
}

pub fn button_for_key(key: PhysicalKey) -> Option<Button> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let button = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Button::MoveUp,
        KeyCode::KeyS | KeyCode::ArrowDown => Button::MoveDown,
        KeyCode::KeyA | KeyCode::ArrowLeft => Button::MoveLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => Button::MoveRight,
        KeyCode::KeyI => Button::ActionUp,
        KeyCode::KeyK => Button::ActionDown,
        KeyCode::KeyJ => Button::ActionLeft,
        KeyCode::KeyL => Button::ActionRight,
        KeyCode::KeyQ => Button::LeftShoulder,
        KeyCode::KeyE => Button::RightShoulder,
        KeyCode::Backspace => Button::Back,
        KeyCode::Enter => Button::Start,
        _ => return None,
    };
    Some(button)
}
