use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use winit::event::{ElementState, Event, TouchPhase, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::events::{is_back_key, EventQueue, EventSource, HostEvent, KeyEvent, LifecycleEvent};
use super::gesture::{MotionAction, MotionEvent, Pointer};
use super::math::Vec2;

pub struct WinitHost {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    pending: PendingEvents,
    touches: TouchTracker,
}

impl WinitHost {
    pub fn new(event_loop: EventLoop<()>, window: Arc<Window>) -> Self {
        Self {
            event_loop,
            window,
            pending: PendingEvents::default(),
            touches: TouchTracker::default(),
        }
    }
}

// Teardown is reported at most once however many exit paths fire.
#[derive(Debug, Default)]
struct PendingEvents {
    queue: EventQueue,
    exit_reported: bool,
}

impl PendingEvents {
    fn push(&mut self, event: HostEvent) {
        if matches!(event, HostEvent::Lifecycle(LifecycleEvent::AppTerminating)) {
            if self.exit_reported {
                return;
            }
            self.exit_reported = true;
        }
        self.queue.push(event);
    }

    fn push_terminating(&mut self) {
        self.push(HostEvent::Lifecycle(LifecycleEvent::AppTerminating));
    }
}

impl EventSource for WinitHost {
    fn pump(&mut self) {
        let window_id = self.window.id();
        let pending = &mut self.pending;
        let touches = &mut self.touches;
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _target| {
                if let Some(host_event) = translate_event(event, window_id, touches) {
                    pending.push(host_event);
                }
            });

        if let PumpStatus::Exit(code) = status {
            debug!(code, "event_loop_exited");
            self.pending.push_terminating();
        }
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.pending.queue.poll_event()
    }

    fn on_unconsumed(&mut self, event: &HostEvent) {
        if let HostEvent::Key(key) = event {
            if is_back_key(key.key) && key.state == ElementState::Pressed && !key.repeat {
                info!(reason = "back_key", "shutdown_requested");
                self.pending.push_terminating();
            }
        }
    }
}

fn translate_event(
    event: Event<()>,
    window_id: WindowId,
    touches: &mut TouchTracker,
) -> Option<HostEvent> {
    match event {
        Event::Resumed => Some(HostEvent::Lifecycle(LifecycleEvent::WindowCreated)),
        Event::Suspended => Some(HostEvent::Lifecycle(LifecycleEvent::WindowDestroyed)),
        Event::LoopExiting => Some(HostEvent::Lifecycle(LifecycleEvent::AppTerminating)),
        Event::WindowEvent {
            window_id: id,
            event,
        } if id == window_id => translate_window_event(event, touches),
        _ => None,
    }
}

fn translate_window_event(event: WindowEvent, touches: &mut TouchTracker) -> Option<HostEvent> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
            Some(HostEvent::Lifecycle(LifecycleEvent::AppTerminating))
        }
        WindowEvent::Resized(size) => Some(HostEvent::Lifecycle(LifecycleEvent::WindowResized {
            width: size.width,
            height: size.height,
        })),
        WindowEvent::Focused(focused) => {
            Some(HostEvent::Lifecycle(LifecycleEvent::FocusChanged(focused)))
        }
        WindowEvent::KeyboardInput { event, .. } => Some(HostEvent::Key(KeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        })),
        WindowEvent::Touch(touch) => touches
            .apply(
                touch.id,
                touch.phase,
                Vec2::new(touch.location.x as f32, touch.location.y as f32),
            )
            .map(HostEvent::Motion),
        WindowEvent::MouseInput { .. } => Some(HostEvent::Unsupported {
            kind: "mouse_input",
        }),
        WindowEvent::MouseWheel { .. } => Some(HostEvent::Unsupported {
            kind: "mouse_wheel",
        }),
        WindowEvent::DroppedFile(_) => Some(HostEvent::Unsupported {
            kind: "dropped_file",
        }),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub(crate) struct TouchTracker {
    active: Vec<Pointer>,
}

impl TouchTracker {
    pub(crate) fn apply(&mut self, id: u64, phase: TouchPhase, position: Vec2) -> Option<MotionEvent> {
        match phase {
            TouchPhase::Started => {
                match self.find(id) {
                    Some(index) => self.active[index].position = position,
                    None => self.active.push(Pointer { id, position }),
                }
                let action = if self.active.len() == 1 {
                    MotionAction::Down
                } else {
                    MotionAction::PointerDown
                };
                Some(self.snapshot(action))
            }
            TouchPhase::Moved => {
                let Some(index) = self.find(id) else {
                    debug!(pointer_id = id, "touch_move_unknown_pointer");
                    return None;
                };
                self.active[index].position = position;
                Some(self.snapshot(MotionAction::Move))
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                let index = self.find(id)?;
                self.active[index].position = position;
                let action = match phase {
                    TouchPhase::Cancelled => MotionAction::Cancel,
                    _ if self.active.len() == 1 => MotionAction::Up,
                    _ => MotionAction::PointerUp,
                };
                let event = self.snapshot(action);
                self.active.remove(index);
                Some(event)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn active_count(&self) -> usize {
        self.active.len()
    }

    fn find(&self, id: u64) -> Option<usize> {
        self.active.iter().position(|pointer| pointer.id == id)
    }

    fn snapshot(&self, action: MotionAction) -> MotionEvent {
        MotionEvent {
            action,
            pointers: self.active.clone(),
        }
    }
}
