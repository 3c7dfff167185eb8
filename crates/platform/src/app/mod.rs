mod events;
mod gesture;
mod host;
mod input;
mod loop_runner;
mod math;
mod metrics;
mod rendering;

pub use events::{
    button_for_key, drain_pending_events, is_back_key, EventQueue, EventSource, HostEvent,
    IngestStats, KeyEvent, LifecycleEvent,
};
pub use gesture::{
    quantize_pan_offset, MotionAction, MotionEvent, PanGesture, PanGestureState, Pointer,
    PAN_DEADZONE_PX,
};
pub use host::WinitHost;
pub use input::{
    begin_frame, Button, ButtonState, ControllerInput, ControllerSlot, FrameInput, InputBuffers,
    BUTTON_COUNT, CONTROLLER_COUNT,
};
pub use loop_runner::{
    plan_frame_pacing, run_app, target_frame_duration, AppError, FrameClock, FrameContext,
    FramePacing, FrameScheduler, IterationReport, LoopConfig, Simulation, SystemClock,
    REFRESH_HZ_ENV_VAR, SLOW_FRAME_ENV_VAR,
};
pub use math::Vec2;
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    PixelBuffer, PixelsPresenter, PresentError, Presenter, BUFFER_HEIGHT, BUFFER_STRIDE,
    BUFFER_WIDTH, BYTES_PER_PIXEL,
};
