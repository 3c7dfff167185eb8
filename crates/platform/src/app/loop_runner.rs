use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use crate::assets::AssetReader;
use crate::StartupError;

use super::events::{drain_pending_events, EventSource, IngestStats, LifecycleEvent};
use super::gesture::PanGesture;
use super::host::WinitHost;
use super::input::{begin_frame, Button, ControllerInput, ControllerSlot, FrameInput, InputBuffers};
use super::math::Vec2;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::rendering::{PixelBuffer, PixelsPresenter, Presenter, BUFFER_HEIGHT, BUFFER_WIDTH};

pub const SLOW_FRAME_ENV_VAR: &str = "HANDMADE_SLOW_FRAME_MS";
pub const REFRESH_HZ_ENV_VAR: &str = "HANDMADE_REFRESH_HZ";

const DEFAULT_DISPLAY_REFRESH_HZ: u32 = 60;
const DEFAULT_OVERRUN_LOG_EVERY: u32 = 10;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub display_refresh_hz: u32,
    pub overrun_log_every: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Handmade".to_string(),
            display_refresh_hz: DEFAULT_DISPLAY_REFRESH_HZ,
            overrun_log_every: DEFAULT_OVERRUN_LOG_EVERY,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
}

pub struct FrameContext<'a> {
    pub delta_seconds: f32,
    pub old_input: &'a FrameInput,
    pub new_input: &'a FrameInput,
    pub assets: &'a dyn AssetReader,
}

pub trait Simulation {
    fn step(&mut self, frame: &FrameContext<'_>, buffer: &mut PixelBuffer);

    fn shutdown(&mut self) {}
}

pub trait FrameClock {
    fn now(&self) -> Instant;

    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl FrameClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePacing {
    Sleep(Duration),
    Overrun(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    pub iteration: u64,
    pub work: Duration,
    pub pacing: FramePacing,
    pub ingest: IngestStats,
    pub metrics: Option<LoopMetricsSnapshot>,
    pub terminate_requested: bool,
}

pub fn run_app(
    config: LoopConfig,
    simulation: Box<dyn Simulation>,
    assets: Box<dyn AssetReader>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                BUFFER_WIDTH as f64,
                BUFFER_HEIGHT as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );

    let config = apply_env_overrides(config, |var| env::var(var));
    let mut host = WinitHost::new(event_loop, Arc::clone(&window));
    let mut presenter = PixelsPresenter::new(window);
    let mut scheduler = FrameScheduler::new(&config, simulation, assets);
    scheduler.run(&mut host, &mut presenter, &mut SystemClock);
    Ok(())
}

pub struct FrameScheduler {
    target_frame: Duration,
    fixed_dt_seconds: f32,
    overrun_log_every: u64,
    slow_frame_delay: Duration,
    simulation: Box<dyn Simulation>,
    assets: Box<dyn AssetReader>,
    inputs: InputBuffers,
    gesture: PanGesture,
    buffer: PixelBuffer,
    drawable: bool,
    terminate_requested: bool,
    iteration: u64,
    overrun_count: u64,
    metrics_log_interval: Duration,
    metrics: Option<MetricsAccumulator>,
}

impl FrameScheduler {
    pub fn new(
        config: &LoopConfig,
        simulation: Box<dyn Simulation>,
        assets: Box<dyn AssetReader>,
    ) -> Self {
        let display_refresh_hz =
            normalize_non_zero(config.display_refresh_hz, DEFAULT_DISPLAY_REFRESH_HZ);
        let overrun_log_every = normalize_non_zero(config.overrun_log_every, DEFAULT_OVERRUN_LOG_EVERY);
        let metrics_log_interval =
            normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
        let slow_frame_delay = Duration::from_millis(config.simulated_slow_frame_ms);
        let target_frame = target_frame_duration(display_refresh_hz);

        info!(
            display_refresh_hz,
            target_frame_ms = target_frame.as_secs_f64() * 1000.0,
            overrun_log_every,
            metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
            slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
            "loop_config"
        );

        Self {
            target_frame,
            fixed_dt_seconds: target_frame.as_secs_f32(),
            overrun_log_every: u64::from(overrun_log_every),
            slow_frame_delay,
            simulation,
            assets,
            inputs: InputBuffers::new(),
            gesture: PanGesture::new(),
            buffer: PixelBuffer::new(),
            drawable: false,
            terminate_requested: false,
            iteration: 0,
            overrun_count: 0,
            metrics_log_interval,
            metrics: None,
        }
    }

    pub fn target_frame(&self) -> Duration {
        self.target_frame
    }

    pub fn is_drawable(&self) -> bool {
        self.drawable
    }

    pub fn overrun_count(&self) -> u64 {
        self.overrun_count
    }

    pub fn inputs(&self) -> &InputBuffers {
        &self.inputs
    }

    pub fn run(
        &mut self,
        source: &mut dyn EventSource,
        presenter: &mut dyn Presenter,
        clock: &mut dyn FrameClock,
    ) -> u64 {
        loop {
            let report = self.run_iteration(source, presenter, clock);
            if report.terminate_requested {
                break;
            }
        }

        self.simulation.shutdown();
        if self.drawable {
            self.drawable = false;
            presenter.detach();
        }
        info!(iterations = self.iteration, overruns = self.overrun_count, "shutdown");
        self.iteration
    }

    pub fn run_iteration(
        &mut self,
        source: &mut dyn EventSource,
        presenter: &mut dyn Presenter,
        clock: &mut dyn FrameClock,
    ) -> IterationReport {
        let start = clock.now();
        let mut metrics = self
            .metrics
            .take()
            .unwrap_or_else(|| MetricsAccumulator::new(self.metrics_log_interval, start));
        let iteration = self.iteration;
        self.iteration = self.iteration.wrapping_add(1);

        let mut lifecycle_events = Vec::new();
        let ingest = {
            let (old, new) = self.inputs.split_mut();
            begin_frame(old, new);
            let ingest = drain_pending_events(
                source,
                new.controller_mut(ControllerSlot::Keyboard),
                &mut self.gesture,
                |event| lifecycle_events.push(event),
            );
            merge_virtual_stick(
                self.gesture.virtual_stick(),
                new.controller_mut(ControllerSlot::TouchGesture),
            );
            new.delta_seconds = self.fixed_dt_seconds;
            ingest
        };

        for event in lifecycle_events {
            self.apply_lifecycle(event, presenter);
        }

        let frame = FrameContext {
            delta_seconds: self.fixed_dt_seconds,
            old_input: self.inputs.old(),
            new_input: self.inputs.new_frame(),
            assets: self.assets.as_ref(),
        };
        self.simulation.step(&frame, &mut self.buffer);

        if self.drawable {
            if let Err(error) = presenter.present(&self.buffer) {
                warn!(error = %error, iteration, "present_failed");
            }
        }

        if self.slow_frame_delay > Duration::ZERO {
            // Debug perturbation only; lets overrun handling be exercised on demand.
            clock.sleep(self.slow_frame_delay);
        }

        let work = clock.now().saturating_duration_since(start);
        let pacing = plan_frame_pacing(work, self.target_frame);
        match pacing {
            FramePacing::Sleep(remaining) => {
                if remaining > Duration::ZERO {
                    clock.sleep(remaining);
                }
            }
            FramePacing::Overrun(excess) => {
                self.overrun_count = self.overrun_count.saturating_add(1);
                metrics.record_overrun();
                if should_log_overrun(self.overrun_count, self.overrun_log_every) {
                    warn!(
                        iteration,
                        work_ms = work.as_secs_f64() * 1000.0,
                        excess_ms = excess.as_secs_f64() * 1000.0,
                        overrun_count = self.overrun_count,
                        "frame_overrun"
                    );
                }
            }
        }

        metrics.record_iteration(work);
        let snapshot = metrics.maybe_snapshot(clock.now());
        self.metrics = Some(metrics);
        if let Some(snapshot) = snapshot {
            info!(
                iterations_per_second = snapshot.iterations_per_second,
                work_time_ms = snapshot.work_time_ms,
                overruns = snapshot.overruns,
                drawable = self.drawable,
                "loop_metrics"
            );
        }

        self.inputs.swap();

        IterationReport {
            iteration,
            work,
            pacing,
            ingest,
            metrics: snapshot,
            terminate_requested: self.terminate_requested,
        }
    }

    fn apply_lifecycle(&mut self, event: LifecycleEvent, presenter: &mut dyn Presenter) {
        match event {
            LifecycleEvent::WindowCreated => match presenter.attach() {
                Ok(()) => self.drawable = true,
                Err(error) => {
                    warn!(error = %error, "presenter_attach_failed");
                    self.drawable = false;
                }
            },
            LifecycleEvent::WindowDestroyed => {
                self.drawable = false;
                presenter.detach();
            }
            LifecycleEvent::WindowResized { width, height } => {
                if self.drawable {
                    if let Err(error) = presenter.resize(width, height) {
                        warn!(error = %error, width, height, "presenter_resize_failed");
                    }
                }
            }
            LifecycleEvent::FocusChanged(_) => {}
            LifecycleEvent::AppTerminating => {
                if !self.terminate_requested {
                    info!(reason = "host_teardown", "shutdown_requested");
                }
                self.terminate_requested = true;
            }
        }
    }
}

fn merge_virtual_stick(stick: Vec2, controller: &mut ControllerInput) {
    controller.apply_edge(Button::MoveRight, stick.x > 0.0);
    controller.apply_edge(Button::MoveLeft, stick.x < 0.0);
    controller.apply_edge(Button::MoveUp, stick.y > 0.0);
    controller.apply_edge(Button::MoveDown, stick.y < 0.0);
}

pub fn target_frame_duration(display_refresh_hz: u32) -> Duration {
    let simulation_hz = f64::from(display_refresh_hz.max(1)) / 2.0;
    Duration::from_secs_f64(1.0 / simulation_hz)
}

pub fn plan_frame_pacing(work: Duration, target: Duration) -> FramePacing {
    if work <= target {
        FramePacing::Sleep(target - work)
    } else {
        FramePacing::Overrun(work - target)
    }
}

fn should_log_overrun(overrun_count: u64, log_every: u64) -> bool {
    overrun_count % log_every.max(1) == 0
}

fn normalize_non_zero(value: u32, fallback: u32) -> u32 {
    if value == 0 {
        fallback
    } else {
        value
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn apply_env_overrides(
    mut config: LoopConfig,
    read_var: impl Fn(&'static str) -> Result<String, env::VarError>,
) -> LoopConfig {
    config.display_refresh_hz = resolve_env_override(
        REFRESH_HZ_ENV_VAR,
        read_var(REFRESH_HZ_ENV_VAR),
        config.display_refresh_hz,
    );
    config.simulated_slow_frame_ms = resolve_env_override(
        SLOW_FRAME_ENV_VAR,
        read_var(SLOW_FRAME_ENV_VAR),
        config.simulated_slow_frame_ms,
    );
    config
}

fn resolve_env_override<T>(
    var: &'static str,
    raw: Result<String, env::VarError>,
    fallback: T,
) -> T
where
    T: FromStr + Copy,
{
    match raw {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    env_var = var,
                    value = value.as_str(),
                    "invalid env var value; falling back to config"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var = var,
                error = %err,
                "unable to read env var; falling back to config"
            );
            fallback
        }
    }
}
