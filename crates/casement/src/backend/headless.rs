//! In-memory backend
//!
//! `HeadlessBackend` keeps every window and renderer in memory. It behaves like a
//! real windowing library closely enough to drive the whole crate, and it exposes
//! the bookkeeping tests need:
//!
//! - a log of every mutating call, by operation name (`"create-window"`, `"clear"`, ...)
//! - per-capability initialization counts
//! - one-shot failure injection with [`HeadlessBackend::fail_next`]
//! - optional confirmation events, mimicking window managers that apply
//!   resize/move/maximize requests asynchronously
//!
//! Read-only queries are not logged.

use super::{Backend, RawHandle};
use crate::core::subsystems::Capabilities;
use crate::events::{Event, EventType, WindowEvent};
use crate::foundation::color::Color;
use crate::foundation::display::{DisplayMode, PixelFormat};
use crate::foundation::math::{Rect, RectInt};
use crate::foundation::vertex::Vertex;
use crate::render::presentation::LogicalPresentation;
use crate::render::state::{BlendFunction, BlendMode};
use crate::system::{PowerState, SystemTheme};
use crate::window::{BordersSize, FlashOperation, WindowFlags};
use parking_lot::{Condvar, Mutex};
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

/// Packed version reported by the headless backend (3.2.10)
pub const HEADLESS_VERSION: i32 = 3_002_010;

/// Name of the only video driver
pub const VIDEO_DRIVER: &str = "headless";

/// Names of the render drivers
pub const RENDER_DRIVERS: [&str; 2] = ["software", "gpu"];

const MAX_QUEUED_EVENTS: usize = 65_535;
const DESKTOP_SIZE: (i32, i32) = (1920, 1080);

/// Id of the primary display; a second display of the same size sits to its right
pub const PRIMARY_DISPLAY: u32 = 1;

new_key_type! {
    struct WindowKey;
    struct RendererKey;
}

/// Backend-side view of one window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    /// Backend assigned id
    pub id: u32,
    /// Title
    pub title: String,
    /// Top-left position
    pub position: (i32, i32),
    /// Client area size
    pub size: (i32, i32),
    /// Current flags
    pub flags: WindowFlags,
    /// Minimum size
    pub min_size: (i32, i32),
    /// Maximum size
    pub max_size: (i32, i32),
    /// Aspect ratio bounds
    pub aspect_ratio: (f32, f32),
    /// Opacity
    pub opacity: f32,
    /// Mouse confinement
    pub mouse_rect: Option<RectInt>,
    /// Exclusive fullscreen mode
    pub fullscreen_mode: Option<DisplayMode>,
}

/// Backend-side view of one renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RendererSnapshot {
    /// Driver name
    pub name: String,
    /// Vsync interval
    pub vsync: i32,
    /// Logical presentation width, height and mode
    pub presentation: (i32, i32, LogicalPresentation),
    /// Draw color used by clear
    pub draw_color: Color,
    /// Blend mode for draws
    pub blend_mode: BlendMode,
    /// Coordinate scale
    pub scale: (f32, f32),
    /// Color scale
    pub color_scale: f32,
    /// Clip rectangle
    pub clip: Option<RectInt>,
    /// Number of geometry draws
    pub draws: usize,
    /// Number of presents
    pub presents: usize,
}

struct HeadlessWindow {
    snapshot: WindowSnapshot,
    renderer: Option<RendererKey>,
}

struct HeadlessRenderer {
    window: WindowKey,
    snapshot: RendererSnapshot,
}

struct State {
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, String>,
    capability_failures: Vec<(Capabilities, String)>,
    last_error: String,
    active: Capabilities,
    init_counts: HashMap<Capabilities, u32>,
    metadata: HashMap<String, String>,
    windows: SlotMap<WindowKey, HeadlessWindow>,
    renderers: SlotMap<RendererKey, HeadlessRenderer>,
    queue: VecDeque<Event>,
    disabled: HashSet<EventType>,
    next_window_id: u32,
    confirm_requests: bool,
    screen_saver: bool,
    screen_keyboard: bool,
    opened_urls: Vec<String>,
}

impl State {
    /// Log `op` and consume an injected failure for it
    fn begin(&mut self, op: &'static str) -> bool {
        self.calls.push(op);
        match self.failures.remove(op) {
            Some(message) => {
                self.last_error = message;
                false
            }
            None => true,
        }
    }

    fn fail(&mut self, message: &str) -> bool {
        self.last_error = message.to_string();
        false
    }

    fn enqueue(&mut self, event: Event) -> bool {
        if self.disabled.contains(&event.event_type()) {
            return false;
        }
        if self.queue.len() >= MAX_QUEUED_EVENTS {
            return self.fail("Event queue is full");
        }
        self.queue.push_back(event);
        true
    }

    fn window_mut(&mut self, raw: RawHandle) -> Option<&mut HeadlessWindow> {
        if raw.is_null() {
            return None;
        }
        self.windows.get_mut(key_of::<WindowKey>(raw))
    }

    fn window(&self, raw: RawHandle) -> Option<&HeadlessWindow> {
        if raw.is_null() {
            return None;
        }
        self.windows.get(key_of::<WindowKey>(raw))
    }

    fn renderer_mut(&mut self, raw: RawHandle) -> Option<&mut HeadlessRenderer> {
        if raw.is_null() {
            return None;
        }
        self.renderers.get_mut(key_of::<RendererKey>(raw))
    }

    fn renderer(&self, raw: RawHandle) -> Option<&HeadlessRenderer> {
        if raw.is_null() {
            return None;
        }
        self.renderers.get(key_of::<RendererKey>(raw))
    }

    /// Apply `f` to a window, reporting "Invalid window" when the handle is stale
    fn with_window(&mut self, raw: RawHandle, f: impl FnOnce(&mut WindowSnapshot)) -> Option<u32> {
        if let Some(window) = self.window_mut(raw) {
            f(&mut window.snapshot);
            return Some(window.snapshot.id);
        }
        self.fail("Invalid window");
        None
    }

    fn with_renderer(&mut self, raw: RawHandle, f: impl FnOnce(&mut RendererSnapshot)) -> bool {
        if let Some(renderer) = self.renderer_mut(raw) {
            f(&mut renderer.snapshot);
            return true;
        }
        self.fail("Invalid renderer")
    }

    fn set_window_flag(&mut self, op: &'static str, raw: RawHandle, flag: WindowFlags, value: bool) -> bool {
        if !self.begin(op) {
            return false;
        }
        self.with_window(raw, |window| window.flags.set(flag, value)).is_some()
    }

    /// Presentation viewport in pixels plus the logical-to-pixel scale factors
    fn viewport(&self, renderer: &HeadlessRenderer, density: f32) -> Option<(Rect, f32, f32)> {
        let window = self.windows.get(renderer.window)?;
        #[allow(clippy::cast_precision_loss)]
        let (out_w, out_h) = (
            window.snapshot.size.0 as f32 * density,
            window.snapshot.size.1 as f32 * density,
        );
        let full = Rect::new(0.0, 0.0, out_w, out_h);

        let (logical_w, logical_h, mode) = renderer.snapshot.presentation;
        if mode == LogicalPresentation::Disabled || logical_w <= 0 || logical_h <= 0 {
            return Some((full, 1.0, 1.0));
        }

        #[allow(clippy::cast_precision_loss)]
        let (logical_w, logical_h) = (logical_w as f32, logical_h as f32);
        let fit_x = out_w / logical_w;
        let fit_y = out_h / logical_h;

        let scale = match mode {
            LogicalPresentation::Stretch => return Some((full, fit_x, fit_y)),
            LogicalPresentation::Letterbox => fit_x.min(fit_y),
            LogicalPresentation::Overscan => fit_x.max(fit_y),
            LogicalPresentation::IntegerScale => fit_x.min(fit_y).floor().max(1.0),
            LogicalPresentation::Disabled => 1.0,
        };

        let (w, h) = (logical_w * scale, logical_h * scale);
        Some((Rect::new((out_w - w) / 2.0, (out_h - h) / 2.0, w, h), scale, scale))
    }
}

/// In-memory windowing and rendering backend
pub struct HeadlessBackend {
    state: Mutex<State>,
    ready: Condvar,
    started: Instant,
    pixel_density: f32,
    power: (PowerState, i32, i32),
    theme: SystemTheme,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                calls: Vec::new(),
                failures: HashMap::new(),
                capability_failures: Vec::new(),
                last_error: String::new(),
                active: Capabilities::empty(),
                init_counts: HashMap::new(),
                metadata: HashMap::new(),
                windows: SlotMap::with_key(),
                renderers: SlotMap::with_key(),
                queue: VecDeque::new(),
                disabled: HashSet::new(),
                next_window_id: 1,
                confirm_requests: false,
                screen_saver: false,
                screen_keyboard: false,
                opened_urls: Vec::new(),
            }),
            ready: Condvar::new(),
            started: Instant::now(),
            pixel_density: 1.0,
            power: (PowerState::NoBattery, -1, -1),
            theme: SystemTheme::Unknown,
        }
    }

    /// Report `density` pixels per screen coordinate
    #[must_use]
    pub fn with_pixel_density(mut self, density: f32) -> Self {
        self.pixel_density = density;
        self
    }

    /// Report a battery state
    #[must_use]
    pub fn with_power(mut self, state: PowerState, seconds: i32, percent: i32) -> Self {
        self.power = (state, seconds, percent);
        self
    }

    /// Report a system theme
    #[must_use]
    pub fn with_theme(mut self, theme: SystemTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Queue confirmation events for window requests
    ///
    /// When enabled, requests such as resize, move or maximize push the window
    /// event a real window manager would report once the request is applied.
    pub fn set_confirm_requests(&self, confirm: bool) {
        self.state.lock().confirm_requests = confirm;
    }

    /// Show or hide the simulated on-screen keyboard
    pub fn set_screen_keyboard_shown(&self, shown: bool) {
        self.state.lock().screen_keyboard = shown;
    }

    /// Make the next call to `op` fail with `message`
    pub fn fail_next(&self, op: &'static str, message: impl Into<String>) {
        self.state.lock().failures.insert(op, message.into());
    }

    /// Make initialization of `capability` fail until the backend quits
    pub fn fail_capability(&self, capability: Capabilities, message: impl Into<String>) {
        self.state.lock().capability_failures.push((capability, message.into()));
    }

    /// Every logged call, oldest first
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    /// Number of logged calls named `op`
    pub fn call_count(&self, op: &str) -> usize {
        self.state.lock().calls.iter().filter(|call| **call == op).count()
    }

    /// Forget the call log
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// How many times `capability` was initialized natively
    pub fn init_count(&self, capability: Capabilities) -> u32 {
        self.state.lock().init_counts.get(&capability).copied().unwrap_or(0)
    }

    /// A metadata property, if set
    pub fn metadata(&self, key: &str) -> Option<String> {
        self.state.lock().metadata.get(key).cloned()
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.state.lock().windows.len()
    }

    /// Number of live renderers
    pub fn renderer_count(&self) -> usize {
        self.state.lock().renderers.len()
    }

    /// Number of queued events
    pub fn queued_events(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Backend-side state of a window
    pub fn window_snapshot(&self, window: RawHandle) -> Option<WindowSnapshot> {
        self.state.lock().window(window).map(|w| w.snapshot.clone())
    }

    /// Backend-side state of a renderer
    pub fn renderer_snapshot(&self, renderer: RawHandle) -> Option<RendererSnapshot> {
        self.state.lock().renderer(renderer).map(|r| r.snapshot.clone())
    }

    /// URLs passed to [`Backend::open_url`]
    pub fn opened_urls(&self) -> Vec<String> {
        self.state.lock().opened_urls.clone()
    }

    /// Queue the event a window manager would send back for an applied request
    fn confirm(&self, state: &mut State, window_id: u32, event: WindowEvent) {
        if state.confirm_requests {
            self.push_and_notify(state, Event::Window { window_id, event });
        }
    }

    fn push_and_notify(&self, state: &mut State, event: Event) -> bool {
        let accepted = state.enqueue(event);
        if accepted {
            self.ready.notify_all();
        }
        accepted
    }
}

/// Whether `code` has the layout produced by `compose_custom_blend_mode`
fn is_valid_blend_code(code: u32) -> bool {
    let field = |shift: u32| (code >> shift) & 0xF;
    let operations = [0, 16].iter().all(|&shift| (1..=5).contains(&field(shift)));
    let factors = [4, 8, 20, 24].iter().all(|&shift| (1..=10).contains(&field(shift)));
    operations && factors && field(12) == 0 && field(28) == 0
}

#[allow(clippy::cast_possible_truncation)]
fn raw_of<K: Key>(key: K) -> RawHandle {
    RawHandle::new(key.data().as_ffi() as usize)
}

fn key_of<K: From<KeyData>>(raw: RawHandle) -> K {
    KeyData::from_ffi(raw.get() as u64).into()
}

fn in_range(event: &Event, min: EventType, max: EventType) -> bool {
    let event_type = event.event_type();
    min <= event_type && event_type <= max
}

impl Backend for HeadlessBackend {
    fn init_subsystem(&self, capabilities: Capabilities) -> bool {
        let mut state = self.state.lock();
        if !state.begin("init") {
            return false;
        }

        let failure = state
            .capability_failures
            .iter()
            .find(|(capability, _)| capabilities.intersects(*capability))
            .map(|(_, message)| message.clone());
        if let Some(message) = failure {
            return state.fail(&message);
        }

        state.active |= capabilities;
        for capability in capabilities.iter() {
            *state.init_counts.entry(capability).or_insert(0) += 1;
        }
        true
    }

    fn quit_subsystem(&self, capabilities: Capabilities) {
        let mut state = self.state.lock();
        state.begin("quit-subsystem");
        state.active.remove(capabilities);
    }

    fn quit(&self) {
        let mut state = self.state.lock();
        state.begin("quit");
        state.active = Capabilities::empty();
        state.renderers.clear();
        state.windows.clear();
        state.queue.clear();
        state.capability_failures.clear();
    }

    fn version(&self) -> i32 {
        HEADLESS_VERSION
    }

    fn ticks(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn last_error(&self) -> String {
        self.state.lock().last_error.clone()
    }

    fn clear_error(&self) {
        self.state.lock().last_error.clear();
    }

    fn set_app_metadata_property(&self, key: &str, value: &str) -> bool {
        let mut state = self.state.lock();
        if !state.begin("set-metadata") {
            return false;
        }
        state.metadata.insert(key.to_string(), value.to_string());
        true
    }

    fn create_window(&self, title: &str, width: i32, height: i32, flags: WindowFlags) -> RawHandle {
        let mut state = self.state.lock();
        if !state.begin("create-window") {
            return RawHandle::NULL;
        }

        let id = state.next_window_id;
        state.next_window_id += 1;

        let snapshot = WindowSnapshot {
            id,
            title: title.to_string(),
            position: ((DESKTOP_SIZE.0 - width) / 2, (DESKTOP_SIZE.1 - height) / 2),
            size: (width, height),
            flags,
            min_size: (0, 0),
            max_size: (0, 0),
            aspect_ratio: (0.0, 0.0),
            opacity: 1.0,
            mouse_rect: None,
            fullscreen_mode: None,
        };
        let key = state.windows.insert(HeadlessWindow {
            snapshot,
            renderer: None,
        });

        if !flags.contains(WindowFlags::HIDDEN) {
            self.confirm(&mut state, id, WindowEvent::Shown);
        }
        raw_of(key)
    }

    fn destroy_window(&self, window: RawHandle) {
        let mut state = self.state.lock();
        state.begin("destroy-window");
        if window.is_null() {
            return;
        }
        if let Some(removed) = state.windows.remove(key_of::<WindowKey>(window)) {
            if let Some(renderer) = removed.renderer {
                state.renderers.remove(renderer);
            }
        }
    }

    fn window_id(&self, window: RawHandle) -> u32 {
        let mut state = self.state.lock();
        let id = state.window(window).map(|w| w.snapshot.id);
        id.unwrap_or_else(|| {
            state.fail("Invalid window");
            0
        })
    }

    fn window_position(&self, window: RawHandle) -> Option<(i32, i32)> {
        self.state.lock().window(window).map(|w| w.snapshot.position)
    }

    fn set_window_position(&self, window: RawHandle, x: i32, y: i32) -> bool {
        let mut state = self.state.lock();
        if !state.begin("set-position") {
            return false;
        }
        match state.with_window(window, |w| w.position = (x, y)) {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::Moved { x, y });
                true
            }
            None => false,
        }
    }

    fn set_window_size(&self, window: RawHandle, width: i32, height: i32) -> bool {
        let mut state = self.state.lock();
        if !state.begin("set-size") {
            return false;
        }
        match state.with_window(window, |w| w.size = (width, height)) {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::Resized { width, height });
                #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
                let (pixel_w, pixel_h) = (
                    (width as f32 * self.pixel_density) as i32,
                    (height as f32 * self.pixel_density) as i32,
                );
                self.confirm(
                    &mut state,
                    id,
                    WindowEvent::PixelSizeChanged {
                        width: pixel_w,
                        height: pixel_h,
                    },
                );
                true
            }
            None => false,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn window_size_in_pixels(&self, window: RawHandle) -> Option<(i32, i32)> {
        self.state.lock().window(window).map(|w| {
            let (width, height) = w.snapshot.size;
            (
                (width as f32 * self.pixel_density) as i32,
                (height as f32 * self.pixel_density) as i32,
            )
        })
    }

    fn set_window_minimum_size(&self, window: RawHandle, width: i32, height: i32) -> bool {
        let mut state = self.state.lock();
        state.begin("set-min-size") && state.with_window(window, |w| w.min_size = (width, height)).is_some()
    }

    fn set_window_maximum_size(&self, window: RawHandle, width: i32, height: i32) -> bool {
        let mut state = self.state.lock();
        state.begin("set-max-size") && state.with_window(window, |w| w.max_size = (width, height)).is_some()
    }

    fn set_window_aspect_ratio(&self, window: RawHandle, min: f32, max: f32) -> bool {
        let mut state = self.state.lock();
        state.begin("set-aspect-ratio") && state.with_window(window, |w| w.aspect_ratio = (min, max)).is_some()
    }

    fn set_window_fullscreen(&self, window: RawHandle, fullscreen: bool) -> bool {
        let mut state = self.state.lock();
        if !state.begin("set-fullscreen") {
            return false;
        }
        match state.with_window(window, |w| w.flags.set(WindowFlags::FULLSCREEN, fullscreen)) {
            Some(id) => {
                let event = if fullscreen {
                    WindowEvent::EnterFullscreen
                } else {
                    WindowEvent::LeaveFullscreen
                };
                self.confirm(&mut state, id, event);
                true
            }
            None => false,
        }
    }

    fn set_window_fullscreen_mode(&self, window: RawHandle, mode: Option<&DisplayMode>) -> bool {
        let mut state = self.state.lock();
        let mode = mode.copied();
        state.begin("set-fullscreen-mode") && state.with_window(window, |w| w.fullscreen_mode = mode).is_some()
    }

    fn set_window_bordered(&self, window: RawHandle, bordered: bool) -> bool {
        self.state
            .lock()
            .set_window_flag("set-bordered", window, WindowFlags::BORDERLESS, !bordered)
    }

    fn set_window_resizable(&self, window: RawHandle, resizable: bool) -> bool {
        self.state
            .lock()
            .set_window_flag("set-resizable", window, WindowFlags::RESIZABLE, resizable)
    }

    fn set_window_always_on_top(&self, window: RawHandle, on_top: bool) -> bool {
        self.state
            .lock()
            .set_window_flag("set-always-on-top", window, WindowFlags::ALWAYS_ON_TOP, on_top)
    }

    fn set_window_focusable(&self, window: RawHandle, focusable: bool) -> bool {
        self.state
            .lock()
            .set_window_flag("set-focusable", window, WindowFlags::NOT_FOCUSABLE, !focusable)
    }

    fn set_window_keyboard_grab(&self, window: RawHandle, grabbed: bool) -> bool {
        self.state
            .lock()
            .set_window_flag("set-keyboard-grab", window, WindowFlags::KEYBOARD_GRABBED, grabbed)
    }

    fn set_window_mouse_grab(&self, window: RawHandle, grabbed: bool) -> bool {
        self.state
            .lock()
            .set_window_flag("set-mouse-grab", window, WindowFlags::MOUSE_GRABBED, grabbed)
    }

    fn window_borders_size(&self, window: RawHandle) -> Option<BordersSize> {
        self.state.lock().window(window).map(|w| {
            if w.snapshot.flags.contains(WindowFlags::BORDERLESS) {
                BordersSize::default()
            } else {
                BordersSize {
                    top: 30,
                    left: 1,
                    bottom: 1,
                    right: 1,
                }
            }
        })
    }

    fn window_display_scale(&self, window: RawHandle) -> f32 {
        self.state.lock().window(window).map_or(0.0, |_| self.pixel_density)
    }

    fn window_pixel_density(&self, window: RawHandle) -> f32 {
        self.state.lock().window(window).map_or(0.0, |_| self.pixel_density)
    }

    fn window_pixel_format(&self, window: RawHandle) -> PixelFormat {
        self.state
            .lock()
            .window(window)
            .map_or(PixelFormat::Unknown, |_| PixelFormat::Xrgb8888)
    }

    fn window_safe_area(&self, window: RawHandle) -> Option<RectInt> {
        self.state.lock().window(window).map(|w| {
            let (width, height) = w.snapshot.size;
            RectInt::new(0, 0, width, height)
        })
    }

    fn window_display(&self, window: RawHandle) -> u32 {
        let state = self.state.lock();
        let Some(window) = state.window(window) else {
            return 0;
        };
        let (x, _) = window.snapshot.position;
        let (width, _) = window.snapshot.size;
        if x + width / 2 >= DESKTOP_SIZE.0 {
            PRIMARY_DISPLAY + 1
        } else {
            PRIMARY_DISPLAY
        }
    }

    fn primary_display(&self) -> u32 {
        PRIMARY_DISPLAY
    }

    fn screen_keyboard_shown(&self, window: RawHandle) -> bool {
        let state = self.state.lock();
        state.screen_keyboard && state.window(window).is_some()
    }

    fn show_window(&self, window: RawHandle) -> bool {
        let mut state = self.state.lock();
        if !state.begin("show") {
            return false;
        }
        match state.with_window(window, |w| w.flags.remove(WindowFlags::HIDDEN)) {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::Shown);
                true
            }
            None => false,
        }
    }

    fn hide_window(&self, window: RawHandle) -> bool {
        let mut state = self.state.lock();
        if !state.begin("hide") {
            return false;
        }
        match state.with_window(window, |w| w.flags.insert(WindowFlags::HIDDEN)) {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::Hidden);
                true
            }
            None => false,
        }
    }

    fn maximize_window(&self, window: RawHandle) -> bool {
        let mut state = self.state.lock();
        if !state.begin("maximize") {
            return false;
        }
        let applied = state.with_window(window, |w| {
            w.flags.remove(WindowFlags::MINIMIZED);
            w.flags.insert(WindowFlags::MAXIMIZED);
        });
        match applied {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::Maximized);
                true
            }
            None => false,
        }
    }

    fn minimize_window(&self, window: RawHandle) -> bool {
        let mut state = self.state.lock();
        if !state.begin("minimize") {
            return false;
        }
        let applied = state.with_window(window, |w| {
            w.flags.remove(WindowFlags::MAXIMIZED);
            w.flags.insert(WindowFlags::MINIMIZED);
        });
        match applied {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::Minimized);
                true
            }
            None => false,
        }
    }

    fn restore_window(&self, window: RawHandle) -> bool {
        let mut state = self.state.lock();
        if !state.begin("restore") {
            return false;
        }
        let applied = state.with_window(window, |w| {
            w.flags.remove(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED);
        });
        match applied {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::Restored);
                true
            }
            None => false,
        }
    }

    fn raise_window(&self, window: RawHandle) -> bool {
        let mut state = self.state.lock();
        if !state.begin("raise") {
            return false;
        }
        match state.with_window(window, |w| w.flags.insert(WindowFlags::INPUT_FOCUS)) {
            Some(id) => {
                self.confirm(&mut state, id, WindowEvent::FocusGained);
                true
            }
            None => false,
        }
    }

    fn flash_window(&self, window: RawHandle, _operation: FlashOperation) -> bool {
        let mut state = self.state.lock();
        state.begin("flash") && state.with_window(window, |_| {}).is_some()
    }

    fn sync_window(&self, window: RawHandle) -> bool {
        let mut state = self.state.lock();
        state.begin("sync") && state.with_window(window, |_| {}).is_some()
    }

    fn set_window_title(&self, window: RawHandle, title: &str) -> bool {
        let mut state = self.state.lock();
        state.begin("set-title") && state.with_window(window, |w| w.title = title.to_string()).is_some()
    }

    fn set_window_opacity(&self, window: RawHandle, opacity: f32) -> bool {
        let mut state = self.state.lock();
        state.begin("set-opacity") && state.with_window(window, |w| w.opacity = opacity).is_some()
    }

    fn set_window_mouse_rect(&self, window: RawHandle, rect: Option<RectInt>) -> bool {
        let mut state = self.state.lock();
        state.begin("set-mouse-rect") && state.with_window(window, |w| w.mouse_rect = rect).is_some()
    }

    fn warp_mouse_in_window(&self, window: RawHandle, x: f32, y: f32) {
        let mut state = self.state.lock();
        state.begin("warp-mouse");
        let window_id = state.window(window).map(|w| w.snapshot.id);
        if let (Some(window_id), true) = (window_id, state.confirm_requests) {
            let motion = Event::MouseMotion {
                window_id,
                x,
                y,
                dx: 0.0,
                dy: 0.0,
            };
            self.push_and_notify(&mut state, motion);
        }
    }

    fn poll_event(&self) -> Option<Event> {
        self.state.lock().queue.pop_front()
    }

    fn wait_event(&self, timeout: Option<Duration>) -> Option<Event> {
        let mut state = self.state.lock();
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        loop {
            if let Some(event) = state.queue.pop_front() {
                return Some(event);
            }
            match deadline {
                Some(deadline) => {
                    if self.ready.wait_until(&mut state, deadline).timed_out() {
                        return state.queue.pop_front();
                    }
                }
                None => self.ready.wait(&mut state),
            }
        }
    }

    fn push_event(&self, event: Event) -> bool {
        let mut state = self.state.lock();
        self.push_and_notify(&mut state, event)
    }

    fn peek_events(&self, max: usize, min_type: EventType, max_type: EventType) -> Vec<Event> {
        self.state
            .lock()
            .queue
            .iter()
            .filter(|event| in_range(event, min_type, max_type))
            .take(max)
            .copied()
            .collect()
    }

    fn retrieve_events(&self, max: usize, min_type: EventType, max_type: EventType) -> Vec<Event> {
        let mut state = self.state.lock();
        let mut taken = Vec::new();
        let mut kept = VecDeque::with_capacity(state.queue.len());

        for event in state.queue.drain(..) {
            if taken.len() < max && in_range(&event, min_type, max_type) {
                taken.push(event);
            } else {
                kept.push_back(event);
            }
        }
        state.queue = kept;
        taken
    }

    fn flush_events(&self, min_type: EventType, max_type: EventType) {
        self.state
            .lock()
            .queue
            .retain(|event| !in_range(event, min_type, max_type));
    }

    fn set_event_enabled(&self, event_type: EventType, enabled: bool) {
        let mut state = self.state.lock();
        if enabled {
            state.disabled.remove(&event_type);
        } else {
            state.disabled.insert(event_type);
            state.queue.retain(|event| event.event_type() != event_type);
        }
    }

    fn event_enabled(&self, event_type: EventType) -> bool {
        !self.state.lock().disabled.contains(&event_type)
    }

    fn has_events(&self, min_type: EventType, max_type: EventType) -> bool {
        self.state
            .lock()
            .queue
            .iter()
            .any(|event| in_range(event, min_type, max_type))
    }

    fn pump_events(&self) {
        self.state.lock().begin("pump-events");
    }

    fn create_renderer(&self, window: RawHandle, driver: Option<&str>) -> RawHandle {
        let mut state = self.state.lock();
        if !state.begin("create-renderer") {
            return RawHandle::NULL;
        }

        let name = driver.unwrap_or(RENDER_DRIVERS[0]);
        if !RENDER_DRIVERS.contains(&name) {
            state.fail("Couldn't find matching render driver");
            return RawHandle::NULL;
        }

        let has_renderer = state.window(window).map(|w| w.renderer.is_some());
        let window_key = match has_renderer {
            Some(true) => {
                state.fail("Renderer already associated with window");
                return RawHandle::NULL;
            }
            Some(false) => key_of::<WindowKey>(window),
            None => {
                state.fail("Invalid window");
                return RawHandle::NULL;
            }
        };

        let key = state.renderers.insert(HeadlessRenderer {
            window: window_key,
            snapshot: RendererSnapshot {
                name: name.to_string(),
                vsync: 0,
                presentation: (0, 0, LogicalPresentation::Disabled),
                draw_color: Color::BLACK,
                blend_mode: BlendMode::None,
                scale: (1.0, 1.0),
                color_scale: 1.0,
                clip: None,
                draws: 0,
                presents: 0,
            },
        });
        if let Some(w) = state.windows.get_mut(window_key) {
            w.renderer = Some(key);
        }
        raw_of(key)
    }

    fn destroy_renderer(&self, renderer: RawHandle) {
        let mut state = self.state.lock();
        state.begin("destroy-renderer");
        if renderer.is_null() {
            return;
        }
        if let Some(removed) = state.renderers.remove(key_of::<RendererKey>(renderer)) {
            if let Some(window) = state.windows.get_mut(removed.window) {
                window.renderer = None;
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn render_output_size(&self, renderer: RawHandle) -> Option<(i32, i32)> {
        let state = self.state.lock();
        let renderer = state.renderer(renderer)?;
        let (width, height) = state.windows.get(renderer.window)?.snapshot.size;
        Some((
            (width as f32 * self.pixel_density) as i32,
            (height as f32 * self.pixel_density) as i32,
        ))
    }

    fn current_render_output_size(&self, renderer: RawHandle) -> Option<(i32, i32)> {
        let (width, height, mode) = {
            let state = self.state.lock();
            state.renderer(renderer)?.snapshot.presentation
        };
        if mode == LogicalPresentation::Disabled {
            self.render_output_size(renderer)
        } else {
            Some((width, height))
        }
    }

    fn set_render_logical_presentation(
        &self,
        renderer: RawHandle,
        width: i32,
        height: i32,
        mode: LogicalPresentation,
    ) -> bool {
        let mut state = self.state.lock();
        state.begin("set-logical-presentation")
            && state.with_renderer(renderer, |r| r.presentation = (width, height, mode))
    }

    fn render_logical_presentation_rect(&self, renderer: RawHandle) -> Option<Rect> {
        let state = self.state.lock();
        let renderer = state.renderer(renderer)?;
        state
            .viewport(renderer, self.pixel_density)
            .map(|(rect, _, _)| rect)
    }

    fn set_render_vsync(&self, renderer: RawHandle, interval: i32) -> bool {
        let mut state = self.state.lock();
        state.begin("set-vsync") && state.with_renderer(renderer, |r| r.vsync = interval)
    }

    fn set_render_draw_color(&self, renderer: RawHandle, color: Color) -> bool {
        let mut state = self.state.lock();
        state.begin("set-draw-color") && state.with_renderer(renderer, |r| r.draw_color = color)
    }

    fn render_clear(&self, renderer: RawHandle) -> bool {
        let mut state = self.state.lock();
        state.begin("clear") && state.with_renderer(renderer, |_| {})
    }

    fn render_geometry(&self, renderer: RawHandle, vertices: &[Vertex], indices: &[i32]) -> bool {
        let mut state = self.state.lock();
        if !state.begin("render-geometry") {
            return false;
        }
        let out_of_range = indices
            .iter()
            .any(|&index| usize::try_from(index).map_or(true, |index| index >= vertices.len()));
        if out_of_range {
            return state.fail("Index out of range");
        }
        state.with_renderer(renderer, |r| r.draws += 1)
    }

    fn render_present(&self, renderer: RawHandle) -> bool {
        let mut state = self.state.lock();
        state.begin("present") && state.with_renderer(renderer, |r| r.presents += 1)
    }

    fn set_render_draw_blend_mode(&self, renderer: RawHandle, mode: BlendMode) -> bool {
        let mut state = self.state.lock();
        if !state.begin("set-blend-mode") {
            return false;
        }
        if let BlendMode::Custom(code) = mode {
            if !is_valid_blend_code(code) {
                return state.fail("Unsupported blend mode");
            }
        }
        state.with_renderer(renderer, |r| r.blend_mode = mode)
    }

    fn compose_custom_blend_mode(&self, function: &BlendFunction) -> u32 {
        let mut state = self.state.lock();
        if !state.begin("compose-blend-mode") {
            return 0;
        }
        (function.color_operation as u32)
            | (function.src_color as u32) << 4
            | (function.dst_color as u32) << 8
            | (function.alpha_operation as u32) << 16
            | (function.src_alpha as u32) << 20
            | (function.dst_alpha as u32) << 24
    }

    fn set_render_scale(&self, renderer: RawHandle, x: f32, y: f32) -> bool {
        let mut state = self.state.lock();
        state.begin("set-scale") && state.with_renderer(renderer, |r| r.scale = (x, y))
    }

    fn set_render_color_scale(&self, renderer: RawHandle, scale: f32) -> bool {
        let mut state = self.state.lock();
        state.begin("set-color-scale") && state.with_renderer(renderer, |r| r.color_scale = scale)
    }

    fn set_render_clip_rect(&self, renderer: RawHandle, rect: Option<RectInt>) -> bool {
        let mut state = self.state.lock();
        state.begin("set-clip-rect") && state.with_renderer(renderer, |r| r.clip = rect)
    }

    fn render_coordinates_from_window(&self, renderer: RawHandle, x: f32, y: f32) -> Option<(f32, f32)> {
        let state = self.state.lock();
        let renderer = state.renderer(renderer)?;
        let (rect, sx, sy) = state.viewport(renderer, self.pixel_density)?;
        let (scale_x, scale_y) = renderer.snapshot.scale;
        Some((
            (x * self.pixel_density - rect.x) / sx / scale_x,
            (y * self.pixel_density - rect.y) / sy / scale_y,
        ))
    }

    fn render_coordinates_to_window(&self, renderer: RawHandle, x: f32, y: f32) -> Option<(f32, f32)> {
        let state = self.state.lock();
        let renderer = state.renderer(renderer)?;
        let (rect, sx, sy) = state.viewport(renderer, self.pixel_density)?;
        let (scale_x, scale_y) = renderer.snapshot.scale;
        Some((
            (x * scale_x * sx + rect.x) / self.pixel_density,
            (y * scale_y * sy + rect.y) / self.pixel_density,
        ))
    }

    fn convert_event_to_render_coordinates(&self, renderer: RawHandle, event: &mut Event) -> bool {
        let mapped = match event.pointer_position() {
            Some((x, y)) => self.render_coordinates_from_window(renderer, x, y).map(Some),
            None => self.state.lock().renderer(renderer).map(|_| None),
        };
        match mapped {
            Some(Some((x, y))) => {
                event.set_pointer_position(x, y);
                true
            }
            Some(None) => true,
            None => self.state.lock().fail("Invalid renderer"),
        }
    }

    fn renderer_name(&self, renderer: RawHandle) -> Option<String> {
        self.state.lock().renderer(renderer).map(|r| r.snapshot.name.clone())
    }

    fn render_drivers(&self) -> Vec<String> {
        RENDER_DRIVERS.iter().map(ToString::to_string).collect()
    }

    fn video_drivers(&self) -> Vec<String> {
        vec![VIDEO_DRIVER.to_string()]
    }

    fn current_video_driver(&self) -> Option<String> {
        self.state
            .lock()
            .active
            .contains(Capabilities::VIDEO)
            .then(|| VIDEO_DRIVER.to_string())
    }

    fn power_info(&self) -> (PowerState, i32, i32) {
        self.power
    }

    fn system_theme(&self) -> SystemTheme {
        self.theme
    }

    fn screen_saver_enabled(&self) -> bool {
        self.state.lock().screen_saver
    }

    fn set_screen_saver_enabled(&self, enabled: bool) -> bool {
        let mut state = self.state.lock();
        if !state.begin("set-screen-saver") {
            return false;
        }
        state.screen_saver = enabled;
        true
    }

    fn open_url(&self, url: &str) -> bool {
        let mut state = self.state.lock();
        if !state.begin("open-url") {
            return false;
        }
        if url.is_empty() {
            return state.fail("Parameter 'url' is invalid");
        }
        state.opened_urls.push(url.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window_with_renderer(backend: &HeadlessBackend) -> (RawHandle, RawHandle) {
        let window = backend.create_window("t", 800, 600, WindowFlags::empty());
        let renderer = backend.create_renderer(window, None);
        (window, renderer)
    }

    #[test]
    fn test_handles_are_never_null() {
        let backend = HeadlessBackend::new();
        let (window, renderer) = window_with_renderer(&backend);
        assert!(!window.is_null());
        assert!(!renderer.is_null());
        assert_eq!(backend.window_id(window), 1);
    }

    #[test]
    fn test_null_handle_is_invalid() {
        let backend = HeadlessBackend::new();
        backend.create_window("t", 800, 600, WindowFlags::empty());
        assert_eq!(backend.window_id(RawHandle::NULL), 0);
        assert_eq!(backend.last_error(), "Invalid window");
        assert!(backend.create_renderer(RawHandle::NULL, None).is_null());
    }

    #[test]
    fn test_second_renderer_is_rejected() {
        let backend = HeadlessBackend::new();
        let (window, _) = window_with_renderer(&backend);
        assert!(backend.create_renderer(window, None).is_null());
        assert_eq!(backend.last_error(), "Renderer already associated with window");
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let backend = HeadlessBackend::new();
        let (_, renderer) = window_with_renderer(&backend);

        backend.fail_next("clear", "device lost");
        assert!(!backend.render_clear(renderer));
        assert_eq!(backend.last_error(), "device lost");
        assert!(backend.render_clear(renderer));
    }

    #[test]
    fn test_confirmation_events() {
        let backend = HeadlessBackend::new();
        backend.set_confirm_requests(true);
        let window = backend.create_window("t", 800, 600, WindowFlags::empty());
        assert_eq!(
            backend.poll_event(),
            Some(Event::Window {
                window_id: 1,
                event: WindowEvent::Shown
            })
        );

        backend.set_window_size(window, 640, 480);
        assert_eq!(
            backend.poll_event(),
            Some(Event::Window {
                window_id: 1,
                event: WindowEvent::Resized {
                    width: 640,
                    height: 480
                }
            })
        );
        assert!(matches!(
            backend.poll_event(),
            Some(Event::Window {
                event: WindowEvent::PixelSizeChanged { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_letterbox_mapping() {
        let backend = HeadlessBackend::new();
        let (_, renderer) = window_with_renderer(&backend);
        backend.set_render_logical_presentation(renderer, 400, 400, LogicalPresentation::Letterbox);

        let rect = backend.render_logical_presentation_rect(renderer).unwrap();
        assert_relative_eq!(rect.x, 100.0);
        assert_relative_eq!(rect.w, 600.0);

        let (x, y) = backend.render_coordinates_from_window(renderer, 400.0, 300.0).unwrap();
        assert_relative_eq!(x, 200.0);
        assert_relative_eq!(y, 200.0);

        let (wx, wy) = backend.render_coordinates_to_window(renderer, x, y).unwrap();
        assert_relative_eq!(wx, 400.0);
        assert_relative_eq!(wy, 300.0);

        assert_eq!(backend.current_render_output_size(renderer), Some((400, 400)));
        assert_eq!(backend.render_output_size(renderer), Some((800, 600)));
    }

    #[test]
    fn test_geometry_index_validation() {
        let backend = HeadlessBackend::new();
        let (_, renderer) = window_with_renderer(&backend);
        let vertices = [Vertex::default(); 3];

        assert!(backend.render_geometry(renderer, &vertices, &[0, 1, 2]));
        assert!(!backend.render_geometry(renderer, &vertices, &[0, 1, 3]));
        assert!(!backend.render_geometry(renderer, &vertices, &[-1, 1, 2]));
        assert_eq!(backend.renderer_snapshot(renderer).unwrap().draws, 1);
    }

    #[test]
    fn test_destroying_window_drops_its_renderer() {
        let backend = HeadlessBackend::new();
        let (window, renderer) = window_with_renderer(&backend);
        backend.destroy_window(window);
        assert_eq!(backend.renderer_count(), 0);
        assert!(backend.renderer_snapshot(renderer).is_none());
    }

    #[test]
    fn test_wait_times_out_on_empty_queue() {
        let backend = HeadlessBackend::new();
        assert_eq!(backend.wait_event(Some(Duration::from_millis(5))), None);

        backend.push_event(Event::Quit);
        assert_eq!(backend.wait_event(Some(Duration::ZERO)), Some(Event::Quit));
    }

    #[test]
    fn test_confirmation_wakes_waiting_thread() {
        let backend = std::sync::Arc::new(HeadlessBackend::new());
        let window = backend.create_window("t", 800, 600, WindowFlags::HIDDEN);
        backend.set_confirm_requests(true);

        let waiter = {
            let backend = std::sync::Arc::clone(&backend);
            std::thread::spawn(move || {
                let started = Instant::now();
                let event = backend.wait_event(Some(Duration::from_secs(10)));
                (event, started.elapsed())
            })
        };
        std::thread::sleep(Duration::from_millis(20));
        assert!(backend.set_window_position(window, 5, 5));

        let (event, waited) = waiter.join().unwrap();
        assert_eq!(
            event,
            Some(Event::Window {
                window_id: 1,
                event: WindowEvent::Moved { x: 5, y: 5 }
            })
        );
        assert!(waited < Duration::from_secs(5));
    }
}
