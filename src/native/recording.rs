//! Recording (in-memory) graphics backend
//!
//! Implements [`NativeGraphics`] without a native library. Surfaces are plain
//! XRGB8888 pixel buffers, software renderers draw straight into them, and
//! every call is appended to a shared log so callers can check exactly which
//! native calls were made and in what order. Any call kind can be set to
//! fail; a failing call leaves an error string behind and returns the same
//! sentinel the C API would.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{ChannelMasks, Extent, NativeGraphics, Rect};
use crate::color::{Rgb, Rgba};

/// Native calls the backend can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeCall {
    CreateRgbSurface,
    MapRgb,
    SetColorKey,
    FillRect,
    CreateSoftwareRenderer,
    DestroyRenderer,
    SetRenderDrawColor,
    RenderFillRect,
    GetRendererOutputSize,
    FreeSurface,
}

impl NativeCall {
    /// Name of the matching SDL function.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateRgbSurface => "SDL_CreateRGBSurface",
            Self::MapRgb => "SDL_MapRGB",
            Self::SetColorKey => "SDL_SetColorKey",
            Self::FillRect => "SDL_FillRect",
            Self::CreateSoftwareRenderer => "SDL_CreateSoftwareRenderer",
            Self::DestroyRenderer => "SDL_DestroyRenderer",
            Self::SetRenderDrawColor => "SDL_SetRenderDrawColor",
            Self::RenderFillRect => "SDL_RenderFillRect",
            Self::GetRendererOutputSize => "SDL_GetRendererOutputSize",
            Self::FreeSurface => "SDL_FreeSurface",
        }
    }
}

#[derive(Debug, Default)]
struct CallLog {
    calls: Vec<NativeCall>,
    mapped: Vec<Rgb>,
    failing: HashMap<NativeCall, String>,
    error: Option<String>,
    next_id: u32,
    created: usize,
    freed: usize,
}

impl CallLog {
    /// Record `call`; returns true when it has been set to fail.
    fn enter(&mut self, call: NativeCall) -> bool {
        self.calls.push(call);
        match self.failing.get(&call) {
            Some(message) => {
                self.error = Some(message.clone());
                true
            }
            None => false,
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

type SharedLog = Rc<RefCell<CallLog>>;
type Pixels = Rc<RefCell<Vec<u32>>>;

/// In-memory backend with a call log and failure injection.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    log: SharedLog,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `call` fail with a generic message.
    pub fn fail_on(&self, call: NativeCall) {
        self.fail_on_with(call, format!("{} failed", call.name()));
    }

    /// Make every later `call` fail with `message` as the error string.
    pub fn fail_on_with(&self, call: NativeCall, message: impl Into<String>) {
        self.log.borrow_mut().failing.insert(call, message.into());
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        self.log.borrow_mut().failing.clear();
    }

    /// Set the error string directly, as a native call would.
    pub fn set_pending_error(&self, message: impl Into<String>) {
        self.log.borrow_mut().error = Some(message.into());
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.log.borrow().calls.clone()
    }

    /// Number of times `call` was made.
    pub fn count(&self, call: NativeCall) -> usize {
        self.log.borrow().calls.iter().filter(|c| **c == call).count()
    }

    /// Colors passed to `map_rgb`, in order.
    pub fn mapped_colors(&self) -> Vec<Rgb> {
        self.log.borrow().mapped.clone()
    }

    /// Surfaces created and not yet freed.
    pub fn live_surfaces(&self) -> usize {
        let log = self.log.borrow();
        log.created - log.freed
    }

    /// Forget recorded calls; failure settings are kept.
    pub fn reset_calls(&self) {
        let mut log = self.log.borrow_mut();
        log.calls.clear();
        log.mapped.clear();
    }
}

fn pack(color: Rgb) -> u32 {
    (u32::from(color.r) << 16) | (u32::from(color.g) << 8) | u32::from(color.b)
}

fn unpack(pixel: u32) -> Rgb {
    Rgb::new((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

/// Clip `rect` (or the whole target for `None`) to `extent`.
fn clip(rect: Option<Rect>, extent: Extent) -> Option<Rect> {
    let rect = rect.unwrap_or(Rect::new(0, 0, extent.width, extent.height));
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.x.saturating_add(rect.w).min(extent.width);
    let y1 = rect.y.saturating_add(rect.h).min(extent.height);
    let clipped = Rect::new(x0, y0, x1 - x0, y1 - y0);
    (!clipped.is_empty()).then_some(clipped)
}

fn fill_pixels(pixels: &Pixels, extent: Extent, rect: Option<Rect>, pixel: u32) {
    let Some(rect) = clip(rect, extent) else {
        return;
    };
    let mut pixels = pixels.borrow_mut();
    for y in rect.y..rect.y + rect.h {
        let start = y as usize * extent.width as usize + rect.x as usize;
        pixels[start..start + rect.w as usize].fill(pixel);
    }
}

/// Surface owned by the caller; records its own release.
#[derive(Debug)]
pub struct RecordedSurface {
    id: u32,
    extent: Extent,
    pixels: Pixels,
    color_key: Option<u32>,
    log: SharedLog,
}

impl RecordedSurface {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Transparent color key, if enabled.
    pub fn color_key(&self) -> Option<Rgb> {
        self.color_key.map(unpack)
    }

    /// Color at (`x`, `y`), or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if x < 0 || y < 0 || x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        let index = y as usize * self.extent.width as usize + x as usize;
        Some(unpack(self.pixels.borrow()[index]))
    }

    /// Number of pixels of `color`.
    pub fn count_pixels(&self, color: Rgb) -> usize {
        let packed = pack(color);
        self.pixels.borrow().iter().filter(|p| **p == packed).count()
    }
}

impl Drop for RecordedSurface {
    fn drop(&mut self) {
        let mut log = self.log.borrow_mut();
        log.calls.push(NativeCall::FreeSurface);
        log.freed += 1;
    }
}

/// Software renderer drawing into a [`RecordedSurface`]'s pixels.
#[derive(Debug)]
pub struct RecordedRenderer {
    id: u32,
    extent: Extent,
    pixels: Pixels,
    draw_color: u32,
}

impl RecordedRenderer {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl NativeGraphics for RecordingBackend {
    type Surface = RecordedSurface;
    type Renderer = RecordedRenderer;

    fn create_rgb_surface(
        &self,
        _flags: u32,
        width: i32,
        height: i32,
        depth: i32,
        _masks: ChannelMasks,
    ) -> Option<RecordedSurface> {
        let mut log = self.log.borrow_mut();
        if log.enter(NativeCall::CreateRgbSurface) {
            return None;
        }
        if width < 0 || height < 0 || depth != 32 {
            log.error = Some(format!("Unsupported surface: {}x{}x{}", width, height, depth));
            return None;
        }
        let Some(len) = width.checked_mul(height) else {
            log.error = Some(format!("Surface too large: {}x{}", width, height));
            return None;
        };

        log.created += 1;
        let id = log.next_id();
        Some(RecordedSurface {
            id,
            extent: Extent::new(width, height),
            pixels: Rc::new(RefCell::new(vec![0; len as usize])),
            color_key: None,
            log: Rc::clone(&self.log),
        })
    }

    fn map_rgb(&self, _surface: &RecordedSurface, color: Rgb) -> u32 {
        let mut log = self.log.borrow_mut();
        log.calls.push(NativeCall::MapRgb);
        log.mapped.push(color);
        pack(color)
    }

    fn set_color_key(&self, surface: &mut RecordedSurface, enable: bool, key: u32) -> i32 {
        if self.log.borrow_mut().enter(NativeCall::SetColorKey) {
            return -1;
        }
        surface.color_key = enable.then_some(key);
        0
    }

    fn fill_rect(&self, surface: &mut RecordedSurface, rect: Option<Rect>, pixel: u32) -> i32 {
        if self.log.borrow_mut().enter(NativeCall::FillRect) {
            return -1;
        }
        fill_pixels(&surface.pixels, surface.extent, rect, pixel);
        0
    }

    fn create_software_renderer(&self, surface: &mut RecordedSurface) -> Option<RecordedRenderer> {
        let mut log = self.log.borrow_mut();
        if log.enter(NativeCall::CreateSoftwareRenderer) {
            return None;
        }
        Some(RecordedRenderer {
            id: log.next_id(),
            extent: surface.extent,
            pixels: Rc::clone(&surface.pixels),
            draw_color: 0,
        })
    }

    fn destroy_renderer(&self, _renderer: RecordedRenderer) {
        // Failure only leaves the error string set; the renderer is gone either way.
        self.log.borrow_mut().enter(NativeCall::DestroyRenderer);
    }

    fn set_render_draw_color(&self, renderer: &mut RecordedRenderer, color: Rgba) -> i32 {
        if self.log.borrow_mut().enter(NativeCall::SetRenderDrawColor) {
            return -1;
        }
        renderer.draw_color = pack(color.rgb());
        0
    }

    fn render_fill_rect(&self, renderer: &mut RecordedRenderer, rect: Option<Rect>) -> i32 {
        if self.log.borrow_mut().enter(NativeCall::RenderFillRect) {
            return -1;
        }
        fill_pixels(&renderer.pixels, renderer.extent, rect, renderer.draw_color);
        0
    }

    fn renderer_output_size(&self, renderer: &RecordedRenderer) -> (i32, Extent) {
        if self.log.borrow_mut().enter(NativeCall::GetRendererOutputSize) {
            return (-1, Extent::default());
        }
        (0, renderer.extent)
    }

    fn pending_error(&self) -> Option<String> {
        self.log.borrow().error.clone()
    }

    fn take_error(&self) -> String {
        self.log.borrow_mut().error.take().unwrap_or_default()
    }
}
