//!
//! Native graphics boundary.
//!
//! The asset layer talks to the 2D graphics library through the
//! [`NativeGraphics`] trait, whose methods keep the library's C-style
//! conventions: null handles and negative status codes signal failure and the
//! reason is left in a per-thread error string. Call sites never inspect those
//! conventions directly; they go through [`sdl_call`], which turns a failed
//! return value into an [`AssetError`].
//!
//! Two backends are provided:
//! - `sdl`: the real SDL2 library through `sdl2::sys`
//! - `recording`: an in-memory stand-in that logs every call and can be told
//!   to fail any of them
//!

pub mod recording;
pub mod sdl;

use crate::color::{Rgb, Rgba};
use crate::error::{AssetError, AssetResult};

pub use recording::{NativeCall, RecordingBackend};
pub use sdl::{SdlBackend, SdlSurface};

/// Rectangle in surface coordinates, mirroring SDL_Rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Check if the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Width and height of a surface or render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Channel bit masks for surface creation. All zero selects the library's
/// default format for the requested depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelMasks {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub a: u32,
}

/// C-style surface/renderer API of a 2D graphics library.
///
/// Methods return the library's raw results; wrap them in [`sdl_call`] to get
/// a `Result`. A renderer created on a surface draws into that surface and
/// must be destroyed before the surface is released.
pub trait NativeGraphics {
    /// Owned surface handle. Dropping it releases the native surface.
    type Surface;
    /// Renderer handle, released through [`NativeGraphics::destroy_renderer`].
    type Renderer;

    /// SDL_CreateRGBSurface. `None` on failure.
    fn create_rgb_surface(
        &self,
        flags: u32,
        width: i32,
        height: i32,
        depth: i32,
        masks: ChannelMasks,
    ) -> Option<Self::Surface>;

    /// SDL_MapRGB: pixel value of `color` in the surface's format.
    fn map_rgb(&self, surface: &Self::Surface, color: Rgb) -> u32;

    /// SDL_SetColorKey. Negative on failure.
    fn set_color_key(&self, surface: &mut Self::Surface, enable: bool, key: u32) -> i32;

    /// SDL_FillRect; `None` fills the whole surface. Negative on failure.
    fn fill_rect(&self, surface: &mut Self::Surface, rect: Option<Rect>, pixel: u32) -> i32;

    /// SDL_CreateSoftwareRenderer. `None` on failure.
    fn create_software_renderer(&self, surface: &mut Self::Surface) -> Option<Self::Renderer>;

    /// SDL_DestroyRenderer.
    fn destroy_renderer(&self, renderer: Self::Renderer);

    /// SDL_SetRenderDrawColor. Negative on failure.
    fn set_render_draw_color(&self, renderer: &mut Self::Renderer, color: Rgba) -> i32;

    /// SDL_RenderFillRect; `None` fills the whole target. Negative on failure.
    fn render_fill_rect(&self, renderer: &mut Self::Renderer, rect: Option<Rect>) -> i32;

    /// SDL_GetRendererOutputSize. The status is negative on failure.
    fn renderer_output_size(&self, renderer: &Self::Renderer) -> (i32, Extent);

    /// Current error string, if one is set.
    fn pending_error(&self) -> Option<String>;

    /// SDL_GetError followed by SDL_ClearError.
    fn take_error(&self) -> String;
}

/// Failure predicate for status-code returns.
pub fn is_negative(rv: &i32) -> bool {
    *rv < 0
}

/// Failure predicate for `(status, value)` returns.
pub fn status_is_negative<T>(rv: &(i32, T)) -> bool {
    rv.0 < 0
}

/// Run a native call and check its return value.
///
/// `is_error` decides whether `rv` signals failure. On failure the native
/// error string is taken (and cleared) and returned as
/// [`AssetError::NativeCall`].
pub fn sdl_call<B, T>(
    backend: &B,
    name: &'static str,
    call: impl FnOnce() -> T,
    is_error: impl FnOnce(&T) -> bool,
) -> AssetResult<T>
where
    B: NativeGraphics + ?Sized,
{
    let rv = call();
    if is_error(&rv) {
        return Err(native_failure(backend, name));
    }
    Ok(rv)
}

/// Run a native call that returns a handle, where null means failure.
pub fn sdl_call_handle<B, T>(
    backend: &B,
    name: &'static str,
    call: impl FnOnce() -> Option<T>,
) -> AssetResult<T>
where
    B: NativeGraphics + ?Sized,
{
    call().ok_or_else(|| native_failure(backend, name))
}

/// Run a native call that has no return value to check.
///
/// Fails when the call sets the native error string. A stale error left by an
/// earlier call is discarded first.
pub fn sdl_call_void<B>(backend: &B, name: &'static str, call: impl FnOnce()) -> AssetResult<()>
where
    B: NativeGraphics + ?Sized,
{
    if let Some(stale) = backend.pending_error() {
        log::trace!("discarding stale native error before {}: {}", name, stale);
        backend.take_error();
    }
    call();
    if backend.pending_error().is_some() {
        return Err(native_failure(backend, name));
    }
    Ok(())
}

fn native_failure<B>(backend: &B, name: &'static str) -> AssetError
where
    B: NativeGraphics + ?Sized,
{
    let message = backend.take_error();
    log::debug!("{} failed: {}", name, message);
    AssetError::native_call(name, message)
}
