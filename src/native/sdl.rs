//!
//! SDL2 backend.
//!
//! Thin [`NativeGraphics`] implementation over the raw SDL2 C API exposed by
//! `sdl2::sys`. Software surfaces and software renderers need no SDL
//! subsystem initialization, so the backend holds no state of its own.
//!
//! SDL reports errors through a per-thread string; keep all calls for one
//! surface on the thread that created it.
//!

use std::ffi::CStr;
use std::path::Path;
use std::ptr::{self, NonNull};

use libc::c_int;
use sdl2::surface::SurfaceRef;
use sdl2::sys;

use super::{ChannelMasks, Extent, NativeGraphics, Rect};
use crate::color::{Rgb, Rgba};
use crate::error::{AssetError, AssetResult};

/// Owned SDL surface; freed with SDL_FreeSurface on drop.
#[derive(Debug)]
pub struct SdlSurface {
    raw: NonNull<sys::SDL_Surface>,
}

impl SdlSurface {
    /// Take ownership of a raw surface pointer.
    ///
    /// # Safety
    /// `raw` must be null or a valid surface that nothing else will free.
    pub unsafe fn from_raw(raw: *mut sys::SDL_Surface) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw })
    }

    /// Raw pointer for direct SDL calls. Ownership is kept.
    pub fn raw(&self) -> *mut sys::SDL_Surface {
        self.raw.as_ptr()
    }

    /// Borrow as an `sdl2` crate surface.
    pub fn as_surface_ref(&self) -> &SurfaceRef {
        // SAFETY: the pointer is valid for as long as `self` is.
        unsafe { SurfaceRef::from_ll(self.raw.as_ptr()) }
    }

    pub fn extent(&self) -> Extent {
        // SAFETY: `raw` is a valid surface.
        let surface = unsafe { self.raw.as_ref() };
        Extent::new(surface.w, surface.h)
    }

    /// Transparent color key, if enabled.
    pub fn color_key(&self) -> Option<Rgb> {
        let mut key = 0u32;
        // SAFETY: `raw` is a valid surface and `key` outlives the call.
        let rv = unsafe { sys::SDL_GetColorKey(self.raw.as_ptr(), &mut key) };
        (rv == 0).then(|| self.decode(key))
    }

    /// Color at (`x`, `y`), or `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        let extent = self.extent();
        if x < 0 || y < 0 || x >= extent.width || y >= extent.height {
            return None;
        }

        let surface = self.as_surface_ref();
        let bpp = surface.pixel_format_enum().byte_size_per_pixel();
        let offset = y as usize * surface.pitch() as usize + x as usize * bpp;
        let value = surface.with_lock(|pixels| {
            let mut bytes = [0u8; 4];
            bytes[..bpp].copy_from_slice(&pixels[offset..offset + bpp]);
            u32::from_ne_bytes(bytes)
        });
        Some(self.decode(value))
    }

    /// Write the surface to a BMP file.
    pub fn save_bmp<P: AsRef<Path>>(&self, path: P) -> AssetResult<()> {
        self.as_surface_ref()
            .save_bmp(path)
            .map_err(|e| AssetError::native_call("SDL_SaveBMP", e))
    }

    fn decode(&self, pixel: u32) -> Rgb {
        let (mut r, mut g, mut b) = (0u8, 0u8, 0u8);
        // SAFETY: `raw` is a valid surface with a valid format.
        unsafe { sys::SDL_GetRGB(pixel, (*self.raw.as_ptr()).format, &mut r, &mut g, &mut b) };
        Rgb::new(r, g, b)
    }
}

impl Drop for SdlSurface {
    fn drop(&mut self) {
        // SAFETY: we own the surface and free it exactly once.
        unsafe { sys::SDL_FreeSurface(self.raw.as_ptr()) };
    }
}

/// Software renderer drawing into an [`SdlSurface`].
#[derive(Debug)]
pub struct SdlRenderer {
    raw: NonNull<sys::SDL_Renderer>,
}

fn rect_ptr(rect: &Option<sys::SDL_Rect>) -> *const sys::SDL_Rect {
    rect.as_ref().map_or(ptr::null(), |r| r as *const sys::SDL_Rect)
}

fn to_sdl_rect(rect: Option<Rect>) -> Option<sys::SDL_Rect> {
    rect.map(|r| sys::SDL_Rect {
        x: r.x,
        y: r.y,
        w: r.w,
        h: r.h,
    })
}

/// SDL2 implementation of [`NativeGraphics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SdlBackend;

impl SdlBackend {
    pub const fn new() -> Self {
        Self
    }
}

impl NativeGraphics for SdlBackend {
    type Surface = SdlSurface;
    type Renderer = SdlRenderer;

    fn create_rgb_surface(
        &self,
        flags: u32,
        width: i32,
        height: i32,
        depth: i32,
        masks: ChannelMasks,
    ) -> Option<SdlSurface> {
        // SAFETY: plain value arguments; the result is null or a new surface we own.
        unsafe {
            let raw = sys::SDL_CreateRGBSurface(
                flags,
                width as c_int,
                height as c_int,
                depth as c_int,
                masks.r,
                masks.g,
                masks.b,
                masks.a,
            );
            SdlSurface::from_raw(raw)
        }
    }

    fn map_rgb(&self, surface: &SdlSurface, color: Rgb) -> u32 {
        // SAFETY: `surface` is valid and owns its format.
        unsafe { sys::SDL_MapRGB((*surface.raw()).format, color.r, color.g, color.b) }
    }

    fn set_color_key(&self, surface: &mut SdlSurface, enable: bool, key: u32) -> i32 {
        // SAFETY: `surface` is valid.
        unsafe { sys::SDL_SetColorKey(surface.raw(), c_int::from(enable), key) }
    }

    fn fill_rect(&self, surface: &mut SdlSurface, rect: Option<Rect>, pixel: u32) -> i32 {
        let rect = to_sdl_rect(rect);
        // SAFETY: `surface` is valid; the rect pointer is null or points at `rect`.
        unsafe { sys::SDL_FillRect(surface.raw(), rect_ptr(&rect), pixel) }
    }

    fn create_software_renderer(&self, surface: &mut SdlSurface) -> Option<SdlRenderer> {
        // SAFETY: `surface` is valid; the renderer is destroyed before it is freed.
        let raw = unsafe { sys::SDL_CreateSoftwareRenderer(surface.raw()) };
        NonNull::new(raw).map(|raw| SdlRenderer { raw })
    }

    fn destroy_renderer(&self, renderer: SdlRenderer) {
        // SAFETY: the renderer is consumed, so it is destroyed exactly once.
        unsafe { sys::SDL_DestroyRenderer(renderer.raw.as_ptr()) };
    }

    fn set_render_draw_color(&self, renderer: &mut SdlRenderer, color: Rgba) -> i32 {
        // SAFETY: `renderer` is valid.
        unsafe {
            sys::SDL_SetRenderDrawColor(renderer.raw.as_ptr(), color.r, color.g, color.b, color.a)
        }
    }

    fn render_fill_rect(&self, renderer: &mut SdlRenderer, rect: Option<Rect>) -> i32 {
        let rect = to_sdl_rect(rect);
        // SAFETY: `renderer` is valid; the rect pointer is null or points at `rect`.
        unsafe { sys::SDL_RenderFillRect(renderer.raw.as_ptr(), rect_ptr(&rect)) }
    }

    fn renderer_output_size(&self, renderer: &SdlRenderer) -> (i32, Extent) {
        let (mut w, mut h): (c_int, c_int) = (0, 0);
        // SAFETY: `renderer` is valid and both out-params outlive the call.
        let rv = unsafe { sys::SDL_GetRendererOutputSize(renderer.raw.as_ptr(), &mut w, &mut h) };
        (rv, Extent::new(w, h))
    }

    fn pending_error(&self) -> Option<String> {
        // SAFETY: SDL_GetError always returns a valid, NUL-terminated string.
        let message = unsafe { CStr::from_ptr(sys::SDL_GetError()) };
        let message = message.to_string_lossy();
        (!message.is_empty()).then(|| message.into_owned())
    }

    fn take_error(&self) -> String {
        let message = self.pending_error().unwrap_or_default();
        // SAFETY: no arguments; resets the per-thread error string.
        unsafe { sys::SDL_ClearError() };
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_to_sdl_rect() {
        assert!(to_sdl_rect(None).is_none());
        let rect = to_sdl_rect(Some(Rect::new(1, 2, 3, 4))).unwrap();
        assert_eq!((rect.x, rect.y, rect.w, rect.h), (1, 2, 3, 4));
        assert!(rect_ptr(&None).is_null());
    }

    #[test]
    #[serial]
    fn test_surface_lifecycle() {
        let backend = SdlBackend::new();
        let mut surface = backend
            .create_rgb_surface(0, 8, 4, 32, ChannelMasks::default())
            .unwrap();
        assert_eq!(surface.extent(), Extent::new(8, 4));
        assert!(surface.color_key().is_none());

        let key = backend.map_rgb(&surface, Rgb::new(255, 71, 182));
        assert_eq!(backend.set_color_key(&mut surface, true, key), 0);
        assert_eq!(backend.fill_rect(&mut surface, None, key), 0);

        assert_eq!(surface.color_key(), Some(Rgb::new(255, 71, 182)));
        assert_eq!(surface.pixel(7, 3), Some(Rgb::new(255, 71, 182)));
        assert_eq!(surface.pixel(8, 0), None);
    }

    #[test]
    #[serial]
    fn test_failed_create_sets_error() {
        let backend = SdlBackend::new();
        backend.take_error();

        let surface = backend.create_rgb_surface(0, -1, -1, 32, ChannelMasks::default());
        assert!(surface.is_none());
        assert!(!backend.take_error().is_empty());
        assert!(backend.pending_error().is_none());
    }
}
