//! Keyed sprite surfaces
//!
//! Every sprite starts as a blank surface whose background is a transparent
//! color key. The key is chosen so it never equals the color the sprite will
//! be drawn in (see [`color_key_for`]).

use crate::color::{color_key_for, Rgb};
use crate::error::AssetResult;
use crate::native::{is_negative, sdl_call, sdl_call_handle, ChannelMasks, NativeGraphics};

/// Edge length of sprites when nothing else is configured.
pub const DEFAULT_SPRITE_SIZE: i32 = 64;

/// Parameters for SDL_CreateRGBSurface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub flags: u32,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub masks: ChannelMasks,
}

impl SurfaceSpec {
    /// Square 32-bit surface in the library's default format.
    pub const fn square(size: i32) -> Self {
        Self {
            flags: 0,
            width: size,
            height: size,
            depth: 32,
            masks: ChannelMasks {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
        }
    }
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self::square(DEFAULT_SPRITE_SIZE)
    }
}

/// Create a default-sized sprite surface for a sprite drawn in `color`.
///
/// See [`create_surface_with`].
pub fn create_surface<B>(backend: &B, color: Rgb) -> AssetResult<B::Surface>
where
    B: NativeGraphics + ?Sized,
{
    create_surface_with(backend, &SurfaceSpec::default(), color)
}

/// Create a sprite surface for a sprite drawn in `color`.
///
/// The surface gets a color key that differs from `color` and is filled with
/// that key, so it starts fully transparent. Any failing native call aborts
/// the remaining steps and the partly built surface is released.
pub fn create_surface_with<B>(backend: &B, spec: &SurfaceSpec, color: Rgb) -> AssetResult<B::Surface>
where
    B: NativeGraphics + ?Sized,
{
    let mut surface = sdl_call_handle(backend, "SDL_CreateRGBSurface", || {
        backend.create_rgb_surface(spec.flags, spec.width, spec.height, spec.depth, spec.masks)
    })?;

    let color_key = color_key_for(color);
    let key = backend.map_rgb(&surface, color_key);

    sdl_call(
        backend,
        "SDL_SetColorKey",
        || backend.set_color_key(&mut surface, true, key),
        is_negative,
    )?;
    sdl_call(
        backend,
        "SDL_FillRect",
        || backend.fill_rect(&mut surface, None, key),
        is_negative,
    )?;

    log::debug!(
        "created {}x{} surface for {} with color key {}",
        spec.width,
        spec.height,
        color,
        color_key
    );
    Ok(surface)
}
