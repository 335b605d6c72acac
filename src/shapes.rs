//! Shape sprite assets
//!
//! Solid-color shapes drawn with a software renderer onto a keyed sprite
//! surface. Everything outside the shape keeps the color key and renders as
//! transparent.

use std::fmt;

use crate::color::Rgb;
use crate::error::AssetResult;
use crate::native::{
    is_negative, sdl_call, sdl_call_handle, sdl_call_void, status_is_negative, Extent,
    NativeGraphics, Rect,
};
use crate::surface::{create_surface_with, SurfaceSpec};

/// Width:height ratio of a rectangle sprite. Both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// `None` when either side is zero.
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Shape drawn by a [`ShapeAsset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Fills the whole sprite.
    Square,
    /// Largest centered rectangle of the given ratio.
    Rectangle(AspectRatio),
    /// Inscribed circle.
    Circle,
    /// Isosceles triangle, apex at top center, base along the bottom edge.
    Triangle,
}

impl Shape {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rectangle(_) => "rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
        }
    }

    /// Replace the aspect ratio of a rectangle; other shapes are unchanged.
    pub fn with_aspect(self, aspect: AspectRatio) -> Self {
        match self {
            Self::Rectangle(_) => Self::Rectangle(aspect),
            other => other,
        }
    }
}

/// A solid-color shape sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeAsset {
    pub shape: Shape,
    pub color: Rgb,
}

impl ShapeAsset {
    pub const fn new(shape: Shape, color: Rgb) -> Self {
        Self { shape, color }
    }

    pub const fn square(color: Rgb) -> Self {
        Self::new(Shape::Square, color)
    }

    pub const fn rectangle(color: Rgb, aspect: AspectRatio) -> Self {
        Self::new(Shape::Rectangle(aspect), color)
    }

    pub const fn circle(color: Rgb) -> Self {
        Self::new(Shape::Circle, color)
    }

    pub const fn triangle(color: Rgb) -> Self {
        Self::new(Shape::Triangle, color)
    }

    /// Render the shape onto a new keyed surface.
    pub fn render<B>(&self, backend: &B, spec: &SurfaceSpec) -> AssetResult<B::Surface>
    where
        B: NativeGraphics + ?Sized,
    {
        let mut surface = create_surface_with(backend, spec, self.color)?;
        with_software_renderer(backend, &mut surface, |renderer| self.draw(backend, renderer))?;
        log::debug!("rendered {} in {}", self.shape.name(), self.color);
        Ok(surface)
    }

    fn draw<B>(&self, backend: &B, renderer: &mut B::Renderer) -> AssetResult<()>
    where
        B: NativeGraphics + ?Sized,
    {
        sdl_call(
            backend,
            "SDL_SetRenderDrawColor",
            || backend.set_render_draw_color(renderer, self.color.opaque()),
            is_negative,
        )?;

        match self.shape {
            Shape::Square => fill(backend, renderer, None),
            Shape::Rectangle(aspect) => {
                let extent = output_size(backend, renderer)?;
                fill(backend, renderer, Some(centered_rect(extent, aspect)))
            }
            Shape::Circle => {
                let extent = output_size(backend, renderer)?;
                circle_spans(extent).try_for_each(|span| fill(backend, renderer, Some(span)))
            }
            Shape::Triangle => {
                let extent = output_size(backend, renderer)?;
                triangle_spans(extent).try_for_each(|span| fill(backend, renderer, Some(span)))
            }
        }
    }
}

/// Run `draw` with a software renderer targeting `surface`.
///
/// The renderer is destroyed afterwards whether or not `draw` succeeded; a
/// drawing error takes precedence over a destroy error.
pub fn with_software_renderer<B, R>(
    backend: &B,
    surface: &mut B::Surface,
    draw: impl FnOnce(&mut B::Renderer) -> AssetResult<R>,
) -> AssetResult<R>
where
    B: NativeGraphics + ?Sized,
{
    let mut renderer = sdl_call_handle(backend, "SDL_CreateSoftwareRenderer", || {
        backend.create_software_renderer(surface)
    })?;

    let drawn = draw(&mut renderer);
    let destroyed = sdl_call_void(backend, "SDL_DestroyRenderer", || {
        backend.destroy_renderer(renderer)
    });

    let value = drawn?;
    destroyed?;
    Ok(value)
}

fn output_size<B>(backend: &B, renderer: &B::Renderer) -> AssetResult<Extent>
where
    B: NativeGraphics + ?Sized,
{
    let (_, extent) = sdl_call(
        backend,
        "SDL_GetRendererOutputSize",
        || backend.renderer_output_size(renderer),
        status_is_negative,
    )?;
    Ok(extent)
}

fn fill<B>(backend: &B, renderer: &mut B::Renderer, rect: Option<Rect>) -> AssetResult<()>
where
    B: NativeGraphics + ?Sized,
{
    sdl_call(
        backend,
        "SDL_RenderFillRect",
        || backend.render_fill_rect(renderer, rect),
        is_negative,
    )?;
    Ok(())
}

/// Largest rectangle of ratio `aspect` centered in `extent`.
///
/// The longer side of the ratio keeps the full target size.
pub fn centered_rect(extent: Extent, aspect: AspectRatio) -> Rect {
    let (mut width, mut height) = (extent.width, extent.height);
    let (aw, ah) = (i64::from(aspect.width), i64::from(aspect.height));

    if aw > ah {
        height = (i64::from(height) * ah / aw) as i32;
    } else if ah > aw {
        width = (i64::from(width) * aw / ah) as i32;
    }

    Rect::new((extent.width - width) / 2, (extent.height - height) / 2, width, height)
}

/// One-pixel-high row span from `x0` to `x1` (rounded), if non-empty.
fn row_span(y: i32, x0: f64, x1: f64) -> Option<Rect> {
    let (x0, x1) = (x0.round() as i32, x1.round() as i32);
    (x1 > x0).then(|| Rect::new(x0, y, x1 - x0, 1))
}

/// Row spans covering the circle inscribed in `extent`.
pub fn circle_spans(extent: Extent) -> impl Iterator<Item = Rect> {
    let cx = f64::from(extent.width) / 2.0;
    let cy = f64::from(extent.height) / 2.0;
    let radius = cx.min(cy);

    (0..extent.height).filter_map(move |y| {
        let dy = f64::from(y) + 0.5 - cy;
        if dy.abs() > radius {
            return None;
        }
        let half = (radius * radius - dy * dy).sqrt();
        row_span(y, cx - half, cx + half)
    })
}

/// Row spans covering the triangle with apex at top center and base along the
/// bottom edge of `extent`.
pub fn triangle_spans(extent: Extent) -> impl Iterator<Item = Rect> {
    let cx = f64::from(extent.width) / 2.0;
    let height = f64::from(extent.height);

    (0..extent.height).filter_map(move |y| {
        let half = (f64::from(y) + 0.5) / height * cx;
        row_span(y, cx - half, cx + half)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, MAGENTA};
    use crate::native::{NativeCall, RecordingBackend};

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn render(asset: ShapeAsset) -> (RecordingBackend, crate::native::recording::RecordedSurface) {
        let backend = RecordingBackend::new();
        let surface = asset.render(&backend, &SurfaceSpec::default()).unwrap();
        (backend, surface)
    }

    #[test]
    fn test_square_fills_everything() {
        let (backend, surface) = render(ShapeAsset::square(RED));

        assert_eq!(surface.count_pixels(RED), 64 * 64);
        assert_eq!(surface.color_key(), Some(BLACK));
        assert_eq!(backend.count(NativeCall::GetRendererOutputSize), 0);
        assert_eq!(backend.count(NativeCall::RenderFillRect), 1);
        assert_eq!(backend.count(NativeCall::DestroyRenderer), 1);
    }

    #[test]
    fn test_black_square_is_keyed_magenta() {
        let (_, surface) = render(ShapeAsset::square(BLACK));

        assert_eq!(surface.color_key(), Some(MAGENTA));
        assert_eq!(surface.count_pixels(BLACK), 64 * 64);
    }

    #[test]
    fn test_wide_rectangle() {
        let aspect = AspectRatio::new(2, 1).unwrap();
        let (backend, surface) = render(ShapeAsset::rectangle(RED, aspect));

        assert_eq!(surface.count_pixels(RED), 64 * 32);
        assert_eq!(surface.pixel(0, 15), Some(BLACK));
        assert_eq!(surface.pixel(0, 16), Some(RED));
        assert_eq!(surface.pixel(63, 47), Some(RED));
        assert_eq!(surface.pixel(63, 48), Some(BLACK));
        assert_eq!(backend.count(NativeCall::GetRendererOutputSize), 1);
    }

    #[test]
    fn test_centered_rect() {
        let extent = Extent::new(64, 64);
        assert_eq!(
            centered_rect(extent, AspectRatio::default()),
            Rect::new(0, 0, 64, 64)
        );
        assert_eq!(
            centered_rect(extent, AspectRatio::new(1, 4).unwrap()),
            Rect::new(24, 0, 16, 64)
        );
        assert_eq!(
            centered_rect(extent, AspectRatio::new(3, 1).unwrap()),
            Rect::new(0, 21, 64, 21)
        );
    }

    #[test]
    fn test_circle() {
        let (_, surface) = render(ShapeAsset::circle(RED));

        assert_eq!(surface.pixel(32, 32), Some(RED));
        assert_eq!(surface.pixel(0, 32), Some(RED));
        assert_eq!(surface.pixel(63, 31), Some(RED));
        assert_eq!(surface.pixel(32, 0), Some(RED));
        assert_eq!(surface.pixel(0, 0), Some(BLACK));
        assert_eq!(surface.pixel(63, 63), Some(BLACK));
    }

    #[test]
    fn test_circle_spans_are_symmetric() {
        let spans: Vec<Rect> = circle_spans(Extent::new(64, 64)).collect();
        assert_eq!(spans.len(), 64);
        for (top, bottom) in spans.iter().zip(spans.iter().rev()) {
            assert_eq!(top.x, bottom.x);
            assert_eq!(top.w, bottom.w);
        }
    }

    #[test]
    fn test_triangle() {
        let (_, surface) = render(ShapeAsset::triangle(RED));

        assert_eq!(surface.pixel(31, 1), Some(RED));
        assert_eq!(surface.pixel(32, 1), Some(RED));
        assert_eq!(surface.pixel(32, 40), Some(RED));
        assert_eq!(surface.pixel(0, 63), Some(RED));
        assert_eq!(surface.pixel(63, 63), Some(RED));
        assert_eq!(surface.pixel(0, 0), Some(BLACK));
        assert_eq!(surface.pixel(63, 0), Some(BLACK));
        assert_eq!(surface.pixel(32, 0), Some(BLACK));
    }

    #[test]
    fn test_renderer_destroyed_when_drawing_fails() {
        let backend = RecordingBackend::new();
        backend.fail_on(NativeCall::RenderFillRect);

        let err = ShapeAsset::circle(RED)
            .render(&backend, &SurfaceSpec::default())
            .unwrap_err();

        assert_eq!(err.call(), "SDL_RenderFillRect");
        assert_eq!(backend.count(NativeCall::RenderFillRect), 1);
        assert_eq!(backend.count(NativeCall::DestroyRenderer), 1);
        assert_eq!(backend.live_surfaces(), 0);
    }

    #[test]
    fn test_output_size_failure() {
        let backend = RecordingBackend::new();
        backend.fail_on(NativeCall::GetRendererOutputSize);

        let err = ShapeAsset::triangle(RED)
            .render(&backend, &SurfaceSpec::default())
            .unwrap_err();

        assert_eq!(err.call(), "SDL_GetRendererOutputSize");
        assert_eq!(backend.count(NativeCall::RenderFillRect), 0);
        assert_eq!(backend.count(NativeCall::DestroyRenderer), 1);
    }

    #[test]
    fn test_destroy_failure_is_reported() {
        let backend = RecordingBackend::new();
        backend.fail_on(NativeCall::DestroyRenderer);

        let err = ShapeAsset::square(RED)
            .render(&backend, &SurfaceSpec::default())
            .unwrap_err();

        assert_eq!(err.call(), "SDL_DestroyRenderer");
        assert_eq!(backend.live_surfaces(), 0);
    }

    #[test]
    fn test_renderer_creation_failure() {
        let backend = RecordingBackend::new();
        backend.fail_on(NativeCall::CreateSoftwareRenderer);

        let err = ShapeAsset::square(RED)
            .render(&backend, &SurfaceSpec::default())
            .unwrap_err();

        assert_eq!(err.call(), "SDL_CreateSoftwareRenderer");
        assert_eq!(backend.count(NativeCall::DestroyRenderer), 0);
    }

    #[test]
    fn test_with_aspect() {
        let aspect = AspectRatio::new(4, 3).unwrap();
        assert_eq!(
            Shape::Rectangle(AspectRatio::default()).with_aspect(aspect),
            Shape::Rectangle(aspect)
        );
        assert_eq!(Shape::Circle.with_aspect(aspect), Shape::Circle);
        assert!(AspectRatio::new(0, 1).is_none());
        assert_eq!(aspect.to_string(), "4:3");
    }
}
