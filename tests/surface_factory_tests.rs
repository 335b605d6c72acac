//! Integration tests for the keyed surface factory.
//!
//! These run against the recording backend so every native call can be
//! counted and any of them made to fail.

#[cfg(test)]
mod factory_tests {
    use rstest::rstest;
    use sprite_assets::native::{NativeCall, RecordingBackend};
    use sprite_assets::{create_surface, create_surface_with, AssetError, Rgb, SurfaceSpec, BLACK, MAGENTA};

    #[test]
    fn test_create_surface_with_black_color() {
        let backend = RecordingBackend::new();

        let surface = create_surface(&backend, BLACK).unwrap();

        assert_eq!(backend.count(NativeCall::CreateRgbSurface), 1);
        assert_eq!(backend.count(NativeCall::SetColorKey), 1);
        assert_eq!(backend.count(NativeCall::MapRgb), 1);
        assert_eq!(backend.count(NativeCall::FillRect), 1);
        assert_eq!(backend.mapped_colors(), vec![MAGENTA]);
        assert_eq!(surface.color_key(), Some(MAGENTA));
    }

    #[test]
    fn test_create_surface_with_non_black_color() {
        let backend = RecordingBackend::new();

        let surface = create_surface(&backend, Rgb::new(255, 0, 0)).unwrap();

        assert_eq!(backend.count(NativeCall::CreateRgbSurface), 1);
        assert_eq!(backend.count(NativeCall::SetColorKey), 1);
        assert_eq!(backend.count(NativeCall::FillRect), 1);
        assert_eq!(backend.mapped_colors(), vec![BLACK]);
        assert_eq!(surface.color_key(), Some(BLACK));
    }

    #[test]
    fn test_color_key_error_handling() {
        let backend = RecordingBackend::new();
        backend.fail_on_with(NativeCall::SetColorKey, "SDL call failed");

        let result = create_surface(&backend, BLACK);

        match result {
            Err(AssetError::NativeCall { call, message }) => {
                assert_eq!(call, "SDL_SetColorKey");
                assert_eq!(message, "SDL call failed");
            }
            Ok(_) => panic!("Expected error"),
        }
        assert_eq!(backend.count(NativeCall::CreateRgbSurface), 1);
        assert_eq!(backend.count(NativeCall::SetColorKey), 1);
        assert_eq!(backend.count(NativeCall::MapRgb), 1);
        assert_eq!(backend.count(NativeCall::FillRect), 0);
        assert_eq!(backend.live_surfaces(), 0);
    }

    #[rstest]
    #[case(BLACK, MAGENTA)]
    #[case(Rgb::new(255, 0, 0), BLACK)]
    fn test_color_conversion(#[case] color: Rgb, #[case] expected_key: Rgb) {
        let backend = RecordingBackend::new();

        let surface = create_surface(&backend, color).unwrap();

        assert_eq!(backend.mapped_colors(), vec![expected_key]);
        assert_eq!(surface.pixel(0, 0), Some(expected_key));
        assert_eq!(surface.pixel(63, 63), Some(expected_key));
    }

    #[test]
    fn test_surfaces_do_not_share_state() {
        let backend = RecordingBackend::new();

        let first = create_surface(&backend, MAGENTA).unwrap();
        backend.reset_calls();
        let second = create_surface(&backend, MAGENTA).unwrap();

        assert_eq!(backend.calls().len(), 4);
        assert_ne!(first.id(), second.id());
        assert_eq!(first.color_key(), second.color_key());
        assert_eq!(first.count_pixels(BLACK), second.count_pixels(BLACK));
    }

    #[test]
    fn test_oversized_spec_is_an_error() {
        let backend = RecordingBackend::new();
        let spec = SurfaceSpec::square(100_000);

        let err = create_surface_with(&backend, &spec, BLACK).unwrap_err();

        assert_eq!(err.call(), "SDL_CreateRGBSurface");
        assert_eq!(backend.count(NativeCall::MapRgb), 0);
        assert_eq!(backend.live_surfaces(), 0);
    }
}
