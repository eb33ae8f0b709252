// Math utilities and helper functions

use glam::{Vec2, Vec3};

/// Convert a pixel position into normalized device coordinates.
///
/// X grows to the right and Y grows upwards, both in `[-1, 1]`.
/// A zero-sized viewport maps everything to the center.
pub fn screen_to_ndc(position: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }

    Vec2::new(
        (position.x / viewport.x) * 2.0 - 1.0,
        -(position.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Unpack a `0xRRGGBB` color into sRGB float channels in `[0, 1]`
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Convert an sRGB-encoded channel to linear space
pub fn srgb_to_linear(channel: f32) -> f32 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert an sRGB color to linear space, channel by channel
pub fn srgb_color_to_linear(color: Vec3) -> Vec3 {
    Vec3::new(
        srgb_to_linear(color.x),
        srgb_to_linear(color.y),
        srgb_to_linear(color.z),
    )
}

/// Convert a linear channel back to sRGB encoding
pub fn linear_to_srgb(channel: f32) -> f32 {
    if channel <= 0.0031308 {
        channel * 12.92
    } else {
        1.055 * channel.powf(1.0 / 2.4) - 0.055
    }
}

/// Color as written to the render target
///
/// sRGB targets encode on store, so colors are linearised first. Other
/// targets store values as given.
pub fn target_color(color: Vec3, srgb_target: bool) -> Vec3 {
    if srgb_target {
        srgb_color_to_linear(color)
    } else {
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ndc_corners() {
        let viewport = Vec2::new(800.0, 600.0);

        let top_left = screen_to_ndc(Vec2::ZERO, viewport);
        assert_relative_eq!(top_left.x, -1.0);
        assert_relative_eq!(top_left.y, 1.0);

        let bottom_right = screen_to_ndc(viewport, viewport);
        assert_relative_eq!(bottom_right.x, 1.0);
        assert_relative_eq!(bottom_right.y, -1.0);
    }

    #[test]
    fn test_ndc_center() {
        let ndc = screen_to_ndc(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0));
        assert_relative_eq!(ndc.x, 0.0);
        assert_relative_eq!(ndc.y, 0.0);
    }

    #[test]
    fn test_ndc_zero_viewport() {
        assert_eq!(screen_to_ndc(Vec2::new(10.0, 10.0), Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(0xff0000), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hex_to_rgb(0x00ff00), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(hex_to_rgb(0x222222).x, 34.0 / 255.0);
    }

    #[test]
    fn test_srgb_to_linear_endpoints() {
        assert_relative_eq!(srgb_to_linear(0.0), 0.0);
        assert_relative_eq!(srgb_to_linear(1.0), 1.0, epsilon = 1e-6);
        assert!(srgb_to_linear(0.5) < 0.5);
    }

    #[test]
    fn test_linear_to_srgb_inverts() {
        for c in [0.0, 0.002, 0.2, 0.5, 1.0] {
            assert_relative_eq!(linear_to_srgb(srgb_to_linear(c)), c, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_target_color_only_linearises_for_srgb() {
        let grey = Vec3::splat(0.5);
        assert_eq!(target_color(grey, false), grey);
        assert!(target_color(grey, true).x < 0.25);
    }
}
