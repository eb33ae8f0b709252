// Scene lights

use glam::Vec3;

/// Uniform light reaching every surface equally
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// sRGB color
    pub color: Vec3,
    pub intensity: f32,
}

/// Parallel light shining from `position` towards `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// sRGB color
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    /// Unit vector the light travels along
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_points_at_target() {
        let light = DirectionalLight {
            color: Vec3::ONE,
            intensity: 1.0,
            position: Vec3::new(0.0, 10.0, 0.0),
            target: Vec3::ZERO,
        };
        assert_eq!(light.direction(), Vec3::NEG_Y);
    }

    #[test]
    fn test_degenerate_direction_falls_back_to_down() {
        let light = DirectionalLight {
            color: Vec3::ONE,
            intensity: 1.0,
            position: Vec3::ONE,
            target: Vec3::ONE,
        };
        assert_eq!(light.direction(), Vec3::NEG_Y);
    }
}
