// Position / rotation / scale of scene objects

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Transform applied as scale, then XYZ euler rotation, then translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    /// Spin around the vertical axis, keeping the angle in `[0, 2π)`
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation.y = (self.rotation.y + angle).rem_euclid(std::f32::consts::TAU);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_translation_only() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rotate_y_turns_x_into_negative_z() {
        let mut t = Transform::default();
        t.rotate_y(FRAC_PI_2);
        let p = t.matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut t = Transform::default();
        t.rotate_y(TAU + 0.5);
        assert_relative_eq!(t.rotation.y, 0.5, epsilon = 1e-5);
    }
}
