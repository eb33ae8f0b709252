// Perspective camera and screen-to-world ray construction

use crate::core::math::screen_to_ndc;
use crate::engine::picking::Ray;
use glam::{Mat4, Vec2, Vec3};

/// Perspective camera looking from `position` at `target`
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in pixels
    viewport: Vec2,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target,
            fov_y,
            near,
            far,
            viewport: Vec2::ONE,
        }
    }

    /// Track the window size; zero dimensions are ignored
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection with a `[0, 1]` depth range, as wgpu expects
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect(), self.near, self.far)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point given in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_proj_matrix().inverse();
        let through = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, through - self.position)
    }

    /// Ray from the camera through a pixel position
    pub fn ray_from_screen(&self, screen: Vec2) -> Ray {
        self.ray_from_ndc(screen_to_ndc(screen, self.viewport))
    }
}
