// Ground grid on the XZ plane

use glam::Vec3;

/// A single colored grid line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Vec3,
    pub end: Vec3,
    /// sRGB color
    pub color: Vec3,
}

/// Square grid of lines centered on the origin at y = 0
///
/// With an even number of divisions the two lines through the origin use
/// `center_color`; every other line uses `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Vec3,
    pub color: Vec3,
}

impl GridHelper {
    /// Build the line segments: one along X and one along Z per division step
    pub fn lines(&self) -> Vec<GridLine> {
        let divisions = self.divisions.max(1);
        let step = self.size / divisions as f32;
        let half = self.size / 2.0;
        let center = (divisions % 2 == 0).then_some(divisions / 2);

        let mut lines = Vec::with_capacity(2 * (divisions as usize + 1));
        for i in 0..=divisions {
            let k = -half + i as f32 * step;
            let color = if Some(i) == center {
                self.center_color
            } else {
                self.color
            };

            lines.push(GridLine {
                start: Vec3::new(-half, 0.0, k),
                end: Vec3::new(half, 0.0, k),
                color,
            });
            lines.push(GridLine {
                start: Vec3::new(k, 0.0, -half),
                end: Vec3::new(k, 0.0, half),
                color,
            });
        }
        lines
    }
}
