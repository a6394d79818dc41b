//! Orthographic camera for 2D scenes

use glam::{Mat4, Vec2, Vec3};

/// 2D orthographic camera
///
/// `zoom` is the half-height of the visible region in world units. With
/// `y_down` set, world y grows toward the bottom of the window, matching
/// pixel-style scene coordinates.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec3,
    pub zoom: f32,
    pub aspect_ratio: f32,
    pub y_down: bool,
}

impl Camera2D {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            zoom: 1.0,
            aspect_ratio,
            y_down: false,
        }
    }

    /// Camera looking at `center` of a scene laid out in screen coordinates
    pub fn screen_space(center: Vec2, half_height: f32, aspect_ratio: f32) -> Self {
        Self {
            position: center.extend(0.0),
            zoom: half_height,
            aspect_ratio,
            y_down: true,
        }
    }

    /// Screen-space camera that keeps a whole `half_extents` box around
    /// `center` in view, padded by `margin`, whatever the aspect ratio
    pub fn framing(center: Vec2, half_extents: Vec2, margin: f32, aspect_ratio: f32) -> Self {
        let aspect_ratio = aspect_ratio.max(f32::EPSILON);
        let half_height = (half_extents.y * margin).max(half_extents.x * margin / aspect_ratio);
        Self::screen_space(center, half_height, aspect_ratio)
    }

    /// Get the view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        let half_width = self.zoom * self.aspect_ratio;
        let half_height = self.zoom;

        let (bottom, top) = if self.y_down {
            (half_height, -half_height)
        } else {
            (-half_height, half_height)
        };

        let projection = Mat4::orthographic_rh(-half_width, half_width, bottom, top, -1.0, 1.0);
        let view = Mat4::from_translation(-self.position);

        projection * view
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_space_camera_maps_center_to_origin() {
        let camera = Camera2D::screen_space(Vec2::new(600.0, 400.0), 300.0, 1.5);
        let clip = camera.view_projection() * glam::Vec4::new(600.0, 400.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
    }

    #[test]
    fn screen_space_camera_puts_larger_y_lower_on_screen() {
        let camera = Camera2D::screen_space(Vec2::new(0.0, 0.0), 100.0, 1.0);
        let below = camera.view_projection() * glam::Vec4::new(0.0, 50.0, 0.0, 1.0);
        assert!(below.y < 0.0);

        let mut upright = camera.clone();
        upright.y_down = false;
        let above = upright.view_projection() * glam::Vec4::new(0.0, 50.0, 0.0, 1.0);
        assert!(above.y > 0.0);
    }

    #[test]
    fn framing_keeps_whole_box_in_view() {
        let center = Vec2::new(600.0, 400.0);
        let half = Vec2::new(500.0, 200.0);
        for aspect in [1.5, 0.6, 1.0, 3.0, 0.25] {
            let camera = Camera2D::framing(center, half, 1.1, aspect);
            let vp = camera.view_projection();
            for (x, y) in [(100.0, 200.0), (1100.0, 200.0), (100.0, 600.0), (1100.0, 600.0)] {
                let clip = vp * glam::Vec4::new(x, y, 0.0, 1.0);
                assert!(clip.x.abs() < 1.0, "x={x} clip={} aspect={aspect}", clip.x);
                assert!(clip.y.abs() < 1.0, "y={y} clip={} aspect={aspect}", clip.y);
            }
        }
    }

    #[test]
    fn framing_fits_the_tighter_axis() {
        // Wide box in a narrow view: width decides
        let camera = Camera2D::framing(Vec2::ZERO, Vec2::new(500.0, 200.0), 1.0, 1.0);
        let edge = camera.view_projection() * glam::Vec4::new(500.0, 0.0, 0.0, 1.0);
        assert!((edge.x - 1.0).abs() < 1e-5);

        // Same box in a very wide view: height decides
        let camera = Camera2D::framing(Vec2::ZERO, Vec2::new(500.0, 200.0), 1.0, 4.0);
        let edge = camera.view_projection() * glam::Vec4::new(0.0, 200.0, 0.0, 1.0);
        assert!((edge.y + 1.0).abs() < 1e-5);
    }
}
