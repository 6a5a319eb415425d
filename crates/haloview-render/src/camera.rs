//! Perspective camera with reverse-Z projection.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A perspective camera that generates view and projection matrices.
///
/// Uses reverse-Z (near plane maps to depth 1, far plane to 0) for stable
/// depth precision across the megaparsec-scale distances of a catalog box.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space (Mpc).
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height of the render surface.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

/// Per-frame uniform consumed by the halo and line shaders: the combined
/// view-projection matrix, the camera's billboard basis, and the halo tint.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Camera right vector (xyz), w unused.
    pub cam_right: [f32; 4],
    /// Camera up vector (xyz), w unused.
    pub cam_up: [f32; 4],
    /// Halo tint in linear RGB (xyz), w unused.
    pub point_color: [f32; 4],
}

impl Camera {
    /// Compute the view matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation);
        let translation_matrix = Mat4::from_translation(self.position);
        (translation_matrix * rotation_matrix).inverse()
    }

    /// Compute the projection matrix with reverse-Z.
    ///
    /// Swapping near/far in `perspective_rh` maps the near plane to z=1 and
    /// the far plane to z=0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Update the aspect ratio after a surface resize.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// Convert the camera to the per-frame scene uniform.
    pub fn to_scene_uniform(&self, point_color: [f32; 3]) -> SceneUniform {
        let right = self.right();
        let up = self.up();
        SceneUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            cam_right: [right.x, right.y, right.z, 0.0],
            cam_up: [up.x, up.y, up.z, 0.0],
            point_color: [point_color[0], point_color[1], point_color[2], 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 16.0 / 9.0,
            near: 0.01,
            far: 10_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    /// Project a world-space point and return its NDC coordinates.
    fn project(camera: &Camera, point: Vec3) -> Vec3 {
        let clip = camera.view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
    }

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!(forward.x.abs() < 1e-6);
        assert!(forward.y.abs() < 1e-6);
        assert!((forward.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_basis_vectors_orthonormal() {
        let camera = Camera {
            rotation: Quat::from_euler(glam::EulerRot::YXZ, 1.1, 0.4, 0.2),
            ..Camera::default()
        };
        let f = camera.forward();
        let u = camera.up();
        let r = camera.right();

        assert!((f.length() - 1.0).abs() < 1e-6);
        assert!((u.length() - 1.0).abs() < 1e-6);
        assert!((r.length() - 1.0).abs() < 1e-6);
        assert!(f.dot(u).abs() < 1e-6);
        assert!(f.dot(r).abs() < 1e-6);
        assert!(u.dot(r).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let inv_view = camera.view_matrix().inverse();
        let reconstructed_pos = inv_view.col(3).truncate();
        assert!((reconstructed_pos - camera.position).length() < 1e-4);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio_ignores_zero_height() {
        let mut camera = Camera::default();
        let before = camera.aspect_ratio;
        camera.set_aspect_ratio(1920.0, 0.0);
        assert_eq!(camera.aspect_ratio, before);
    }

    #[test]
    fn test_reverse_z_near_maps_to_one() {
        let camera = Camera::default();
        // A point just inside the near plane should land near depth 1.
        let ndc = project(&camera, Vec3::new(0.0, 0.0, -camera.near * 1.0001));
        assert!(
            ndc.z > 0.99,
            "near-plane depth should approach 1 under reverse-Z, got {}",
            ndc.z
        );
    }

    #[test]
    fn test_scene_uniform_is_gpu_aligned() {
        let size = std::mem::size_of::<SceneUniform>();
        assert_eq!(size, 112);
        assert_eq!(size % 16, 0, "SceneUniform must be 16-byte aligned");
    }

    #[test]
    fn test_scene_uniform_carries_camera_basis_and_color() {
        let camera = Camera::default();
        let uniform = camera.to_scene_uniform([0.2, 0.4, 0.8]);
        assert_eq!(uniform.cam_right[0], 1.0);
        assert_eq!(uniform.cam_up[1], 1.0);
        assert_eq!(uniform.point_color, [0.2, 0.4, 0.8, 0.0]);
    }

    /// Doubling camera distance must approximately halve the projected pixel
    /// footprint of a fixed world radius (perspective scaling law).
    #[test]
    fn test_projected_footprint_halves_with_doubled_distance() {
        let viewport_height = 1080.0_f32;
        let radius = 0.5_f32;

        let footprint_px = |distance: f32| {
            let camera = Camera {
                position: Vec3::new(0.0, 0.0, distance),
                ..Camera::default()
            };
            // Project the halo center and a point offset by the radius along
            // the camera's up axis; the NDC delta times half the viewport
            // height is the on-screen radius in pixels.
            let center = project(&camera, Vec3::ZERO);
            let edge = project(&camera, Vec3::new(0.0, radius, 0.0));
            (edge.y - center.y).abs() * viewport_height * 0.5
        };

        let near_px = footprint_px(10.0);
        let far_px = footprint_px(20.0);
        let ratio = near_px / far_px;
        assert!(
            (ratio - 2.0).abs() < 0.02,
            "expected footprint ratio ~2.0 for doubled distance, got {ratio}"
        );
    }
}
