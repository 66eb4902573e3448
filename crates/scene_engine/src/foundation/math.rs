//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of matrix builders the
//! camera and the frame scheduler need.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Scalar helpers used by the camera and entity transforms
pub mod utils {
    /// Degrees to radians
    #[must_use]
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Clamp into `[min, max]`; `min` wins if the bounds are inverted
    #[must_use]
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.min(max).max(min)
    }

    /// Linear interpolation from `a` towards `b`
    #[must_use]
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        (b - a).mul_add(t, a)
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a perspective projection matrix (right-handed, depth in [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix mapping the given box to NDC
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Flatten into a contiguous column-major buffer of 16 floats
    fn to_column_buffer(&self) -> [f32; 16];
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;
        result
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new(
            2.0 / (right - left), 0.0, 0.0, -(right + left) / (right - left),
            0.0, 2.0 / (top - bottom), 0.0, -(top + bottom) / (top - bottom),
            0.0, 0.0, -2.0 / (far - near), -(far + near) / (far - near),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        // Right-handed, camera looks down -Z in view space
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn to_column_buffer(&self) -> [f32; 16] {
        let mut buffer = [0.0; 16];
        buffer.copy_from_slice(self.as_slice());
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(3.0, -2.0, 5.0);
        let view = Mat4::look_at(eye, eye + Vec3::new(0.0, 0.0, -1.0), Vec3::y());
        let p = view.transform_point(&nalgebra::Point3::from(eye));
        assert_relative_eq!(p.coords, Vec3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_forward_is_identity() {
        let view = Mat4::look_at(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), Vec3::y());
        assert_relative_eq!(view, Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_maps_corners() {
        let proj = Mat4::orthographic(0.0, 800.0, 0.0, 600.0, -1.0, 1.0);
        let low = proj.transform_point(&nalgebra::Point3::new(0.0, 0.0, 0.0));
        let high = proj.transform_point(&nalgebra::Point3::new(800.0, 600.0, 0.0));
        assert_relative_eq!(low.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(low.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(high.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(high.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_column_buffer_is_column_major() {
        let m = Mat4::new_translation(&Vec3::new(7.0, 8.0, 9.0));
        let buffer = m.to_column_buffer();
        assert_eq!(&buffer[12..15], &[7.0, 8.0, 9.0]);
        assert_eq!(buffer[15], 1.0);
    }

    #[test]
    fn test_lerp_and_clamp() {
        assert_relative_eq!(utils::lerp(2.0, 4.0, 0.5), 3.0);
        assert_relative_eq!(utils::clamp(120.0, -89.0, 89.0), 89.0);
        assert_relative_eq!(utils::deg_to_rad(180.0), std::f32::consts::PI);
        assert_relative_eq!(utils::clamp(-120.0, -89.0, 89.0), -89.0);
    }
}
