//! CPU-side point and splat records built from a parsed cloud.

use glam::Vec3;

/// A colored point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Position in world space.
    pub position: Vec3,
    /// RGB color (0-1 range).
    pub color: Vec3,
    /// Unit normal, when the file stores `nx, ny, nz`.
    pub normal: Option<Vec3>,
}

impl Point {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            color,
            normal: None,
        }
    }

    pub fn with_normal(position: Vec3, color: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            color,
            normal: Some(normal),
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::splat(0.8))
    }
}

/// A 3D Gaussian splat with activated parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    /// Center position in world space.
    pub position: Vec3,
    /// Rotation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    /// Per-axis scale (x, y, z).
    pub scale: Vec3,
    /// RGB color (0-1 range).
    pub color: Vec3,
    /// Opacity (0-1).
    pub opacity: f32,
}

impl Gaussian {
    /// Isotropic, fully opaque splat around a point.
    pub fn from_point(point: &Point, scale: f32) -> Self {
        Self {
            position: point.position,
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: Vec3::splat(scale),
            color: point.color,
            opacity: 1.0,
        }
    }
}

impl Default for Gaussian {
    fn default() -> Self {
        Self::from_point(&Point::default(), 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = Point::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.color, Vec3::new(1.0, 0.0, 0.0));
        assert!(p.normal.is_none());
    }

    #[test]
    fn test_gaussian_from_point() {
        let p = Point::with_normal(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(0.5), Vec3::Z);
        let g = Gaussian::from_point(&p, 0.1);
        assert_eq!(g.position, p.position);
        assert_eq!(g.color, p.color);
        assert_eq!(g.scale, Vec3::splat(0.1));
        assert_eq!(g.rotation, [0.0, 0.0, 0.0, 1.0]);
    }
}
