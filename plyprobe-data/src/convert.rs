//! Conversion of parsed clouds into [`Point`] and [`Gaussian`] records.

use crate::ply::{AttributeArray, ParsedCloud, PlyError};
use crate::types::{Gaussian, Point};
use glam::{Quat, Vec3};
use tracing::{debug, info, warn};

/// Zeroth-order real spherical harmonic, `1 / (2 * sqrt(pi))`.
pub const SH_C0: f32 = 0.28209479177387814;

const DEFAULT_COLOR: Vec3 = Vec3::splat(0.8);

/// How raw splat parameters are turned into renderable values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianDecodeConfig {
    /// Scale used when a cloud stores no `scale_*` fields.
    pub default_scale: f32,
    /// Stored scales are natural logarithms (the usual 3DGS convention).
    pub log_scales: bool,
}

impl Default for GaussianDecodeConfig {
    fn default() -> Self {
        Self {
            default_scale: 0.01,
            log_scales: true,
        }
    }
}

impl GaussianDecodeConfig {
    pub fn with_default_scale(mut self, scale: f32) -> Self {
        self.default_scale = scale;
        self
    }

    pub fn with_log_scales(mut self, log_scales: bool) -> Self {
        self.log_scales = log_scales;
        self
    }
}

/// Map an SH DC coefficient triple to a displayable RGB color.
pub fn sh_dc_to_rgb(dc: Vec3) -> Vec3 {
    (dc * SH_C0 + Vec3::splat(0.5)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Values already in `[0, 1]` are kept; anything else is treated as a logit.
pub fn activate_opacity(raw: f32) -> f32 {
    if (0.0..=1.0).contains(&raw) {
        raw
    } else {
        (1.0 / (1.0 + (-raw).exp())).clamp(0.0, 1.0)
    }
}

impl ParsedCloud {
    /// Displayable RGB per vertex.
    ///
    /// Splat clouds prefer their SH DC terms; otherwise `red, green, blue` are
    /// used, and light gray when the cloud has no color at all.
    pub fn display_colors(&self) -> Vec<Vec3> {
        if self.is_gaussian() {
            if let Some(dc) = self.scalar_triplet(["f_dc_0", "f_dc_1", "f_dc_2"]) {
                return dc.into_iter().map(sh_dc_to_rgb).collect();
            }
            if let Some(AttributeArray::Matrix { .. }) = self.fields().get_opt("f_dc_0") {
                if let Ok(band) = self.get_color().and_then(|c| vec3_rows("f_dc_0", &c)) {
                    return band.into_iter().map(sh_dc_to_rgb).collect();
                }
            }
        }

        match self.rgb_color().and_then(|c| vec3_rows("red", &c)) {
            Ok(colors) => colors,
            Err(e) => {
                warn!("No usable color information ({}), using default color", e);
                vec![DEFAULT_COLOR; self.vertex_count()]
            }
        }
    }

    /// Points with position, display color and normal when available.
    pub fn to_points(&self) -> Result<Vec<Point>, PlyError> {
        let positions = vec3_rows("x", &self.get_position()?)?;
        let colors = self.display_colors();
        let normals = self
            .get_normals()
            .and_then(|n| vec3_rows("nx", &n))
            .ok();

        let points = positions
            .into_iter()
            .zip(colors)
            .enumerate()
            .map(|(i, (position, color))| match &normals {
                Some(normals) => Point::with_normal(position, color, normals[i]),
                None => Point::new(position, color),
            })
            .collect::<Vec<_>>();

        debug!("Built {} points", points.len());
        Ok(points)
    }

    /// Activated splats. Geometric clouds become isotropic splats of
    /// `config.default_scale`.
    pub fn to_gaussians(&self, config: &GaussianDecodeConfig) -> Result<Vec<Gaussian>, PlyError> {
        if !self.is_gaussian() {
            let gaussians = self
                .to_points()?
                .iter()
                .map(|p| Gaussian::from_point(p, config.default_scale))
                .collect::<Vec<_>>();
            info!(
                "Built {} isotropic splats from geometric cloud",
                gaussians.len()
            );
            return Ok(gaussians);
        }

        let positions = vec3_rows("x", &self.get_position()?)?;
        let colors = self.display_colors();
        let scales = self.scalar_triplet(["scale_0", "scale_1", "scale_2"]);
        let opacity = self
            .fields()
            .get_opt("opacity")
            .and_then(AttributeArray::as_scalar);
        let rotations = ["rot_0", "rot_1", "rot_2", "rot_3"].map(|name| {
            self.fields()
                .get_opt(name)
                .and_then(AttributeArray::as_scalar)
        });

        let mut gaussians = Vec::with_capacity(positions.len());
        for (i, (position, color)) in positions.into_iter().zip(colors).enumerate() {
            let scale = match &scales {
                Some(scales) if config.log_scales => scales[i].exp(),
                Some(scales) => scales[i],
                None => Vec3::splat(config.default_scale),
            };

            // Stored as (w, x, y, z).
            let rotation = match rotations {
                [Some(w), Some(x), Some(y), Some(z)] => {
                    let q = Quat::from_xyzw(x[i], y[i], z[i], w[i]);
                    if q.length_squared() > 0.0 {
                        q.normalize()
                    } else {
                        Quat::IDENTITY
                    }
                }
                _ => Quat::IDENTITY,
            };

            gaussians.push(Gaussian {
                position,
                rotation: rotation.to_array(),
                scale,
                color,
                opacity: opacity.map_or(1.0, |o| activate_opacity(o[i])),
            });
        }

        info!("Built {} Gaussians", gaussians.len());
        Ok(gaussians)
    }

    fn scalar_triplet(&self, names: [&str; 3]) -> Option<Vec<Vec3>> {
        let [a, b, c] = names.map(|name| {
            self.fields()
                .get_opt(name)
                .and_then(AttributeArray::as_scalar)
        });
        let (a, b, c) = (a?, b?, c?);
        Some(
            a.iter()
                .zip(b)
                .zip(c)
                .map(|((&a, &b), &c)| Vec3::new(a, b, c))
                .collect(),
        )
    }
}

fn vec3_rows(name: &str, array: &AttributeArray) -> Result<Vec<Vec3>, PlyError> {
    if array.width() != 3 {
        return Err(PlyError::ShapeMismatch {
            name: name.to_string(),
            expected: "(N, 3)".to_string(),
            found: format!("{:?}", array.shape()),
        });
    }
    Ok(array.rows().map(Vec3::from_slice).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::parse_reader;
    use std::io::Cursor;

    fn parse_str(data: &str) -> ParsedCloud {
        parse_reader(Cursor::new(data.as_bytes().to_vec()), "test").unwrap()
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_sh_dc_to_rgb() {
        assert!(approx(sh_dc_to_rgb(Vec3::ZERO), Vec3::splat(0.5)));
        assert!(approx(sh_dc_to_rgb(Vec3::splat(100.0)), Vec3::ONE));
        assert!(approx(sh_dc_to_rgb(Vec3::splat(-100.0)), Vec3::ZERO));
    }

    #[test]
    fn test_activate_opacity() {
        assert_eq!(activate_opacity(0.3), 0.3);
        assert!((activate_opacity(2.0) - 0.880797).abs() < 1e-5);
        assert!((activate_opacity(-2.0) - 0.119203).abs() < 1e-5);
    }

    #[test]
    fn test_points_from_geometric_cloud() {
        let cloud = parse_str(
            "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
property float nx
property float ny
property float nz
property uchar red
property uchar green
property uchar blue
end_header
1 2 3 0 0 1 255 0 0
4 5 6 0 1 0 0 0 255
",
        );
        let points = cloud.to_points().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(points[0].color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(points[1].normal, Some(Vec3::Y));
    }

    #[test]
    fn test_points_without_color_use_default() {
        let cloud = parse_str(
            "ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
end_header
0 0 0
",
        );
        let points = cloud.to_points().unwrap();
        assert_eq!(points[0].color, DEFAULT_COLOR);
        assert!(points[0].normal.is_none());
    }

    #[test]
    fn test_gaussians_activate_parameters() {
        let cloud = parse_str(
            "ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
property float f_dc_0
property float f_dc_1
property float f_dc_2
property float opacity
property float scale_0
property float scale_1
property float scale_2
property float rot_0
property float rot_1
property float rot_2
property float rot_3
end_header
1 2 3 0 0 0 0 0 0 0 2 0 0 0
",
        );
        let gaussians = cloud.to_gaussians(&GaussianDecodeConfig::default()).unwrap();
        assert_eq!(gaussians.len(), 1);

        let g = gaussians[0];
        assert_eq!(g.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(approx(g.color, Vec3::splat(0.5)));
        assert_eq!(g.opacity, 0.0);
        assert!(approx(g.scale, Vec3::ONE));
        assert_eq!(g.rotation, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_gaussians_linear_scales_and_missing_rotation() {
        let cloud = parse_str(
            "ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
property float scale_0
property float scale_1
property float scale_2
end_header
0 0 0 0.1 0.2 0.3
",
        );
        let config = GaussianDecodeConfig::default().with_log_scales(false);
        let g = cloud.to_gaussians(&config).unwrap()[0];
        assert!(approx(g.scale, Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(g.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(g.opacity, 1.0);
        assert_eq!(g.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_geometric_cloud_becomes_isotropic_splats() {
        let cloud = parse_str(
            "ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
end_header
0 0 0
",
        );
        let config = GaussianDecodeConfig::default().with_default_scale(0.05);
        let g = cloud.to_gaussians(&config).unwrap()[0];
        assert_eq!(g.scale, Vec3::splat(0.05));
        assert_eq!(g.opacity, 1.0);
    }

    #[test]
    fn test_missing_position_fails() {
        let cloud = parse_str(
            "ply
format ascii 1.0
element vertex 1
property float x
property float opacity
end_header
0 0.5
",
        );
        let err = cloud.to_points().unwrap_err();
        assert_eq!(err.missing_attribute(), Some("y"));
    }
}
