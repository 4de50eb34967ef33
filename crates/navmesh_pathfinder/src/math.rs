use glam::{UVec3, Vec3A};

/// Tolerance used by the xz-plane containment tests.
pub(crate) const XZ_EPSILON: f32 = 1e-5;

pub(crate) trait TriangleIndices {
    fn vertices(&self, vertices: &[Vec3A]) -> Option<[Vec3A; 3]>;
}

impl TriangleIndices for UVec3 {
    #[inline]
    fn vertices(&self, vertices: &[Vec3A]) -> Option<[Vec3A; 3]> {
        Some([
            *vertices.get(self[0] as usize)?,
            *vertices.get(self[1] as usize)?,
            *vertices.get(self[2] as usize)?,
        ])
    }
}

pub(crate) trait TriangleVertices {
    fn centroid(&self) -> Vec3A;
    fn area_xz2(&self) -> f32;
    fn height_at_xz(&self, point: Vec3A) -> Option<f32>;
    fn closest_point(&self, point: Vec3A) -> Vec3A;
}

impl TriangleVertices for [Vec3A; 3] {
    #[inline]
    fn centroid(&self) -> Vec3A {
        (self[0] + self[1] + self[2]) / 3.0
    }

    /// Twice the signed area of the triangle projected onto the xz-plane.
    #[inline]
    fn area_xz2(&self) -> f32 {
        triarea2(self[0], self[1], self[2])
    }

    /// Height of the triangle surface at the xz-position of `point`,
    /// or `None` if the point lies outside of the triangle on the xz-plane.
    fn height_at_xz(&self, point: Vec3A) -> Option<f32> {
        let [a, b, c] = *self;
        let v0 = c - a;
        let v1 = b - a;
        let v2 = point - a;

        let denom = v0.x * v1.z - v0.z * v1.x;
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let u = (v1.z * v2.x - v1.x * v2.z) / denom;
        let v = (v0.x * v2.z - v0.z * v2.x) / denom;

        if u >= -XZ_EPSILON && v >= -XZ_EPSILON && u + v <= 1.0 + XZ_EPSILON {
            Some(a.y + v0.y * u + v1.y * v)
        } else {
            None
        }
    }

    /// Closest point on the triangle to `point` in 3D.
    /// See Ericson, Real-Time Collision Detection, 5.1.5.
    fn closest_point(&self, point: Vec3A) -> Vec3A {
        let [a, b, c] = *self;
        let ab = b - a;
        let ac = c - a;

        let ap = point - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = point - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = point - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }
}

/// Twice the signed area of the triangle `abc` on the xz-plane.
/// The sign is flipped relative to [`cross_xz`], matching the funnel algorithm's convention.
#[inline]
pub(crate) fn triarea2(a: Vec3A, b: Vec3A, c: Vec3A) -> f32 {
    let ab = b - a;
    let ac = c - a;
    ac.x * ab.z - ab.x * ac.z
}

/// 2D cross product of `a` and `b` on the xz-plane.
#[inline]
pub(crate) fn cross_xz(a: Vec3A, b: Vec3A) -> f32 {
    a.x * b.z - a.z * b.x
}

pub(crate) fn closest_point_on_segment(point: Vec3A, a: Vec3A, b: Vec3A) -> Vec3A {
    let ab = b - a;
    let denom = ab.length_squared();
    if denom <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / denom).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn triangle() -> [Vec3A; 3] {
        [
            Vec3A::new(0.0, 0.0, 0.0),
            Vec3A::new(0.0, 0.0, 4.0),
            Vec3A::new(4.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn height_inside_flat_triangle() {
        let height = triangle().height_at_xz(Vec3A::new(1.0, 7.0, 1.0));
        assert_eq!(height, Some(0.0));
    }

    #[test]
    fn height_outside_triangle() {
        let height = triangle().height_at_xz(Vec3A::new(3.0, 0.0, 3.0));
        assert_eq!(height, None);
    }

    #[test]
    fn height_on_vertex() {
        let height = triangle().height_at_xz(Vec3A::new(4.0, 0.0, 0.0));
        assert!(height.is_some());
    }

    #[test]
    fn height_on_slope() {
        let triangle = [
            Vec3A::new(0.0, 0.0, 0.0),
            Vec3A::new(0.0, 2.0, 4.0),
            Vec3A::new(4.0, 0.0, 0.0),
        ];
        let height = triangle.height_at_xz(Vec3A::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(height, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn closest_point_above_interior_projects_down() {
        let point = triangle().closest_point(Vec3A::new(1.0, 50.0, 1.0));
        assert_relative_eq!(point.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(point.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(point.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn closest_point_outside_clamps_to_vertex() {
        let point = triangle().closest_point(Vec3A::new(-3.0, 0.0, -3.0));
        assert_eq!(point, Vec3A::ZERO);
    }

    #[test]
    fn closest_point_outside_clamps_to_edge() {
        let point = triangle().closest_point(Vec3A::new(2.0, 0.0, -5.0));
        assert_relative_eq!(point.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(point.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn segment_clamps_to_endpoints() {
        let a = Vec3A::ZERO;
        let b = Vec3A::X;
        assert_eq!(closest_point_on_segment(Vec3A::new(-1.0, 0.0, 0.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec3A::new(3.0, 1.0, 0.0), a, b), b);
        assert_eq!(
            closest_point_on_segment(Vec3A::new(0.5, 1.0, 0.0), a, b),
            Vec3A::new(0.5, 0.0, 0.0)
        );
    }

    #[test]
    fn triarea_sign_follows_winding() {
        let a = Vec3A::ZERO;
        let b = Vec3A::X;
        assert!(triarea2(a, b, Vec3A::Z) < 0.0);
        assert!(triarea2(a, b, Vec3A::NEG_Z) > 0.0);
        assert_eq!(triarea2(a, b, Vec3A::new(2.0, 0.0, 0.0)), 0.0);
    }
}
