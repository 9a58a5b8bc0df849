//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in canvas coordinates
//! (origin top-left, y down).

use glam::Vec2;

use super::vertex::Vertex;

/// Full texture coordinates
pub const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Textured quad centred on `center`
pub fn sprite_quad(center: Vec2, size: Vec2, uv: [f32; 4], color: [f32; 4]) -> [Vertex; 6] {
    let half = size * 0.5;
    let min = center - half;
    let max = center + half;
    let [u0, v0, u1, v1] = uv;

    let tl = Vertex::new(min.x, min.y, u0, v0, color);
    let tr = Vertex::new(max.x, min.y, u1, v0, color);
    let bl = Vertex::new(min.x, max.y, u0, v1, color);
    let br = Vertex::new(max.x, max.y, u1, v1, color);

    [tl, bl, tr, tr, bl, br]
}

/// Hollow rectangle drawn as four thin quads
pub fn rect_outline(center: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size * 0.5;
    let t = thickness;
    let edges = [
        // top, bottom
        (center - Vec2::new(0.0, half.y - t / 2.0), Vec2::new(size.x, t)),
        (center + Vec2::new(0.0, half.y - t / 2.0), Vec2::new(size.x, t)),
        // left, right
        (center - Vec2::new(half.x - t / 2.0, 0.0), Vec2::new(t, size.y)),
        (center + Vec2::new(half.x - t / 2.0, 0.0), Vec2::new(t, size.y)),
    ];

    let mut vertices = Vec::with_capacity(24);
    for (c, s) in edges {
        vertices.extend_from_slice(&sprite_quad(c, s, FULL_UV, color));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_quad_corners() {
        let quad = sprite_quad(
            Vec2::new(100.0, 450.0),
            Vec2::new(32.0, 48.0),
            [0.1, 0.0, 0.2, 1.0],
            [1.0; 4],
        );
        let xs: Vec<f32> = quad.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = quad.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 84.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 116.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 426.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 474.0);

        // Top-left vertex carries the top-left UV
        assert_eq!(quad[0].position, [84.0, 426.0]);
        assert_eq!(quad[0].uv, [0.1, 0.0]);
        assert_eq!(quad[5].uv, [0.2, 1.0]);
    }

    #[test]
    fn test_outline_stays_inside_rect() {
        let verts = rect_outline(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0), 1.0, [1.0; 4]);
        assert_eq!(verts.len(), 24);
        for v in &verts {
            assert!((40.0..=60.0).contains(&v.position[0]));
            assert!((45.0..=55.0).contains(&v.position[1]));
        }
    }
}
