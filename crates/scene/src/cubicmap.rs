use glam::{Vec2, Vec3};
use walkabout_assets::MapImage;

/// A mesh vertex produced by cubicmap generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// CPU-side triangle mesh: positions/normals/uvs plus u32 indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        let uvs = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        for (position, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(MeshVertex {
                position,
                normal,
                uv,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// Build a cubicmap mesh from a map image.
///
/// Each image pixel is one cell of `cube_size`. Solid (bright) cells emit a
/// top, a bottom, and side faces only where the neighboring cell is open;
/// open cells emit floor and ceiling quads. The mesh is centered on the map
/// so the world origin sits in the middle.
pub fn build_cubicmap(map: &MapImage, cube_size: Vec3) -> MeshData {
    let mut mesh = MeshData::default();
    let (width, depth) = (map.width(), map.height());
    let origin = Vec3::new(
        -(width as f32) * cube_size.x / 2.0,
        0.0,
        -(depth as f32) * cube_size.z / 2.0,
    );

    let solid = |x: i64, z: i64| -> bool {
        if x < 0 || z < 0 || x >= i64::from(width) || z >= i64::from(depth) {
            return false;
        }
        map.is_solid(x as u32, z as u32)
    };

    for z in 0..i64::from(depth) {
        for x in 0..i64::from(width) {
            let x0 = origin.x + x as f32 * cube_size.x;
            let x1 = x0 + cube_size.x;
            let z0 = origin.z + z as f32 * cube_size.z;
            let z1 = z0 + cube_size.z;
            let y0 = 0.0;
            let y1 = cube_size.y;

            if solid(x, z) {
                mesh.push_quad(
                    [
                        Vec3::new(x0, y1, z1),
                        Vec3::new(x1, y1, z1),
                        Vec3::new(x1, y1, z0),
                        Vec3::new(x0, y1, z0),
                    ],
                    Vec3::Y,
                );
                mesh.push_quad(
                    [
                        Vec3::new(x0, y0, z0),
                        Vec3::new(x1, y0, z0),
                        Vec3::new(x1, y0, z1),
                        Vec3::new(x0, y0, z1),
                    ],
                    Vec3::NEG_Y,
                );
                if !solid(x, z + 1) {
                    mesh.push_quad(
                        [
                            Vec3::new(x0, y0, z1),
                            Vec3::new(x1, y0, z1),
                            Vec3::new(x1, y1, z1),
                            Vec3::new(x0, y1, z1),
                        ],
                        Vec3::Z,
                    );
                }
                if !solid(x, z - 1) {
                    mesh.push_quad(
                        [
                            Vec3::new(x1, y0, z0),
                            Vec3::new(x0, y0, z0),
                            Vec3::new(x0, y1, z0),
                            Vec3::new(x1, y1, z0),
                        ],
                        Vec3::NEG_Z,
                    );
                }
                if !solid(x + 1, z) {
                    mesh.push_quad(
                        [
                            Vec3::new(x1, y0, z1),
                            Vec3::new(x1, y0, z0),
                            Vec3::new(x1, y1, z0),
                            Vec3::new(x1, y1, z1),
                        ],
                        Vec3::X,
                    );
                }
                if !solid(x - 1, z) {
                    mesh.push_quad(
                        [
                            Vec3::new(x0, y0, z0),
                            Vec3::new(x0, y0, z1),
                            Vec3::new(x0, y1, z1),
                            Vec3::new(x0, y1, z0),
                        ],
                        Vec3::NEG_X,
                    );
                }
            } else {
                // Open cell: walkable floor plus a ceiling closing the map.
                mesh.push_quad(
                    [
                        Vec3::new(x0, y0, z1),
                        Vec3::new(x1, y0, z1),
                        Vec3::new(x1, y0, z0),
                        Vec3::new(x0, y0, z0),
                    ],
                    Vec3::Y,
                );
                mesh.push_quad(
                    [
                        Vec3::new(x0, y1, z0),
                        Vec3::new(x1, y1, z0),
                        Vec3::new(x1, y1, z1),
                        Vec3::new(x0, y1, z1),
                    ],
                    Vec3::NEG_Y,
                );
            }
        }
    }

    tracing::debug!(
        cells = (width * depth),
        solid = map.solid_count(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "built cubicmap mesh"
    );
    mesh
}
