use bytemuck::NoUninit;
use glam::Vec3;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Outward normal, tangent and bitangent per cuboid face (t x b = n,
/// so corners wind CCW seen from outside).
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

impl Mesh {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Append a solid axis-aligned cuboid centered at `center`.
    pub fn push_box(&mut self, center: Vec3, size: Vec3, color: [f32; 4]) {
        let half = size * 0.5;
        for (n, t, b) in FACES {
            let n = Vec3::from(n);
            let t = Vec3::from(t);
            let b = Vec3::from(b);
            // half extent along each face axis
            let hn = (half * n).length();
            let ht = (half * t).length();
            let hb = (half * b).length();
            let base = self.vertices.len() as u32;

            let corners = [
                center + n * hn - t * ht - b * hb,
                center + n * hn + t * ht - b * hb,
                center + n * hn + t * ht + b * hb,
                center + n * hn - t * ht + b * hb,
            ];
            let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

            for (corner, uv) in corners.iter().zip(uvs) {
                self.vertices.push(Vertex {
                    pos: (*corner).into(),
                    normal: n.into(),
                    color,
                    uv,
                });
            }
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    /// Append a cuboid rotated by `yaw` around the Y axis through `pivot`.
    pub fn push_box_rotated(
        &mut self,
        center: Vec3,
        size: Vec3,
        color: [f32; 4],
        yaw: f32,
        pivot: Vec3,
    ) {
        let start = self.vertices.len();
        self.push_box(center, size, color);
        let (sin, cos) = yaw.sin_cos();
        for v in &mut self.vertices[start..] {
            let p = Vec3::from(v.pos) - pivot;
            v.pos = [
                pivot.x + p.x * cos + p.z * sin,
                pivot.y + p.y,
                pivot.z - p.x * sin + p.z * cos,
            ];
            let n = Vec3::from(v.normal);
            v.normal = [n.x * cos + n.z * sin, n.y, -n.x * sin + n.z * cos];
        }
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_six_faces() {
        let mut mesh = Mesh::empty();
        mesh.push_box(Vec3::ZERO, Vec3::ONE, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn box_corners_stay_within_half_extents() {
        let mut mesh = Mesh::empty();
        mesh.push_box(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0), [1.0; 4]);
        for v in &mesh.vertices {
            assert!((v.pos[0] - 1.0).abs() <= 1.0 + 1e-5);
            assert!((v.pos[1] - 2.0).abs() <= 2.0 + 1e-5);
            assert!((v.pos[2] - 3.0).abs() <= 3.0 + 1e-5);
        }
    }

    #[test]
    fn rotated_box_keeps_height() {
        let mut mesh = Mesh::empty();
        mesh.push_box_rotated(
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::ONE,
            [1.0; 4],
            std::f32::consts::FRAC_PI_2,
            Vec3::ZERO,
        );
        for v in &mesh.vertices {
            assert!(v.pos[1] >= 0.5 - 1e-5 && v.pos[1] <= 1.5 + 1e-5);
        }
        // a quarter turn around Y through the origin carries +Z offsets onto +X
        let max_x = mesh.vertices.iter().map(|v| v.pos[0]).fold(f32::MIN, f32::max);
        assert!(max_x > 2.0);
    }
}
