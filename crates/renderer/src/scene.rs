use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Vec3};

/// Plane extent in world units.
pub(crate) const PLANE_WIDTH: f32 = 10.0;
pub(crate) const PLANE_HEIGHT: f32 = 30.0;
/// Grid subdivisions along each plane axis.
pub(crate) const PLANE_SEGMENTS: u32 = 64;

const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);
const CAMERA_FOV_Y_DEGREES: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;

const PLANE_TRANSLATION: Vec3 = Vec3::new(-3.0, 0.0, 0.0);
const PLANE_ROTATION_DEGREES: [f32; 3] = [-50.0, -20.0, -75.0];

/// Perspective camera looking at the scene origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: CAMERA_POSITION,
            fov_y: CAMERA_FOV_Y_DEGREES.to_radians(),
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Combined projection and view transform.
    pub fn clip_from_world(&self) -> Mat4 {
        let projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
        let view = Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y);
        projection * view
    }
}

/// World transform of the wave plane.
pub(crate) fn plane_world_transform() -> Mat4 {
    let [x, y, z] = PLANE_ROTATION_DEGREES;
    Mat4::from_translation(PLANE_TRANSLATION)
        * Mat4::from_euler(
            EulerRot::XYZ,
            x.to_radians(),
            y.to_radians(),
            z.to_radians(),
        )
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Generates the subdivided plane the vertex stage displaces.
///
/// The grid lies in the XY plane, centred on the origin, with UVs spanning
/// `[0, 1]` so the fragment stage can place its lights in surface space.
pub(crate) fn plane_grid(
    width: f32,
    height: f32,
    segments_x: u32,
    segments_y: u32,
) -> (Vec<Vertex>, Vec<u32>) {
    let columns = segments_x + 1;
    let rows = segments_y + 1;
    let mut vertices = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        let v = row as f32 / segments_y as f32;
        let y = (v - 0.5) * height;
        for column in 0..columns {
            let u = column as f32 / segments_x as f32;
            let x = (u - 0.5) * width;
            vertices.push(Vertex {
                position: [x, y, 0.0],
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments_x * segments_y * 6) as usize);
    for row in 0..segments_y {
        for column in 0..segments_x {
            let base = row * columns + column;
            indices.extend_from_slice(&[
                base,
                base + 1,
                base + columns,
                base + 1,
                base + columns + 1,
                base + columns,
            ]);
        }
    }

    (vertices, indices)
}
