//! Plane geometry shared by every terrain tile.

use wgpu::util::DeviceExt;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TileVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl TileVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];
}

impl Vertex for TileVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TileVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub const PLANE_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// A `size × size` quad in the XY plane facing +Z, centred on the origin.
///
/// Texture coordinates run from 0 to `repeat` so a repeat-addressed sampler
/// tiles the texture `repeat` times along each edge.
pub fn plane_vertices(size: f32, repeat: f32) -> [TileVertex; 4] {
    let h = size / 2.0;
    let normal = [0.0, 0.0, 1.0];
    [
        TileVertex {
            position: [-h, h, 0.0],
            tex_coords: [0.0, 0.0],
            normal,
        },
        TileVertex {
            position: [-h, -h, 0.0],
            tex_coords: [0.0, repeat],
            normal,
        },
        TileVertex {
            position: [h, h, 0.0],
            tex_coords: [repeat, 0.0],
            normal,
        },
        TileVertex {
            position: [h, -h, 0.0],
            tex_coords: [repeat, repeat],
            normal,
        },
    ]
}

/// GPU buffers of the tile plane.
#[derive(Debug)]
pub struct PlaneMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl PlaneMesh {
    pub fn new(device: &wgpu::Device, size: f32, repeat: f32) -> Self {
        let vertices = plane_vertices(size, repeat);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Tile Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Tile Index Buffer"),
            contents: bytemuck::cast_slice(&PLANE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_elements: PLANE_INDICES.len() as u32,
        }
    }
}
