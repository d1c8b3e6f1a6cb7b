//! Terrain pipeline and the GPU side of a built terrain.
//!
//! All tiles share one plane mesh. Tiles of the same material are drawn with a
//! single instanced call, so the terrain costs one draw per material no matter
//! how large the grid is.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        mesh::{PlaneMesh, TileVertex, Vertex},
        terrain::{Material, Terrain},
        texture::Texture,
    },
    render::Instanced,
};

/// A loaded terrain texture bound for sampling in the terrain shader.
#[derive(Clone, Debug)]
pub struct TerrainMaterial {
    pub name: String,
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

impl TerrainMaterial {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        texture: Texture,
    ) -> Self {
        let sampler = texture
            .sampler
            .clone()
            .unwrap_or_else(|| crate::data_structures::texture::create_repeat_sampler(device));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some(name),
        });
        Self {
            name: name.to_string(),
            texture,
            bind_group,
        }
    }
}

pub fn mk_texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Terrain texture_bind_group_layout"),
    })
}

pub fn mk_terrain_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    texture_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Terrain Pipeline Layout"),
        bind_group_layouts: &[
            Some(texture_layout),
            Some(camera_bind_group_layout),
            Some(light_bind_group_layout),
        ],
        immediate_size: 0,
    });
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Terrain Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("terrain.wgsl").into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Terrain Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[TileVertex::desc(), InstanceRaw::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // tiles are only seen from above
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: Some(true),
            depth_compare: Some(wgpu::CompareFunction::Less),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}

#[derive(Debug)]
struct InstanceBatch {
    material: Material,
    buffer: wgpu::Buffer,
    amount: usize,
}

/// Vertex and instance buffers of a built terrain. Written once, never updated.
#[derive(Debug)]
pub struct TerrainResources {
    mesh: PlaneMesh,
    batches: Vec<InstanceBatch>,
}

impl TerrainResources {
    /// Upload the tiles of `terrain`. Returns `None` for an empty terrain.
    pub fn new(
        device: &wgpu::Device,
        terrain: &Terrain<TerrainMaterial>,
        texture_repeat: f32,
    ) -> Option<Self> {
        let tile_size = terrain.tiles().first()?.size;
        let mesh = PlaneMesh::new(device, tile_size, texture_repeat);
        let batches = [Material::Land, Material::Grass]
            .into_iter()
            .filter_map(|material| {
                let instance_data = terrain
                    .tiles_of(material)
                    .map(|tile| &tile.transform)
                    .map(Instance::to_raw)
                    .collect::<Vec<_>>();
                if instance_data.is_empty() {
                    return None;
                }
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Instance Buffer", material)),
                    contents: bytemuck::cast_slice(&instance_data),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                Some(InstanceBatch {
                    material,
                    buffer,
                    amount: instance_data.len(),
                })
            })
            .collect();
        Some(Self { mesh, batches })
    }

    /// One [`Instanced`] draw per material present in the terrain.
    pub fn instanced<'a>(&'a self, terrain: &'a Terrain<TerrainMaterial>) -> Vec<Instanced<'a>> {
        let Some(materials) = terrain.materials() else {
            return Vec::new();
        };
        self.batches
            .iter()
            .map(|batch| Instanced {
                mesh: &self.mesh,
                instance: &batch.buffer,
                material: &materials.get(batch.material).bind_group,
                amount: batch.amount,
            })
            .collect()
    }
}
