//! Render batching.
//!
//! The terrain hands the frame a list of [`Instanced`] draws, one per material.
//! [`DrawTerrain`] issues them on a render pass with the camera and light bind
//! groups that every draw shares.

use crate::data_structures::mesh::PlaneMesh;

/// Data for instanced drawing: a mesh, an instance buffer and the material
/// bind group all instances are sampled with.
#[derive(Clone, Copy, Debug)]
pub struct Instanced<'a> {
    pub mesh: &'a PlaneMesh,
    pub instance: &'a wgpu::Buffer,
    pub material: &'a wgpu::BindGroup,
    pub amount: usize,
}

pub trait DrawTerrain<'a> {
    fn draw_instanced_batch(
        &mut self,
        instanced: &Instanced<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawTerrain<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_instanced_batch(
        &mut self,
        instanced: &Instanced<'b>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        if instanced.amount == 0 || instanced.instance.size() == 0 {
            log::warn!("you attempted to render something with zero instances");
            return;
        }
        self.set_vertex_buffer(0, instanced.mesh.vertex_buffer.slice(..));
        self.set_vertex_buffer(1, instanced.instance.slice(..));
        self.set_index_buffer(
            instanced.mesh.index_buffer.slice(..),
            wgpu::IndexFormat::Uint16,
        );
        self.set_bind_group(0, instanced.material, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(
            0..instanced.mesh.num_elements,
            0,
            0..instanced.amount as u32,
        );
    }
}
