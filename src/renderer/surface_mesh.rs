use glam::Vec3;
use std::sync::Arc;

use crate::surface::mesh::{MeshBackend, MeshView};

const MIN_VERTEX_CAPACITY: usize = 4096;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
}

/// GPU vertex/index buffers for the morphing surface.
///
/// Buffers grow to the next power of two and are reused while the published
/// mesh fits, so steady blends are plain `write_buffer` calls.
pub struct GpuSurfaceMesh {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,

    position_buffer: wgpu::Buffer,
    normal_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,

    vertex_count: u32,
    index_count: u32,

    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    color: [f32; 4],
}

fn vertex_buffer(device: &wgpu::Device, label: &str, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (vertices * std::mem::size_of::<Vec3>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn index_buffer(device: &wgpu::Device, indices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Surface Index Buffer"),
        size: (indices * std::mem::size_of::<u32>()) as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl GpuSurfaceMesh {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        material_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let vertex_capacity = MIN_VERTEX_CAPACITY;
        let index_capacity = MIN_VERTEX_CAPACITY * 6;

        let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Surface Material Buffer"),
            size: std::mem::size_of::<MaterialUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Surface Material Bind Group"),
            layout: material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });

        let mut mesh = Self {
            position_buffer: vertex_buffer(&device, "Surface Position Buffer", vertex_capacity),
            normal_buffer: vertex_buffer(&device, "Surface Normal Buffer", vertex_capacity),
            index_buffer: index_buffer(&device, index_capacity),
            vertex_capacity,
            index_capacity,
            vertex_count: 0,
            index_count: 0,
            material_buffer,
            material_bind_group,
            color: [1.0; 4],
            device,
            queue,
        };
        mesh.set_color([1.0; 4]);
        mesh
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    fn reserve(&mut self, vertices: usize, indices: usize) {
        if vertices > self.vertex_capacity {
            self.vertex_capacity = vertices.next_power_of_two();
            log::debug!("growing surface vertex buffers to {}", self.vertex_capacity);
            self.position_buffer =
                vertex_buffer(&self.device, "Surface Position Buffer", self.vertex_capacity);
            self.normal_buffer =
                vertex_buffer(&self.device, "Surface Normal Buffer", self.vertex_capacity);
        }
        if indices > self.index_capacity {
            self.index_capacity = indices.next_power_of_two();
            log::debug!("growing surface index buffer to {}", self.index_capacity);
            self.index_buffer = index_buffer(&self.device, self.index_capacity);
        }
    }

    fn write_vertices(&self, positions: &[Vec3], normals: &[Vec3]) {
        if positions.is_empty() {
            return;
        }
        self.queue
            .write_buffer(&self.position_buffer, 0, bytemuck::cast_slice(positions));
        self.queue
            .write_buffer(&self.normal_buffer, 0, bytemuck::cast_slice(normals));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        render_pass.set_bind_group(1, &self.material_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.normal_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl MeshBackend for GpuSurfaceMesh {
    fn replace(&mut self, mesh: MeshView<'_>) {
        self.reserve(mesh.positions.len(), mesh.indices.len());
        self.write_vertices(mesh.positions, mesh.normals);
        if !mesh.indices.is_empty() {
            self.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(mesh.indices));
        }
        self.vertex_count = mesh.positions.len() as u32;
        self.index_count = mesh.indices.len() as u32;
    }

    fn write_region(&mut self, positions: &[Vec3], normals: &[Vec3]) {
        if positions.len() != self.vertex_count as usize {
            log::warn!(
                "region write of {} vertices into a {} vertex mesh",
                positions.len(),
                self.vertex_count
            );
            self.reserve(positions.len(), 0);
            self.vertex_count = positions.len() as u32;
        }
        self.write_vertices(positions, normals);
    }

    fn clear(&mut self) {
        self.vertex_count = 0;
        self.index_count = 0;
    }

    fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
        self.queue.write_buffer(
            &self.material_buffer,
            0,
            bytemuck::cast_slice(&[MaterialUniform { color }]),
        );
    }
}
