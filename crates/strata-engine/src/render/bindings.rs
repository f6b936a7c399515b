use wgpu::util::DeviceExt;

use crate::sprite::{Camera, Model};

/// Camera uniform buffer + group 0 bind group.
pub struct CameraBinding {
    camera: Camera,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    pub(super) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        camera: Camera,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("strata camera ubo"),
            contents: bytemuck::bytes_of(&camera.to_uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("strata camera bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            camera,
            buffer,
            bind_group,
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Rewrites the uniform. Takes effect for passes submitted afterwards.
    pub fn update(&mut self, queue: &wgpu::Queue, camera: Camera) {
        self.camera = camera;
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&camera.to_uniform()));
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Model uniform buffer + group 1 bind group, one per drawable.
pub struct ModelBinding {
    model: Model,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ModelBinding {
    pub(super) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        model: Model,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("strata model ubo"),
            contents: bytemuck::bytes_of(&model.to_uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("strata model bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            model,
            buffer,
            bind_group,
        }
    }

    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Rewrites the uniform. Takes effect for passes submitted afterwards.
    pub fn update(&mut self, queue: &wgpu::Queue, model: Model) {
        self.model = model;
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&model.to_uniform()));
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
