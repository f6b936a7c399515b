use anyhow::{Context, Result};

use super::GpuInit;

/// Owns the wgpu core objects.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Device/Queue
/// - creates command encoders and submits them
pub struct Gpu {
    /// Kept alive for the lifetime of the device.
    #[allow(dead_code)]
    instance: wgpu::Instance,

    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a GPU context without a presentation surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; wrap in
    /// `pollster::block_on` from synchronous code.
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("strata-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Gpu {
            instance,
            device,
            queue,
        })
    }

    /// Blocking variant of [`Gpu::new_headless`].
    pub fn new_headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new_headless(init))
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Creates a command encoder for one frame of work.
    pub fn create_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Submits the recorded commands.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) -> wgpu::SubmissionIndex {
        self.queue.submit(std::iter::once(encoder.finish()))
    }

    /// Blocks until all submitted work has completed.
    pub fn wait_idle(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed")?;
        Ok(())
    }
}
