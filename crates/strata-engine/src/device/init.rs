/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may pick an adapter from.
    pub backends: wgpu::Backends,

    /// Adapter preference.
    pub power_preference: wgpu::PowerPreference,

    /// Accept a software adapter when no hardware adapter is available.
    ///
    /// Useful on CI machines without a GPU.
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
        }
    }
}
