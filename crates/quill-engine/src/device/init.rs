/// Initialization parameters for the headless GPU layer.
///
/// Keep this minimal. Add flags only when a concrete backend requirement
/// exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// The shape renderer needs none; keep this empty for portability.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Use a software adapter (e.g. on CI machines without a GPU).
    pub force_fallback_adapter: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            force_fallback_adapter: false,
        }
    }
}
