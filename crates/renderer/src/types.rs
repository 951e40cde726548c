/// GPU power preference requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuPowerPreference {
    /// Prefer the integrated/low-power adapter.
    Low,
    /// Prefer the discrete/high-performance adapter.
    High,
}

impl Default for GpuPowerPreference {
    fn default() -> Self {
        Self::High
    }
}

impl std::fmt::Display for GpuPowerPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuPowerPreference::Low => f.write_str("low"),
            GpuPowerPreference::High => f.write_str("high"),
        }
    }
}

/// Identity of the adapter the renderer ended up on, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// True when the adapter is a software rasterizer (llvmpipe and friends).
    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
            || self.name.to_ascii_lowercase().contains("llvmpipe")
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and tells the renderer how large the
/// window should be and which adapter class to prefer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Title of the demo window.
    pub window_title: String,
    /// Adapter class to request from the instance.
    pub gpu_power: GpuPowerPreference,
}

impl Default for RendererConfig {
    /// Provides a 720p windowed configuration on the high-performance adapter.
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            window_title: "Seascape".to_string(),
            gpu_power: GpuPowerPreference::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn software_profile_detected_by_device_type() {
        let profile = AdapterProfile {
            name: "Some GPU".into(),
            backend: wgpu::Backend::Vulkan,
            device_type: wgpu::DeviceType::Cpu,
        };
        assert!(profile.is_software());
    }

    #[test]
    fn software_profile_detected_by_name() {
        let profile = AdapterProfile {
            name: "llvmpipe (LLVM 17.0.6, 256 bits)".into(),
            backend: wgpu::Backend::Vulkan,
            device_type: wgpu::DeviceType::Other,
        };
        assert!(profile.is_software());
    }

    #[test]
    fn discrete_profile_is_not_software() {
        let profile = AdapterProfile {
            name: "NVIDIA GeForce RTX 3070".into(),
            backend: wgpu::Backend::Vulkan,
            device_type: wgpu::DeviceType::DiscreteGpu,
        };
        assert!(!profile.is_software());
    }
}
