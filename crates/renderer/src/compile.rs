//! Shader module preparation.
//!
//! Both WGSL sources ship inside the binary. The present shader compiles as
//! written, while the compute kernel carries `{{GROUP_WIDTH}}` and
//! `{{GROUP_HEIGHT}}` placeholders in its `@workgroup_size` attribute that
//! are substituted with dimensions derived from the adapter limits before
//! the module is handed to `wgpu`.

use anyhow::{bail, Result};

const SEASCAPE_KERNEL_WGSL: &str = include_str!("../shaders/seascape.wgsl");
const PRESENT_WGSL: &str = include_str!("../shaders/present.wgsl");

const GROUP_WIDTH_TOKEN: &str = "{{GROUP_WIDTH}}";
const GROUP_HEIGHT_TOKEN: &str = "{{GROUP_HEIGHT}}";

/// Fallback execution width when the adapter does not report subgroup sizes.
const DEFAULT_EXECUTION_WIDTH: u32 = 32;

/// Workgroup dimensions for the 2D compute dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupSize {
    pub width: u32,
    pub height: u32,
}

impl GroupSize {
    /// Derives workgroup dimensions from what the device reports.
    ///
    /// Width follows the adapter's subgroup (SIMD execution) width, height is
    /// whatever of the per-workgroup invocation budget remains, both clamped
    /// to the per-axis limits.
    pub fn derive(limits: &wgpu::Limits) -> Self {
        let execution_width = if limits.max_subgroup_size > 0 {
            limits.max_subgroup_size
        } else {
            DEFAULT_EXECUTION_WIDTH
        };
        let width = execution_width.clamp(1, limits.max_compute_workgroup_size_x.max(1));
        let budget = limits.max_compute_invocations_per_workgroup.max(1);
        let height = (budget / width).clamp(1, limits.max_compute_workgroup_size_y.max(1));
        Self { width, height }
    }
}

/// Substitutes the derived workgroup size into the kernel source.
pub(crate) fn specialize_kernel(source: &str, group: GroupSize) -> Result<String> {
    if !source.contains(GROUP_WIDTH_TOKEN) || !source.contains(GROUP_HEIGHT_TOKEN) {
        bail!("compute kernel is missing workgroup size placeholders");
    }
    Ok(source
        .replace(GROUP_WIDTH_TOKEN, &group.width.to_string())
        .replace(GROUP_HEIGHT_TOKEN, &group.height.to_string()))
}

/// Compiles the seascape compute kernel specialized for `group`.
pub(crate) fn compile_compute_kernel(
    device: &wgpu::Device,
    group: GroupSize,
) -> Result<wgpu::ShaderModule> {
    let specialized = specialize_kernel(SEASCAPE_KERNEL_WGSL, group)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("seascape kernel"),
        source: wgpu::ShaderSource::Wgsl(specialized.into()),
    }))
}

/// Compiles the fullscreen present vertex/fragment pair.
pub(crate) fn compile_present_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("present shader"),
        source: wgpu::ShaderSource::Wgsl(PRESENT_WGSL.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_uses_fallback_width_without_subgroup_info() {
        let limits = wgpu::Limits::default();
        let group = GroupSize::derive(&limits);
        assert_eq!(group.width, DEFAULT_EXECUTION_WIDTH);
        assert_eq!(
            group.width * group.height,
            limits.max_compute_invocations_per_workgroup
        );
    }

    #[test]
    fn derive_respects_per_axis_limits() {
        let limits = wgpu::Limits {
            max_subgroup_size: 128,
            max_compute_workgroup_size_x: 64,
            max_compute_workgroup_size_y: 2,
            max_compute_invocations_per_workgroup: 256,
            ..wgpu::Limits::default()
        };
        let group = GroupSize::derive(&limits);
        assert_eq!(group.width, 64);
        assert_eq!(group.height, 2);
    }

    #[test]
    fn derive_never_returns_zero_dimensions() {
        let limits = wgpu::Limits {
            max_subgroup_size: 0,
            max_compute_workgroup_size_x: 1,
            max_compute_workgroup_size_y: 1,
            max_compute_invocations_per_workgroup: 1,
            ..wgpu::Limits::default()
        };
        let group = GroupSize::derive(&limits);
        assert_eq!(group, GroupSize { width: 1, height: 1 });
    }

    #[test]
    fn kernel_source_specializes_cleanly() {
        let group = GroupSize {
            width: 16,
            height: 4,
        };
        let specialized = specialize_kernel(SEASCAPE_KERNEL_WGSL, group).expect("specialize");
        assert!(specialized.contains("@workgroup_size(16, 4, 1)"));
        assert!(!specialized.contains("{{"));
    }

    #[test]
    fn specialize_rejects_sources_without_placeholders() {
        let result = specialize_kernel("@workgroup_size(8, 8, 1)", GroupSize { width: 8, height: 8 });
        assert!(result.is_err());
    }

    #[test]
    fn kernel_declares_expected_entry_point() {
        assert!(SEASCAPE_KERNEL_WGSL.contains("fn main"));
        assert!(PRESENT_WGSL.contains("fn vs_main"));
        assert!(PRESENT_WGSL.contains("fn fs_main"));
    }
}
