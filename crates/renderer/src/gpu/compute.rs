use anyhow::Result;

use crate::compile::{compile_compute_kernel, GroupSize};

use super::ring::RING_FORMAT;

/// Wraps the compute pipeline that advances the ocean by one frame.
///
/// Each pass reads the previous frame's texture, consumes one `FrameInput`
/// uniform, and writes the next ring texture. Rotation of the ring is the
/// caller's responsibility.
pub(crate) struct ComputeStage {
    pipeline: wgpu::ComputePipeline,
    bind_layout: wgpu::BindGroupLayout,
    group: GroupSize,
}

impl ComputeStage {
    pub(crate) fn new(device: &wgpu::Device, limits: &wgpu::Limits) -> Result<Self> {
        let group = GroupSize::derive(limits);
        tracing::debug!(
            width = group.width,
            height = group.height,
            "derived compute workgroup size"
        );
        let module = compile_compute_kernel(device, group)?;

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("seascape kernel layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: RING_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("seascape kernel pipeline layout"),
            bind_group_layouts: &[&bind_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("seascape kernel pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        Ok(Self {
            pipeline,
            bind_layout,
            group,
        })
    }

    /// Encodes one compute pass covering every pixel of the write texture.
    pub(crate) fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        read_view: &wgpu::TextureView,
        write_view: &wgpu::TextureView,
        uniform_buffer: &wgpu::Buffer,
        extent: wgpu::Extent3d,
    ) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("seascape kernel bindings"),
            layout: &self.bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(read_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(write_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let (groups_x, groups_y) = dispatch_grid(extent, self.group);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("seascape compute pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(groups_x, groups_y, 1);
    }
}

/// Thread-group counts so that `groups * group_size` covers the texture.
fn dispatch_grid(extent: wgpu::Extent3d, group: GroupSize) -> (u32, u32) {
    (
        extent.width.div_ceil(group.width),
        extent.height.div_ceil(group.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(width: u32, height: u32) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        }
    }

    #[test]
    fn exact_multiples_need_no_padding() {
        let group = GroupSize {
            width: 32,
            height: 8,
        };
        assert_eq!(dispatch_grid(extent(1280, 720), group), (40, 90));
    }

    #[test]
    fn remainders_round_up() {
        let group = GroupSize {
            width: 32,
            height: 8,
        };
        assert_eq!(dispatch_grid(extent(1281, 721), group), (41, 91));
    }

    #[test]
    fn grid_covers_every_pixel_at_least_once() {
        let group = GroupSize {
            width: 16,
            height: 16,
        };
        for (w, h) in [(1, 1), (15, 17), (16, 16), (1920, 1080), (33, 1)] {
            let (gx, gy) = dispatch_grid(extent(w, h), group);
            assert!(gx * group.width >= w);
            assert!(gy * group.height >= h);
            // Never a full workgroup of pure overhang.
            assert!((gx - 1) * group.width < w);
            assert!((gy - 1) * group.height < h);
        }
    }
}
