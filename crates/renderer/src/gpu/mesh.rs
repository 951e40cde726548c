use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// One vertex of the fullscreen quad: clip-space position plus UV.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Two counter-clockwise triangles covering the viewport. The UV origin sits
/// at the top-left so the sampled ring texture lands upright on screen.
pub(crate) const SCREEN_QUAD: [QuadVertex; 6] = [
    QuadVertex { position: [-1.0, 1.0], uv: [0.0, 0.0] },
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    QuadVertex { position: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { position: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { position: [-1.0, 1.0], uv: [0.0, 0.0] },
];

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

/// Static GPU-resident vertex buffer for the fullscreen quad.
///
/// Uploaded once at startup and never mutated afterwards.
pub(crate) struct ScreenMesh {
    buffer: wgpu::Buffer,
}

impl ScreenMesh {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("screen quad"),
            contents: bytemuck::cast_slice(&SCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { buffer }
    }

    pub(crate) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub(crate) fn vertex_count(&self) -> u32 {
        SCREEN_QUAD.len() as u32
    }

    /// Interleaved layout: position then uv, 16 bytes per vertex.
    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &QUAD_ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_four_floats() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
        assert_eq!(ScreenMesh::layout().array_stride, 16);
    }

    #[test]
    fn quad_has_two_triangles() {
        assert_eq!(SCREEN_QUAD.len(), 6);
    }

    #[test]
    fn quad_covers_clip_space() {
        let mut min = [f32::MAX; 2];
        let mut max = [f32::MIN; 2];
        for vertex in &SCREEN_QUAD {
            for axis in 0..2 {
                min[axis] = min[axis].min(vertex.position[axis]);
                max[axis] = max[axis].max(vertex.position[axis]);
            }
        }
        assert_eq!(min, [-1.0, -1.0]);
        assert_eq!(max, [1.0, 1.0]);
    }

    #[test]
    fn uvs_stay_in_unit_range() {
        for vertex in &SCREEN_QUAD {
            assert!((0.0..=1.0).contains(&vertex.uv[0]));
            assert!((0.0..=1.0).contains(&vertex.uv[1]));
        }
    }
}
