use bytemuck::{Pod, Zeroable};

/// Per-frame parameters consumed by the compute kernel.
///
/// Layout matches the `FrameInput` struct in `seascape.wgsl`: one vec4 worth
/// of data, mouse position in the xy lanes and simulated time in w.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameInput {
    pub mouse: [f32; 2],
    pub reserved: f32,
    pub time: f32,
}

/// One uniform buffer per admission-gate slot.
///
/// Tagging the buffer with the slot index guarantees the CPU only ever
/// rewrites a buffer whose previous GPU reader has already completed; there
/// is no shared mutable uniform cell to race on.
pub(crate) struct UniformSlots {
    buffers: Vec<wgpu::Buffer>,
}

impl UniformSlots {
    pub(crate) fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let buffers = (0..capacity)
            .map(|index| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("frame input #{index}")),
                    size: std::mem::size_of::<FrameInput>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();
        Self { buffers }
    }

    pub(crate) fn write(&self, queue: &wgpu::Queue, slot: usize, input: &FrameInput) {
        queue.write_buffer(&self.buffers[slot], 0, bytemuck::bytes_of(input));
    }

    pub(crate) fn buffer(&self, slot: usize) -> &wgpu::Buffer {
        &self.buffers[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_input_is_one_vec4() {
        assert_eq!(std::mem::size_of::<FrameInput>(), 16);
    }

    #[test]
    fn time_occupies_the_w_lane() {
        let input = FrameInput {
            mouse: [3.0, 4.0],
            reserved: 0.0,
            time: 7.5,
        };
        let bytes = bytemuck::bytes_of(&input);
        let lanes: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(lanes, &[3.0, 4.0, 0.0, 7.5]);
    }
}
