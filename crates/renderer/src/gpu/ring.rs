use std::collections::VecDeque;

use winit::dpi::PhysicalSize;

/// Number of rotating compute targets, which also bounds frames in flight.
pub const RING_DEPTH: usize = 3;

/// Pixel format of every ring texture.
///
/// WebGPU storage textures cannot be `Bgra8Unorm` on the core profile, so
/// the ring uses `Rgba8Unorm` and the present pass resolves into whatever
/// surface format was negotiated.
pub(crate) const RING_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// FIFO rotation state over slot indices, kept separate from the GPU
/// resources so the ordering invariants are plain data.
#[derive(Debug, Clone)]
pub(crate) struct SlotRing {
    order: VecDeque<usize>,
    current: Option<usize>,
    capacity: usize,
}

impl SlotRing {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            order: (0..capacity).collect(),
            current: None,
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest slot, i.e. the next compute write destination.
    pub(crate) fn write_target(&self) -> usize {
        *self.order.front().expect("ring is never empty")
    }

    /// Most recently completed slot. Before the first advance no compute
    /// pass has run; the back slot stands in, which is safe because every
    /// texture starts out cleared.
    pub(crate) fn read_source(&self) -> usize {
        self.current
            .unwrap_or_else(|| *self.order.back().expect("ring is never empty"))
    }

    /// Marks the front slot as written: it becomes current and moves to the
    /// back of the queue, so it will not be overwritten again until every
    /// other slot has had its turn.
    pub(crate) fn advance(&mut self) -> usize {
        let written = self.order.pop_front().expect("ring is never empty");
        self.order.push_back(written);
        self.current = Some(written);
        written
    }

    /// Forgets rotation history, e.g. after the textures were rebuilt.
    pub(crate) fn reset(&mut self) {
        self.order = (0..self.capacity).collect();
        self.current = None;
    }
}

/// Fixed-capacity arena of shader-read/shader-write textures plus the FIFO
/// rotation over their indices.
pub(crate) struct TextureRing {
    textures: Vec<wgpu::Texture>,
    views: Vec<wgpu::TextureView>,
    ring: SlotRing,
    extent: wgpu::Extent3d,
}

impl TextureRing {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: PhysicalSize<u32>,
    ) -> Self {
        let mut this = Self {
            textures: Vec::new(),
            views: Vec::new(),
            ring: SlotRing::new(RING_DEPTH),
            extent: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        };
        this.resize(device, queue, size);
        this
    }

    /// Discards all textures and allocates a fresh, cleared set at the new
    /// dimensions. The caller must guarantee no GPU work still references
    /// the old set (the frame engine drains the admission gate first).
    pub(crate) fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: PhysicalSize<u32>,
    ) {
        let extent = clamped_extent(size);

        self.textures.clear();
        self.views.clear();
        self.ring.reset();
        self.extent = extent;

        for index in 0..self.ring.capacity() {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&format!("seascape ring #{index}")),
                size: extent,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: RING_FORMAT,
                usage: wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            clear_to_black(queue, &texture, extent);
            self.views
                .push(texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.textures.push(texture);
        }
    }

    pub(crate) fn extent(&self) -> wgpu::Extent3d {
        self.extent
    }

    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    pub(crate) fn write_view(&self) -> &wgpu::TextureView {
        &self.views[self.ring.write_target()]
    }

    pub(crate) fn read_view(&self) -> &wgpu::TextureView {
        &self.views[self.ring.read_source()]
    }

    pub(crate) fn advance(&mut self) -> usize {
        self.ring.advance()
    }
}

/// Texture extent for a requested size, with zero dimensions clamped to 1 so
/// a minimized window never produces an invalid allocation.
fn clamped_extent(size: PhysicalSize<u32>) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width.max(1),
        height: size.height.max(1),
        depth_or_array_layers: 1,
    }
}

/// Seeds a ring texture with opaque black so the very first present never
/// samples undefined memory.
fn clear_to_black(queue: &wgpu::Queue, texture: &wgpu::Texture, extent: wgpu::Extent3d) {
    let bytes_per_row = extent.width * 4;
    let mut pixels = vec![0u8; (bytes_per_row * extent.height) as usize];
    for pixel in pixels.chunks_exact_mut(4) {
        pixel[3] = u8::MAX;
    }
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(bytes_per_row),
            rows_per_image: Some(extent.height),
        },
        extent,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_strict_fifo() {
        let mut ring = SlotRing::new(3);
        assert_eq!(ring.write_target(), 0);

        let written = ring.advance();
        assert_eq!(written, 0);
        assert_eq!(ring.read_source(), 0, "just-written slot becomes current");
        assert_eq!(ring.write_target(), 1, "previous current cycles to the back");
    }

    #[test]
    fn every_slot_visited_once_per_cycle() {
        let mut ring = SlotRing::new(3);
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(ring.advance());
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn written_slot_is_never_the_immediate_next_target() {
        let mut ring = SlotRing::new(3);
        for _ in 0..12 {
            let written = ring.advance();
            assert_ne!(
                written,
                ring.write_target(),
                "a freshly written texture must cycle through the full ring"
            );
        }
    }

    #[test]
    fn read_source_is_defined_before_first_advance() {
        let ring = SlotRing::new(3);
        let source = ring.read_source();
        assert!(source < 3);
        assert_ne!(source, ring.write_target());
    }

    #[test]
    fn zero_sized_requests_clamp_to_one_pixel() {
        let extent = clamped_extent(PhysicalSize::new(0, 0));
        assert_eq!((extent.width, extent.height), (1, 1));

        let extent = clamped_extent(PhysicalSize::new(1920, 0));
        assert_eq!((extent.width, extent.height), (1920, 1));
    }

    #[test]
    fn reset_restores_initial_order() {
        let mut ring = SlotRing::new(3);
        ring.advance();
        ring.advance();
        ring.reset();
        assert_eq!(ring.write_target(), 0);
        assert_eq!(ring.read_source(), 2);
    }
}
