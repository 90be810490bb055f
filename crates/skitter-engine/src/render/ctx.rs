use crate::coords::Vec2;
use crate::paint::Color;

/// What a renderer needs to build and feed its pipeline for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,

    /// Distance from the window center to each edge, logical px.
    /// Always positive; frames with an empty window never reach a renderer.
    pub half_extent: Vec2,
}

/// The frame's encoder and swapchain view.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl RenderTarget<'_> {
    /// Records a pass that fills the whole view with `color`.
    pub fn clear(&mut self, color: Color) {
        let _rpass = self.pass("skitter clear", wgpu::LoadOp::Clear(color.to_wgpu()));
    }

    /// Opens a pass that draws over what earlier passes left in the view.
    pub fn load_pass(&mut self, label: &str) -> wgpu::RenderPass<'_> {
        self.pass(label, wgpu::LoadOp::Load)
    }

    fn pass(&mut self, label: &str, load: wgpu::LoadOp<wgpu::Color>) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
