use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Vec2;
use crate::render::{RenderCtx, RenderTarget, ShaderProgram};

/// Sprite vertex: NDC position + RGB color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Builds the sprite quad (two triangles) centered at the origin.
///
/// `half` is the half-extent in NDC.
pub fn sprite_vertices(half: f32) -> [SpriteVertex; 6] {
    let v = |x: f32, y: f32, color: [f32; 3]| SpriteVertex { pos: [x, y, 0.0], color };
    [
        v(-half, half, [0.0, 0.0, 1.0]),
        v(half, -half, [1.0, 0.0, 0.0]),
        v(half, half, [1.0, 0.0, 1.0]),
        v(-half, half, [0.0, 0.0, 1.0]),
        v(half, -half, [1.0, 0.0, 0.0]),
        v(-half, -half, [1.0, 0.0, 1.0]),
    ]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteUniform {
    transform: [[f32; 4]; 4], // column-major
}

/// Column-major translation matrix moving the sprite by `offset` logical px.
///
/// `half_extent` is the viewport half size, which maps to one NDC unit.
pub fn sprite_transform(offset: Vec2, half_extent: Vec2) -> [[f32; 4]; 4] {
    let tx = offset.x / half_extent.x.max(1.0);
    let ty = offset.y / half_extent.y.max(1.0);
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [tx, ty, 0.0, 1.0],
    ]
}

/// Draws the single player sprite.
///
/// GPU objects are created on first use and rebuilt if the surface format
/// changes. The offset reaches the GPU as a transform uniform.
pub struct SpriteRenderer {
    program: ShaderProgram,
    vertices: [SpriteVertex; 6],

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_buffer: Option<wgpu::Buffer>,

    vertex_buffer: Option<wgpu::Buffer>,
}

impl SpriteRenderer {
    pub fn new(program: ShaderProgram, half_extent_ndc: f32) -> Self {
        Self {
            program,
            vertices: sprite_vertices(half_extent_ndc),
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_buffer: None,
            vertex_buffer: None,
        }
    }

    /// Records a draw of the sprite at `offset` (logical px from center).
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, offset: Vec2) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.write_transform(ctx, offset);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vertex_buffer) = self.vertex_buffer.as_ref() else { return };

        let mut rpass = target.load_pass("skitter sprite pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.draw(0..self.vertices.len() as u32, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let vertex = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("skitter sprite vertex shader"),
            source: wgpu::ShaderSource::Wgsl(self.program.vertex().code.as_str().into()),
        });
        let fragment = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("skitter sprite fragment shader"),
            source: wgpu::ShaderSource::Wgsl(self.program.fragment().code.as_str().into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("skitter sprite bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<SpriteUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("skitter sprite pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("skitter sprite pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some(crate::render::ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some(crate::render::ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("sprite pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        // Bindings hang off the old layout.
        self.bind_group = None;
        self.uniform_buffer = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform_buffer.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("skitter sprite transform ubo"),
            size: std::mem::size_of::<SpriteUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skitter sprite bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.uniform_buffer = Some(uniform_buffer);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertex_buffer.is_some() {
            return;
        }

        self.vertex_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skitter sprite vbo"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn write_transform(&self, ctx: &RenderCtx<'_>, offset: Vec2) {
        let Some(ubo) = self.uniform_buffer.as_ref() else { return };
        let u = SpriteUniform {
            transform: sprite_transform(offset, ctx.half_extent),
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offset_is_identity() {
        let m = sprite_transform(Vec2::zero(), Vec2::new(320.0, 320.0));
        assert_eq!(m[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn offset_lands_in_fourth_column_as_ndc() {
        let m = sprite_transform(Vec2::new(160.0, -320.0), Vec2::new(320.0, 320.0));
        assert_eq!(m[3], [0.5, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_viewport_does_not_divide_by_zero() {
        let m = sprite_transform(Vec2::new(1.0, 1.0), Vec2::zero());
        assert!(m[3][0].is_finite() && m[3][1].is_finite());
    }

    #[test]
    fn vertices_form_a_square_of_the_given_half_extent() {
        let verts = sprite_vertices(0.1);
        for v in verts {
            assert!((v.pos[0].abs() - 0.1).abs() < f32::EPSILON);
            assert!((v.pos[1].abs() - 0.1).abs() < f32::EPSILON);
            assert_eq!(v.pos[2], 0.0);
        }
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 6 * 4);
    }
}
