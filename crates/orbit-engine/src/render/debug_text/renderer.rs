use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::quad::{
    premul_alpha_blend, viewport_ubo_min_binding_size, QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};
use crate::render::{RenderCtx, RenderTarget};
use crate::text::MonoFont;

use super::{DebugText, CELL_HEIGHT, CELL_WIDTH};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 512;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// Solid block in the first atlas slot, sampled by background quads.
const SOLID_SIZE: u32 = 4;

// ── shelf packer ──────────────────────────────────────────────────────────

/// Row-by-row rectangle packer for the glyph atlas.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self { size, cursor_x: GLYPH_PADDING, cursor_y: GLYPH_PADDING, row_height: 0 }
    }

    /// Reserves a `w`×`h` rect; returns its top-left corner.
    ///
    /// A rect larger than the atlas is rejected without touching the shelves.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * GLYPH_PADDING > self.size || h + 2 * GLYPH_PADDING > self.size {
            return None;
        }

        // Advance to a new shelf row when the rect doesn't fit horizontally.
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.size {
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

// ── cached glyph ──────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    /// Bitmap size in pixels.
    size: [f32; 2],
    /// Bitmap top-left relative to the pen position on the baseline.
    offset: [f32; 2],
}

fn uv_rect(x: u32, y: u32, w: u32, h: u32) -> ([f32; 2], [f32; 2]) {
    let atlas = ATLAS_SIZE as f32;
    (
        [x as f32 / atlas, y as f32 / atlas],
        [(x + w) as f32 / atlas, (y + h) as f32 / atlas],
    )
}

/// Baseline of a cell row, `top` pixels from the top of the target.
fn baseline(top: f32, font_px: f32, ascent: f32) -> f32 {
    top + ((CELL_HEIGHT as f32 - font_px) * 0.5 + ascent).round()
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Draws a [`DebugText`] grid over the frame.
///
/// Glyphs are rasterized on first use into an R8 atlas and cached by
/// character. Backgrounds are quads sampling a solid block of the atlas.
pub(crate) struct DebugTextRenderer {
    font: MonoFont,

    pipeline_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,

    atlas: wgpu::Texture,
    packer: ShelfPacker,
    solid_uv: [f32; 2],
    /// `None` marks characters with nothing to draw (space, missing glyph, full atlas).
    glyph_cache: HashMap<char, Option<CachedGlyph>>,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instances: Vec<GlyphInstance>,
}

impl DebugTextRenderer {
    pub(crate) fn new(ctx: &RenderCtx<'_>, font: MonoFont) -> Self {
        let atlas = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("orbit debug text atlas"),
            size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let atlas_view = atlas.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("orbit debug text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orbit debug text viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbit debug text bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(viewport_ubo_min_binding_size()),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbit debug text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&atlas_view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        let pipeline = Self::create_pipeline(ctx.device, &bgl, ctx.surface_format);

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orbit debug text quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orbit debug text quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut packer = ShelfPacker::new(ATLAS_SIZE);
        let solid_uv = match packer.place(SOLID_SIZE, SOLID_SIZE) {
            Some((x, y)) => {
                let solid = [0xffu8; (SOLID_SIZE * SOLID_SIZE) as usize];
                write_atlas(ctx.queue, &atlas, x, y, SOLID_SIZE, SOLID_SIZE, &solid);
                let center = SOLID_SIZE as f32 * 0.5;
                [(x as f32 + center) / ATLAS_SIZE as f32, (y as f32 + center) / ATLAS_SIZE as f32]
            }
            None => [0.0; 2],
        };

        Self {
            font,
            pipeline_format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
            atlas,
            packer,
            solid_uv,
            glyph_cache: HashMap::new(),
            quad_vbo,
            quad_ibo,
            instance_vbo: None,
            instance_capacity: 0,
            instances: Vec::new(),
        }
    }

    /// Records an overlay pass over `target`. Returns the number of quads drawn.
    pub(crate) fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, text: &DebugText) -> u32 {
        if ctx.surface_format != self.pipeline_format {
            log::warn!("debug text: surface format changed to {:?}; overlay skipped", ctx.surface_format);
            return 0;
        }

        self.build_instances(ctx, text);
        if self.instances.is_empty() {
            return 0;
        }

        ctx.queue.write_buffer(&self.viewport_ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));
        self.ensure_instance_capacity(ctx, self.instances.len());
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return 0 };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&self.instances));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orbit debug text pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let count = self.instances.len() as u32;
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..count);
        count
    }

    pub(crate) fn destroy(&self) {
        self.atlas.destroy();
        self.viewport_ubo.destroy();
        self.quad_vbo.destroy();
        self.quad_ibo.destroy();
        if let Some(vbo) = &self.instance_vbo {
            vbo.destroy();
        }
    }

    // ── instances ──────────────────────────────────────────────────────────

    /// Backgrounds first, then glyphs, so a later background never covers an
    /// earlier glyph.
    fn build_instances(&mut self, ctx: &RenderCtx<'_>, text: &DebugText) {
        self.instances.clear();

        for cell in text.cells() {
            let Some(bg) = cell.attr.background() else { continue };
            let [x, y] = cell.origin();
            self.instances.push(GlyphInstance {
                dst_min: [x, y],
                dst_max: [x + CELL_WIDTH as f32, y + CELL_HEIGHT as f32],
                uv_min: self.solid_uv,
                uv_max: self.solid_uv,
                color: bg.to_premul_f32(),
            });
        }

        for cell in text.cells().filter(|c| !c.ch.is_whitespace()) {
            let Some(glyph) = self.glyph(ctx, cell.ch) else { continue };
            let [x, y] = cell.origin();
            let base = baseline(y, self.font.px(), self.font.ascent());
            let min = [x + glyph.offset[0], base + glyph.offset[1]];
            self.instances.push(GlyphInstance {
                dst_min: min,
                dst_max: [min[0] + glyph.size[0], min[1] + glyph.size[1]],
                uv_min: glyph.uv_min,
                uv_max: glyph.uv_max,
                color: cell.attr.foreground().to_premul_f32(),
            });
        }
    }

    /// Rasterizes and uploads `ch` on first encounter.
    fn glyph(&mut self, ctx: &RenderCtx<'_>, ch: char) -> Option<CachedGlyph> {
        if let Some(cached) = self.glyph_cache.get(&ch) {
            return *cached;
        }

        let (metrics, bitmap) = self.font.rasterize(ch);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        let entry = if w == 0 || h == 0 {
            None
        } else if let Some((x, y)) = self.packer.place(w, h) {
            write_atlas(ctx.queue, &self.atlas, x, y, w, h, &bitmap);
            let (uv_min, uv_max) = uv_rect(x, y, w, h);
            Some(CachedGlyph {
                uv_min,
                uv_max,
                size: [w as f32, h as f32],
                offset: [metrics.xmin as f32, -(metrics.ymin as f32 + h as f32)],
            })
        } else {
            log::warn!("debug text: no room for '{ch}' ({w}×{h}) in the {ATLAS_SIZE}×{ATLAS_SIZE} glyph atlas");
            None
        };

        self.glyph_cache.insert(ch, entry);
        entry
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<GlyphInstance>()) as u64;
        if let Some(old) = self.instance_vbo.take() {
            old.destroy();
        }
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orbit debug text instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }

    fn create_pipeline(
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orbit debug text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/debug_text.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orbit debug text pipeline layout"),
            bind_group_layouts: &[bgl],
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("orbit debug text pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), GlyphInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
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
        })
    }
}

fn write_atlas(queue: &wgpu::Queue, atlas: &wgpu::Texture, x: u32, y: u32, w: u32, h: u32, bitmap: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: atlas,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        bitmap,
        wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(w), rows_per_image: Some(h) },
        wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
    );
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5  (premultiplied)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── shelf packer ───────────────────────────────────────────────────────

    #[test]
    fn packs_along_a_row() {
        let mut p = ShelfPacker::new(32);
        assert_eq!(p.place(4, 4), Some((1, 1)));
        assert_eq!(p.place(6, 8), Some((6, 1)));
    }

    #[test]
    fn wraps_to_next_shelf() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(8, 5), Some((1, 1)));
        assert_eq!(p.place(8, 3), Some((1, 7)));
    }

    #[test]
    fn stays_full_once_full() {
        let mut p = ShelfPacker::new(8);
        assert_eq!(p.place(6, 6), Some((1, 1)));
        assert_eq!(p.place(6, 6), None);
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn rejects_rects_wider_than_atlas() {
        let mut p = ShelfPacker::new(8);
        assert_eq!(p.place(9, 1), None);
    }

    #[test]
    fn oversized_rect_does_not_block_later_glyphs() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(4, 4), Some((1, 1)));
        assert_eq!(p.place(40, 2), None);
        assert_eq!(p.place(2, 40), None);
        assert_eq!(p.place(4, 4), Some((6, 1)));
    }

    // ── geometry ───────────────────────────────────────────────────────────

    #[test]
    fn instance_is_48_bytes() {
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 48);
    }

    #[test]
    fn uv_rect_normalizes_by_atlas_size() {
        let (min, max) = uv_rect(0, 256, 256, 256);
        assert_eq!(min, [0.0, 0.5]);
        assert_eq!(max, [0.5, 1.0]);
    }

    #[test]
    fn baseline_sits_inside_the_cell() {
        let b = baseline(32.0, 13.0, 12.0);
        assert!(b > 32.0 && b <= 32.0 + CELL_HEIGHT as f32);
    }
}
