use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::scene::Transform;
use crate::shape::{DrawMode, ShapeVertex};
use crate::{Error, Result};

use super::{BufferKind, DeviceCaps, IndexedDraw, RenderDevice};

/// Configuration for [`WgpuDevice`].
#[derive(Debug, Clone)]
pub struct WgpuDeviceConfig {
    /// Format of the color views passed to [`WgpuDevice::encode`].
    pub target_format: wgpu::TextureFormat,
    /// Logical size of the target; see [`WgpuDevice::set_viewport`].
    pub viewport: Viewport,
    /// Clear the target before drawing. `None` loads existing contents.
    pub clear_color: Option<wgpu::Color>,
}

impl WgpuDeviceConfig {
    pub fn new(target_format: wgpu::TextureFormat, viewport: Viewport) -> Self {
        Self {
            target_format,
            viewport,
            clear_color: None,
        }
    }

    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = Some(color);
        self
    }
}

/// wgpu backend for shape batches.
///
/// `draw_indexed` only queues work; [`WgpuDevice::encode`] records every queued
/// draw into a single render pass. Each queued draw keeps the transform that
/// was current when it was queued, so several shape lists with different
/// transforms can share one pass.
///
/// WebGPU has no line loops, triangle fans, or restart for list topologies
/// (see [`DeviceCaps::WEBGPU`]); batches lower those before upload. Strip
/// topologies use `Uint32` indices, whose restart value is `u32::MAX`.
///
/// Line widths other than 1px cannot be expressed and are ignored with a
/// one-time debug message.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target_format: wgpu::TextureFormat,
    viewport: Viewport,
    config: WgpuDeviceConfig,

    shader: Option<wgpu::ShaderModule>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    pipelines: HashMap<wgpu::PrimitiveTopology, wgpu::RenderPipeline>,

    uniform_stride: u64,
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    bind_group: Option<wgpu::BindGroup>,

    transform: Transform,
    current_slot: Option<u32>,
    slots: Vec<ShapeUniform>,
    queued: Vec<QueuedDraw>,

    warned_line_width: bool,
}

struct QueuedDraw {
    topology: wgpu::PrimitiveTopology,
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
    slot: u32,
}

impl WgpuDevice {
    /// Builds a backend on `device`. Pipelines and bindings are created lazily
    /// on first use.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, config: WgpuDeviceConfig) -> Self {
        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment).max(1);
        let uniform_stride = (std::mem::size_of::<ShapeUniform>() as u64).div_ceil(align) * align;

        Self {
            device: device.clone(),
            queue: queue.clone(),
            target_format: config.target_format,
            viewport: config.viewport,
            config,
            shader: None,
            bind_group_layout: None,
            pipeline_layout: None,
            pipelines: HashMap::new(),
            uniform_stride,
            uniform_buffer: None,
            uniform_capacity: 0,
            bind_group: None,
            transform: Transform::default(),
            current_slot: None,
            slots: Vec::new(),
            queued: Vec::new(),
            warned_line_width: false,
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the logical target size used by draws queued from now on.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            log::warn!("ignoring invalid viewport {viewport:?}");
            return;
        }
        self.viewport = viewport;
        self.current_slot = None;
    }

    /// Draws queued since the last `encode`.
    #[inline]
    pub fn queued_draws(&self) -> usize {
        self.queued.len()
    }

    /// Records all queued draws into one render pass on `view`.
    ///
    /// Transform uniforms are staged and copied inside `encoder`, ahead of the
    /// pass, so several `encode` calls may share one submit. With no queued
    /// draws this only clears (if configured).
    pub fn encode(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let draws = std::mem::take(&mut self.queued);
        let slots = std::mem::take(&mut self.slots);
        self.current_slot = None;

        if draws.is_empty() && self.config.clear_color.is_none() {
            return;
        }

        self.ensure_bindings(slots.len());
        self.stage_uniforms(encoder, &slots);

        let load = match self.config.clear_color {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quill shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
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
        });

        let Some(bind_group) = self.bind_group.as_ref() else { return };

        for draw in &draws {
            let Some(pipeline) = self.pipelines.get(&draw.topology) else { continue };
            let offset = u64::from(draw.slot) * self.uniform_stride;

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[offset as u32]);
            rpass.set_vertex_buffer(0, draw.vertex.slice(..));
            rpass.set_index_buffer(draw.index.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..draw.index_count, 0, 0..1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn transform_slot(&mut self) -> u32 {
        if let Some(slot) = self.current_slot {
            return slot;
        }
        self.slots.push(ShapeUniform::new(self.viewport, self.transform));
        let slot = (self.slots.len() - 1) as u32;
        self.current_slot = Some(slot);
        slot
    }

    fn ensure_layouts(&mut self) {
        if self.pipeline_layout.is_some() {
            return;
        }

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quill shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });

        let bind_group_layout =
            self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quill shape bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(uniform_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("quill shape pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        self.shader = Some(shader);
        self.bind_group_layout = Some(bind_group_layout);
        self.pipeline_layout = Some(pipeline_layout);
    }

    fn ensure_pipeline(&mut self, topology: wgpu::PrimitiveTopology) {
        if self.pipelines.contains_key(&topology) {
            return;
        }
        self.ensure_layouts();
        let (Some(shader), Some(layout)) = (self.shader.as_ref(), self.pipeline_layout.as_ref())
        else {
            return;
        };

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quill shape pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[ShapeVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: strip_index_format(topology),
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

        log::debug!("created shape pipeline for {topology:?}");
        self.pipelines.insert(topology, pipeline);
    }

    fn ensure_bindings(&mut self, slots: usize) {
        self.ensure_layouts();
        if self.bind_group.is_some() && slots <= self.uniform_capacity {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let capacity = slots.next_power_of_two().max(8);
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quill shape ubo"),
            size: capacity as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quill shape bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: Some(uniform_binding_size()),
                }),
            }],
        });

        self.uniform_buffer = Some(uniform_buffer);
        self.uniform_capacity = capacity;
        self.bind_group = Some(bind_group);
    }

    /// Copies `slots` into the uniform buffer as an encoder command, ordered
    /// with the passes of the same encoder (unlike `queue.write_buffer`, which
    /// lands at submit).
    fn stage_uniforms(&self, encoder: &mut wgpu::CommandEncoder, slots: &[ShapeUniform]) {
        let Some(ubo) = self.uniform_buffer.as_ref() else { return };
        if slots.is_empty() {
            return;
        }

        let bytes = uniform_bytes(slots, self.uniform_stride as usize);
        let staging = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quill shape ubo staging"),
            contents: &bytes,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        encoder.copy_buffer_to_buffer(&staging, 0, ubo, 0, bytes.len() as u64);
    }
}

impl RenderDevice for WgpuDevice {
    type Buffer = wgpu::Buffer;

    fn caps(&self) -> DeviceCaps {
        DeviceCaps::WEBGPU
    }

    fn allocate_buffer(&mut self, kind: BufferKind, size: u64) -> Result<wgpu::Buffer> {
        let max = self.device.limits().max_buffer_size;
        if size > max {
            return Err(Error::Device(format!(
                "{kind:?} buffer of {size} bytes exceeds the device limit of {max} bytes"
            )));
        }

        let (label, usage) = match kind {
            BufferKind::Vertex => ("quill batch vbo", wgpu::BufferUsages::VERTEX),
            BufferKind::Index => ("quill batch ibo", wgpu::BufferUsages::INDEX),
        };

        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    fn upload(&mut self, buffer: &wgpu::Buffer, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.queue.write_buffer(buffer, 0, bytes);
    }

    fn set_transform(&mut self, transform: Transform) {
        if transform != self.transform {
            self.transform = transform;
            self.current_slot = None;
        }
    }

    fn draw_indexed(&mut self, draw: IndexedDraw<'_, wgpu::Buffer>) {
        let Some(topology) = topology_for(draw.mode) else {
            log::warn!("{:?} has no wgpu topology; draw skipped", draw.mode);
            return;
        };
        if draw.restart_index.is_some() && strip_index_format(topology).is_none() {
            log::warn!("{:?} cannot restart primitives under wgpu; draw skipped", draw.mode);
            return;
        }
        if draw.line_width != 1.0 && !self.warned_line_width {
            log::debug!("wgpu rasterizes lines at 1px; ignoring width {}", draw.line_width);
            self.warned_line_width = true;
        }

        self.ensure_pipeline(topology);
        let slot = self.transform_slot();

        self.queued.push(QueuedDraw {
            topology,
            vertex: draw.vertex_buffer.clone(),
            index: draw.index_buffer.clone(),
            index_count: draw.index_count,
            slot,
        });
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Uniform layout (32 bytes):
///
///  offset  0  viewport  [f32; 2]   logical px
///  offset  8  center    [f32; 2]   list translation
///  offset 16  rotation  [f32; 2]   (cos, sin) of the list angle
///  offset 24  _pad      [f32; 2]
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ShapeUniform {
    viewport: [f32; 2],
    center: [f32; 2],
    rotation: [f32; 2],
    _pad: [f32; 2],
}

impl ShapeUniform {
    fn new(viewport: Viewport, transform: Transform) -> Self {
        let (sin, cos) = transform.angle_degrees.to_radians().sin_cos();
        Self {
            viewport: viewport.clamped(),
            center: [transform.center.x, transform.center.y],
            rotation: [cos, sin],
            _pad: [0.0; 2],
        }
    }
}

/// Lays `slots` out at `stride`-byte intervals, zero padded.
fn uniform_bytes(slots: &[ShapeUniform], stride: usize) -> Vec<u8> {
    let size = std::mem::size_of::<ShapeUniform>();
    let mut bytes = vec![0u8; slots.len() * stride];
    for (chunk, slot) in bytes.chunks_exact_mut(stride).zip(slots) {
        chunk[..size].copy_from_slice(bytemuck::bytes_of(slot));
    }
    bytes
}

fn uniform_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ShapeUniform>() as u64)
        .expect("ShapeUniform has non-zero size by construction")
}

fn topology_for(mode: DrawMode) -> Option<wgpu::PrimitiveTopology> {
    match mode {
        DrawMode::Lines => Some(wgpu::PrimitiveTopology::LineList),
        DrawMode::LineStrip => Some(wgpu::PrimitiveTopology::LineStrip),
        DrawMode::Triangles => Some(wgpu::PrimitiveTopology::TriangleList),
        DrawMode::TriangleStrip => Some(wgpu::PrimitiveTopology::TriangleStrip),
        DrawMode::LineLoop | DrawMode::TriangleFan => None,
    }
}

fn strip_index_format(topology: wgpu::PrimitiveTopology) -> Option<wgpu::IndexFormat> {
    match topology {
        wgpu::PrimitiveTopology::LineStrip | wgpu::PrimitiveTopology::TriangleStrip => {
            Some(wgpu::IndexFormat::Uint32)
        }
        _ => None,
    }
}
