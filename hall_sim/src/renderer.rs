//! Hall effect scene rendering
//!
//! Three pipelines share one camera: filled triangles (conductor body),
//! line lists (outline, centerline, velocity arrow) and instanced round
//! sprites (the carrier).

use common::{create_uniform_buffer, create_vertex_buffer, Camera2D, CameraUniform, GraphicsContext, Vertex};
use glam::{DVec2, Vec2};

use crate::carrier::{Carrier, Polarity};
use crate::geometry::Geometry;

/// Scene background, rgb(20, 20, 40)
pub const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 20.0 / 255.0,
    g: 20.0 / 255.0,
    b: 40.0 / 255.0,
    a: 1.0,
};

const CONDUCTOR_FILL: [f32; 4] = [50.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0, 1.0];
const CONDUCTOR_OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const CENTERLINE: [f32; 4] = [0.6, 0.6, 0.6, 0.35];
const VELOCITY_ARROW: [f32; 4] = [1.0, 0.85, 0.2, 0.9];

/// Seconds of travel the velocity arrow represents
const ARROW_TIME: f32 = 0.25;

/// Instance data for round sprites
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl PointInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        2 => Float32x3,  // position
        3 => Float32,    // size
        4 => Float32x4,  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Quad corner for sprites
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Geometry for one frame
#[derive(Debug, Default, Clone)]
pub struct Scene {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
    pub points: Vec<PointInstance>,
}

fn to_vec2(v: DVec2) -> Vec2 {
    Vec2::new(v.x as f32, v.y as f32)
}

fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, color: [f32; 4]) {
    out.push(Vertex::new([a.x, a.y, 0.0], color));
    out.push(Vertex::new([b.x, b.y, 0.0], color));
}

impl Scene {
    /// Conductor body, outline and the dashed injection centerline
    pub fn add_conductor(&mut self, geometry: &Geometry) {
        let tl = Vec2::new(geometry.left() as f32, geometry.top() as f32);
        let br = Vec2::new(geometry.right() as f32, geometry.bottom() as f32);
        let tr = Vec2::new(br.x, tl.y);
        let bl = Vec2::new(tl.x, br.y);

        for corner in [tl, tr, br, tl, br, bl] {
            self.triangles
                .push(Vertex::new([corner.x, corner.y, 0.0], CONDUCTOR_FILL));
        }

        line(&mut self.lines, tl, tr, CONDUCTOR_OUTLINE);
        line(&mut self.lines, tr, br, CONDUCTOR_OUTLINE);
        line(&mut self.lines, br, bl, CONDUCTOR_OUTLINE);
        line(&mut self.lines, bl, tl, CONDUCTOR_OUTLINE);

        // Centerline through the carrier's center at injection
        let y = (geometry.vertical_center() + geometry.carrier_radius()) as f32;
        let dash = 20.0;
        let mut x = tl.x;
        while x < br.x {
            let end = (x + dash * 0.5).min(br.x);
            line(&mut self.lines, Vec2::new(x, y), Vec2::new(end, y), CENTERLINE);
            x += dash;
        }
    }

    /// Carrier disc plus an arrow along its velocity; `polarity` picks the color
    pub fn add_carrier(&mut self, carrier: &Carrier, polarity: Polarity, geometry: &Geometry) {
        let center = to_vec2(carrier.center(geometry));
        self.points.push(PointInstance {
            position: [center.x, center.y, 0.0],
            size: geometry.carrier_radius() as f32,
            color: polarity.color(),
        });

        let velocity = to_vec2(carrier.velocity) * ARROW_TIME;
        if velocity.length() < 1.0 {
            return;
        }

        let tip = center + velocity;
        let back = -velocity.normalize() * 8.0;
        line(&mut self.lines, center, tip, VELOCITY_ARROW);
        line(&mut self.lines, tip, tip + Vec2::from_angle(0.5).rotate(back), VELOCITY_ARROW);
        line(&mut self.lines, tip, tip + Vec2::from_angle(-0.5).rotate(back), VELOCITY_ARROW);
    }
}

/// Pixel rectangle of the window the scene is drawn into
///
/// Everything outside it belongs to the UI panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneViewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SceneViewport {
    pub fn full(surface_width: u32, surface_height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: surface_width.max(1) as f32,
            height: surface_height.max(1) as f32,
        }
    }

    /// Viewport from a rectangle in UI points, clamped to the surface
    ///
    /// An empty or inverted rectangle falls back to the whole surface.
    pub fn from_points(
        min: Vec2,
        max: Vec2,
        pixels_per_point: f32,
        surface_width: u32,
        surface_height: u32,
    ) -> Self {
        let full = Self::full(surface_width, surface_height);
        let scale = if pixels_per_point > 0.0 { pixels_per_point } else { 1.0 };
        let surface = Vec2::new(full.width, full.height);

        let lo = (min * scale).clamp(Vec2::ZERO, surface);
        let hi = (max * scale).clamp(Vec2::ZERO, surface);
        let size = hi - lo;
        if !(size.x >= 1.0 && size.y >= 1.0) {
            return full;
        }

        Self {
            x: lo.x,
            y: lo.y,
            width: size.x,
            height: size.y,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// Renderer for the Hall effect scene
pub struct HallRenderer {
    fill_pipeline: wgpu::RenderPipeline,
    triangle_buffer: wgpu::Buffer,
    max_triangle_vertices: usize,

    line_pipeline: wgpu::RenderPipeline,
    line_buffer: wgpu::Buffer,
    max_line_vertices: usize,

    point_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    point_buffer: wgpu::Buffer,
    max_points: usize,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

fn alpha_blend_target(format: wgpu::TextureFormat) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        }),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

impl HallRenderer {
    pub fn new(ctx: &GraphicsContext, max_points: usize, max_lines: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Hall Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/hall.wgsl").into()),
        });

        let camera_buffer = create_uniform_buffer(device, &CameraUniform::from_camera_2d(&Camera2D::new(1.0)));

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Hall Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let targets = alpha_blend_target(ctx.config.format);

        let flat_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_flat",
                    buffers: &[Vertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_flat",
                    targets: &targets,
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let fill_pipeline = flat_pipeline("Fill Pipeline", wgpu::PrimitiveTopology::TriangleList);
        let line_pipeline = flat_pipeline("Line Pipeline", wgpu::PrimitiveTopology::LineList);

        let point_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_point",
                buffers: &[QuadVertex::layout(), PointInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_point",
                targets: &targets,
                compilation_options: Default::default(),
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
            multiview: None,
        });

        let quad_buffer = create_vertex_buffer(device, "Quad Buffer", QUAD_VERTICES);

        // Conductor body only: two triangles
        let max_triangle_vertices = 6;
        let triangle_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Triangle Buffer"),
            size: (std::mem::size_of::<Vertex>() * max_triangle_vertices) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let point_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point Instance Buffer"),
            size: (std::mem::size_of::<PointInstance>() * max_points) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let max_line_vertices = max_lines * 2;
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Buffer"),
            size: (std::mem::size_of::<Vertex>() * max_line_vertices) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            fill_pipeline,
            triangle_buffer,
            max_triangle_vertices,
            line_pipeline,
            line_buffer,
            max_line_vertices,
            point_pipeline,
            quad_buffer,
            point_buffer,
            max_points,
            camera_buffer,
            camera_bind_group,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera2D) {
        let uniform = CameraUniform::from_camera_2d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload the scene; returns the (triangle vertices, line vertices, points) drawn
    pub fn upload(&self, queue: &wgpu::Queue, scene: &Scene) -> (u32, u32, u32) {
        let triangles = &scene.triangles[..scene.triangles.len().min(self.max_triangle_vertices)];
        // Keep whole segments only
        let line_count = scene.lines.len().min(self.max_line_vertices) & !1;
        let lines = &scene.lines[..line_count];
        let points = &scene.points[..scene.points.len().min(self.max_points)];

        queue.write_buffer(&self.triangle_buffer, 0, bytemuck::cast_slice(triangles));
        queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(lines));
        queue.write_buffer(&self.point_buffer, 0, bytemuck::cast_slice(points));

        (triangles.len() as u32, lines.len() as u32, points.len() as u32)
    }

    /// Clear to the background and draw fills, then lines, then sprites,
    /// all inside `viewport`
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        viewport: SceneViewport,
        counts: (u32, u32, u32),
    ) {
        let (triangles, lines, points) = counts;

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_viewport(viewport.x, viewport.y, viewport.width, viewport.height, 0.0, 1.0);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if triangles > 0 {
            render_pass.set_pipeline(&self.fill_pipeline);
            render_pass.set_vertex_buffer(0, self.triangle_buffer.slice(..));
            render_pass.draw(0..triangles, 0..1);
        }

        if lines > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            render_pass.draw(0..lines, 0..1);
        }

        if points > 0 {
            render_pass.set_pipeline(&self.point_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.point_buffer.slice(..));
            render_pass.draw(0..6, 0..points);
        }
    }
}
