//! wgpu-backed [`RenderContext`] for one surface canvas.

mod helpers;

use crate::dom::{self, AttachedCanvas};
use helpers::{create_depth_texture, Mesh, Program};
use instant::Instant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use surface_core::{AcquireRequest, Geometry, RenderContext, SurfaceError, SurfaceSize};
use web_sys as web;

fn acquisition<E: std::fmt::Display>(err: E) -> SurfaceError {
    SurfaceError::ContextAcquisition(err.to_string())
}

/// Fail an acquisition that already owns a device; nothing is left for the GC.
fn abandon<E: std::fmt::Display>(
    device: &wgpu::Device,
    canvas: &web::HtmlCanvasElement,
    err: E,
) -> SurfaceError {
    device.destroy();
    dom::lose_webgl_context(canvas);
    acquisition(err)
}

pub struct GpuContext {
    canvas: AttachedCanvas,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    program: Program,
    mesh: Mesh,
    depth: Option<wgpu::TextureView>,
    clear: wgpu::Color,
    max_dimension: u32,
    lost: Arc<AtomicBool>,
}

impl GpuContext {
    /// Build a context for `request` and append its canvas to `container`.
    ///
    /// The canvas is only attached once every GPU object exists, so a failed
    /// acquisition leaves the container untouched.
    pub async fn acquire(
        container: &web::Element,
        class_name: &str,
        request: &AcquireRequest,
    ) -> Result<Self, SurfaceError> {
        let started = Instant::now();
        let canvas = dom::create_canvas(class_name).map_err(acquisition)?;
        let size = request.size.unwrap_or(SurfaceSize {
            width: canvas.width(),
            height: canvas.height(),
            css_width: 0.0,
            css_height: 0.0,
        });

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(acquisition)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| acquisition("no GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some(request.program.label),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await
            .map_err(acquisition)?;

        let lost = Arc::new(AtomicBool::new(false));
        {
            let lost = lost.clone();
            device.set_device_lost_callback(move |reason, message| {
                lost.store(true, Ordering::Release);
                if !matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                    log::warn!("[gpu] device lost: {}", message);
                }
            });
        }
        {
            let lost = lost.clone();
            device.on_uncaptured_error(Box::new(move |err: wgpu::Error| {
                lost.store(true, Ordering::Release);
                log::warn!("[gpu] {}", err);
            }));
        }

        let caps = surface.get_capabilities(&adapter);
        // Shaders write display-referred values; avoid a second sRGB encode.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| abandon(&device, &canvas, "surface reports no formats"))?;
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let max_dimension = device.limits().max_texture_dimension_2d;
        let size = size.clamped(max_dimension);
        canvas.set_width(size.width);
        canvas.set_height(size.height);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let geometry = &request.geometry;
        let depth = geometry.is_indexed();
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let program = Program::new(
            &device,
            &request.program,
            geometry.layout.as_ref(),
            format,
            depth,
        );
        let mesh = Mesh::upload(&device, geometry);
        if let Some(err) = device.pop_error_scope().await {
            return Err(abandon(&device, &canvas, err));
        }
        let depth = depth.then(|| create_depth_texture(&device, size.width, size.height));

        let [r, g, b, a] = request.policy.clear;
        let canvas = AttachedCanvas::append(container, canvas.clone())
            .map_err(|e| abandon(&device, &canvas, e))?;
        log::info!(
            "[gpu] {} ready {}x{} in {:.0} ms",
            request.program.label,
            size.width,
            size.height,
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            program,
            mesh,
            depth,
            clear: wgpu::Color { r, g, b, a },
            max_dimension,
            lost,
        })
    }
}

impl RenderContext for GpuContext {
    fn set_size(&mut self, size: SurfaceSize) {
        let size = size.clamped(self.max_dimension);
        if size.width == self.config.width && size.height == self.config.height {
            return;
        }
        self.canvas.element().set_width(size.width);
        self.canvas.element().set_height(size.height);
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        if self.depth.is_some() {
            self.depth = Some(create_depth_texture(&self.device, size.width, size.height));
        }
    }

    fn rebuild_geometry(&mut self, geometry: &Geometry) -> Result<(), SurfaceError> {
        if self.lost.load(Ordering::Acquire) {
            return Err(SurfaceError::ContextLost("device lost".into()));
        }
        self.mesh = Mesh::upload(&self.device, geometry);
        Ok(())
    }

    fn draw(&mut self, uniforms: &[u8]) -> Result<(), SurfaceError> {
        if self.lost.load(Ordering::Acquire) {
            return Err(SurfaceError::ContextLost("device lost".into()));
        }
        self.queue
            .write_buffer(&self.program.uniform_buffer, 0, uniforms);
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(err) => return Err(SurfaceError::ContextLost(err.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("surface_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("surface_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth.as_ref().map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.program.pipeline);
            rpass.set_bind_group(0, &self.program.bind_group, &[]);
            self.mesh.draw(&mut rpass);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn release(self) {
        self.device.destroy();
        dom::lose_webgl_context(self.canvas.element());
        log::info!("[gpu] context released");
        // Dropping the guard detaches the canvas.
    }
}
