// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Renderer
//!
//! Owns every Vulkan object the triangle needs.  Fields are declared newest first because Rust
//! drops fields in declaration order, which gives reverse creation order on teardown.  During
//! `new`, the same holds for the locals, so an error at any step releases exactly what was already
//! created.

use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, info};

use crate::command::Commands;
use crate::device::{AshProbe, LogicalDevice};
use crate::framebuffer::Framebuffers;
use crate::instance::Instance;
use crate::pipeline::GraphicsPipeline;
use crate::prelude::*;
use crate::render_pass::RenderPass;
use crate::selection::{self, SurfaceConfig};
use crate::surface::Surface;
use crate::swapchain::Swapchain;
use crate::sync::FrameSync;

#[derive(Clone, Copy, Debug)]
pub struct RendererConfig {
    /// Enable `VK_LAYER_KHRONOS_validation` and route its messages to the log.
    pub validation: bool,
    /// The window's drawable size, used when the surface lets us pick the extent.
    pub extent: vk::Extent2D,
}

pub struct Renderer {
    sync: FrameSync,
    commands: Commands,
    framebuffers: Framebuffers,
    pipeline: GraphicsPipeline,
    render_pass: RenderPass,
    swapchain: Swapchain,
    device: LogicalDevice,
    pub physical_device: vk::PhysicalDevice,
    pub surface_config: SurfaceConfig,
    _surface: Surface,
    _instance: Instance,
}

impl Renderer {
    /// Run every setup step against `window`.  The window must outlive the renderer.
    pub fn new<W>(config: &RendererConfig, window: &W) -> Result<Self, SetupError>
    where
        W: HasDisplayHandle + HasWindowHandle,
    {
        let display = window.display_handle()?.as_raw();
        let window_handle = window.window_handle()?.as_raw();

        let instance = Instance::new(display, config.validation)?;
        let surface = Surface::new(&instance, display, window_handle)?;

        let probe = AshProbe {
            instance: &instance.instance,
            surface: &surface,
        };
        let selected = selection::select_device(&probe)?;
        let surface_config = SurfaceConfig::choose(&selected, config.extent)?;
        debug!(?surface_config, "surface configuration");

        let device = LogicalDevice::new(&instance.instance, selected.device, selected.families)?;
        let swapchain = Swapchain::new(&instance, &device.device, &surface, &surface_config)?;
        info!(
            images = swapchain.images.len(),
            width = swapchain.extent.width,
            height = swapchain.extent.height,
            "swap chain created"
        );

        let render_pass = RenderPass::new(&device.device, swapchain.format)?;
        let pipeline = GraphicsPipeline::new(&device.device, render_pass.render_pass)?;
        let framebuffers = Framebuffers::new(
            &device.device,
            render_pass.render_pass,
            &swapchain.image_views,
            swapchain.extent,
        )?;
        let commands = Commands::new(&device.device, device.queues.families.graphics)?;
        let sync = FrameSync::new(&device.device, swapchain.images.len())?;

        Ok(Self {
            sync,
            commands,
            framebuffers,
            pipeline,
            render_pass,
            swapchain,
            device,
            physical_device: selected.device,
            surface_config,
            _surface: surface,
            _instance: instance,
        })
    }

    pub fn image_count(&self) -> usize {
        self.swapchain.images.len()
    }

    /// Wait for the previous frame, then record, submit, and present the next one.
    pub fn draw_frame(&mut self) -> Result<(), SetupError> {
        self.sync.wait_in_flight()?;

        let (image_index, suboptimal) =
            self.swapchain.acquire_next_image(self.sync.image_available)?;
        if suboptimal {
            debug!("acquired suboptimal swap chain image");
        }

        self.commands.record(
            self.render_pass.render_pass,
            self.framebuffers.framebuffers[image_index as usize],
            self.swapchain.extent,
            &self.pipeline,
        )?;

        let wait_semaphores = [self.sync.image_available];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [self.commands.command_buffer];
        let render_finished = self.sync.render_finished(image_index);
        let signal_semaphores = [render_finished];
        let submit = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        // Reset only now, so a failure above cannot leave the next wait hanging.
        self.sync.reset_in_flight()?;
        unsafe {
            self.device.device.queue_submit(
                self.device.queues.graphics,
                &[submit],
                self.sync.in_flight,
            )
        }
        .context("failed to submit draw command buffer")?;

        let suboptimal = self.swapchain.present(
            self.device.queues.present,
            image_index,
            render_finished,
        )?;
        if suboptimal {
            debug!("presented to suboptimal swap chain");
        }

        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Nothing may be in use once the fields start dropping.
        if let Err(e) = self.device.wait_idle() {
            tracing::error!("{e}");
        }
        debug!("releasing Vulkan resources");
    }
}
