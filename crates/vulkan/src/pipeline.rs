// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Pipeline
//!
//! The triangle pipeline.  Vertex positions and colors live in the vertex shader, so there is no
//! vertex input and the layout is empty.

use ash::vk;

use hello_assets as assets;

use crate::prelude::*;

pub const VERTEX_SHADER: &str = "triangle/vertex";
pub const FRAGMENT_SHADER: &str = "triangle/fragment";

pub struct GraphicsPipeline {
    pub pipeline_layout: vk::PipelineLayout,
    pub pipeline: vk::Pipeline,
    device: ash::Device,
}

impl GraphicsPipeline {
    pub fn new(device: &ash::Device, render_pass: vk::RenderPass) -> Result<Self, SetupError> {
        let assets = assets::AssetDirs::new();
        let vert_spv = assets.find_shader(VERTEX_SHADER)?;
        let frag_spv = assets.find_shader(FRAGMENT_SHADER)?;

        // Modules are only needed until the pipeline exists.
        let vert_module = ShaderModule::new(device, &vert_spv)?;
        let frag_module = ShaderModule::new(device, &frag_spv)?;

        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vert_module.module)
                .name(c"main"),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(frag_module.module)
                .name(c"main"),
        ];

        let vertex_input_info = vk::PipelineVertexInputStateCreateInfo::default();

        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo {
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            primitive_restart_enable: vk::FALSE,
            ..Default::default()
        };

        // Set per draw.  See `dynamic_states`.
        let viewport_state = vk::PipelineViewportStateCreateInfo {
            viewport_count: 1,
            scissor_count: 1,
            ..Default::default()
        };

        let rasterizer = vk::PipelineRasterizationStateCreateInfo {
            polygon_mode: vk::PolygonMode::FILL,
            line_width: 1.0,
            cull_mode: vk::CullModeFlags::BACK,
            front_face: vk::FrontFace::CLOCKWISE,
            ..Default::default()
        };

        let multisampling = vk::PipelineMultisampleStateCreateInfo {
            rasterization_samples: vk::SampleCountFlags::TYPE_1,
            min_sample_shading: 1.0,
            ..Default::default()
        };

        let color_blend_attachments = [vk::PipelineColorBlendAttachmentState {
            color_write_mask: vk::ColorComponentFlags::RGBA,
            blend_enable: vk::FALSE,
            ..Default::default()
        }];

        let color_blend = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op(vk::LogicOp::COPY)
            .attachments(&color_blend_attachments);

        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state_info =
            vk::PipelineDynamicStateCreateInfo::default().dynamic_states(&dynamic_states);

        let pipeline_layout_info = vk::PipelineLayoutCreateInfo::default();
        let pipeline_layout = unsafe { device.create_pipeline_layout(&pipeline_layout_info, None) }
            .context("failed to create pipeline layout")?;

        // The layout now needs cleanup if pipeline creation fails.  Destroying a null pipeline is
        // allowed.
        let mut created = Self {
            pipeline_layout,
            pipeline: vk::Pipeline::null(),
            device: device.clone(),
        };

        let pipeline_ci = vk::GraphicsPipelineCreateInfo::default()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_info)
            .input_assembly_state(&input_assembly)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterizer)
            .multisample_state(&multisampling)
            .color_blend_state(&color_blend)
            .dynamic_state(&dynamic_state_info)
            .layout(pipeline_layout)
            .render_pass(render_pass)
            .subpass(0);

        let pipelines = unsafe {
            device.create_graphics_pipelines(vk::PipelineCache::null(), &[pipeline_ci], None)
        }
        .map_err(|(_, result)| result)
        .context("failed to create graphics pipeline")?;
        created.pipeline = pipelines[0];

        Ok(created)
    }

    /// Bind the pipeline, cover `extent`, and draw the three hardcoded vertices.
    pub fn draw(&self, cb: vk::CommandBuffer, extent: vk::Extent2D) {
        let device = &self.device;
        let viewport = vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };

        let scissor = vk::Rect2D {
            offset: vk::Offset2D::default(),
            extent,
        };

        unsafe {
            device.cmd_bind_pipeline(cb, vk::PipelineBindPoint::GRAPHICS, self.pipeline);
            device.cmd_set_viewport(cb, 0, &[viewport]);
            device.cmd_set_scissor(cb, 0, &[scissor]);

            // The triangle ▲
            device.cmd_draw(cb, 3, 1, 0, 0);
        }
    }
}

impl Drop for GraphicsPipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
            self.device
                .destroy_pipeline_layout(self.pipeline_layout, None);
        }
    }
}

struct ShaderModule {
    module: vk::ShaderModule,
    device: ash::Device,
}

impl ShaderModule {
    fn new(device: &ash::Device, spv: &[u32]) -> Result<Self, SetupError> {
        let module_ci = vk::ShaderModuleCreateInfo::default().code(spv);
        let module = unsafe { device.create_shader_module(&module_ci, None) }
            .context("failed to create shader module")?;
        Ok(Self {
            module,
            device: device.clone(),
        })
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        unsafe { self.device.destroy_shader_module(self.module, None) };
    }
}
