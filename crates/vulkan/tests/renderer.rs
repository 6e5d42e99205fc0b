// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Needs a display, a Vulkan driver with the Khronos validation layer, and compiled shaders.  Run
//! with `--ignored` and `HELLO_ASSETS_DIR` pointing at `hello-triangle/assets`.

#![cfg(target_os = "linux")]

use ash::vk;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::x11::EventLoopBuilderExtX11,
    window::{Window, WindowId},
};

use hello_vulkan::debug::validation_error_count;
use hello_vulkan::prelude::*;

/// Draws enough frames to cycle through every swapchain image more than once.
#[derive(Default)]
struct CycleImages {
    frames: usize,
    result: Option<Result<(), SetupError>>,
}

impl ApplicationHandler for CycleImages {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = event_loop
            .create_window(Window::default_attributes().with_visible(false))
            .unwrap();
        let size = window.inner_size();
        let config = RendererConfig {
            validation: true,
            extent: vk::Extent2D {
                width: size.width,
                height: size.height,
            },
        };
        self.result = Some(Renderer::new(&config, &window).and_then(|mut renderer| {
            let frames = renderer.image_count() * 3;
            for _ in 0..frames {
                renderer.draw_frame()?;
                self.frames += 1;
            }
            Ok(())
        }));
        event_loop.exit();
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

#[test]
#[ignore]
fn renderer_cycles_images_without_validation_errors() {
    let errors_before = validation_error_count();

    let event_loop = EventLoop::builder().with_any_thread(true).build().unwrap();
    let mut app = CycleImages::default();
    event_loop.run_app(&mut app).unwrap();

    app.result.unwrap().unwrap();
    assert!(app.frames >= 3);
    assert_eq!(validation_error_count(), errors_before);
}
