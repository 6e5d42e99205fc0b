// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::process::ExitCode;

use ash::vk;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard as kb,
    window::{Window, WindowId},
};

use hello_vulkan::prelude::*;

#[derive(Parser, Debug)]
#[command(about = "Draw one triangle with Vulkan", long_about = None)]
struct Args {
    /// Window width in pixels
    #[arg(long, env = "HELLO_WIDTH", default_value_t = 800)]
    width: u32,
    /// Window height in pixels
    #[arg(long, env = "HELLO_HEIGHT", default_value_t = 600)]
    height: u32,
    /// Enable the Khronos validation layer
    #[arg(
        long,
        env = "HELLO_VALIDATION",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new(),
        default_value_t = cfg!(debug_assertions),
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    validation: bool,
    /// Window title
    #[arg(long, default_value = "Vulkan")]
    title: String,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation: {0}")]
    Os(#[from] winit::error::OsError),
}

struct App {
    args: Args,
    // Declared before the window so it drops first.
    renderer: Option<Renderer>,
    window: Option<Window>,
    error: Option<AppError>,
}

impl App {
    fn new(args: Args) -> Self {
        Self {
            args,
            renderer: None,
            window: None,
            error: None,
        }
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = Window::default_attributes()
            .with_title(self.args.title.as_str())
            .with_inner_size(PhysicalSize::new(self.args.width, self.args.height))
            .with_resizable(false);
        let window = event_loop.create_window(attributes)?;

        let size = window.inner_size();
        let config = RendererConfig {
            validation: self.args.validation,
            extent: vk::Extent2D {
                width: size.width,
                height: size.height,
            },
        };
        let renderer = Renderer::new(&config, &window)?;
        info!(
            format = ?renderer.surface_config.format.format,
            present_mode = ?renderer.surface_config.present_mode,
            "renderer ready"
        );

        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: AppError) {
        self.renderer = None;
        self.error = Some(e);
        event_loop.exit();
    }

    /// Release the renderer while the window is still alive, then stop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.renderer = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.setup(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.repeat && event.state == ElementState::Pressed {
                    match event.physical_key {
                        kb::PhysicalKey::Code(kb::KeyCode::KeyQ)
                        | kb::PhysicalKey::Code(kb::KeyCode::Escape) => self.shutdown(event_loop),
                        _ => {}
                    }
                }
            }
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = self.renderer.as_mut() {
                    if let Err(e) = renderer.draw_frame() {
                        self.fail(event_loop, e.into());
                    }
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(args);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "parsed arguments");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
