//! Terminal frontend for the stereo line viewer

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{error, info};
use std::io::{stdout, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use stereoview_core::{EventSource, InputEvent, RenderBackend, Section, StereoViewer, ViewerConfig};

pub mod canvas;
pub mod export;
pub mod input;
pub mod model;
pub mod raster;
pub mod renderer;

pub use canvas::Canvas;
pub use renderer::AsciiRenderer;

use input::{Command, TerminalInput};

/// Drains pending crossterm events. Viewer input is handed to the viewer;
/// everything else is queued for the app.
struct TerminalEvents<'a> {
    commands: &'a mut Vec<Command>,
}

impl EventSource for TerminalEvents<'_> {
    fn poll_event(&mut self) -> stereoview_core::Result<Option<InputEvent>> {
        while event::poll(Duration::ZERO)? {
            match input::translate(&event::read()?) {
                Some(TerminalInput::Viewer(event)) => return Ok(Some(event)),
                Some(TerminalInput::App(command)) => self.commands.push(command),
                None => {}
            }
        }
        Ok(None)
    }
}

/// Main application struct for terminal stereo rendering
pub struct TerminalApp {
    viewer: StereoViewer,
    renderer: AsciiRenderer,
    config: ViewerConfig,
    status: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig, sections: Vec<Section>) -> Result<Self> {
        let (width, height) = terminal::size()?;

        let mut viewer = StereoViewer::new(&config);
        viewer.set_data(Arc::from(sections)).context("failed to load model")?;

        let mut app = Self {
            viewer,
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            config,
            status: String::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.sync_window_size();
        Ok(app)
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        let mut commands = Vec::new();

        loop {
            let frame_start = Instant::now();

            let mut source = TerminalEvents { commands: &mut commands };
            if !self.viewer.process_events(&mut source, &mut self.renderer)? {
                break;
            }
            for command in commands.drain(..) {
                self.apply(command);
            }

            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("viewer closed");
        Ok(())
    }

    fn apply(&mut self, command: Command) {
        let result = match command {
            Command::ScaleEyeDistance(factor) => {
                let distance = self.viewer.projector().eye_distance * factor;
                self.viewer.set_eye_distance(distance)
            }
            Command::ShiftFocus(delta) => {
                let focus = self.viewer.projector().eye_target + delta;
                self.viewer.set_eye_focus(focus)
            }
            Command::Resize(width, height) => {
                self.renderer.resize(width as usize, height.saturating_sub(1) as usize);
                self.sync_window_size();
                Ok(())
            }
            Command::Export => {
                self.export();
                Ok(())
            }
        };
        if let Err(e) = result {
            error!("{:?} failed: {}", command, e);
            self.status = format!("error: {}", e);
        }
    }

    fn export(&mut self) {
        let settings = &self.config.export;
        match export::export_view(
            &self.viewer,
            &settings.path,
            settings.width,
            settings.height,
            settings.window_aspect,
        ) {
            Ok(()) => self.status = format!("saved {}", settings.path.display()),
            Err(e) => {
                error!("export to {} failed: {}", settings.path.display(), e);
                self.status = format!("export failed: {}", e);
            }
        }
    }

    fn sync_window_size(&mut self) {
        let (width, height) = self.renderer.size();
        self.viewer.set_window_size(width, height);
    }

    fn present(&mut self) -> Result<()> {
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay on the last row
        let (_, rows) = terminal::size()?;
        let projector = self.viewer.projector();
        queue!(
            stdout,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Stereoview | FPS: {:.1} | eye {:.3} focus {:.1} zoom {:.2} | drag=rotate wheel=zoom arrows=pan [ ]=eye , .=focus p=save q=quit {}",
                self.fps,
                projector.eye_distance,
                projector.eye_target,
                self.viewer.camera().zoom,
                self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
