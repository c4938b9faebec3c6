/// Terminal front end: input, frame loop and character output for a lumen scene
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::info;
use lumen_core::{Camera, CameraMovement, LightingModel, Scene, ShaderLibrary};
use nalgebra::Point3;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;
pub mod shading;

pub use renderer::Framebuffer;
pub use shading::AsciiProgram;

/// Seconds of camera travel per key press
const MOVE_STEP: f32 = 0.1;
/// Raw look offset per arrow key press, scaled by the camera sensitivity
const LOOK_STEP: f32 = 50.0;
/// Spot cone adjustment per key press, in degrees
const CONE_STEP: f32 = 5.0;
/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub target_fps: u32,
    pub camera_position: Point3<f32>,
    pub follow_spot: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            camera_position: Point3::new(0.0, 2.0, 5.0),
            follow_spot: false,
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    camera: Camera,
    library: ShaderLibrary<AsciiProgram>,
    framebuffer: Framebuffer,
    target_fps: u32,
    follow_spot: bool,
    follow_point: bool,
    running: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

/// Camera aspect for a grid of terminal cells
fn cell_aspect(width: u16, height: u16) -> f32 {
    width as f32 / (height.max(1) as f32 * CELL_ASPECT)
}

impl TerminalApp {
    pub fn new(scene: Scene, config: AppConfig) -> Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;

        let mut library = ShaderLibrary::new();
        for model in LightingModel::ALL {
            library.insert(model, AsciiProgram::new(model));
        }

        Ok(Self {
            scene,
            camera: Camera::new(config.camera_position, cell_aspect(width, height)),
            library,
            framebuffer: Framebuffer::new(width as usize, height as usize),
            target_fps: config.target_fps.max(1),
            follow_spot: config.follow_spot,
            follow_point: false,
            running: true,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.target_fps as u64);
        let mut last_update = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            let delta_time = last_update.elapsed().as_secs_f32();
            last_update = Instant::now();
            self.update(delta_time);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        info!("Leaving render loop");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.framebuffer.resize(width as usize, height as usize);
                self.camera.aspect = cell_aspect(width, height);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') => self.camera.process_movement(CameraMovement::Forward, MOVE_STEP),
            KeyCode::Char('s') => self.camera.process_movement(CameraMovement::Backward, MOVE_STEP),
            KeyCode::Char('a') => self.camera.process_movement(CameraMovement::Left, MOVE_STEP),
            KeyCode::Char('d') => self.camera.process_movement(CameraMovement::Right, MOVE_STEP),
            KeyCode::Char(' ') => self.camera.process_movement(CameraMovement::Up, MOVE_STEP),
            KeyCode::Char('c') => self.camera.process_movement(CameraMovement::Down, MOVE_STEP),
            KeyCode::Up => self.camera.process_rotation(0.0, LOOK_STEP, true),
            KeyCode::Down => self.camera.process_rotation(0.0, -LOOK_STEP, true),
            KeyCode::Left => self.camera.process_rotation(-LOOK_STEP, 0.0, true),
            KeyCode::Right => self.camera.process_rotation(LOOK_STEP, 0.0, true),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.process_zoom(1.0),
            KeyCode::Char('-') => self.camera.process_zoom(-1.0),
            KeyCode::Char('f') => {
                self.follow_spot = !self.follow_spot;
                info!("Spot light follow {}", if self.follow_spot { "on" } else { "off" });
            }
            KeyCode::Char('p') => {
                self.follow_point = !self.follow_point;
                info!("Point light follow {}", if self.follow_point { "on" } else { "off" });
            }
            KeyCode::Char(']') => self.scene.increase_spot_light_inner_cut_off(CONE_STEP),
            KeyCode::Char('[') => self.scene.decrease_spot_light_inner_cut_off(CONE_STEP),
            _ => {}
        }
    }

    fn update(&mut self, delta_time: f32) {
        self.scene.update(delta_time);

        if self.follow_spot {
            self.scene.sync_spot_light_with_camera(&self.camera);
        }
        if self.follow_point {
            self.scene.sync_point_light_with_camera(&self.camera);
        }
    }

    fn render(&mut self) -> Result<()> {
        // Clear renderer
        self.framebuffer.clear();

        // Render scene
        self.scene
            .render(&self.camera, &mut self.library, &mut self.framebuffer)?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.framebuffer.draw(&mut stdout)?;

        // Draw UI overlay
        let cone = match self.scene.spot_light_inner_cut_off_degrees() {
            angle if angle < 0.0 => "off".to_string(),
            angle => format!("{:.0}deg", angle),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Lumen | FPS: {:.1} | Cone: {} | WASD/Space/C=Move Arrows=Look +/-=Zoom F/P=Follow [/]=Cone Q=Quit",
                self.fps, cone
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
