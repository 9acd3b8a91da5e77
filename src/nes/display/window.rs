//! Concrete `DisplaySink`/`Clock`/`EventPoll` built on `piston_window`. This
//! is the only module in the core that depends on a real window toolkit;
//! everything else talks to the traits in the parent module.

use std::time::{Duration, Instant};

use piston_window::*;

use crate::nes::display::{Clock, DisplaySink, EventPoll, Quit};
use crate::nes::ppu::constants::{FRAME_HEIGHT, FRAME_WIDTH};

/// How much the native 256x240 frame is scaled up for an on-screen window.
const SCALE: u32 = 2;

pub struct PistonDisplay {
    window: PistonWindow,
    texture_context: G2dTextureContext,
    screen: image::RgbaImage,
    texture: G2dTexture,
    pending_render: Option<Event>,
}

impl PistonDisplay {
    pub fn new(title: &str) -> Result<Self, String> {
        let win_w = FRAME_WIDTH as u32 * SCALE;
        let win_h = FRAME_HEIGHT as u32 * SCALE;

        let mut window: PistonWindow = WindowSettings::new(title, (win_w, win_h))
            .exit_on_esc(true)
            .build()
            .map_err(|e| format!("failed to create window: {}", e))?;

        let mut texture_context = TextureContext {
            factory: window.factory.clone(),
            encoder: window.factory.create_command_buffer().into(),
        };
        let screen = image::ImageBuffer::new(FRAME_WIDTH as u32, FRAME_HEIGHT as u32);
        let texture = Texture::from_image(&mut texture_context, &screen, &TextureSettings::new())
            .map_err(|e| format!("failed to create frame texture: {}", e))?;

        Ok(PistonDisplay {
            window,
            texture_context,
            screen,
            texture,
            pending_render: None,
        })
    }
}

impl DisplaySink for PistonDisplay {
    fn pixel(&mut self, x: u16, y: u16, rgb: u32) {
        let r = ((rgb >> 16) & 0xFF) as u8;
        let g = ((rgb >> 8) & 0xFF) as u8;
        let b = (rgb & 0xFF) as u8;
        self.screen
            .put_pixel(x as u32, y as u32, image::Rgba([r, g, b, 255]));
    }

    fn present(&mut self) {
        self.texture
            .update(&mut self.texture_context, &self.screen)
            .expect("failed to upload frame texture");

        if let Some(e) = self.pending_render.take() {
            let texture = &self.texture;
            let texture_context = &mut self.texture_context;
            self.window.draw_2d(&e, |c, g, device| {
                texture_context.encoder.flush(device);
                let transform = c.transform.scale(SCALE as f64, SCALE as f64);
                image(texture, transform, g);
            });
        }
    }
}

impl Clock for PistonDisplay {
    fn now_us(&self) -> u64 {
        // Relative to process start is sufficient: the scheduler only ever
        // compares two readings of this clock to each other.
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let start = START.get_or_init(Instant::now);
        start.elapsed().as_micros() as u64
    }

    fn sleep_us(&self, us: u64) {
        std::thread::sleep(Duration::from_micros(us));
    }
}

impl EventPoll for PistonDisplay {
    fn poll(&mut self) -> Option<Quit> {
        match self.window.next() {
            None => Some(Quit::UserRequested),
            Some(e) => {
                if e.render_args().is_some() {
                    self.pending_render = Some(e);
                }
                None
            }
        }
    }
}
