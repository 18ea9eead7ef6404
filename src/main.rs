use anyhow::{Context, Result};
use arboard::Clipboard;
use clap::Parser;
use gridcaster::{Axis, Config, FrameClock, InputState, MotionInput, RenderError, Simulation};
use log::{error, info, warn};
use macroquad::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about = "Textured grid raycaster", long_about = None)]
struct CliArgs {
    /// Configuration file
    #[arg(long, value_name = "PATH", default_value = "config.toml")]
    config: PathBuf,

    /// Map layout file, overriding `[map].path`
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Cast one frame from the start pose, print the rays as JSON and exit
    #[arg(long)]
    dump_rays: bool,
}

fn poll_input() -> InputState {
    InputState {
        motion: MotionInput {
            walk: Axis::from_keys(
                is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
                is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            ),
            turn: Axis::from_keys(
                is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
                is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            ),
        },
        quit: is_key_pressed(KeyCode::Escape) || is_quit_requested(),
        snapshot: is_key_pressed(KeyCode::C),
    }
}

fn copy_snapshot(sim: &Simulation) {
    let snapshot = sim.snapshot_text();
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(&snapshot) {
                warn!("Failed to copy to clipboard: {}", e);
            } else {
                info!("Map snapshot copied to clipboard");
                // Keep clipboard alive for a moment so clipboard managers can capture it
                std::thread::sleep(Duration::from_millis(100));
            }
        }
        Err(e) => {
            warn!("Failed to access clipboard: {}", e);
        }
    }
}

/// Frame loop; the shutdown result is left in `outcome` for `main` to report
/// once the window is gone
async fn run(mut sim: Simulation, budget: Duration, outcome: Rc<RefCell<Result<(), RenderError>>>) {
    prevent_quit();

    // screen edges are bounded to u16 when the simulation is built
    let (width, height) = (sim.frame().width() as u16, sim.frame().height() as u16);
    let mut image = Image::gen_image_color(width, height, BLACK);
    let screen = Texture2D::from_image(&image);
    screen.set_filter(FilterMode::Nearest);

    let mut clock = FrameClock::new(budget);

    while sim.is_running() {
        let input = poll_input();
        if input.quit {
            sim.stop();
        }
        if input.snapshot {
            copy_snapshot(&sim);
        }

        let dt = clock.tick();
        if let Err(e) = sim.step(dt, input.motion) {
            error!("Render failed: {}", e);
            sim.abort(e);
        }

        sim.frame().write_rgba(&mut image.bytes);
        screen.update(&image);
        clear_background(BLACK);
        draw_texture(&screen, 0.0, 0.0, WHITE);

        next_frame().await
    }

    *outcome.borrow_mut() = sim.shutdown();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let mut config = Config::load(&args.config);
    if let Some(path) = &args.map {
        config.map.path = Some(path.display().to_string());
    }

    let mut sim = Simulation::from_config(&config).context("Failed to set up the renderer")?;

    if args.dump_rays {
        sim.cast();
        println!("{}", serde_json::to_string_pretty(sim.rays())?);
        sim.shutdown()?;
        return Ok(());
    }

    info!(
        "Opening {}x{} window, {} fps cap",
        config.window.width, config.window.height, config.frame.target_fps
    );
    let window = Conf {
        window_title: config.window.title.clone(),
        window_width: config.window.width as i32,
        window_height: config.window.height as i32,
        window_resizable: false,
        ..Default::default()
    };
    let outcome = Rc::new(RefCell::new(Ok(())));
    macroquad::Window::from_config(
        window,
        run(sim, config.frame.frame_budget(), Rc::clone(&outcome)),
    );

    let result = outcome.replace(Ok(()));
    result.context("Frame loop stopped on a render error")
}
