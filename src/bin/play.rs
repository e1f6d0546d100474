//! Interactive raycast viewer.
//!
//! ```bash
//! cargo run --release -- 640
//! ```
//!
//! An `xres` of 128 runs the headless benchmark: a fixed frame count with an
//! average frame time report, no window.

use anyhow::Context;
use clap::Parser;
use minifb::{Window, WindowOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use gridfall::{
    render::{Frame, hud},
    sim::{caretake, read_input, sustain},
    world::{Field, Flow, Hero, Map, Portals, Sprites, TextureBank},
};

/// Horizontal resolution that selects the benchmark mode.
const BENCH_XRES: usize = 128;

#[derive(Parser)]
#[command(about = "Grid raycaster with billboard sprites and a steering field")]
struct Args {
    /// Horizontal resolution; 128 runs the headless benchmark instead.
    xres: usize,

    /// Vertical resolution.
    #[arg(long, default_value_t = 360)]
    yres: usize,

    /// Frame cap, also the benchmark's frame count.
    #[arg(long, default_value_t = 60)]
    fps: usize,

    /// Let the window pace frames instead of sleeping by hand.
    #[arg(long)]
    vsync: bool,

    /// Column-renderer worker threads; all hardware threads when omitted.
    #[arg(long)]
    threads: Option<usize>,

    /// Zone file (ceiling, walling, flooring grids); the built-in demo zone
    /// when omitted.
    #[arg(long)]
    zone: Option<PathBuf>,

    /// Portal file with "<x>,<y> <name>" lines; zones transit relative to it.
    #[arg(long)]
    portals: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let threads = args.threads.unwrap_or_else(|| {
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    });

    let mut map = match &args.zone {
        Some(path) => {
            Map::load(path).with_context(|| format!("loading zone {}", path.display()))?
        }
        None => Map::demo(),
    };
    let portals = match &args.portals {
        Some(path) => Some(
            Portals::load(path)
                .with_context(|| format!("loading portals {}", path.display()))?,
        ),
        None => None,
    };

    let bank = TextureBank::with_defaults();
    let mut hero = Hero::spawn(map.spawn());
    let mut sprites = Sprites::demo(&map);
    let mut field = Field::new(&map, hero.aura);
    let mut current = Flow::start(-0.15);
    let mut clouds = Flow::start(0.35);
    let mut frame = Frame::new(args.xres, args.yres, threads);

    if args.xres == BENCH_XRES {
        let t0 = Instant::now();
        for ticks in 0..args.fps as u32 {
            current.stream(ticks);
            clouds.stream(ticks);
            caretake(&mut sprites, &hero, &map, &mut field);
            frame.render(&hero, &mut sprites, &map, &bank, &current, &clouds, ticks / 6);
            hud::draw(&mut frame, &hero, ticks);
        }
        let avg = t0.elapsed().as_secs_f64() * 1000.0 / args.fps.max(1) as f64;
        println!(
            "rendered {} frames at {}x{}: avg {:.2} ms ({:.1} FPS)",
            args.fps, args.xres, args.yres, avg, 1000.0 / avg
        );
        return Ok(());
    }

    let mut win = Window::new("gridfall", args.xres, args.yres, WindowOptions::default())?;
    if args.vsync {
        win.set_target_fps(args.fps);
    }

    // ────────────────── frame-time reporting state ──────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let mut ticks: u32 = 0;
    while win.is_open() {
        let t0 = Instant::now();

        let cmd = read_input(&win);
        if cmd.quit {
            break;
        }
        sustain(&mut hero, &cmd, &map);
        current.stream(ticks);
        clouds.stream(ticks);
        caretake(&mut sprites, &hero, &map, &mut field);

        frame.render(&hero, &mut sprites, &map, &bank, &current, &clouds, ticks / 6);
        hud::draw(&mut frame, &hero, ticks);

        acc_time += t0.elapsed();
        acc_frames += 1;
        win.update_with_buffer(&frame.buffer, args.xres, args.yres)?;

        // Step through a portal: load the named zone from beside the portal
        // file and rebuild everything that hangs off the map.
        let transit = portals
            .as_ref()
            .and_then(|p| p.near(hero.pos, 0.75))
            .map(|p| p.name.clone());
        if let Some(name) = transit {
            let dir = args
                .portals
                .as_deref()
                .and_then(Path::parent)
                .unwrap_or(Path::new("."));
            match Map::load(dir.join(&name)) {
                Ok(next) => {
                    log::info!("transit to {name}");
                    map = next;
                    hero.pos = map.spawn();
                    sprites = Sprites::demo(&map);
                    field = Field::new(&map, hero.aura);
                }
                Err(err) => log::warn!("cannot transit to {name}: {err}"),
            }
        }

        if !args.vsync {
            let budget = Duration::from_millis(1000 / args.fps.max(1) as u64);
            let spent = t0.elapsed();
            if budget > spent {
                thread::sleep(budget - spent);
            }
        }

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            log::info!("avg render: {:.2} ms ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }

        ticks += 1;
    }
    Ok(())
}
