use argh::FromArgs;
use badapple_core::frame::Frame;
use badapple_core::movie::MovieReader;
use badapple_core::res::test_pattern;
use badapple_core::scanner::{DEFAULT_DWELL_US, MatrixScanner, PinMap};

use crate::sim_matrix::SimMatrix;
use crate::std_io::StdFile;

mod sim_matrix;
mod std_io;

#[derive(FromArgs)]
/// 8x8 LED matrix simulator. Drives the real scan algorithm against a
/// simulated port and renders the resulting duty cycle per LED.
struct Args {
    /// movie file to play (.bam); loops the built-in sweep when omitted
    #[argh(positional)]
    movie: Option<String>,

    /// row dwell in microseconds
    #[argh(option, default = "DEFAULT_DWELL_US")]
    dwell: u32,

    /// walk every pixel once before playback
    #[argh(switch)]
    pin_test: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let (frames, fps) = match &args.movie {
        Some(path) => load_movie(path),
        None => (test_pattern::ROW_SWEEP.to_vec(), test_pattern::SWEEP_FPS),
    };
    log::info!("loaded {} frames at {} fps", frames.len(), fps);

    let mut sim = SimMatrix::new(PinMap::ESP32_BAD_APPLE);
    let mut scanner = MatrixScanner::with_dwell(
        sim.port(),
        sim.delay(),
        PinMap::ESP32_BAD_APPLE,
        args.dwell,
    );
    scanner.init();

    if args.pin_test {
        scanner.pin_test();
        sim.present();
    }

    let frame_us = 1_000_000 / fps.max(1) as u32;
    let passes = (frame_us / scanner.scan_period_us().max(1)).max(1);

    let mut index = 0usize;
    while sim.is_open() {
        let frame = &frames[index % frames.len()];
        for _ in 0..passes {
            scanner.display_frame(frame);
        }
        sim.present();
        std::thread::sleep(std::time::Duration::from_micros(frame_us as u64));
        index += 1;
    }
}

fn load_movie(path: &str) -> (Vec<Frame>, u16) {
    let file = std::fs::File::open(path).expect("Failed to open movie file");
    let mut reader = MovieReader::new(StdFile::new(file)).expect("Invalid movie file");
    let fps = reader.fps();
    let mut frames = Vec::new();
    while let Some(frame) = reader.next_frame().expect("Truncated movie file") {
        frames.push(frame);
    }
    assert!(!frames.is_empty(), "Movie contains no frames");
    (frames, fps)
}
