use argh::FromArgs;
use badapple_core::frame::{Frame, HEIGHT, WIDTH};
use badapple_core::movie::Movie;
use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage};

#[derive(FromArgs)]
/// Conversion options
struct Args {
    /// input images in playback order; a single .gif is decoded as an animation
    #[argh(positional)]
    inputs: Vec<String>,

    /// output movie path
    #[argh(option, short = 'o')]
    output: String,

    /// playback frame rate
    #[argh(option, short = 'f', default = "10")]
    fps: u16,

    /// luma threshold for a lit pixel (0-255)
    #[argh(option, short = 't', default = "128")]
    threshold: u8,

    /// light pixels darker than the threshold instead
    #[argh(switch)]
    invert: bool,
}

fn main() {
    let args: Args = argh::from_env();
    if args.inputs.is_empty() {
        panic!("No input images given");
    }

    let images = decode_inputs(&args.inputs);
    let frames: Vec<Frame> = images
        .into_iter()
        .map(|img| encode_frame(img, args.threshold, args.invert))
        .collect();

    let bytes = Movie::encode(&frames, args.fps);
    std::fs::write(&args.output, &bytes).expect("Failed to write output movie");

    println!(
        "{}: {} frames at {} fps, {} bytes",
        args.output,
        frames.len(),
        args.fps,
        bytes.len()
    );
}

fn decode_inputs(inputs: &[String]) -> Vec<DynamicImage> {
    if inputs.len() == 1 && inputs[0].to_ascii_lowercase().ends_with(".gif") {
        let file = std::fs::File::open(&inputs[0]).expect("Failed to open input GIF");
        let decoder =
            GifDecoder::new(std::io::BufReader::new(file)).expect("Failed to decode GIF");
        decoder
            .into_frames()
            .collect_frames()
            .expect("Failed to decode GIF frames")
            .into_iter()
            .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()))
            .collect()
    } else {
        inputs
            .iter()
            .map(|path| image::open(path).expect("Failed to open input image"))
            .collect()
    }
}

/// Downscale to 8x8 and threshold luma into the packed row format.
fn encode_frame(img: DynamicImage, threshold: u8, invert: bool) -> Frame {
    let small = img
        .resize_exact(WIDTH as u32, HEIGHT as u32, FilterType::Triangle)
        .into_luma8();
    let mut frame = Frame::default();
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let luma = small.get_pixel(col as u32, row as u32)[0];
            let lit = (luma >= threshold) != invert;
            frame.set_pixel(col, row, lit);
        }
    }
    frame
}
