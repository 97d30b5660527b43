use anyhow::Context;
use clap::Parser;
use colorcut::{image::io::Reader as ImageReader, Histogram, Palette, DEFAULT_COLOR_COUNT};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "colorcut")]
#[command(about = "Extract an ordered color palette from an image")]
struct Cli {
    /// Input image file path
    #[arg(short, long)]
    input: PathBuf,

    /// Number of colors in the palette
    #[arg(short, long, default_value_t = DEFAULT_COLOR_COUNT)]
    color_count: usize,

    /// Scale the image down to about this many pixels before counting colors (0 keeps the full image)
    #[arg(long, default_value_t = 0)]
    resize_area: u32,

    /// Print the pixel count of each color
    #[arg(long)]
    counts: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "colorcut=warn".into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    let image = ImageReader::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("failed to decode {}", cli.input.display()))?
        .to_rgb8();

    let image = colorcut::scale_to_area(&image, cli.resize_area).unwrap_or(image);
    let histogram = Histogram::from_image(&image);

    let palette = Palette::from_histogram(histogram)
        .color_count(cli.color_count)
        .generate()?;

    if !palette.is_complete() {
        tracing::warn!(
            requested = palette.requested_count(),
            found = palette.len(),
            "Image has fewer distinct colors than requested"
        );
    }

    for swatch in palette.swatches() {
        if cli.counts {
            println!("{swatch} {}", swatch.population());
        } else {
            println!("{swatch}");
        }
    }

    Ok(())
}
