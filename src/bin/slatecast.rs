use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slatecast::{load_records, render_slide_frame, render_video, RenderConfig};

#[derive(Parser, Debug)]
#[command(
    name = "slatecast",
    version,
    about = "Render product slide videos from spreadsheet rows"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every eligible record into an MP4.
    Render {
        /// Render configuration JSON.
        #[arg(long)]
        config: PathBuf,
        /// Slide records JSON array.
        #[arg(long)]
        records: PathBuf,
        /// Output MP4 path. Defaults to the config's output_path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rasterize one slide at a local time and save it as PNG.
    Frame {
        /// Render configuration JSON.
        #[arg(long)]
        config: PathBuf,
        /// Slide records JSON array.
        #[arg(long)]
        records: PathBuf,
        /// Zero-based index into the eligible slides.
        #[arg(long, default_value_t = 0)]
        slide: usize,
        /// Local time in seconds within the slide.
        #[arg(long, default_value_t = 0.0)]
        at: f64,
        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            config,
            records,
            out,
        } => {
            let cfg = RenderConfig::load(&config)?;
            let rows = load_records(&records)?;
            let out_path = out.unwrap_or_else(|| cfg.output_path.clone());
            let stats = render_video(&cfg, &rows, &out_path)?;
            eprintln!(
                "wrote {} ({} slides, {} frames, {:.1}s)",
                out_path.display(),
                stats.slides,
                stats.frames_total,
                stats.duration_sec
            );
        }
        Command::Frame {
            config,
            records,
            slide,
            at,
            out,
        } => {
            let cfg = RenderConfig::load(&config)?;
            let rows = load_records(&records)?;
            let frame = render_slide_frame(&cfg, &rows, slide, at)?;
            image::save_buffer_with_format(
                &out,
                &frame.data,
                frame.width,
                frame.height,
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
            .with_context(|| format!("writing {}", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
    }
    Ok(())
}
