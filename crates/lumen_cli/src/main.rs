//! Render a JSON scene to `<scene>.png`.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::load_description;
use lumen_renderer::{build_scene, render, RenderConfig};

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Render a CSG scene description to PNG", long_about = None)]
struct Cli {
    /// Scene description (JSON)
    scene: PathBuf,

    /// Worker threads (defaults to available parallelism)
    threads: Option<NonZeroUsize>,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let scene_path = cli.scene.as_path();
    let mut config = RenderConfig::default();
    if let Some(threads) = cli.threads {
        config.threads = threads.get();
    }

    log::info!("Loading {}", scene_path.display());
    let description = load_description(scene_path)
        .with_context(|| format!("failed to read scene {}", scene_path.display()))?;

    let base_dir = scene_path.parent().unwrap_or_else(|| Path::new("."));
    let built = build_scene(&description, base_dir)
        .with_context(|| format!("failed to build scene {}", scene_path.display()))?;
    let scene = built.scene()?;

    let image = render(&scene, &config).context("failed to start render threads")?;

    let output = output_path(scene_path);
    let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
        .context("framebuffer size does not match image dimensions")?;
    rgb.save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    log::info!("Wrote {}", output.display());
    Ok(())
}

/// `scenes/foo.json` renders to `foo.png` in the working directory.
fn output_path(scene_path: &Path) -> PathBuf {
    let stem = scene_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "render".to_string());
    PathBuf::from(format!("{}.png", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_uses_scene_stem() {
        assert_eq!(output_path(Path::new("scenes/csg.json")), PathBuf::from("csg.png"));
        assert_eq!(output_path(Path::new("glass")), PathBuf::from("glass.png"));
    }

    #[test]
    fn test_cli_scene_and_thread_count() {
        let cli = Cli::try_parse_from(["lumen", "scenes/csg.json", "4"]).unwrap();
        assert_eq!(cli.scene, PathBuf::from("scenes/csg.json"));
        assert_eq!(cli.threads.map(NonZeroUsize::get), Some(4));

        let cli = Cli::try_parse_from(["lumen", "scenes/csg.json"]).unwrap();
        assert!(cli.threads.is_none());
    }

    #[test]
    fn test_cli_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["lumen"]).is_err());
        assert!(Cli::try_parse_from(["lumen", "a.json", "0"]).is_err());
        assert!(Cli::try_parse_from(["lumen", "a.json", "two"]).is_err());
        assert!(Cli::try_parse_from(["lumen", "a.json", "2", "extra"]).is_err());
    }
}
