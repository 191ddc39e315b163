use argh::FromArgs;
use log::*;
use std::fs::File;
use std::path::Path;

use magick_steps::{DirectoryContext, Manifest};

/// Run ImageMagick steps from a manifest over a site resources directory
#[derive(FromArgs)]
struct MagickSteps {
    /// path to the site resources directory
    #[argh(option)]
    resources: String,
    /// path to the JSON step manifest
    #[argh(option)]
    manifest: String,
    /// abort when no magick executable is found on PATH
    #[argh(switch)]
    require_magick: bool,
}

fn main() {
    let args: MagickSteps = argh::from_env();
    env_logger::init();

    if which::which("magick").is_err() {
        if args.require_magick {
            error!("ImageMagick is not installed!");
            panic!("ImageMagick unavailable!");
        }
        warn!("No magick executable on PATH, steps may fail to launch");
    }

    if !Path::new(&args.resources).is_dir() {
        panic!("Resources directory '{}' does not exist", args.resources);
    }

    let manifest_file = File::open(&args.manifest).expect("Failed to open step manifest");
    let manifest = Manifest::from_reader(manifest_file).expect("Failed to parse step manifest");

    let context = DirectoryContext::new(&args.resources);
    let steps = manifest.into_steps();
    info!(
        "Running {} magick steps against '{}' ...",
        steps.len(),
        args.resources
    );

    // Best effort: a failed step logs its diagnostic and the build goes on.
    for step in &steps {
        info!("{} ...", step.name());
        step.execute(&context);
    }

    info!("Image processing complete!");
}
