//! Headless gallery tour.
//!
//! Loads options (from the TOML path given as the first argument, or
//! defaults), preloads the configured images, resolves a gallery set and
//! drives the camera through every viewpoint, logging as it goes.

use std::path::Path;

use galleria::assets::{AssetCache, DirectorySource};
use galleria::camera::{Camera, CameraUniform, OrbitController};
use galleria::navigation::{FrameOutcome, NavigationController, OVERVIEW};
use galleria::options::Options;
use galleria::GalleriaError;

const VIEWPORT: (u32, u32) = (1280, 720);

fn main() -> Result<(), GalleriaError> {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options::default(),
    };

    let cache = AssetCache::new(&options.assets);
    let source = DirectorySource::new(&options.assets.root);
    let report = pollster::block_on(cache.preload(
        &source,
        &options.assets.available,
        |all_succeeded| log::debug!("Preload finished (all succeeded: {all_succeeded})"),
    ))?;
    log::info!(
        "{} ({} loaded, {} fallbacks)",
        report.status_message(),
        report.loaded.len(),
        report.failed.len()
    );

    let set = cache.get_set(options.assets.gallery_slots)?;
    let placeholders = set.iter().filter(|image| image.is_fallback()).count();
    log::info!(
        "Gallery set: {} images, {placeholders} placeholders",
        set.len()
    );

    tour(&options)?;

    let released = cache.dispose();
    log::info!("Tour complete, released {released} resources");
    Ok(())
}

/// Visit every gallery viewpoint in order, then return to the overview.
fn tour(options: &Options) -> Result<(), GalleriaError> {
    let mut camera = Camera::new(&options.camera, VIEWPORT.0, VIEWPORT.1);
    let mut orbit = OrbitController::new(&options.orbit, &camera);
    let mut nav = NavigationController::from_options(&options.navigation, &mut camera, &mut orbit);
    orbit.sync_from(&camera);

    let mut stops: Vec<String> = nav
        .viewpoints()
        .ids()
        .filter(|id| *id != OVERVIEW)
        .map(str::to_owned)
        .collect();
    stops.push(OVERVIEW.to_owned());

    for stop in &stops {
        let _ = nav.navigate_to(stop, &camera, &mut orbit)?;
        let mut frames = 0_u32;
        loop {
            frames += 1;
            let outcome = nav.update(&mut camera, &mut orbit);
            let _ = orbit.update(&mut camera);
            match outcome {
                FrameOutcome::Moving { .. } => {}
                FrameOutcome::Idle => break,
                FrameOutcome::Arrived { target } => {
                    let uniform = CameraUniform::from_camera(&camera);
                    log::info!(
                        "{target}: eye {:?} after {frames} frames (manual control {})",
                        uniform.position,
                        if orbit.is_enabled() { "on" } else { "off" }
                    );
                    break;
                }
            }
        }
    }
    Ok(())
}
