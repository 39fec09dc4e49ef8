//! Runs the Flatland demo scene for a fixed number of steps without any graphics,
//! logging step statistics and printing where everything ended up.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use anyhow::Context as _;
use clap::Parser as _;
use manyfmt::Refmt as _;

use flatland::scene::SceneStepInfo;
use flatland::util::{ConciseDebug, ShowStatus, StatusText};

mod command_options;
mod demo;
mod logging;

use command_options::HeadlessArgs;

fn main() -> Result<(), anyhow::Error> {
    let options = HeadlessArgs::parse();
    logging::install(&options.logging)?;

    let config = options.physics_config()?;
    if options.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    log::info!(
        "running {} ticks at {} Hz",
        options.ticks,
        config.fixed_step_hz
    );

    let (mut scene, camera) =
        demo::demo_scene(config, options.gravity).context("failed to build demo scene")?;

    let detail = StatusText {
        show: if options.logging.verbose {
            ShowStatus::all()
        } else {
            ShowStatus::DEFAULT
        },
    };
    let mut total = SceneStepInfo::default();
    let mut since_report = SceneStepInfo::default();
    for tick in 1..=options.ticks {
        let info = scene.step();
        total += info.clone();
        since_report += info;
        if options.report_every != 0 && tick % options.report_every == 0 {
            log::info!("after {tick} ticks:\n{}", since_report.refmt(&detail));
            since_report = SceneStepInfo::default();
        }
    }
    log::info!("total:\n{}", total.refmt(&detail));

    for item in scene.render_list(camera)? {
        println!(
            "{name} at {position} facing {angle}",
            name = item.name,
            position = item.position.refmt(&ConciseDebug),
            angle = item.angle,
        );
    }
    Ok(())
}
