//! Run Pipelines
//!
//! Wire configuration, engines, sequencer and renderer together for one run.
//! Each pipeline returns the paths it wrote, in write order.
//!
//! License: MIT

use std::path::PathBuf;

use crate::config::{ChaosConfig, GasketConfig, SubdivisionConfig};
use crate::error::Result;
use crate::frames::FrameNamer;
use crate::generators::{ChaosGame, SubdivisionArena};
use crate::render::{Renderer, FORWARD_COLOR, REVERSE_COLOR, TRIANGLE_COLOR};
use crate::sequencer::GenerationSequencer;

/// Frame written by a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFrame {
    pub path: PathBuf,
    /// Generation or snapshot index (`None` for chaos final mode)
    pub generation: Option<usize>,
    /// Points or triangles drawn
    pub elements: usize,
}

/// Run the chaos game and write forward / reverse frame pairs.
pub fn run_chaos(
    chaos: &ChaosConfig,
    namer: &FrameNamer,
    renderer: &dyn Renderer,
) -> Result<Vec<WrittenFrame>> {
    let game = ChaosGame::sierpinski();
    let mut rng = ChaosGame::seeded_rng(chaos.seed);
    let trajectory = game.forward(chaos.n_points, &mut rng);
    log::info!(
        "chaos game: {} points (seed {:?}), {} mode",
        trajectory.len(),
        chaos.seed,
        chaos.save_mode
    );

    let mut written = Vec::new();
    for snapshot in GenerationSequencer::chaos(&game, &trajectory, chaos.save_mode, chaos.snapshot_count) {
        let snapshot = snapshot?;

        let forward_path = namer.chaos_forward(snapshot.generation);
        renderer.render_points(snapshot.forward, FORWARD_COLOR, &forward_path)?;
        written.push(WrittenFrame {
            path: forward_path,
            generation: snapshot.generation,
            elements: snapshot.forward.len(),
        });

        let reverse_path = namer.chaos_reverse(snapshot.generation);
        renderer.render_points(&snapshot.reverse, REVERSE_COLOR, &reverse_path)?;
        written.push(WrittenFrame {
            path: reverse_path,
            generation: snapshot.generation,
            elements: snapshot.reverse.len(),
        });
    }
    Ok(written)
}

/// Build the subdivision generations and write one frame per requested one.
pub fn run_subdivision(
    ifs8: &SubdivisionConfig,
    namer: &FrameNamer,
    renderer: &dyn Renderer,
) -> Result<Vec<WrittenFrame>> {
    let mut arena = SubdivisionArena::sierpinski();
    log::info!(
        "ifs8: generation {} in {} mode",
        ifs8.max_generation,
        ifs8.save_mode
    );

    let mut written = Vec::new();
    for snapshot in GenerationSequencer::subdivision(&mut arena, ifs8.save_mode, ifs8.max_generation) {
        let path = namer.subdivision(&ifs8.name_base, snapshot.generation);
        renderer.render_triangles(snapshot.triangles, TRIANGLE_COLOR, &path)?;
        written.push(WrittenFrame {
            path,
            generation: Some(snapshot.generation),
            elements: snapshot.triangles.len(),
        });
    }
    Ok(written)
}

/// Validate `config` and run the chaos game with its configured renderer
pub fn chaos_from_config(config: &GasketConfig) -> Result<Vec<WrittenFrame>> {
    config.validate()?;
    let namer = FrameNamer::new(&config.output.out_dir, config.output.format);
    let renderer = crate::render::renderer_for(&config.output, config.chaos.dpi);
    run_chaos(&config.chaos, &namer, renderer.as_ref())
}

/// Validate `config` and run the subdivision with its configured renderer
pub fn subdivision_from_config(config: &GasketConfig) -> Result<Vec<WrittenFrame>> {
    config.validate()?;
    let namer = FrameNamer::new(&config.output.out_dir, config.output.format);
    let renderer = crate::render::renderer_for(&config.output, config.ifs8.dpi);
    run_subdivision(&config.ifs8, &namer, renderer.as_ref())
}
