//! Host-side handle owning a loaded stage.

use std::path::{Path, PathBuf};

use usdattr_core::usd::StageResult;
use usdattr_core::{Interpolation, Settings, Stage};

/// Owns at most one stage and the path of its root layer.
#[derive(Debug, Default)]
pub struct StageActor {
    root_layer: Option<PathBuf>,
    stage: Option<Stage>,
    interpolation: Interpolation,
}

impl StageActor {
    /// An actor with no stage loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an actor and open `path` as its root layer.
    pub fn load<P: AsRef<Path>>(path: P) -> StageResult<Self> {
        let mut actor = Self::new();
        actor.open(path)?;
        Ok(actor)
    }

    /// Wrap an already opened stage.
    pub fn from_stage(stage: Stage) -> Self {
        Self {
            interpolation: stage.interpolation(),
            stage: Some(stage),
            ..Default::default()
        }
    }

    /// Replace the current stage with the layer at `path`.
    ///
    /// On error the previous stage is kept.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> StageResult<()> {
        let path = path.as_ref();
        let mut stage = Stage::open(path)?;
        stage.set_interpolation(self.interpolation);

        self.stage = Some(stage);
        self.root_layer = Some(path.to_path_buf());
        log::info!("StageActor loaded {}", path.display());
        Ok(())
    }

    /// Drop the loaded stage, if any.
    pub fn unload(&mut self) {
        if self.stage.take().is_some() {
            log::info!("StageActor unloaded stage");
        }
        self.root_layer = None;
    }

    /// Apply the `[stage]` settings to this actor and its stage.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_interpolation(settings.stage.interpolation);
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
        if let Some(stage) = self.stage.as_mut() {
            stage.set_interpolation(interpolation);
        }
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    /// Path of the root layer, when loaded from disk.
    pub fn root_layer(&self) -> Option<&Path> {
        self.root_layer.as_deref()
    }
}
