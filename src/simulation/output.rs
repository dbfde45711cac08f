//! Simulation output and serialization

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::board::state::{Board, ColorFrame};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::TypeCounts;
use crate::simulation::playback::sample_frames;
use crate::simulation::run::RunReport;
use crate::spatial::grid::Grid;

/// Default number of frames kept for playback
pub const DEFAULT_PLAYBACK_FRAMES: usize = 200;

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub config: SimulationConfig,
    pub report: RunReport,
    pub statistics: SimulationStats,
    /// Every captured frame, oldest first
    pub frames: Vec<ColorFrame>,
    /// Final board as color codes
    pub final_frame: ColorFrame,
    /// Final cached satisfaction of every cell
    pub final_satisfaction: Grid<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub steps_executed: usize,
    pub total_moves: usize,
    pub simulation_time_ms: u64,
    pub initial_average_satisfaction: Option<f64>,
    pub final_average_satisfaction: Option<f64>,
    pub unsatisfied_remaining: usize,
    pub population: TypeCounts,
    pub frames_captured: usize,
}

impl SimulationOutput {
    pub fn new(
        config: SimulationConfig,
        board: &Board,
        report: RunReport,
        initial_average_satisfaction: Option<f64>,
        elapsed: Duration,
    ) -> Self {
        let statistics = SimulationStats {
            steps_executed: report.steps_executed,
            total_moves: report.total_moves(),
            simulation_time_ms: elapsed.as_millis() as u64,
            initial_average_satisfaction,
            final_average_satisfaction: board.average_satisfaction(),
            unsatisfied_remaining: board.unsatisfied_count(),
            population: board.type_counts(),
            frames_captured: board.snapshots().len(),
        };

        Self {
            config,
            report,
            statistics,
            frames: board.snapshots().to_vec(),
            final_frame: board.color_codes(),
            final_satisfaction: board.satisfaction_grid(),
        }
    }

    /// Frames a renderer should play back; always ends on the last frame
    pub fn playback_frames(&self, total_frames: usize, frame_jump: Option<usize>) -> Vec<&ColorFrame> {
        sample_frames(&self.frames, total_frames, frame_jump)
    }

    /// Drop all but the playback frames to keep the written file small
    pub fn retain_playback_frames(&mut self, total_frames: usize, frame_jump: Option<usize>) {
        let kept: Vec<ColorFrame> = self
            .playback_frames(total_frames, frame_jump)
            .into_iter()
            .cloned()
            .collect();
        self.frames = kept;
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let fmt_satisfaction = |value: Option<f64>| {
            value
                .map(|v| format!("{:.3}", v))
                .unwrap_or_else(|| "n/a".to_string())
        };

        format!(
            "{} on {}x{} (threshold {}): {} steps, {} moves in {}ms, {:?}\n\
             average satisfaction {} -> {}, {} still unsatisfied",
            self.report.policy,
            self.config.side_length,
            self.config.side_length,
            self.config.threshold,
            self.statistics.steps_executed,
            self.statistics.total_moves,
            self.statistics.simulation_time_ms,
            self.report.termination,
            fmt_satisfaction(self.statistics.initial_average_satisfaction),
            fmt_satisfaction(self.statistics.final_average_satisfaction),
            self.statistics.unsatisfied_remaining,
        )
    }
}
