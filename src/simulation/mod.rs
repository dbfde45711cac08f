pub mod output;
pub mod playback;
pub mod run;

pub use output::{SimulationOutput, SimulationStats};
pub use playback::{frame_stride, sample_frames};
pub use run::{run, run_policy, run_with_observer, simulate, RunReport, StepRecord, Termination};
