use std::time::Duration;

use super::setup::parameters::simulation::SimParams;

#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    // Sinks only look at every `dstep_view`-th step.
    pub dstep_view: usize,
    // Wall-clock delay between steps, applied by the presentation layer only.
    pub pace: Option<Duration>,
}

impl RunParams {
    pub fn new(sim_params: &SimParams, dt_view: Option<f64>, pace_ms: Option<u64>) -> Self {
        let dstep_view = dt_view.map_or(1, |dt_view| sim_params.to_steps(dt_view).max(1));
        RunParams {
            dstep_view,
            pace: pace_ms.filter(|&ms| ms > 0).map(Duration::from_millis),
        }
    }
}
