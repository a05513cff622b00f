pub mod boundary;
pub mod forcing;
pub mod integrator;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use nalgebra::DVector;

use crate::config::setup::{
    initial::initialize_state,
    parameters::{forcing::ForcingParams, simulation::SimParams, LeftBoundary},
    SetupConfig,
};
use crate::error::ConfigurationError;
use crate::state::SimState;
use crate::view::Observer;

use self::integrator::Scratch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub t: f64,
    pub wall_time: Duration,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn steps_per_second(&self) -> f64 {
        self.steps as f64 / self.wall_time.as_secs_f64().max(f64::MIN_POSITIVE)
    }
}

// Constraints are applied again after the clock advances, so every snapshot
// shows the ends clamped and the driven point on its oscillator.
pub struct Driver {
    params: SimParams,
    forcing: Option<ForcingParams>,
    left_boundary: LeftBoundary,
    state: SimState,
    scratch: Scratch,
}

impl Driver {
    pub fn new(setup: &SetupConfig) -> Result<Self, ConfigurationError> {
        setup.validate()?;
        let state = initialize_state(&setup.initial_condition, setup.parameters.n)?;
        let params = &setup.parameters;
        if params.exceeds_stability_bound() {
            warn!(
                "spring_multiplier={} with velocity_multiplier={} is outside \
                 0 <= 2 k <= 1 + vm, |vm| <= 1, displacements will grow without limit",
                params.spring_multiplier, params.velocity_multiplier
            );
        }
        debug!(
            "Driver::new(n={}, dt={}, timestep_max={}, forcing={:?}, left_boundary={:?})",
            params.n, params.dt, params.timestep_max, setup.forcing, setup.left_boundary
        );
        let mut driver = Driver {
            params: params.clone(),
            forcing: setup.forcing.clone(),
            left_boundary: setup.left_boundary,
            scratch: Scratch::new(params.n),
            state,
        };
        driver.apply_constraints();
        Ok(driver)
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    // Velocity and acceleration of each point from the latest tick.
    pub fn velocity(&self) -> &DVector<f64> {
        &self.scratch.velocity
    }

    pub fn acceleration(&self) -> &DVector<f64> {
        &self.scratch.acceleration
    }

    pub fn status(&self) -> Status {
        if self.state.step > self.params.timestep_max {
            Status::Terminated
        } else {
            Status::Running
        }
    }

    fn apply_constraints(&mut self) {
        let x = self.state.current.as_mut_slice();
        if let Some(forcing) = &self.forcing {
            forcing::apply(forcing, self.state.t, x);
        }
        boundary::clamp(self.left_boundary, x);
    }

    pub fn tick(&mut self) -> Status {
        if self.status() == Status::Terminated {
            return Status::Terminated;
        }
        self.apply_constraints();
        integrator::step(
            &self.state.current,
            &self.state.previous,
            &self.params,
            &mut self.scratch,
        );
        // previous <- current, current <- next. The old previous buffer
        // becomes next step's scratch output.
        std::mem::swap(&mut self.state.previous, &mut self.state.current);
        std::mem::swap(&mut self.state.current, &mut self.scratch.next);

        self.state.step += 1;
        self.state.t = self.state.step as f64 * self.params.dt;
        self.apply_constraints();
        self.status()
    }

    pub fn run<O: Observer + ?Sized>(&mut self, observer: &mut O) -> RunSummary {
        self.run_until_cancelled(observer, &AtomicBool::new(false))
    }

    // The observer also sees the state before the first tick.
    pub fn run_until_cancelled<O: Observer + ?Sized>(
        &mut self,
        observer: &mut O,
        cancel: &AtomicBool,
    ) -> RunSummary {
        let start = Instant::now();
        let step_start = self.state.step;
        let mut warned_non_finite = false;

        let mut cancelled = observer.observe(&self.state).is_break();
        while !cancelled && self.status() == Status::Running {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
            self.tick();
            if !warned_non_finite && !self.state.is_finite() {
                warn!(
                    "Displacements became non-finite at step {}, t={}",
                    self.state.step, self.state.t
                );
                warned_non_finite = true;
            }
            if observer.observe(&self.state).is_break() {
                cancelled = true;
            }
        }
        if cancelled {
            info!(
                "Run stopped at step {}, t={}",
                self.state.step, self.state.t
            );
        }

        RunSummary {
            steps: self.state.step - step_start,
            t: self.state.t,
            wall_time: start.elapsed(),
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::setup::{
        initial::{ExplicitConfig, ImpulseConfig, InitialConditionConfig},
        parameters::forcing::Waveform,
    };
    use approx::assert_relative_eq;
    use std::ops::ControlFlow;

    fn setup(n: usize, timestep_max: usize) -> SetupConfig {
        SetupConfig {
            parameters: SimParams {
                n,
                dt: 1.0,
                timestep_max,
                spring_multiplier: 1.0,
                velocity_multiplier: 1.0,
            },
            forcing: None,
            left_boundary: LeftBoundary::Fixed,
            initial_condition: InitialConditionConfig::Rest,
        }
    }

    #[test]
    fn test_rejects_invalid_setup() {
        assert!(matches!(
            Driver::new(&setup(2, 10)),
            Err(ConfigurationError::TooFewPoints(2))
        ));
        let mut s = setup(5, 10);
        s.parameters.dt = 0.0;
        assert!(matches!(
            Driver::new(&s),
            Err(ConfigurationError::NonPositiveTimestep(_))
        ));
        let mut s = setup(5, 10);
        s.forcing = Some(ForcingParams {
            driven_index: 5,
            ..Default::default()
        });
        assert!(matches!(
            Driver::new(&s),
            Err(ConfigurationError::DrivenIndexOutOfRange { index: 5, n: 5 })
        ));
    }

    #[test]
    fn test_driven_left_end() {
        let mut s = setup(11, 20);
        s.forcing = Some(ForcingParams {
            driven_index: 0,
            duration: 100.0,
            strength: 5.0,
            settle: 0.0,
            waveform: Waveform::Constant,
        });
        assert!(matches!(
            Driver::new(&s),
            Err(ConfigurationError::DrivenIndexOnFixedBoundary { index: 0 })
        ));

        s.left_boundary = LeftBoundary::Free;
        let mut d = Driver::new(&s).unwrap();
        let mut peak: f64 = 0.0;
        d.run(&mut |s: &SimState| -> ControlFlow<()> {
            assert_eq!(s.current[0], 5.0);
            peak = peak.max(s.current[1].abs());
            ControlFlow::Continue(())
        });
        assert!(peak > 0.0);
    }

    #[test]
    fn test_clock() {
        let mut s = setup(5, 3);
        s.parameters.dt = 0.1;
        let mut d = Driver::new(&s).unwrap();
        assert_eq!(d.status(), Status::Running);
        for i in 1..=4 {
            d.tick();
            assert_eq!(d.state().step, i);
            assert_eq!(d.state().t, i as f64 * 0.1);
        }
        assert_eq!(d.status(), Status::Terminated);
        let before = d.state().clone();
        assert_eq!(d.tick(), Status::Terminated);
        assert_eq!(d.state(), &before);
    }

    #[test]
    fn test_runs_timestep_max_plus_one_ticks() {
        let mut d = Driver::new(&setup(5, 7)).unwrap();
        let mut seen = Vec::new();
        let summary = d.run(&mut |s: &SimState| -> ControlFlow<()> {
            seen.push(s.step);
            ControlFlow::Continue(())
        });
        assert_eq!(summary.steps, 8);
        assert!(!summary.cancelled);
        assert_eq!(seen, (0..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_observer_can_stop() {
        let mut d = Driver::new(&setup(5, 100)).unwrap();
        let summary = d.run(&mut |s: &SimState| -> ControlFlow<()> {
            if s.step == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(summary.cancelled);
        assert_eq!(summary.steps, 3);
        assert_eq!(d.state().step, 3);
    }

    #[test]
    fn test_cancel_flag() {
        let mut d = Driver::new(&setup(5, 100)).unwrap();
        let cancel = AtomicBool::new(false);
        let summary = d.run_until_cancelled(
            &mut |s: &SimState| -> ControlFlow<()> {
                if s.step == 5 {
                    cancel.store(true, Ordering::Relaxed);
                }
                ControlFlow::Continue(())
            },
            &cancel,
        );
        assert!(summary.cancelled);
        assert_eq!(summary.steps, 5);
    }

    #[test]
    fn test_single_tick_with_held_driven_point() {
        let mut s = setup(5, 10);
        s.forcing = Some(ForcingParams {
            driven_index: 2,
            duration: 100.0,
            strength: 1.0,
            settle: 0.0,
            waveform: Waveform::Constant,
        });
        let mut d = Driver::new(&s).unwrap();
        d.tick();
        assert_eq!(d.state().current.as_slice(), &[0.0, 1.0, 1.0, 1.0, 0.0]);
        assert_eq!(d.state().previous.as_slice(), &[0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(d.acceleration().as_slice(), &[0.0, 1.0, -2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_sine_forcing_snapshot() {
        let mut s = setup(9, 100);
        s.forcing = Some(ForcingParams {
            driven_index: 4,
            duration: 8.0,
            strength: 3.0,
            settle: 2.0,
            waveform: Waveform::Sine,
        });
        let mut d = Driver::new(&s).unwrap();
        assert_eq!(d.state().current[4], 0.0);
        d.tick();
        d.tick();
        // t = duration / 4 is the sine peak.
        assert_relative_eq!(d.state().current[4], 3.0, epsilon = 1e-12);
        for _ in 0..7 {
            d.tick();
        }
        // t = 9 is inside the settle window.
        assert_eq!(d.state().t, 9.0);
        assert_eq!(d.state().current[4], 0.0);
    }

    #[test]
    fn test_free_left_end_moves() {
        let mut s = setup(5, 10);
        s.left_boundary = LeftBoundary::Free;
        s.initial_condition = InitialConditionConfig::Impulse(ImpulseConfig {
            index: 1,
            magnitude: 1.0,
        });
        let mut d = Driver::new(&s).unwrap();
        d.tick();
        assert_eq!(d.state().current[0], 1.0);

        s.left_boundary = LeftBoundary::Fixed;
        let mut d = Driver::new(&s).unwrap();
        d.tick();
        assert_eq!(d.state().current[0], 0.0);
    }

    #[test]
    fn test_initial_state_is_constrained() {
        let mut s = setup(4, 10);
        s.initial_condition = InitialConditionConfig::Explicit(ExplicitConfig {
            displacements: vec![1.0, 2.0, 3.0, 4.0],
        });
        let d = Driver::new(&s).unwrap();
        assert_eq!(d.state().current.as_slice(), &[0.0, 2.0, 3.0, 0.0]);
    }
}
