use nalgebra::DVector;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::setup::parameters::simulation::SimParams;

// Per-step working buffers, allocated once per run and overwritten by every
// call to `step`.
#[derive(Clone, Debug)]
pub struct Scratch {
    // Velocity after the spring term has been applied.
    pub velocity: DVector<f64>,
    pub acceleration: DVector<f64>,
    pub next: DVector<f64>,
}

impl Scratch {
    pub fn new(n: usize) -> Self {
        Scratch {
            velocity: DVector::zeros(n),
            acceleration: DVector::zeros(n),
            next: DVector::zeros(n),
        }
    }
}

// Summed displacement of both neighbours relative to point `i`. A missing
// neighbour past either end counts as level with the point itself.
pub fn neighbor_relative(x: &[f64], i: usize) -> f64 {
    let xi = x[i];
    let left = if i > 0 { x[i - 1] } else { xi };
    let right = if i + 1 < x.len() { x[i + 1] } else { xi };
    (left - xi) + (right - xi)
}

struct PointUpdate {
    velocity: f64,
    acceleration: f64,
    next: f64,
}

#[inline]
fn update_point(current: &[f64], previous: &[f64], i: usize, params: &SimParams) -> PointUpdate {
    let dt = params.dt;
    let velocity = (current[i] - previous[i]) / dt * params.velocity_multiplier;
    let acceleration = neighbor_relative(current, i) * params.spring_multiplier;
    let new_velocity = velocity + acceleration / dt;
    let delta = new_velocity * dt;
    PointUpdate {
        velocity: new_velocity,
        acceleration,
        next: current[i] + delta,
    }
}

/// Advances every point by one timestep into `scratch.next`. The ends get the
/// same zero-padded update as the interior; the caller clamps them afterwards.
pub fn step(
    current: &DVector<f64>,
    previous: &DVector<f64>,
    params: &SimParams,
    scratch: &mut Scratch,
) {
    debug_assert_eq!(current.len(), previous.len());
    debug_assert_eq!(current.len(), scratch.next.len());
    fill(current.as_slice(), previous.as_slice(), params, scratch);
}

#[cfg(not(feature = "parallel"))]
fn fill(current: &[f64], previous: &[f64], params: &SimParams, scratch: &mut Scratch) {
    for (i, ((v, a), x)) in scratch
        .velocity
        .iter_mut()
        .zip(scratch.acceleration.iter_mut())
        .zip(scratch.next.iter_mut())
        .enumerate()
    {
        let u = update_point(current, previous, i, params);
        *v = u.velocity;
        *a = u.acceleration;
        *x = u.next;
    }
}

// Each point reads only the shared inputs and writes only its own slots, so
// the index range can be split freely across the pool.
#[cfg(feature = "parallel")]
fn fill(current: &[f64], previous: &[f64], params: &SimParams, scratch: &mut Scratch) {
    scratch
        .velocity
        .as_mut_slice()
        .par_iter_mut()
        .zip(scratch.acceleration.as_mut_slice().par_iter_mut())
        .zip(scratch.next.as_mut_slice().par_iter_mut())
        .enumerate()
        .for_each(|(i, ((v, a), x))| {
            let u = update_point(current, previous, i, params);
            *v = u.velocity;
            *a = u.acceleration;
            *x = u.next;
        });
}
