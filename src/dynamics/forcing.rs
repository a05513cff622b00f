use std::f64::consts::PI;

use crate::config::setup::parameters::forcing::{ForcingParams, Waveform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrivenPoint {
    // Overwritten by the oscillator.
    Driven(f64),
    // Held at zero after the driven window.
    Settling,
    // Left to the integrator.
    Free,
}

pub fn oscillator(forcing: &ForcingParams, t: f64) -> f64 {
    match forcing.waveform {
        Waveform::Sine => forcing.strength * (2.0 * PI * t / forcing.duration).sin(),
        Waveform::Constant => forcing.strength,
    }
}

pub fn driven_point(forcing: &ForcingParams, t: f64) -> DrivenPoint {
    if t <= forcing.duration {
        DrivenPoint::Driven(oscillator(forcing, t))
    } else if t < forcing.duration + forcing.settle {
        DrivenPoint::Settling
    } else {
        DrivenPoint::Free
    }
}

pub fn apply(forcing: &ForcingParams, t: f64, x: &mut [f64]) {
    match driven_point(forcing, t) {
        DrivenPoint::Driven(value) => x[forcing.driven_index] = value,
        DrivenPoint::Settling => x[forcing.driven_index] = 0.0,
        DrivenPoint::Free => {}
    }
}
