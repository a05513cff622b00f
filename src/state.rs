use nalgebra::DVector;

#[derive(Clone, Debug, PartialEq)]
pub struct SimState {
    // Displacement of every point at the current and the previous step.
    pub current: DVector<f64>,
    pub previous: DVector<f64>,
    pub t: f64,
    pub step: usize,
}

impl SimState {
    pub fn new(current: DVector<f64>, previous: DVector<f64>) -> SimState {
        debug_assert_eq!(current.len(), previous.len());
        SimState {
            current,
            previous,
            t: 0.0,
            step: 0,
        }
    }

    pub fn at_rest(n: usize) -> SimState {
        SimState::new(DVector::zeros(n), DVector::zeros(n))
    }

    pub fn n(&self) -> usize {
        self.current.len()
    }

    pub fn max_abs_displacement(&self) -> f64 {
        self.current.amax()
    }

    pub fn is_finite(&self) -> bool {
        self.current.iter().all(|x| x.is_finite())
    }
}
