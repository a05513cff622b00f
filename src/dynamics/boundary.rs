use crate::config::setup::parameters::LeftBoundary;

pub fn clamp(left: LeftBoundary, x: &mut [f64]) {
    let last = x.len() - 1;
    x[last] = 0.0;
    if left == LeftBoundary::Fixed {
        x[0] = 0.0;
    }
}
