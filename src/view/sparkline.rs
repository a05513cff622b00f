use std::io::Write;
use std::ops::ControlFlow;

use log::error;

use super::{is_view_step, Observer};
use crate::state::SimState;

const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

// Renders the string as one line of block characters, with a fixed
// vertical range so successive frames are comparable.
pub struct SparklineSink<W: Write> {
    writer: W,
    dstep_view: usize,
    width: usize,
    y_lim: f64,
}

impl<W: Write> SparklineSink<W> {
    pub fn new(writer: W, dstep_view: usize, width: usize, y_lim: f64) -> Self {
        SparklineSink {
            writer,
            dstep_view,
            width: width.max(1),
            y_lim,
        }
    }
}

fn level(x: f64, y_lim: f64) -> char {
    if !x.is_finite() {
        return '!';
    }
    let frac = ((x + y_lim) / (2.0 * y_lim)).clamp(0.0, 1.0);
    LEVELS[(frac * (LEVELS.len() - 1) as f64).round() as usize]
}

pub fn render(x: &[f64], width: usize, y_lim: f64) -> String {
    let width = width.min(x.len()).max(1);
    (0..width)
        .map(|col| {
            // Each column shows the point of largest magnitude in its bucket.
            let lo = col * x.len() / width;
            let hi = ((col + 1) * x.len() / width).max(lo + 1);
            let v = x[lo..hi]
                .iter()
                .copied()
                .fold(0.0_f64, |acc, v| if v.abs() > acc.abs() || v.is_nan() { v } else { acc });
            level(v, y_lim)
        })
        .collect()
}

impl<W: Write> Observer for SparklineSink<W> {
    fn observe(&mut self, state: &SimState) -> ControlFlow<()> {
        if !is_view_step(state.step, self.dstep_view) {
            return ControlFlow::Continue(());
        }
        let line = render(state.current.as_slice(), self.width, self.y_lim);
        match writeln!(self.writer, "{:>8} |{}|", state.step, line) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                error!("Failed to render step {}: {}", state.step, e);
                ControlFlow::Break(())
            }
        }
    }
}
