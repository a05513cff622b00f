pub mod csv_sink;
pub mod sparkline;

use std::ops::ControlFlow;
use std::time::Duration;

use log::info;

use crate::state::SimState;

// Break stops the run at that step boundary.
pub trait Observer {
    fn observe(&mut self, state: &SimState) -> ControlFlow<()>;
}

impl<F> Observer for F
where
    F: FnMut(&SimState) -> ControlFlow<()>,
{
    fn observe(&mut self, state: &SimState) -> ControlFlow<()> {
        self(state)
    }
}

// Fan out to every observer, even if an earlier one asks to stop.
impl Observer for Vec<Box<dyn Observer>> {
    fn observe(&mut self, state: &SimState) -> ControlFlow<()> {
        let mut flow = ControlFlow::Continue(());
        for observer in self.iter_mut() {
            if observer.observe(state).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        flow
    }
}

pub fn is_view_step(step: usize, dstep_view: usize) -> bool {
    step % dstep_view.max(1) == 0
}

pub struct LogSink {
    pub dstep_view: usize,
}

impl Observer for LogSink {
    fn observe(&mut self, state: &SimState) -> ControlFlow<()> {
        if is_view_step(state.step, self.dstep_view) {
            info!(
                "step={}, t={}, max |x|={:.4}",
                state.step,
                state.t,
                state.max_abs_displacement()
            );
        }
        ControlFlow::Continue(())
    }
}

// Sleeps after handing each snapshot on, so a viewer can keep up.
pub struct Paced<O> {
    pub inner: O,
    pub pace: Duration,
}

impl<O: Observer> Observer for Paced<O> {
    fn observe(&mut self, state: &SimState) -> ControlFlow<()> {
        let flow = self.inner.observe(state);
        if flow.is_continue() && !self.pace.is_zero() {
            std::thread::sleep(self.pace);
        }
        flow
    }
}
