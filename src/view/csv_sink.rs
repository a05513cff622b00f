use std::io::Write;
use std::ops::ControlFlow;

use log::error;

use super::{is_view_step, Observer};
use crate::state::SimState;

// Writes one row per viewed step: `step, t, x_0, ..., x_{n-1}`.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    dstep_view: usize,
    error: Option<csv::Error>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W, dstep_view: usize) -> Self {
        CsvSink {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
            dstep_view,
            error: None,
        }
    }

    fn write_row(&mut self, state: &SimState) -> csv::Result<()> {
        let mut record = Vec::with_capacity(state.n() + 2);
        record.push(state.step.to_string());
        record.push(state.t.to_string());
        record.extend(state.current.iter().map(|x| x.to_string()));
        self.writer.write_record(&record)
    }

    /// Flushes the output and reports the first write failure, if any.
    pub fn finish(mut self) -> csv::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Observer for CsvSink<W> {
    fn observe(&mut self, state: &SimState) -> ControlFlow<()> {
        if !is_view_step(state.step, self.dstep_view) {
            return ControlFlow::Continue(());
        }
        match self.write_row(state) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                error!("Failed to write CSV row at step {}: {}", state.step, e);
                self.error = Some(e);
                ControlFlow::Break(())
            }
        }
    }
}
