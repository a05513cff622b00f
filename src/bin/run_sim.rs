use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use stringsim::{
    config::{
        run::RunParams,
        setup::{parameters::LeftBoundary, SetupConfig},
    },
    dynamics::{Driver, RunSummary},
    view::{csv_sink::CsvSink, sparkline::SparklineSink, LogSink, Observer, Paced},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Output {
    Log,
    Csv,
    Sparkline,
}

#[derive(Debug, clap::Parser)]
#[command(name = "stringsim_run", about = "Run a driven elastic-string simulation")]
pub struct RunCli {
    /// YAML setup file. Without one the reference setup is used.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    #[arg(short = 'n', long = "points")]
    points: Option<usize>,

    #[arg(long = "dt")]
    dt: Option<f64>,

    #[arg(short = 't', long = "timestep-max")]
    timestep_max: Option<usize>,

    #[arg(long = "spring")]
    spring_multiplier: Option<f64>,

    #[arg(long = "velocity-multiplier")]
    velocity_multiplier: Option<f64>,

    #[arg(long = "driven-index", conflicts_with = "no_forcing")]
    driven_index: Option<usize>,

    /// Leave the driven point alone for the whole run.
    #[arg(long = "no-forcing")]
    no_forcing: bool,

    /// Let the left end move instead of clamping it to zero.
    #[arg(long = "free-left")]
    free_left: bool,

    /// Simulation time between viewed snapshots.
    #[arg(short = 'd', long = "dt-view")]
    dt_view: Option<f64>,

    /// Wall-clock delay after each step, in milliseconds.
    #[arg(long = "pace-ms")]
    pace_ms: Option<u64>,

    #[arg(short = 'o', long = "output", value_enum, default_value_t = Output::Log)]
    output: Output,

    #[arg(long = "width", default_value_t = 100)]
    width: usize,

    #[arg(long = "y-lim", default_value_t = 20.0)]
    y_lim: f64,

    #[arg(long = "print-config")]
    print_config: bool,
}

impl RunCli {
    fn setup_config(&self) -> Result<SetupConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Reading setup from {}", path.display());
                SetupConfig::parse(path)?
            }
            None => SetupConfig::default(),
        };
        let p = &mut config.parameters;
        if let Some(n) = self.points {
            p.n = n;
        }
        if let Some(dt) = self.dt {
            p.dt = dt;
        }
        if let Some(timestep_max) = self.timestep_max {
            p.timestep_max = timestep_max;
        }
        if let Some(k) = self.spring_multiplier {
            p.spring_multiplier = k;
        }
        if let Some(vm) = self.velocity_multiplier {
            p.velocity_multiplier = vm;
        }
        if self.no_forcing {
            config.forcing = None;
        } else if let Some(i) = self.driven_index {
            config.forcing.get_or_insert_with(Default::default).driven_index = i;
        }
        if self.free_left {
            config.left_boundary = LeftBoundary::Free;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = RunCli::parse();

    let setup_config = args.setup_config()?;
    if args.print_config {
        setup_config.print();
    }
    let run_params = RunParams::new(&setup_config.parameters, args.dt_view, args.pace_ms);

    let mut driver = Driver::new(&setup_config)?;
    info!(
        "Running {} points to step {}",
        setup_config.parameters.n, setup_config.parameters.timestep_max
    );

    let summary = match args.output {
        Output::Log => run_with(
            &mut driver,
            LogSink {
                dstep_view: run_params.dstep_view,
            },
            &run_params,
        ),
        Output::Sparkline => run_with(
            &mut driver,
            SparklineSink::new(
                io::stdout().lock(),
                run_params.dstep_view,
                args.width,
                args.y_lim,
            ),
            &run_params,
        ),
        Output::Csv => {
            let mut sink = CsvSink::new(io::stdout().lock(), run_params.dstep_view);
            let summary = match run_params.pace {
                Some(pace) => {
                    let mut paced = Paced { inner: sink, pace };
                    let summary = driver.run(&mut paced);
                    sink = paced.inner;
                    summary
                }
                None => driver.run(&mut sink),
            };
            sink.finish()?;
            summary
        }
    };

    info!(
        "{:.3} seconds for {} timesteps of {} points = {:.1} steps per second",
        summary.wall_time.as_secs_f64(),
        summary.steps,
        setup_config.parameters.n,
        summary.steps_per_second()
    );
    info!("Done!");
    Ok(())
}

fn run_with<O: Observer>(driver: &mut Driver, mut observer: O, run_params: &RunParams) -> RunSummary {
    match run_params.pace {
        Some(pace) => driver.run(&mut Paced {
            inner: observer,
            pace,
        }),
        None => driver.run(&mut observer),
    }
}
