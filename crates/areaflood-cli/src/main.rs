//! `areaflood`: estimate the area enclosed by a shape drawn as text.
//!
//! Usage:
//!   areaflood shapes/rectangle.txt
//!   areaflood --stepped --delay-ms 30 shapes/blob.txt
//!   cat shape.txt | areaflood --plain -
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

mod render;

use std::error::Error;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossterm::{cursor, execute, tty::IsTty};
use tracing_subscriber::{EnvFilter, fmt};

use areaflood_core::{GridConfig, Shape};
use areaflood_estimator::{AreaEstimator, EstimatorConfig, RunStatus, Step};

use render::Canvas;

/// Flood-fill area estimator for shapes drawn on a square grid.
#[derive(Parser, Debug)]
#[command(name = "areaflood")]
#[command(about = "Estimate the area enclosed by a shape drawn on a grid")]
struct Args {
    /// Shape file using `.` (empty), `#` (boundary) and `S` (start); `-` reads stdin
    shape: PathBuf,

    /// Count one cell per tick and redraw the grid in between
    #[arg(long)]
    stepped: bool,

    /// Pause after each counted cell in stepped mode
    #[arg(long, default_value_t = 15)]
    delay_ms: u64,

    /// Draw glyphs instead of colored cells
    #[arg(long)]
    plain: bool,
}

fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let text = read_shape(&args.shape)?;
    let shape = Shape::parse(&text)?;
    let grid = shape.build(grid_config(args))?;

    let mut estimator = AreaEstimator::with_config(
        grid.clone(),
        EstimatorConfig {
            stepped: args.stepped,
        },
    );
    let stdout = io::stdout();
    let mut canvas = Canvas::new(stdout.lock(), !args.plain);
    let estimate = match estimator.run()? {
        RunStatus::Done(estimate) => estimate,
        RunStatus::Pending => {
            let delay = Duration::from_millis(args.delay_ms);
            execute!(io::stdout(), cursor::Hide)?;
            let finished = drive(&mut estimator, &mut canvas, delay);
            execute!(io::stdout(), cursor::Show)?;
            finished?
        }
    };
    canvas.draw(&grid, estimate.total)?;

    log::info!(
        "{}: {} units ({} interior, {} boundary, {} corners)",
        args.shape.display(),
        estimate.total,
        estimate.interior,
        estimate.boundary,
        estimate.corners
    );
    Ok(())
}

/// Step a pending run to completion, redrawing after every counted cell.
fn drive<W: io::Write>(
    estimator: &mut AreaEstimator,
    canvas: &mut Canvas<W>,
    delay: Duration,
) -> Result<areaflood_estimator::Estimate, Box<dyn Error>> {
    canvas.draw(estimator.grid(), estimator.total())?;
    loop {
        match estimator.step() {
            Step::Visit {
                counted: true,
                total,
                ..
            } => {
                canvas.draw(estimator.grid(), total)?;
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            Step::Visit { .. } => {}
            Step::Finished(estimate) => return Ok(estimate),
            Step::Idle => return Err("estimator stopped before finishing".into()),
        }
    }
}

fn read_shape(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Colored frames need one terminal row per cell; glyphs are not checked.
fn grid_config(args: &Args) -> GridConfig {
    let config = GridConfig::default();
    if args.plain || !io::stdout().is_tty() {
        return config;
    }
    match crossterm::terminal::size() {
        // leave a row for the area label
        Ok((_, rows)) if rows > 1 => config
            .with_display_extent(u32::from(rows - 1))
            .with_min_cell_size(1),
        _ => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["areaflood", "room.txt"]).unwrap();
        assert_eq!(args.shape, PathBuf::from("room.txt"));
        assert!(!args.stepped);
        assert!(!args.plain);
        assert_eq!(args.delay_ms, 15);
    }

    #[test]
    fn stepped_with_delay_from_stdin() {
        let args =
            Args::try_parse_from(["areaflood", "--stepped", "--delay-ms", "0", "-"]).unwrap();
        assert!(args.stepped);
        assert_eq!(args.delay_ms, 0);
        assert_eq!(args.shape, PathBuf::from("-"));
    }

    #[test]
    fn shape_is_required() {
        assert!(Args::try_parse_from(["areaflood"]).is_err());
    }

    #[test]
    fn drive_finishes_a_stepped_run() {
        let grid = Shape::parse("#####\n#...#\n#.S.#\n#...#\n#####")
            .unwrap()
            .build(GridConfig::default())
            .unwrap();
        let mut estimator = AreaEstimator::with_config(grid, EstimatorConfig { stepped: true });

        assert_eq!(estimator.run().unwrap(), RunStatus::Pending);
        let mut canvas = Canvas::new(Vec::new(), false);
        let estimate = drive(&mut estimator, &mut canvas, Duration::ZERO).unwrap();
        assert_eq!(estimate.total, 25);
        assert!(!estimator.is_running());

        let text = String::from_utf8(canvas.into_inner()).unwrap();
        assert!(text.contains("Area: 21 units^2"));
    }
}
