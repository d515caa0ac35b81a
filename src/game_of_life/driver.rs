//! Simulation driver: current grid, pause/speed controls and the tick loop

use super::{rules, Grid};
use crate::config::{Settings, MAX_SPEED, MIN_SPEED};
use crate::error::GridError;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Notice shown while waiting to reseed an extinct grid
pub const EXTINCTION_MESSAGE: &str = "All cells are dead. Restarting...";

/// How long the runner idles between checks while paused
const PAUSE_POLL: Duration = Duration::from_millis(50);

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused; the grid was left untouched
    Paused,
    /// Advanced one generation and at least one cell is alive
    Advanced,
    /// Advanced one generation and every cell is dead
    Extinct,
}

/// Holds the current grid and the controls a front end manipulates
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    density: f64,
    rng: StdRng,
    paused: bool,
    speed: u32,
    reseed_delay: Duration,
    generation: u64,
    total_generations: u64,
    reseeds: u64,
    message: Option<String>,
}

impl Simulation {
    /// Create a simulation seeded with a randomized grid
    pub fn new(settings: &Settings) -> Result<Self, GridError> {
        let mut rng = Self::rng_for(settings)?;
        let grid = Grid::fill(
            settings.grid.rows,
            settings.grid.cols,
            settings.grid.density,
            &mut rng,
        );
        Ok(Self::assemble(grid, rng, settings))
    }

    /// Create a simulation starting from a given grid.
    ///
    /// Later reseeds keep the dimensions of `grid`.
    pub fn with_grid(grid: Grid, settings: &Settings) -> Result<Self, GridError> {
        let rng = Self::rng_for(settings)?;
        Ok(Self::assemble(grid, rng, settings))
    }

    fn rng_for(settings: &Settings) -> Result<StdRng, GridError> {
        let density = settings.grid.density;
        if !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidDensity(density));
        }
        Ok(match settings.grid.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        })
    }

    fn assemble(grid: Grid, rng: StdRng, settings: &Settings) -> Self {
        Self {
            grid,
            density: settings.grid.density,
            rng,
            paused: settings.driver.start_paused,
            speed: settings.driver.speed.clamp(MIN_SPEED, MAX_SPEED),
            reseed_delay: Duration::from_millis(settings.driver.reseed_delay_ms),
            generation: 0,
            total_generations: 0,
            reseeds: 0,
            message: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Generations since the last reseed, clear or randomize
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generations stepped over the whole session
    pub fn total_generations(&self) -> u64 {
        self.total_generations
    }

    pub fn reseeds(&self) -> u64 {
        self.reseeds
    }

    /// Transient status notice, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Advance one generation unless paused
    pub fn tick(&mut self) -> TickOutcome {
        if self.paused {
            return TickOutcome::Paused;
        }

        self.grid = rules::step(&self.grid);
        self.generation += 1;
        self.total_generations += 1;
        log::debug!(
            "generation {}: {} living cells",
            self.generation,
            self.grid.living_count()
        );

        if rules::is_extinct(&self.grid) {
            log::info!("Extinct after {} generations", self.generation);
            self.message = Some(EXTINCTION_MESSAGE.to_string());
            TickOutcome::Extinct
        } else {
            TickOutcome::Advanced
        }
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.generation = 0;
        self.message = None;
    }

    fn random_grid(&mut self) -> Grid {
        Grid::fill(self.grid.rows(), self.grid.cols(), self.density, &mut self.rng)
    }

    /// Replace an extinct grid with a fresh random one
    pub fn reseed(&mut self) {
        let grid = self.random_grid();
        self.replace_grid(grid);
        self.reseeds += 1;
        log::info!("Reseeded grid ({} total)", self.reseeds);
    }

    /// Replace the grid with a fresh random one
    pub fn randomize(&mut self) {
        let grid = self.random_grid();
        self.replace_grid(grid);
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        let grid = Grid::new(self.grid.rows(), self.grid.cols());
        self.replace_grid(grid);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Set the speed, clamped to the selectable range
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Speed as shown on a percentage control
    pub fn speed_percent(&self) -> u32 {
        self.speed * 10
    }

    /// Delay between regular ticks
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.speed))
    }

    /// Delay before an extinct grid is reseeded
    pub fn reseed_delay(&self) -> Duration {
        self.reseed_delay
    }
}

/// Time source the runner sleeps on
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Receives every generation the runner produces
pub trait FrameSink {
    fn frame(&mut self, sim: &Simulation) -> Result<()>;
}

/// Pause and stop signals shared with whoever controls a running loop
#[derive(Debug, Clone, Default)]
pub struct ControlHandle {
    paused: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl ControlHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn toggle_pause(&self) {
        self.paused.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Totals reported when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RunSummary {
    pub generations: u64,
    pub reseeds: u64,
    pub living_cells: usize,
}

/// Repeating tick loop around a [`Simulation`]
pub struct Runner {
    sim: Simulation,
    control: ControlHandle,
    max_generations: Option<u64>,
}

impl Runner {
    pub fn new(sim: Simulation, max_generations: Option<u64>) -> Self {
        let control = ControlHandle::new();
        if sim.is_paused() {
            control.pause();
        }
        Self {
            sim,
            control,
            max_generations,
        }
    }

    /// Handle for pausing or stopping the loop from elsewhere
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    fn limit_reached(&self) -> bool {
        self.max_generations
            .is_some_and(|max| self.sim.total_generations() >= max)
    }

    /// Run until stopped or the generation limit is reached.
    ///
    /// The control handle is checked before every tick. An extinct grid
    /// waits out the reseed delay and is replaced before ticking resumes.
    pub fn run<C: Clock, S: FrameSink>(&mut self, clock: &mut C, sink: &mut S) -> Result<RunSummary> {
        sink.frame(&self.sim)?;

        while !self.control.is_stopped() && !self.limit_reached() {
            self.sim.set_paused(self.control.is_paused());

            match self.sim.tick() {
                TickOutcome::Paused => clock.sleep(PAUSE_POLL),
                TickOutcome::Advanced => {
                    sink.frame(&self.sim)?;
                    clock.sleep(self.sim.tick_delay());
                }
                TickOutcome::Extinct => {
                    sink.frame(&self.sim)?;
                    if self.limit_reached() {
                        break;
                    }
                    clock.sleep(self.sim.reseed_delay());
                    if self.control.is_stopped() {
                        break;
                    }
                    self.sim.reseed();
                }
            }
        }

        Ok(RunSummary {
            generations: self.sim.total_generations(),
            reseeds: self.sim.reseeds(),
            living_cells: self.sim.grid().living_count(),
        })
    }

    pub fn into_simulation(self) -> Simulation {
        self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(rows: usize, cols: usize) -> Settings {
        let mut settings = Settings::default();
        settings.grid.rows = rows;
        settings.grid.cols = cols;
        settings.grid.seed = Some(5);
        settings
    }

    fn blinker() -> Grid {
        Grid::from_living(5, 5, &[(2, 1), (2, 2), (2, 3)]).unwrap()
    }

    /// Records every sleep; optionally stops the loop after a number of sleeps
    struct TestClock {
        sleeps: Vec<Duration>,
        stop_after: Option<(usize, ControlHandle)>,
    }

    impl TestClock {
        fn new() -> Self {
            Self { sleeps: Vec::new(), stop_after: None }
        }
    }

    impl Clock for TestClock {
        fn sleep(&mut self, duration: Duration) {
            self.sleeps.push(duration);
            if let Some((limit, control)) = &self.stop_after {
                if self.sleeps.len() >= *limit {
                    control.stop();
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(u64, usize, Option<String>)>,
    }

    impl FrameSink for RecordingSink {
        fn frame(&mut self, sim: &Simulation) -> Result<()> {
            self.frames.push((
                sim.generation(),
                sim.grid().living_count(),
                sim.message().map(str::to_string),
            ));
            Ok(())
        }
    }

    #[test]
    fn test_seeded_simulations_match() {
        let a = Simulation::new(&settings(20, 20)).unwrap();
        let b = Simulation::new(&settings(20, 20)).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!((a.grid().rows(), a.grid().cols()), (20, 20));
    }

    #[test]
    fn test_invalid_density() {
        let mut s = settings(4, 4);
        s.grid.density = 2.0;
        assert!(matches!(Simulation::new(&s), Err(GridError::InvalidDensity(_))));
    }

    #[test]
    fn test_tick_and_pause() {
        let mut sim = Simulation::with_grid(blinker(), &settings(5, 5)).unwrap();
        assert_eq!(sim.tick(), TickOutcome::Advanced);
        assert_eq!(sim.generation(), 1);

        sim.toggle_pause();
        assert_eq!(sim.tick(), TickOutcome::Paused);
        assert_eq!(sim.generation(), 1);

        sim.toggle_pause();
        assert_eq!(sim.tick(), TickOutcome::Advanced);
        assert_eq!(sim.grid(), &blinker());
    }

    #[test]
    fn test_extinction_sets_message_and_reseed_clears_it() {
        let lonely = Grid::from_living(5, 5, &[(0, 0)]).unwrap();
        let mut sim = Simulation::with_grid(lonely, &settings(5, 5)).unwrap();

        assert_eq!(sim.tick(), TickOutcome::Extinct);
        assert_eq!(sim.message(), Some(EXTINCTION_MESSAGE));

        sim.reseed();
        assert_eq!(sim.message(), None);
        assert_eq!(sim.reseeds(), 1);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.total_generations(), 1);
        assert_eq!((sim.grid().rows(), sim.grid().cols()), (5, 5));
    }

    #[test]
    fn test_clear_and_randomize() {
        let mut s = settings(10, 10);
        s.grid.density = 1.0;
        let mut sim = Simulation::new(&s).unwrap();
        assert_eq!(sim.grid().living_count(), 100);

        sim.clear();
        assert!(rules::is_extinct(sim.grid()));

        sim.randomize();
        assert_eq!(sim.grid().living_count(), 100);
        assert_eq!(sim.reseeds(), 0);
    }

    #[test]
    fn test_speed_controls() {
        let mut sim = Simulation::new(&settings(2, 2)).unwrap();
        assert_eq!(sim.tick_delay(), Duration::from_millis(200));
        assert_eq!(sim.speed_percent(), 50);

        sim.set_speed(10);
        assert_eq!(sim.tick_delay(), Duration::from_millis(100));

        sim.set_speed(0);
        assert_eq!(sim.speed(), MIN_SPEED);
        assert_eq!(sim.tick_delay(), Duration::from_millis(1000));

        sim.set_speed(40);
        assert_eq!(sim.speed(), MAX_SPEED);
    }

    #[test]
    fn test_runner_stops_at_generation_limit() {
        let sim = Simulation::with_grid(blinker(), &settings(5, 5)).unwrap();
        let mut runner = Runner::new(sim, Some(4));
        let mut clock = TestClock::new();
        let mut sink = RecordingSink::default();

        let summary = runner.run(&mut clock, &mut sink).unwrap();

        assert_eq!(summary, RunSummary { generations: 4, reseeds: 0, living_cells: 3 });
        assert_eq!(sink.frames.len(), 5);
        assert_eq!(clock.sleeps, vec![Duration::from_millis(200); 4]);
    }

    #[test]
    fn test_runner_waits_then_reseeds_on_extinction() {
        let lonely = Grid::from_living(6, 6, &[(3, 3)]).unwrap();
        let mut s = settings(6, 6);
        s.grid.density = 1.0;
        let sim = Simulation::with_grid(lonely, &s).unwrap();
        let mut runner = Runner::new(sim, Some(2));
        let mut clock = TestClock::new();
        let mut sink = RecordingSink::default();

        let summary = runner.run(&mut clock, &mut sink).unwrap();

        assert_eq!(clock.sleeps[0], Duration::from_millis(3000));
        assert_eq!(summary.reseeds, 1);
        assert_eq!(summary.generations, 2);
        assert_eq!(sink.frames[1], (1, 0, Some(EXTINCTION_MESSAGE.to_string())));
        // a full grid keeps only its four corners
        assert_eq!(sink.frames[2], (1, 4, None));
    }

    #[test]
    fn test_runner_idles_while_paused_until_stopped() {
        let sim = Simulation::with_grid(blinker(), &settings(5, 5)).unwrap();
        let mut runner = Runner::new(sim, None);
        let control = runner.control();
        control.pause();

        let mut clock = TestClock::new();
        clock.stop_after = Some((3, control.clone()));
        let mut sink = RecordingSink::default();

        let summary = runner.run(&mut clock, &mut sink).unwrap();

        assert_eq!(summary.generations, 0);
        assert_eq!(clock.sleeps, vec![PAUSE_POLL; 3]);
        assert_eq!(sink.frames.len(), 1);
        assert!(runner.simulation().is_paused());
    }

    #[test]
    fn test_runner_stop_during_reseed_delay() {
        let lonely = Grid::from_living(4, 4, &[(1, 1)]).unwrap();
        let sim = Simulation::with_grid(lonely, &settings(4, 4)).unwrap();
        let mut runner = Runner::new(sim, None);

        let mut clock = TestClock::new();
        clock.stop_after = Some((1, runner.control()));
        let mut sink = RecordingSink::default();

        let summary = runner.run(&mut clock, &mut sink).unwrap();
        assert_eq!(summary.reseeds, 0);
        assert_eq!(summary.living_cells, 0);
    }

    #[test]
    fn test_start_paused_is_carried_to_control() {
        let mut s = settings(3, 3);
        s.driver.start_paused = true;
        let runner = Runner::new(Simulation::new(&s).unwrap(), None);
        assert!(runner.control().is_paused());
        runner.control().toggle_pause();
        assert!(!runner.control().is_paused());
    }

    #[test]
    fn test_zero_sized_grid_is_always_extinct() {
        let sim = Simulation::new(&settings(0, 0)).unwrap();
        let mut runner = Runner::new(sim, Some(3));
        let mut clock = TestClock::new();
        let mut sink = RecordingSink::default();

        let summary = runner.run(&mut clock, &mut sink).unwrap();
        assert_eq!(summary.generations, 3);
        assert_eq!(summary.reseeds, 2);
    }
}
