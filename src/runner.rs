//! Batch execution loop.
//!
//! [`AcoRunner`] drives a [`Colony`] iteration by iteration until the
//! stagnation cutoff declares convergence, the iteration budget runs out,
//! or a cancellation token fires. Interactive callers (an animation loop
//! pacing one iteration per frame) can skip the runner and call
//! [`Colony::run_iteration`] directly.

use crate::colony::Colony;
use crate::config::AcoConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a batch ACO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// The best tour found, or `None` if no iteration produced a solution.
    pub best_tour: Option<Vec<usize>>,

    /// Length of the best tour (`f64::INFINITY` when `best_tour` is `None`).
    pub best_distance: f64,

    /// Total iterations executed.
    pub iterations: usize,

    /// Iteration at which the best tour was found.
    pub last_improvement: usize,

    /// Whether the run stopped because the colony stalled past the cutoff.
    pub converged: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best distance after each iteration that had a solution.
    pub distance_history: Vec<f64>,
}

/// Executes the ACO optimization loop.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs a fresh colony to convergence.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`AcoConfig::validate`]
    /// first to get a descriptive error).
    pub fn run(config: &AcoConfig) -> AcoResult {
        Self::run_with_cancel(config, None)
    }

    /// Runs a fresh colony with an optional cancellation token.
    ///
    /// If `cancel` is set to `true`, the loop stops before the next
    /// iteration and returns the best solution found so far.
    pub fn run_with_cancel(config: &AcoConfig, cancel: Option<Arc<AtomicBool>>) -> AcoResult {
        let mut colony = Colony::new(config.clone()).expect("invalid AcoConfig");
        Self::run_colony(&mut colony, cancel)
    }

    /// Drives an existing colony (for explicit instances or resumed runs).
    ///
    /// The colony keeps its state afterwards, so the caller can inspect
    /// pheromones or replay the best tour.
    pub fn run_colony(colony: &mut Colony, cancel: Option<Arc<AtomicBool>>) -> AcoResult {
        let max_iterations = colony.config().max_iterations;
        let mut distance_history = Vec::new();
        let mut cancelled = false;

        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if max_iterations > 0 && colony.iteration() >= max_iterations {
                break;
            }
            if colony.is_converged() {
                break;
            }

            colony.run_iteration();
            if colony.best_distance().is_finite() {
                distance_history.push(colony.best_distance());
            }
        }

        AcoResult {
            best_tour: colony.best_tour().map(<[usize]>::to_vec),
            best_distance: colony.best_distance(),
            iterations: colony.iteration(),
            last_improvement: colony.last_improvement_iter(),
            converged: colony.is_converged(),
            cancelled,
            distance_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;
    use crate::types::Point;

    fn square_instance() -> Instance {
        Instance::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ])
    }

    #[test]
    fn test_runner_converges() {
        let config = AcoConfig::default()
            .with_num_cities(8)
            .with_num_ants(10)
            .with_convergence_cutoff(5)
            .with_seed(42);

        let result = AcoRunner::run(&config);

        assert!(result.converged);
        assert!(!result.cancelled);
        assert!(result.iterations > result.last_improvement);
        let best = result.best_tour.expect("converged run has a best tour");
        assert_eq!(best.len(), 8);
        assert!(result.best_distance.is_finite());
    }

    #[test]
    fn test_runner_history_is_non_increasing() {
        let config = AcoConfig::default()
            .with_num_cities(10)
            .with_num_ants(8)
            .with_convergence_cutoff(8)
            .with_seed(7);

        let result = AcoRunner::run(&config);

        assert!(!result.distance_history.is_empty());
        for window in result.distance_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best distance history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(
            *result.distance_history.last().unwrap(),
            result.best_distance
        );
    }

    #[test]
    fn test_runner_honors_iteration_budget() {
        let config = AcoConfig::default()
            .with_num_cities(10)
            .with_num_ants(5)
            .with_convergence_cutoff(usize::MAX)
            .with_max_iterations(7)
            .with_seed(42);

        let result = AcoRunner::run(&config);

        assert_eq!(result.iterations, 7);
        assert!(!result.converged);
    }

    #[test]
    fn test_runner_cancellation() {
        let config = AcoConfig::default().with_num_cities(8).with_seed(42);

        // Flag set before running: deterministic cancellation regardless of
        // how fast the loop converges.
        let cancel = Arc::new(AtomicBool::new(true));
        let result = AcoRunner::run_with_cancel(&config, Some(cancel));

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.best_tour.is_none());
        assert!(result.distance_history.is_empty());
    }

    #[test]
    fn test_runner_finds_square_optimum() {
        let config = AcoConfig::default()
            .with_num_ants(30)
            .with_convergence_cutoff(10)
            .with_seed(42);
        let mut colony = Colony::from_instance(square_instance(), config).unwrap();

        let result = AcoRunner::run_colony(&mut colony, None);

        // The only cycle lengths on this square are 40 (perimeter) and
        // ~48.28 (the two diagonal cycles); 330+ ant trials find the
        // perimeter with overwhelming probability.
        assert!(
            (result.best_distance - 40.0).abs() < 1e-9,
            "expected the perimeter tour, got {}",
            result.best_distance
        );
        // The colony keeps its state for inspection afterwards.
        assert_eq!(colony.best_distance(), result.best_distance);
        assert_eq!(colony.replay_best().len(), 30);
    }

    #[test]
    #[should_panic(expected = "invalid AcoConfig")]
    fn test_runner_panics_on_invalid_config() {
        let config = AcoConfig::default().with_num_cities(0);
        AcoRunner::run(&config);
    }
}
