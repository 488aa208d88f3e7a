//! Colony state and the per-iteration optimization step.
//!
//! A [`Colony`] owns the problem instance, the pheromone matrix, and the
//! best-solution bookkeeping. One call to [`Colony::run_iteration`] sends
//! every ant around the map, updates the best tour, evaporates and deposits
//! pheromone, and returns all trails for downstream consumers.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stuetzle (2004), "Ant Colony Optimization"

use crate::config::AcoConfig;
use crate::instance::Instance;
use crate::types::AntTour;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Baseline pheromone level for every city pair after (re)initialization.
pub const INITIAL_PHEROMONE: f64 = 0.1;

/// The ACO solver state.
///
/// Construction generates a problem instance from the configured bounds;
/// [`Colony::from_instance`] accepts an explicit map instead. Tunables are
/// mutable between iterations through the validated `set_*` methods;
/// changing the city count goes through [`Colony::set_num_cities`], which
/// performs a full reset because both matrices are dimensioned by it.
///
/// # Usage
///
/// ```
/// use aco_tsp::{AcoConfig, Colony};
///
/// let config = AcoConfig::default().with_num_cities(10).with_seed(42);
/// let mut colony = Colony::new(config).unwrap();
///
/// for _ in 0..5 {
///     let trails = colony.run_iteration();
///     assert_eq!(trails.len(), colony.config().num_ants);
/// }
/// assert!(colony.best_distance().is_finite());
/// ```
#[derive(Debug)]
pub struct Colony {
    config: AcoConfig,
    instance: Instance,
    pheromones: Vec<Vec<f64>>,
    best_tour: Option<Vec<usize>>,
    best_distance: f64,
    iteration: usize,
    last_improvement_iter: usize,
    rng: StdRng,
}

impl Colony {
    /// Creates a colony with a freshly generated instance.
    ///
    /// Returns `Err` with a description if the configuration is invalid.
    pub fn new(config: AcoConfig) -> Result<Self, String> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let instance = Instance::generate(
            config.num_cities,
            config.width,
            config.height,
            config.grid_spacing,
            &mut rng,
        );
        Ok(Self::assemble(config, instance, rng))
    }

    /// Creates a colony over an explicit instance.
    ///
    /// `config.num_cities` is overridden by the instance's city count.
    /// A later full reset regenerates cities from the configured bounds.
    pub fn from_instance(instance: Instance, config: AcoConfig) -> Result<Self, String> {
        let config = config.with_num_cities(instance.num_cities());
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self::assemble(config, instance, rng))
    }

    fn assemble(config: AcoConfig, instance: Instance, rng: StdRng) -> Self {
        let n = instance.num_cities();
        Self {
            config,
            instance,
            pheromones: initial_pheromones(n),
            best_tour: None,
            best_distance: f64::INFINITY,
            iteration: 0,
            last_improvement_iter: 0,
            rng,
        }
    }

    /// Runs exactly one optimization iteration.
    ///
    /// Every ant constructs and evaluates a tour, the best-so-far record is
    /// updated, and evaporation plus deposit are applied using all trails.
    /// Returns one [`AntTour`] per ant (empty for an ant-less colony, which
    /// still evaporates).
    pub fn run_iteration(&mut self) -> Vec<AntTour> {
        // Sub-seeds are drawn up front so each ant has an independent
        // stream; sequential and parallel construction produce identical
        // trails.
        let seeds: Vec<u64> = (0..self.config.num_ants)
            .map(|_| self.rng.random())
            .collect();
        let trails = self.construct_trails(&seeds);

        for trail in &trails {
            if trail.length < self.best_distance {
                self.best_distance = trail.length;
                self.best_tour = Some(trail.tour.clone());
                self.last_improvement_iter = self.iteration;
            }
        }

        update_pheromones(
            &mut self.pheromones,
            &trails,
            self.config.evaporation_rate,
            self.config.q,
        );
        self.iteration += 1;

        trails
    }

    /// Replays the best-known solution without mutating any state.
    ///
    /// Returns the best trail repeated once per ant (the same shape as a
    /// live iteration, so downstream consumers need no special case), or an
    /// empty vec when no best exists yet.
    pub fn replay_best(&self) -> Vec<AntTour> {
        match &self.best_tour {
            None => Vec::new(),
            Some(tour) => (0..self.config.num_ants)
                .map(|_| AntTour {
                    tour: tour.clone(),
                    length: self.best_distance,
                })
                .collect(),
        }
    }

    /// Full reset: regenerates cities and distances from the configured
    /// bounds and reinitializes pheromones and run state.
    pub fn reset(&mut self) {
        self.instance = Instance::generate(
            self.config.num_cities,
            self.config.width,
            self.config.height,
            self.config.grid_spacing,
            &mut self.rng,
        );
        self.reset_pheromones();
    }

    /// Soft reset: reinitializes pheromones and run state, keeping the
    /// current cities and distances.
    pub fn reset_pheromones(&mut self) {
        self.pheromones = initial_pheromones(self.config.num_cities);
        self.best_tour = None;
        self.best_distance = f64::INFINITY;
        self.iteration = 0;
        self.last_improvement_iter = 0;
    }

    /// Whether the colony has stalled past the configured cutoff.
    pub fn is_converged(&self) -> bool {
        self.iteration > 0
            && self.iteration - self.last_improvement_iter > self.config.convergence_cutoff
    }

    // ---- Readable state ----

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn pheromones(&self) -> &[Vec<f64>] {
        &self.pheromones
    }

    pub fn best_tour(&self) -> Option<&[usize]> {
        self.best_tour.as_deref()
    }

    /// Length of the best tour, or `f64::INFINITY` before any solution.
    pub fn best_distance(&self) -> f64 {
        self.best_distance
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn last_improvement_iter(&self) -> usize {
        self.last_improvement_iter
    }

    // ---- Parameter mutation between iterations ----

    /// Sets the ant count. Any value is legal, including zero.
    pub fn set_num_ants(&mut self, n: usize) {
        self.config.num_ants = n;
    }

    /// Sets the pheromone exponent. Rejects invalid values, leaving the
    /// current value in place.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), String> {
        self.apply(self.config.clone().with_alpha(alpha))
    }

    /// Sets the inverse-distance exponent.
    pub fn set_beta(&mut self, beta: f64) -> Result<(), String> {
        self.apply(self.config.clone().with_beta(beta))
    }

    /// Sets the evaporation rate (strictly inside (0, 1)).
    pub fn set_evaporation_rate(&mut self, rate: f64) -> Result<(), String> {
        self.apply(self.config.clone().with_evaporation_rate(rate))
    }

    /// Sets the deposit constant.
    pub fn set_q(&mut self, q: f64) -> Result<(), String> {
        self.apply(self.config.clone().with_q(q))
    }

    /// Sets the grid spacing used by the next full reset.
    pub fn set_grid_spacing(&mut self, spacing: Option<f64>) -> Result<(), String> {
        self.apply(self.config.clone().with_grid_spacing(spacing))
    }

    /// Changes the city count and performs the full reset this requires
    /// (distance and pheromone matrix dimensions must match it).
    pub fn set_num_cities(&mut self, n: usize) -> Result<(), String> {
        self.apply(self.config.clone().with_num_cities(n))?;
        self.reset();
        Ok(())
    }

    fn apply(&mut self, candidate: AcoConfig) -> Result<(), String> {
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    // ---- Internals ----

    fn construct_trails(&self, seeds: &[u64]) -> Vec<AntTour> {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return seeds.par_iter().map(|&s| self.run_ant(s)).collect();
        }
        seeds.iter().map(|&s| self.run_ant(s)).collect()
    }

    fn run_ant(&self, seed: u64) -> AntTour {
        let mut rng = StdRng::seed_from_u64(seed);
        let tour = construct_tour(
            &self.instance,
            &self.pheromones,
            self.config.alpha,
            self.config.beta,
            &mut rng,
        );
        let length = self.instance.tour_length(&tour);
        AntTour { tour, length }
    }
}

fn initial_pheromones(n: usize) -> Vec<Vec<f64>> {
    vec![vec![INITIAL_PHEROMONE; n]; n]
}

/// Builds one tour by sequential probabilistic selection.
///
/// From a uniformly random start city, each step weighs every unvisited
/// city by `pheromone^alpha * (1/distance)^beta` (zero when the distance
/// is zero) and samples the next city from the normalized weights.
fn construct_tour<R: Rng>(
    instance: &Instance,
    pheromones: &[Vec<f64>],
    alpha: f64,
    beta: f64,
    rng: &mut R,
) -> Vec<usize> {
    let n = instance.num_cities();
    let mut tour = Vec::with_capacity(n);
    let mut visited = vec![false; n];

    let start = rng.random_range(0..n);
    tour.push(start);
    visited[start] = true;

    let mut current = start;
    let mut candidates = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);

    while tour.len() < n {
        candidates.clear();
        weights.clear();

        for j in 0..n {
            if visited[j] {
                continue;
            }
            let tau = pheromones[current][j].powf(alpha);
            let d = instance.distance(current, j);
            let eta = if d > 0.0 { (1.0 / d).powf(beta) } else { 0.0 };
            candidates.push(j);
            weights.push(tau * eta);
        }

        let next = weighted_pick(&candidates, &weights, rng);
        tour.push(next);
        visited[next] = true;
        current = next;
    }

    tour
}

/// Cumulative weighted draw over `candidates`.
///
/// A zero weight total is an expected input class (all desirabilities
/// degenerate, e.g. every remaining distance is zero) and falls back to a
/// uniform draw instead of failing.
fn weighted_pick<R: Rng>(candidates: &[usize], weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return candidates[rng.random_range(0..candidates.len())];
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return candidates[i];
        }
    }

    candidates[candidates.len() - 1] // floating-point fallback
}

/// Evaporation followed by reinforcement, symmetric in both directions.
///
/// A zero-length trail (coincident cities collapsing the whole cycle)
/// skips its deposit so the matrix never sees a division by zero.
fn update_pheromones(
    pheromones: &mut [Vec<f64>],
    trails: &[AntTour],
    evaporation_rate: f64,
    q: f64,
) {
    let keep = 1.0 - evaporation_rate;
    for row in pheromones.iter_mut() {
        for entry in row.iter_mut() {
            *entry *= keep;
        }
    }

    for trail in trails {
        if trail.length <= 0.0 {
            continue;
        }
        let deposit = q / trail.length;
        let n = trail.tour.len();
        for i in 0..n {
            let from = trail.tour[i];
            let to = trail.tour[(i + 1) % n];
            pheromones[from][to] += deposit;
            pheromones[to][from] += deposit;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
