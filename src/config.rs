//! Solver configuration.
//!
//! [`AcoConfig`] holds all parameters that control instance generation,
//! tour construction, and the pheromone update.

/// Configuration for the ACO solver.
///
/// Controls instance size and bounds, colony size, the selection weighting
/// exponents, the pheromone model, and the batch-run termination policy.
///
/// # Defaults
///
/// ```
/// use aco_tsp::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.num_cities, 8);
/// assert_eq!(config.num_ants, 50);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use aco_tsp::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_num_cities(20)
///     .with_num_ants(30)
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of cities in the problem instance.
    ///
    /// Changing this on a live [`Colony`](crate::Colony) requires a full
    /// reset; use [`Colony::set_num_cities`](crate::Colony::set_num_cities).
    pub num_cities: usize,

    /// Number of ants (independent tour constructions) per iteration.
    ///
    /// Zero is legal: an iteration then only evaporates pheromones.
    pub num_ants: usize,

    /// Pheromone influence exponent in the selection weight.
    pub alpha: f64,

    /// Inverse-distance influence exponent in the selection weight.
    pub beta: f64,

    /// Fraction of pheromone removed each iteration, strictly in (0, 1).
    ///
    /// Near 0 = slow forgetting, near 1 = near-total forgetting.
    pub evaporation_rate: f64,

    /// Deposit constant: a tour of length `d` deposits `q / d` per edge.
    pub q: f64,

    /// Width of the generation area. Cities are placed inside a fixed
    /// padding margin.
    pub width: f64,

    /// Height of the generation area.
    pub height: f64,

    /// Lattice spacing for grid-constrained city placement.
    ///
    /// `None` places cities uniformly at random inside the padded bounds.
    pub grid_spacing: Option<f64>,

    /// Iterations without improvement before the colony counts as
    /// converged. Used by [`Colony::is_converged`](crate::Colony::is_converged)
    /// and the batch runner.
    pub convergence_cutoff: usize,

    /// Maximum iterations for a batch run. 0 = no limit.
    pub max_iterations: usize,

    /// Whether to construct ant tours in parallel using rayon.
    ///
    /// Requires the `parallel` cargo feature; ignored otherwise. Results
    /// are identical either way because each ant draws from its own
    /// pre-seeded random stream.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_cities: 8,
            num_ants: 50,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            q: 100.0,
            width: 900.0,
            height: 800.0,
            grid_spacing: None,
            convergence_cutoff: 30,
            max_iterations: 0,
            parallel: false,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_num_cities(mut self, n: usize) -> Self {
        self.num_cities = n;
        self
    }

    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Sets the generation area bounds.
    pub fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the grid spacing (`None` for free placement).
    pub fn with_grid_spacing(mut self, spacing: Option<f64>) -> Self {
        self.grid_spacing = spacing;
        self
    }

    /// Sets the stagnation cutoff for convergence detection.
    pub fn with_convergence_cutoff(mut self, cutoff: usize) -> Self {
        self.convergence_cutoff = cutoff;
        self
    }

    /// Sets the batch-run iteration budget (0 to disable).
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Enables or disables parallel tour construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_cities < 2 {
            return Err("num_cities must be at least 2".into());
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(format!("alpha must be finite and non-negative, got {}", self.alpha));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(format!("beta must be finite and non-negative, got {}", self.beta));
        }
        if !self.evaporation_rate.is_finite()
            || self.evaporation_rate <= 0.0
            || self.evaporation_rate >= 1.0
        {
            return Err(format!(
                "evaporation_rate must be in (0, 1), got {}",
                self.evaporation_rate
            ));
        }
        if !self.q.is_finite() || self.q < 0.0 {
            return Err(format!("q must be finite and non-negative, got {}", self.q));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(format!("width must be positive, got {}", self.width));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(format!("height must be positive, got {}", self.height));
        }
        if let Some(spacing) = self.grid_spacing {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(format!("grid_spacing must be positive, got {spacing}"));
            }
        }
        Ok(())
    }
}
