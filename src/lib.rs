//! Ant Colony Optimization solver for the symmetric Traveling Salesman
//! Problem.
//!
//! A population of ants repeatedly constructs cyclic tours over a set of
//! cities, biased by a learned pheromone model: each step weighs every
//! unvisited city by `pheromone^alpha * (1/distance)^beta` and samples the
//! next city from the normalized weights. After every iteration the
//! pheromone matrix evaporates and each ant deposits `q / tour_length`
//! along its tour, so short tours reinforce their edges over time.
//!
//! - [`Instance`]: city coordinates (free or grid-constrained placement)
//!   and the symmetric distance matrix.
//! - [`AcoConfig`]: all tunables with validation.
//! - [`Colony`]: the solver state. One optimization iteration at a time,
//!   best-tour tracking, replay, and full/soft resets. Built for stepwise
//!   driving (e.g. one iteration per animation frame).
//! - [`AcoRunner`]: batch loop running a colony until it stalls past the
//!   convergence cutoff, with cancellation and distance history.
//!
//! # Example
//!
//! ```
//! use aco_tsp::{AcoConfig, AcoRunner};
//!
//! let config = AcoConfig::default()
//!     .with_num_cities(15)
//!     .with_num_ants(20)
//!     .with_convergence_cutoff(10)
//!     .with_seed(42);
//!
//! let result = AcoRunner::run(&config);
//! assert!(result.converged);
//! println!("best tour length: {:.1}", result.best_distance);
//! ```
//!
//! # Features
//!
//! - `parallel`: construct ant tours in parallel with rayon (deterministic
//!   per seed, since each ant uses its own derived random stream).
//! - `serde`: `Serialize`/`Deserialize` on the public value types.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"

pub mod colony;
pub mod config;
pub mod instance;
pub mod runner;
pub mod types;

pub use colony::{Colony, INITIAL_PHEROMONE};
pub use config::AcoConfig;
pub use instance::{Instance, PADDING};
pub use runner::{AcoResult, AcoRunner};
pub use types::{AntTour, Point};
