//! Problem instance: city coordinates, distance matrix, tour evaluation.
//!
//! An [`Instance`] is immutable once built. Regeneration (a full reset of
//! the colony) replaces the whole instance, so the distance matrix always
//! matches the city list.

use crate::types::Point;
use rand::Rng;

/// Margin kept free of cities along every edge of the generation area.
pub const PADDING: f64 = 50.0;

/// A symmetric Euclidean TSP instance.
#[derive(Debug, Clone)]
pub struct Instance {
    cities: Vec<Point>,
    distances: Vec<Vec<f64>>,
}

impl Instance {
    /// Builds an instance from explicit city coordinates.
    ///
    /// Computes the full N×N distance matrix (symmetric, zero diagonal).
    pub fn from_points(cities: Vec<Point>) -> Self {
        let n = cities.len();
        let mut distances = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cities[i].distance_to(&cities[j]);
                distances[i][j] = d;
                distances[j][i] = d;
            }
        }
        Self { cities, distances }
    }

    /// Generates `num_cities` cities inside the padded bounds.
    ///
    /// With `grid_spacing = None`, cities are drawn uniformly at random;
    /// duplicate coordinates are permitted. With `Some(spacing)`, cities
    /// are sampled without replacement from the lattice of points spaced
    /// `spacing` apart inside the padded bounds; if the lattice is smaller
    /// than `num_cities`, every lattice point is taken and the remainder is
    /// filled with random draws.
    pub fn generate<R: Rng>(
        num_cities: usize,
        width: f64,
        height: f64,
        grid_spacing: Option<f64>,
        rng: &mut R,
    ) -> Self {
        let cities = match grid_spacing {
            Some(spacing) => grid_cities(num_cities, width, height, spacing, rng),
            None => (0..num_cities)
                .map(|_| random_city(width, height, rng))
                .collect(),
        };
        Self::from_points(cities)
    }

    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    pub fn distances(&self) -> &[Vec<f64>] {
        &self.distances
    }

    /// Distance between cities `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[i][j]
    }

    /// Cyclic tour length: sum of edge distances including the wrap-around
    /// edge from the last city back to the first.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        let n = tour.len();
        (0..n)
            .map(|i| self.distances[tour[i]][tour[(i + 1) % n]])
            .sum()
    }
}

/// One uniformly random city inside the padded bounds.
///
/// A degenerate area (bound not larger than twice the padding) collapses
/// the range to the single point at the margin instead of panicking.
fn random_city<R: Rng>(width: f64, height: f64, rng: &mut R) -> Point {
    Point::new(sample_coord(width, rng), sample_coord(height, rng))
}

fn sample_coord<R: Rng>(limit: f64, rng: &mut R) -> f64 {
    let hi = limit - PADDING;
    if hi > PADDING {
        rng.random_range(PADDING..hi)
    } else {
        PADDING
    }
}

/// Grid-constrained placement: sample from the lattice spaced `spacing`
/// apart inside the padded bounds, falling back to random fill when the
/// lattice cannot supply enough points.
fn grid_cities<R: Rng>(
    num_cities: usize,
    width: f64,
    height: f64,
    spacing: f64,
    rng: &mut R,
) -> Vec<Point> {
    let cols = (((width - 2.0 * PADDING) / spacing).floor()).max(0.0) as usize;
    let rows = (((height - 2.0 * PADDING) / spacing).floor()).max(0.0) as usize;

    let mut lattice = Vec::with_capacity((rows + 1) * (cols + 1));
    for r in 0..=rows {
        for c in 0..=cols {
            lattice.push(Point::new(
                PADDING + c as f64 * spacing,
                PADDING + r as f64 * spacing,
            ));
        }
    }

    if lattice.len() >= num_cities {
        rand::seq::index::sample(rng, lattice.len(), num_cities)
            .into_iter()
            .map(|i| lattice[i])
            .collect()
    } else {
        let mut cities = lattice;
        while cities.len() < num_cities {
            cities.push(random_city(width, height, rng));
        }
        cities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_instance() -> Instance {
        Instance::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ])
    }

    #[test]
    fn test_distance_matrix_symmetric_zero_diagonal() {
        let instance = square_instance();
        let n = instance.num_cities();
        for i in 0..n {
            assert_eq!(instance.distance(i, i), 0.0);
            for j in 0..n {
                assert_eq!(instance.distance(i, j), instance.distance(j, i));
                if i != j {
                    assert!(instance.distance(i, j) > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_square_edge_distances() {
        let instance = square_instance();
        assert!((instance.distance(0, 1) - 10.0).abs() < 1e-12);
        assert!((instance.distance(0, 2) - 200.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_tour_length_square_perimeter() {
        let instance = square_instance();
        let length = instance.tour_length(&[0, 1, 2, 3]);
        assert!(
            (length - 40.0).abs() < 1e-12,
            "perimeter tour should have length 40, got {length}"
        );
    }

    #[test]
    fn test_tour_length_includes_wraparound() {
        let instance = square_instance();
        // 0 -> 2 and 2 -> 0 are both diagonals.
        let length = instance.tour_length(&[0, 2]);
        assert!((length - 2.0 * 200.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_tour_length_trivial_tours() {
        let instance = square_instance();
        assert_eq!(instance.tour_length(&[]), 0.0);
        assert_eq!(instance.tour_length(&[2]), 0.0);
    }

    #[test]
    fn test_free_placement_within_padded_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let instance = Instance::generate(40, 300.0, 300.0, None, &mut rng);
        assert_eq!(instance.num_cities(), 40);
        for city in instance.cities() {
            assert!(city.x >= PADDING && city.x <= 300.0 - PADDING);
            assert!(city.y >= PADDING && city.y <= 300.0 - PADDING);
        }
    }

    #[test]
    fn test_free_placement_degenerate_bounds_clamp() {
        // Bounds smaller than twice the padding: every coordinate pins to
        // the margin rather than panicking on an empty range.
        let mut rng = StdRng::seed_from_u64(42);
        let instance = Instance::generate(5, 60.0, 60.0, None, &mut rng);
        for city in instance.cities() {
            assert_eq!(city.x, PADDING);
            assert_eq!(city.y, PADDING);
        }
    }

    #[test]
    fn test_grid_placement_selects_distinct_lattice_points() {
        // 300x300 with spacing 100: lattice is {50, 150, 250}^2, 9 points.
        let mut rng = StdRng::seed_from_u64(42);
        let instance = Instance::generate(4, 300.0, 300.0, Some(100.0), &mut rng);
        assert_eq!(instance.num_cities(), 4);

        for city in instance.cities() {
            assert!(
                [50.0, 150.0, 250.0].contains(&city.x),
                "x off-lattice: {}",
                city.x
            );
            assert!(
                [50.0, 150.0, 250.0].contains(&city.y),
                "y off-lattice: {}",
                city.y
            );
        }

        // Without replacement: no duplicates.
        for (i, a) in instance.cities().iter().enumerate() {
            for b in &instance.cities()[i + 1..] {
                assert_ne!(a, b, "grid sampling must not repeat lattice points");
            }
        }
    }

    #[test]
    fn test_grid_placement_exhausts_lattice() {
        // Lattice of 9 points, all requested.
        let mut rng = StdRng::seed_from_u64(7);
        let instance = Instance::generate(9, 300.0, 300.0, Some(100.0), &mut rng);
        let mut xs: Vec<(u64, u64)> = instance
            .cities()
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect();
        xs.sort_unstable();
        xs.dedup();
        assert_eq!(xs.len(), 9, "all nine lattice points should appear once");
    }

    #[test]
    fn test_grid_placement_fills_past_lattice() {
        // Lattice smaller than the request: every lattice point is used and
        // the remainder is filled with free draws.
        let mut rng = StdRng::seed_from_u64(7);
        let instance = Instance::generate(12, 300.0, 300.0, Some(100.0), &mut rng);
        assert_eq!(instance.num_cities(), 12);

        let on_lattice = instance
            .cities()
            .iter()
            .filter(|p| {
                [50.0, 150.0, 250.0].contains(&p.x) && [50.0, 150.0, 250.0].contains(&p.y)
            })
            .count();
        assert!(on_lattice >= 9, "all lattice points must be included");
    }

    #[test]
    fn test_generate_recomputes_distances() {
        let mut rng = StdRng::seed_from_u64(3);
        let instance = Instance::generate(6, 400.0, 400.0, None, &mut rng);
        for i in 0..6 {
            for j in 0..6 {
                let expected = instance.cities()[i].distance_to(&instance.cities()[j]);
                assert!((instance.distance(i, j) - expected).abs() < 1e-12);
            }
        }
    }
}
