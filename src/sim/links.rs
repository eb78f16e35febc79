//! Proximity links between particles
//!
//! Every unordered pair closer than the link distance gets a line whose alpha
//! fades linearly from `link_alpha` at zero distance to 0 at the threshold.
//! Two passes produce the same links in the same (a, b) order:
//! - `links_all_pairs`: tests every pair, O(n²)
//! - `links_grid`: buckets particles into link-distance cells and only tests
//!   neighboring cells

use std::collections::HashMap;

use super::particle::Particle;
use crate::settings::FieldConfig;

/// A line between particles `a` and `b` (indices, a < b)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// Line alpha for a pair at `distance`, or None if too far apart to link
#[inline]
pub fn link_alpha(distance: f32, max_distance: f32, max_alpha: f32) -> Option<f32> {
    if distance < max_distance {
        Some(max_alpha * (1.0 - distance / max_distance))
    } else {
        None
    }
}

#[inline]
fn try_link(particles: &[Particle], a: usize, b: usize, config: &FieldConfig) -> Option<Link> {
    let distance = (particles[a].pos - particles[b].pos).length();
    link_alpha(distance, config.link_distance, config.link_alpha).map(|alpha| Link {
        a,
        b,
        distance,
        alpha,
    })
}

/// Test every unordered pair
pub fn links_all_pairs(particles: &[Particle], config: &FieldConfig, out: &mut Vec<Link>) {
    out.clear();
    for a in 0..particles.len() {
        for b in a + 1..particles.len() {
            if let Some(link) = try_link(particles, a, b, config) {
                out.push(link);
            }
        }
    }
}

/// Grid-accelerated pass, identical output to `links_all_pairs`
pub fn links_grid(particles: &[Particle], config: &FieldConfig, out: &mut Vec<Link>) {
    out.clear();
    let cell = config.link_distance;
    if !(cell > 0.0) || particles.is_empty() {
        return;
    }

    let key = |p: &Particle| {
        (
            (p.pos.x / cell).floor() as i32,
            (p.pos.y / cell).floor() as i32,
        )
    };

    let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for (i, p) in particles.iter().enumerate() {
        grid.entry(key(p)).or_default().push(i);
    }

    for (a, p) in particles.iter().enumerate() {
        let (cx, cy) = key(p);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(bucket) = grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &b in bucket.iter().filter(|&&b| b > a) {
                    if let Some(link) = try_link(particles, a, b, config) {
                        out.push(link);
                    }
                }
            }
        }
    }

    // Buckets are visited cell by cell; restore pair order
    out.sort_unstable_by_key(|l| (l.a, l.b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: 1.0,
            opacity: 0.3,
        }
    }

    #[test]
    fn test_alpha_endpoints() {
        assert_eq!(link_alpha(0.0, 150.0, 0.06), Some(0.06));
        assert_eq!(link_alpha(150.0, 150.0, 0.06), None);
        assert_eq!(link_alpha(200.0, 150.0, 0.06), None);
        let half = link_alpha(75.0, 150.0, 0.06).unwrap();
        assert!((half - 0.03).abs() < 1e-7);
    }

    #[test]
    fn test_alpha_approaches_zero_at_threshold() {
        let near = link_alpha(149.999, 150.0, 0.06).unwrap();
        assert!(near >= 0.0 && near < 1e-5);
    }

    #[test]
    fn test_pairs_are_unordered_and_distinct() {
        let particles = vec![at(0.0, 0.0), at(100.0, 0.0), at(0.0, 100.0), at(500.0, 500.0)];
        let mut links = Vec::new();
        links_all_pairs(&particles, &FieldConfig::default(), &mut links);

        let pairs: Vec<_> = links.iter().map(|l| (l.a, l.b)).collect();
        // (1, 2) are ~141.4 apart, still linked; particle 3 is isolated
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
        assert!((links[0].alpha - 0.06 * (1.0 - 100.0 / 150.0)).abs() < 1e-7);
    }

    #[test]
    fn test_exact_threshold_not_linked() {
        let particles = vec![at(0.0, 0.0), at(150.0, 0.0)];
        let mut links = Vec::new();
        links_all_pairs(&particles, &FieldConfig::default(), &mut links);
        assert!(links.is_empty());
        links_grid(&particles, &FieldConfig::default(), &mut links);
        assert!(links.is_empty());
    }

    #[test]
    fn test_grid_handles_negative_overshoot() {
        let particles = vec![at(-0.1, -0.1), at(10.0, 10.0), at(149.0, -0.05)];
        let config = FieldConfig::default();
        let mut brute = Vec::new();
        let mut grid = Vec::new();
        links_all_pairs(&particles, &config, &mut brute);
        links_grid(&particles, &config, &mut grid);
        assert_eq!(brute, grid);
        assert_eq!(brute.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_alpha_linear_and_decreasing(d1 in 0.0f32..150.0, d2 in 0.0f32..150.0) {
            let a1 = link_alpha(d1, 150.0, 0.06).unwrap();
            let a2 = link_alpha(d2, 150.0, 0.06).unwrap();
            prop_assert!((0.0..=0.06).contains(&a1));
            if d1 < d2 {
                prop_assert!(a1 >= a2);
            }
        }

        #[test]
        fn prop_grid_matches_all_pairs(
            points in prop::collection::vec((-1.0f32..1201.0, -1.0f32..801.0), 0..90),
        ) {
            let particles: Vec<_> = points.iter().map(|&(x, y)| at(x, y)).collect();
            let config = FieldConfig::default();
            let mut brute = Vec::new();
            let mut grid = Vec::new();
            links_all_pairs(&particles, &config, &mut brute);
            links_grid(&particles, &config, &mut grid);
            prop_assert_eq!(brute, grid);
        }
    }
}
