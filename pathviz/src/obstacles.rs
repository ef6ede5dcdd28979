//! Random obstacle placement.

use log::debug;
use rand::{Rng, RngExt};

use pathviz_core::{Grid, NodeKind, Pos, Result};

/// Turn roughly `density` of the empty cells into walls.
///
/// `density` is clamped to `[0, 1]`; markers and existing walls are left
/// alone. Returns the number of walls added.
pub fn scatter(grid: &mut Grid, density: f64, rng: &mut impl Rng) -> Result<usize> {
    if density.is_nan() || density <= 0.0 {
        return Ok(0);
    }
    let density = density.min(1.0);

    let empty: Vec<Pos> = grid
        .iter()
        .filter(|(_, n)| n.kind() == NodeKind::Empty)
        .map(|(p, _)| p)
        .collect();
    let mut added = 0;
    for p in empty {
        if rng.random_bool(density) {
            grid.set_kind(p, NodeKind::Wall)?;
            added += 1;
        }
    }
    debug!("scattered {added} wall(s) at density {density:.2}");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grid() -> Grid {
        Grid::new(10, 10, Pos::new(0, 0), Pos::new(9, 9)).unwrap()
    }

    #[test]
    fn zero_and_nan_do_nothing() {
        let mut g = grid();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(scatter(&mut g, 0.0, &mut rng).unwrap(), 0);
        assert_eq!(scatter(&mut g, f64::NAN, &mut rng).unwrap(), 0);
        assert_eq!(g.count(NodeKind::Wall), 0);
    }

    #[test]
    fn full_density_spares_markers() {
        let mut g = grid();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(scatter(&mut g, 5.0, &mut rng).unwrap(), 98);
        assert_eq!(g.kind(Pos::new(0, 0)), Some(NodeKind::Start));
        assert_eq!(g.kind(Pos::new(9, 9)), Some(NodeKind::Target));
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = grid();
        let mut b = grid();
        scatter(&mut a, 0.3, &mut StdRng::seed_from_u64(42)).unwrap();
        scatter(&mut b, 0.3, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
