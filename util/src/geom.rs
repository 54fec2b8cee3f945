use glam::{ivec2, IVec2};

/// 8 directions, orthogonals first, then diagonals.
///
/// Code that scans neighbors in a fixed order and keeps the first best
/// result relies on this ordering to prefer orthogonal steps over diagonal
/// ones. Do not reorder.
pub const DIR_8: [IVec2; 8] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([-1, 0]),
    IVec2::from_array([1, 1]),
    IVec2::from_array([-1, 1]),
    IVec2::from_array([1, -1]),
    IVec2::from_array([-1, -1]),
];

/// 4 orthogonal directions, the prefix of `DIR_8`.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([-1, 0]),
];

pub trait VecExt: Sized {
    /// Absolute size of vector in taxicab metric.
    fn taxi_len(&self) -> i32;

    /// Absolute size of vector in chessboard metric.
    fn cheb_len(&self) -> i32;

    /// Vec points to one of the 8 surrounding cells.
    fn is_adjacent(&self) -> bool {
        self.cheb_len() == 1
    }

    /// Unit step vector pointing towards the other point.
    fn step_towards(&self, other: &Self) -> Self;
}

impl VecExt for IVec2 {
    fn taxi_len(&self) -> i32 {
        self.x.abs() + self.y.abs()
    }

    fn cheb_len(&self) -> i32 {
        self.x.abs().max(self.y.abs())
    }

    fn step_towards(&self, other: &Self) -> Self {
        let d = *other - *self;
        ivec2(d.x.signum(), d.y.signum())
    }
}

/// Plot the line from `a` towards `b`, excluding the endpoint `b`.
pub fn bresenham_line(
    a: impl Into<IVec2>,
    b: impl Into<IVec2>,
) -> impl Iterator<Item = IVec2> {
    let (a, b): (IVec2, IVec2) = (a.into(), b.into());

    let d = b - a;
    let step = d.signum();
    let d = d.abs() * ivec2(1, -1);
    let mut p = a;
    let mut err = d.x + d.y;

    std::iter::from_fn(move || {
        if p == b {
            None
        } else {
            let ret = p;

            let e2 = 2 * err;
            if e2 >= d.y {
                err += d.y;
                p.x += step.x;
            }
            if e2 <= d.x {
                err += d.x;
                p.y += step.y;
            }
            Some(ret)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_tables() {
        // DIR_4 must stay the orthogonal prefix of DIR_8.
        assert_eq!(&DIR_8[..4], &DIR_4[..]);

        for d in DIR_8 {
            assert!(d.is_adjacent());
        }
        assert_eq!(DIR_8.iter().filter(|d| d.taxi_len() == 1).count(), 4);
        assert_eq!(DIR_8.iter().filter(|d| d.taxi_len() == 2).count(), 4);
    }

    #[test]
    fn lines() {
        let pts: Vec<IVec2> =
            bresenham_line(ivec2(0, 0), ivec2(4, 2)).collect();
        assert_eq!(pts[0], ivec2(0, 0));
        assert!(!pts.contains(&ivec2(4, 2)));
        // Consecutive plotted cells are always adjacent.
        for w in pts.windows(2) {
            assert!((w[1] - w[0]).is_adjacent());
        }
    }

    #[test]
    fn steps() {
        assert_eq!(ivec2(0, 0).step_towards(&ivec2(5, -3)), ivec2(1, -1));
        assert_eq!(ivec2(2, 2).step_towards(&ivec2(2, 9)), ivec2(0, 1));
        assert_eq!(ivec2(1, 1).step_towards(&ivec2(1, 1)), ivec2(0, 0));
    }
}
