use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};

/// A dense rectangular grid of values indexed by 2D cell coordinates.
///
/// Out of bounds reads through `get` return `None`, the `Index` operators
/// panic. Equality is cell-by-cell, so two grids built the same way compare
/// identical.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Grid<T> {
    dim: IVec2,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(dim: impl Into<IVec2>, init: T) -> Self {
        let dim = dim.into();
        assert!(dim.x > 0 && dim.y > 0, "degenerate grid dimensions");
        Grid {
            dim,
            data: vec![init; (dim.x * dim.y) as usize],
        }
    }

    /// Overwrite every cell with the given value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn dim(&self) -> IVec2 {
        self.dim
    }

    pub fn contains(&self, pos: impl Into<IVec2>) -> bool {
        let pos = pos.into();
        pos.x >= 0 && pos.y >= 0 && pos.x < self.dim.x && pos.y < self.dim.y
    }

    pub fn get(&self, pos: impl Into<IVec2>) -> Option<&T> {
        let pos = pos.into();
        self.contains(pos)
            .then(|| &self.data[(pos.y * self.dim.x + pos.x) as usize])
    }

    pub fn get_mut(&mut self, pos: impl Into<IVec2>) -> Option<&mut T> {
        let pos = pos.into();
        self.contains(pos)
            .then(|| &mut self.data[(pos.y * self.dim.x + pos.x) as usize])
    }

    /// Iterate all cell coordinates in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.dim.y)
            .flat_map(move |y| (0..self.dim.x).map(move |x| ivec2(x, y)))
    }

    /// Iterate coordinate-value pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &T)> + '_ {
        self.iter_cells().zip(self.data.iter())
    }
}

impl<T> std::ops::Index<IVec2> for Grid<T> {
    type Output = T;

    fn index(&self, pos: IVec2) -> &T {
        assert!(self.contains(pos), "Grid: index {pos} out of bounds");
        &self.data[(pos.y * self.dim.x + pos.x) as usize]
    }
}

impl<T> std::ops::IndexMut<IVec2> for Grid<T> {
    fn index_mut(&mut self, pos: IVec2) -> &mut T {
        assert!(self.contains(pos), "Grid: index {pos} out of bounds");
        &mut self.data[(pos.y * self.dim.x + pos.x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let mut g = Grid::new([3, 2], 0u16);
        assert_eq!(g.dim(), ivec2(3, 2));
        assert!(g.contains([0, 0]));
        assert!(g.contains([2, 1]));
        assert!(!g.contains([3, 1]));
        assert!(!g.contains([-1, 0]));

        assert_eq!(g.get([5, 5]), None);
        g[ivec2(2, 1)] = 7;
        assert_eq!(g[ivec2(2, 1)], 7);
        assert_eq!(g.iter_cells().count(), 6);
    }

    #[test]
    fn equality() {
        let mut a = Grid::new([4, 4], 0u16);
        let mut b = Grid::new([4, 4], 0u16);
        assert_eq!(a, b);
        a[ivec2(1, 1)] = 3;
        assert_ne!(a, b);
        b[ivec2(1, 1)] = 3;
        assert_eq!(a, b);
    }
}
