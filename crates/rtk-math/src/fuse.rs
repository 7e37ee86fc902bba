//! Vertex fusing by union-find.
//!
//! Coincident vertices are merged into equivalence classes and every input
//! index is mapped to one canonical index. Callers keep their own coordinate
//! buffers; only the index table is shared.

use rtk_core::Tolerance;

use crate::predicates::pt2_equal;
use crate::Point2;

#[derive(Debug, Clone)]
pub struct VertexFuse {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl VertexFuse {
    /// `n` singleton classes.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Merge every pair of items for which `same` holds. Quadratic; meant for
    /// the handful of endpoints in a trimming loop.
    pub fn from_items<P>(items: &[P], same: impl Fn(&P, &P) -> bool) -> Self {
        let mut fuse = Self::new(items.len());
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                if same(&items[i], &items[j]) {
                    fuse.union(i, j);
                }
            }
        }
        fuse
    }

    pub fn from_points2(points: &[Point2], tol: &Tolerance) -> Self {
        Self::from_items(points, |a, b| pt2_equal(*a, *b, tol))
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    pub fn same(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Map each index to the smallest index of its class.
    pub fn remap(&mut self) -> Vec<usize> {
        let n = self.len();
        let mut smallest = vec![usize::MAX; n];
        for i in 0..n {
            let r = self.find(i);
            smallest[r] = smallest[r].min(i);
        }
        (0..n).map(|i| smallest[self.find(i)]).collect()
    }

    pub fn class_count(&mut self) -> usize {
        (0..self.len()).filter(|&i| self.find(i) == i).count()
    }
}
