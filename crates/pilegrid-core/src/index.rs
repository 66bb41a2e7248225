//! Spatial index over detection centers.
//!
//! The kd-tree stores each distinct coordinate once; stacked duplicates are
//! kept as members of that site and expanded back when querying. Trees built
//! over many identical coordinates cannot split their leaves.

use std::collections::HashMap;

use crate::Point;
use kiddo::{KdTree, SquaredEuclidean};

/// Bit pattern of a coordinate pair, with `-0.0` folded onto `0.0`.
fn site_key(p: &Point) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// Nearest-neighbor and radius queries over a fixed point set.
pub struct PointIndex {
    tree: KdTree<f64, 2>,
    sites: Vec<Point>,
    /// Site of every input point, in input order.
    site_of: Vec<usize>,
    /// Input indices stacked on each site, ascending.
    members: Vec<Vec<usize>>,
}

impl PointIndex {
    pub fn new(points: &[Point]) -> Self {
        let mut lookup: HashMap<(u64, u64), usize> = HashMap::with_capacity(points.len());
        let mut sites = Vec::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut site_of = Vec::with_capacity(points.len());

        for (i, p) in points.iter().enumerate() {
            let site = *lookup.entry(site_key(p)).or_insert_with(|| {
                sites.push(*p);
                members.push(Vec::new());
                sites.len() - 1
            });
            members[site].push(i);
            site_of.push(site);
        }

        let coords = sites.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>();
        let tree: KdTree<f64, 2> = (&coords).into();

        Self {
            tree,
            sites,
            site_of,
            members,
        }
    }

    pub fn len(&self) -> usize {
        self.site_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.site_of.is_empty()
    }

    /// Number of distinct coordinates.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Distance from point `i` to its nearest other point; zero when another
    /// point shares its coordinates. `None` for a lone point.
    pub fn nearest_other_distance(&self, i: usize) -> Option<f64> {
        let site = self.site_of[i];
        if self.members[site].len() > 1 {
            return Some(0.0);
        }
        let q = self.sites[site];
        self.tree
            .nearest_n::<SquaredEuclidean>(&[q.x, q.y], 2)
            .into_iter()
            .filter(|nn| nn.item as usize != site)
            .map(|nn| nn.distance.sqrt())
            .reduce(f64::min)
    }

    /// Distance from `query` to the closest indexed point.
    pub fn nearest_distance(&self, query: &Point) -> Option<f64> {
        if self.sites.is_empty() {
            return None;
        }
        let nn = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x, query.y]);
        Some(nn.distance.sqrt())
    }

    /// Every input index within `radius` of `query`, with its distance.
    /// Order is unspecified.
    pub fn within(&self, query: &Point, radius: f64) -> Vec<(usize, f64)> {
        if self.sites.is_empty() {
            return Vec::new();
        }
        self.tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
            .into_iter()
            .flat_map(|nn| {
                let d = nn.distance.sqrt();
                self.members[nn.item as usize].iter().map(move |&i| (i, d))
            })
            .collect()
    }
}
