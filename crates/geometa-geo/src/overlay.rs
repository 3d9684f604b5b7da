//! Planar overlay of a single ring.
//!
//! A self-intersecting ring is noded (every crossing or touching point
//! becomes an explicit vertex of both segments involved), turned into an
//! undirected edge graph, and the bounded faces of that graph are traced
//! back out as simple polygons.

use crate::error::RepairError;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString, MultiPolygon, Polygon};
use rstar::{RTree, RTreeObject, AABB};
use std::collections::{HashMap, HashSet, VecDeque};

/// Segment of the input ring indexed by its bounding box
struct IndexedSegment {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl IndexedSegment {
    fn new(index: usize, line: &Line<f64>) -> Self {
        let envelope = AABB::from_corners([line.start.x, line.start.y], [line.end.x, line.end.y]);
        Self { index, envelope }
    }
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Split a ring into the simple polygons enclosed by it
///
/// The returned faces have disjoint interiors and counter-clockwise
/// exteriors. A ring enclosing no area yields an empty multi-polygon.
pub fn polygonize_ring(ring: &LineString<f64>) -> Result<MultiPolygon<f64>, RepairError> {
    if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(RepairError::NonFinite);
    }

    let segments = ring_segments(ring);
    let split_points = node_segments(&segments);
    let graph = EdgeGraph::from_split_segments(&split_points);
    let faces = graph.pruned().faces();

    tracing::debug!(segments = segments.len(), faces = faces.len(), "Polygonized ring");
    Ok(MultiPolygon::new(faces))
}

/// Non-degenerate segments of a ring, closing it when needed
fn ring_segments(ring: &LineString<f64>) -> Vec<Line<f64>> {
    let mut coords: Vec<Coord<f64>> = ring.coords().copied().collect();
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }

    coords
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| Line::new(pair[0], pair[1]))
        .collect()
}

/// Every point at which each segment meets another, endpoints included
fn node_segments(segments: &[Line<f64>]) -> Vec<Vec<Coord<f64>>> {
    let mut split_points: Vec<Vec<Coord<f64>>> =
        segments.iter().map(|line| vec![line.start, line.end]).collect();

    let tree = RTree::bulk_load(
        segments.iter().enumerate().map(|(i, line)| IndexedSegment::new(i, line)).collect(),
    );

    for (i, line) in segments.iter().enumerate() {
        let envelope = IndexedSegment::new(i, line).envelope;
        for candidate in tree.locate_in_envelope_intersecting(&envelope) {
            let j = candidate.index;
            if j <= i {
                continue;
            }

            match line_intersection(*line, segments[j]) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    split_points[i].push(intersection);
                    split_points[j].push(intersection);
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    for point in [intersection.start, intersection.end] {
                        split_points[i].push(point);
                        split_points[j].push(point);
                    }
                }
                None => {}
            }
        }
    }

    for (line, points) in segments.iter().zip(split_points.iter_mut()) {
        sort_along(line, points);
    }
    split_points
}

/// Order points by their position along a segment and drop duplicates
fn sort_along(line: &Line<f64>, points: &mut Vec<Coord<f64>>) {
    let delta = line.delta();
    let length_sq = delta.x * delta.x + delta.y * delta.y;
    let param = |p: &Coord<f64>| {
        ((p.x - line.start.x) * delta.x + (p.y - line.start.y) * delta.y) / length_sq
    };

    points.sort_by(|a, b| param(a).total_cmp(&param(b)));
    points.dedup();
}

/// Bit-exact key for a vertex; `+ 0.0` folds negative zero into zero
fn node_key(coord: &Coord<f64>) -> (u64, u64) {
    ((coord.x + 0.0).to_bits(), (coord.y + 0.0).to_bits())
}

/// Undirected planar edge graph with vertices in insertion order
struct EdgeGraph {
    nodes: Vec<Coord<f64>>,
    adjacency: Vec<Vec<usize>>,
}

impl EdgeGraph {
    fn from_split_segments(split_points: &[Vec<Coord<f64>>]) -> Self {
        let mut nodes = Vec::new();
        let mut ids: HashMap<(u64, u64), usize> = HashMap::new();
        let mut edges: HashSet<(usize, usize)> = HashSet::new();
        let mut adjacency: Vec<Vec<usize>> = Vec::new();

        let mut node_id = |coord: &Coord<f64>, adjacency: &mut Vec<Vec<usize>>| {
            *ids.entry(node_key(coord)).or_insert_with(|| {
                nodes.push(*coord);
                adjacency.push(Vec::new());
                nodes.len() - 1
            })
        };

        for points in split_points {
            for pair in points.windows(2) {
                let u = node_id(&pair[0], &mut adjacency);
                let v = node_id(&pair[1], &mut adjacency);
                if u == v {
                    continue;
                }
                if edges.insert((u.min(v), u.max(v))) {
                    adjacency[u].push(v);
                    adjacency[v].push(u);
                }
            }
        }

        Self { nodes, adjacency }
    }

    /// Remove dangling edges until every remaining vertex has degree >= 2
    fn pruned(mut self) -> Self {
        let mut queue: VecDeque<usize> =
            (0..self.nodes.len()).filter(|&n| self.adjacency[n].len() == 1).collect();

        while let Some(node) = queue.pop_front() {
            if self.adjacency[node].len() != 1 {
                continue;
            }
            let neighbour = self.adjacency[node][0];
            self.adjacency[node].clear();
            self.adjacency[neighbour].retain(|&n| n != node);
            if self.adjacency[neighbour].len() == 1 {
                queue.push_back(neighbour);
            }
        }
        self
    }

    /// Trace every bounded face of the graph
    ///
    /// Neighbours are sorted counter-clockwise; leaving a vertex along the
    /// edge immediately clockwise of the one we arrived on keeps the face
    /// on the left, so bounded faces come out counter-clockwise and the
    /// unbounded face clockwise.
    fn faces(mut self) -> Vec<Polygon<f64>> {
        for node in 0..self.nodes.len() {
            let origin = self.nodes[node];
            let nodes = &self.nodes;
            self.adjacency[node].sort_by(|&a, &b| {
                angle(origin, nodes[a]).total_cmp(&angle(origin, nodes[b]))
            });
        }

        let mut visited: HashSet<(usize, usize)> = HashSet::new();
        let mut faces = Vec::new();

        for start in 0..self.nodes.len() {
            for &first in &self.adjacency[start] {
                if visited.contains(&(start, first)) {
                    continue;
                }

                let mut ring = vec![self.nodes[start]];
                let (mut from, mut to) = (start, first);
                while visited.insert((from, to)) {
                    ring.push(self.nodes[to]);
                    let around = &self.adjacency[to];
                    let Some(back) = around.iter().position(|&n| n == from) else {
                        break;
                    };
                    let next = around[(back + around.len() - 1) % around.len()];
                    (from, to) = (to, next);
                }

                if signed_area(&ring) > 0.0 {
                    faces.push(Polygon::new(LineString::new(ring), vec![]));
                }
            }
        }
        faces
    }
}

fn angle(origin: Coord<f64>, target: Coord<f64>) -> f64 {
    (target.y - origin.y).atan2(target.x - origin.x)
}

/// Shoelace area of a closed coordinate sequence, positive when
/// counter-clockwise
fn signed_area(ring: &[Coord<f64>]) -> f64 {
    ring.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn ring(points: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(points.to_vec())
    }

    #[test]
    fn test_simple_square_is_one_face() {
        let square = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let faces = polygonize_ring(&square).unwrap();

        assert_eq!(faces.0.len(), 1);
        assert!((faces.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_clockwise_square_gives_counter_clockwise_face() {
        let square = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        let faces = polygonize_ring(&square).unwrap();

        assert_eq!(faces.0.len(), 1);
        assert!(faces.0[0].signed_area() > 0.0);
    }

    #[test]
    fn test_figure_eight_splits_into_two_faces() {
        let bowtie = ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]);
        let faces = polygonize_ring(&bowtie).unwrap();

        assert_eq!(faces.0.len(), 2);
        for face in &faces.0 {
            assert!((face.unsigned_area() - 1.0).abs() < 1e-12);
            assert!(face
                .exterior()
                .coords()
                .any(|c| (c.x - 1.0).abs() < 1e-12 && (c.y - 1.0).abs() < 1e-12));
        }
    }

    #[test]
    fn test_spike_is_pruned() {
        let spiked = ring(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (2.0, 4.0),
            (2.0, 6.0),
            (2.0, 4.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ]);
        let faces = polygonize_ring(&spiked).unwrap();

        assert_eq!(faces.0.len(), 1);
        assert!((faces.unsigned_area() - 16.0).abs() < 1e-12);
        assert!(faces.0[0].exterior().coords().all(|c| c.y <= 4.0));
    }

    #[test]
    fn test_unclosed_ring_is_closed() {
        let open = ring(&[(0.0, 0.0), (3.0, 0.0), (0.0, 3.0)]);
        let faces = polygonize_ring(&open).unwrap();
        assert!((faces.unsigned_area() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_area_ring_has_no_faces() {
        let flat = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 0.0)]);
        assert!(polygonize_ring(&flat).unwrap().0.is_empty());
    }

    #[test]
    fn test_non_finite_rejected() {
        let bad = ring(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(polygonize_ring(&bad), Err(RepairError::NonFinite));
    }

    #[test]
    fn test_node_key_folds_negative_zero() {
        assert_eq!(node_key(&Coord { x: -0.0, y: 1.0 }), node_key(&Coord { x: 0.0, y: 1.0 }));
    }
}
