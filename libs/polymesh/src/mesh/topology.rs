//! # Half-Edge Topology
//!
//! Derived adjacency for a face list. Face `f`'s `k`-th half-edge is stored at
//! `face_start[f] + k` and runs from `face[k]` to `face[k + 1]`.
//!
//! Twins are paired only when both directions exist exactly once; meshes with
//! inconsistent winding simply see those edges as boundary.

use std::collections::HashMap;
use std::ops::Range;

/// One directed edge of a face loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Start vertex.
    pub from: usize,
    /// End vertex.
    pub to: usize,
    /// Owning face.
    pub face: usize,
    /// Next half-edge in the same face.
    pub next: usize,
    /// Previous half-edge in the same face.
    pub prev: usize,
    /// Opposite half-edge, if the edge is shared.
    pub twin: Option<usize>,
}

/// An undirected edge, represented by its lower-indexed half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Start vertex of `half_edge`.
    pub a: usize,
    /// End vertex of `half_edge`.
    pub b: usize,
    /// Representative half-edge.
    pub half_edge: usize,
    /// Twin of the representative, if any.
    pub twin: Option<usize>,
}

/// Outgoing half-edges around a vertex in counter-clockwise order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fan {
    /// Outgoing half-edges. For open fans the first one borders the boundary.
    pub half_edges: Vec<usize>,
    /// True when the fan wraps all the way around the vertex.
    pub closed: bool,
}

/// Half-edge adjacency derived from a face list.
#[derive(Debug, Clone)]
pub struct Topology {
    half_edges: Vec<HalfEdge>,
    face_start: Vec<usize>,
    outgoing: Vec<Option<usize>>,
}

impl Topology {
    /// Builds the half-edge structure for `faces` over `vertex_count` vertices.
    pub fn build(faces: &[Vec<usize>], vertex_count: usize) -> Self {
        let total: usize = faces.iter().map(Vec::len).sum();
        let mut half_edges = Vec::with_capacity(total);
        let mut face_start = Vec::with_capacity(faces.len());
        let mut outgoing = vec![None; vertex_count];
        let mut directed: HashMap<(usize, usize), Option<usize>> = HashMap::with_capacity(total);

        for (fi, face) in faces.iter().enumerate() {
            let start = half_edges.len();
            face_start.push(start);
            let n = face.len();
            for k in 0..n {
                let h = start + k;
                let from = face[k];
                let to = face[(k + 1) % n];
                half_edges.push(HalfEdge {
                    from,
                    to,
                    face: fi,
                    next: start + (k + 1) % n,
                    prev: start + (k + n - 1) % n,
                    twin: None,
                });
                if let Some(slot) = outgoing.get_mut(from) {
                    slot.get_or_insert(h);
                }
                // A repeated directed edge is non-manifold; pair neither copy.
                directed
                    .entry((from, to))
                    .and_modify(|e| *e = None)
                    .or_insert(Some(h));
            }
        }

        for h in 0..half_edges.len() {
            let HalfEdge { from, to, .. } = half_edges[h];
            if let Some(Some(t)) = directed.get(&(to, from)) {
                if matches!(directed.get(&(from, to)), Some(Some(_))) {
                    half_edges[h].twin = Some(*t);
                }
            }
        }

        Self {
            half_edges,
            face_start,
            outgoing,
        }
    }

    /// All half-edges.
    #[inline]
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// One half-edge by index.
    #[inline]
    pub fn half_edge(&self, h: usize) -> &HalfEdge {
        &self.half_edges[h]
    }

    /// Index range of a face's half-edges.
    pub fn face_half_edges(&self, face: usize) -> Range<usize> {
        let start = self.face_start[face];
        let end = self
            .face_start
            .get(face + 1)
            .copied()
            .unwrap_or(self.half_edges.len());
        start..end
    }

    /// True when every half-edge has a twin.
    pub fn is_closed(&self) -> bool {
        self.half_edges.iter().all(|h| h.twin.is_some())
    }

    /// Undirected edges in half-edge order.
    pub fn edges(&self) -> Vec<Edge> {
        self.half_edges
            .iter()
            .enumerate()
            .filter(|(h, he)| he.twin.map_or(true, |t| *h < t))
            .map(|(h, he)| Edge {
                a: he.from,
                b: he.to,
                half_edge: h,
                twin: he.twin,
            })
            .collect()
    }

    /// True when some half-edge around `v` lacks a twin.
    pub fn is_boundary_vertex(&self, v: usize) -> bool {
        !self.vertex_fan(v).closed
    }

    /// Walks the outgoing half-edges around `v` counter-clockwise.
    ///
    /// Open fans start at the half-edge whose clockwise neighbor is missing.
    pub fn vertex_fan(&self, v: usize) -> Fan {
        let Some(start) = self.outgoing.get(v).copied().flatten() else {
            return Fan::default();
        };
        let limit = self.half_edges.len();

        // Rewind clockwise to the boundary, if there is one.
        let mut first = start;
        let mut steps = 0;
        while let Some(t) = self.half_edges[first].twin {
            let cw = self.half_edges[t].next;
            if cw == start || steps > limit {
                first = start;
                break;
            }
            first = cw;
            steps += 1;
        }

        let mut fan = Fan {
            half_edges: vec![first],
            closed: false,
        };
        let mut h = first;
        loop {
            let prev = self.half_edges[h].prev;
            let Some(ccw) = self.half_edges[prev].twin else {
                break;
            };
            if ccw == first {
                fan.closed = true;
                break;
            }
            if fan.half_edges.len() > limit {
                break;
            }
            fan.half_edges.push(ccw);
            h = ccw;
        }
        fan
    }

    /// Neighboring vertices of `v` in fan order.
    pub fn neighbors(&self, v: usize) -> Vec<usize> {
        let fan = self.vertex_fan(v);
        let mut out: Vec<usize> = fan
            .half_edges
            .iter()
            .map(|&h| self.half_edges[h].to)
            .collect();
        if !fan.closed {
            if let Some(&last) = fan.half_edges.last() {
                out.push(self.half_edges[self.half_edges[last].prev].from);
            }
        }
        out
    }

    /// Boundary loops as vertex sequences following the boundary half-edges.
    ///
    /// Each loop runs in the direction of the half-edges that lack twins, so
    /// reversing it yields a face that closes the hole with matching winding.
    pub fn boundary_loops(&self) -> Vec<Vec<usize>> {
        let mut next_boundary: HashMap<usize, usize> = HashMap::new();
        let mut order = Vec::new();
        for (h, he) in self.half_edges.iter().enumerate() {
            if he.twin.is_none() {
                next_boundary.entry(he.from).or_insert(h);
                order.push(h);
            }
        }
        let mut used = vec![false; self.half_edges.len()];
        let mut loops = Vec::new();
        for &start in &order {
            if used[start] {
                continue;
            }
            let mut loop_ = Vec::new();
            let mut h = start;
            while !used[h] {
                used[h] = true;
                loop_.push(self.half_edges[h].from);
                match next_boundary.get(&self.half_edges[h].to) {
                    Some(&n) => h = n,
                    None => break,
                }
            }
            if loop_.len() >= 3 {
                loops.push(loop_);
            }
        }
        loops
    }
}
