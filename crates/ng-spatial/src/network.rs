//! Road network representation and builder.
//!
//! # Data layout
//!
//! Edges are undirected road segments.  Adjacency uses **Compressed Sparse
//! Row (CSR)** format: every edge appears once in the row of each endpoint,
//! so the neighbors of `NodeId n` occupy the slices
//!
//! ```text
//! adj_node[ adj_start[n] .. adj_start[n+1] ]
//! adj_edge[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! Rows are sorted by neighbor id (then edge id), which makes the router's
//! relaxation order, and therefore its tie-breaking, deterministic.
//!
//! # Spatial indexes
//!
//! Two R-trees (via `rstar`):
//!
//! - nodes, for nearest-node snapping when choosing destinations;
//! - edge envelopes, for finding the edges an external object's footprint
//!   overlaps.  Envelope hits are confirmed with an exact segment test.

use rstar::{AABB, Envelope, PointDistance, RTree, RTreeObject, SelectionFunction};
use rustc_hash::FxHashMap;

use ng_core::{ClassId, EdgeId, NodeId, Point, Rect};

use crate::{SpatialError, SpatialResult};

// ── R-tree entries ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[derive(Clone, Debug)]
struct EdgeEntry {
    envelope: AABB<[f64; 2]>,
    id:       EdgeId,
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Selects edge entries whose envelope touches a query box.
struct TouchesBox(AABB<[f64; 2]>);

impl SelectionFunction<EdgeEntry> for TouchesBox {
    fn should_unpack_parent(&self, envelope: &AABB<[f64; 2]>) -> bool {
        envelope.intersects(&self.0)
    }

    fn should_unpack_leaf(&self, leaf: &EdgeEntry) -> bool {
        leaf.envelope.intersects(&self.0)
    }
}

#[inline]
fn to_array(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

// ── NetworkGraph ──────────────────────────────────────────────────────────────

/// Immutable undirected road graph in CSR format plus spatial indexes.
///
/// All per-node and per-edge arrays are `pub` for direct indexed access on
/// hot paths.  Do not construct directly; use [`NetworkBuilder`] or
/// [`load_network`](crate::load_network).
#[derive(Debug)]
pub struct NetworkGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,
    /// Class of each node as given in the input.
    pub node_class: Vec<ClassId>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Row pointer, length `node_count + 1`.
    pub adj_start: Vec<u32>,
    /// Neighbor at each adjacency slot.
    pub adj_node: Vec<NodeId>,
    /// Edge connecting the row's node to `adj_node` at the same slot.
    pub adj_edge: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    /// First endpoint as added.
    pub edge_a: Vec<NodeId>,
    /// Second endpoint as added.
    pub edge_b: Vec<NodeId>,
    pub edge_length: Vec<f64>,
    pub edge_class: Vec<ClassId>,

    // ── Lookups ───────────────────────────────────────────────────────────
    pair_index: FxHashMap<(NodeId, NodeId), EdgeId>,
    node_idx:   RTree<NodeEntry>,
    edge_idx:   RTree<EdgeEntry>,
    bounds:     Rect,
}

impl NetworkGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_length.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Number of distinct edge classes referenced (highest class id + 1).
    pub fn edge_class_count(&self) -> usize {
        self.edge_class.iter().map(|c| c.index() + 1).max().unwrap_or(1)
    }

    // ── Node queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, node: NodeId) -> Point {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Number of incident edges.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        end - start
    }

    /// `(neighbor, edge)` pairs of `node`, sorted by neighbor id.
    ///
    /// A contiguous scan of two CSR slices; no allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        self.adj_node[start..end]
            .iter()
            .copied()
            .zip(self.adj_edge[start..end].iter().copied())
    }

    // ── Edge queries ──────────────────────────────────────────────────────

    /// The edge joining `a` and `b` in either direction.
    ///
    /// With parallel edges the first one added wins.
    #[inline]
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.pair_index.get(&ordered_pair(a, b)).copied()
    }

    /// Both endpoints of `edge`.
    #[inline]
    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        (self.edge_a[edge.index()], self.edge_b[edge.index()])
    }

    /// The endpoint of `edge` that is not `from`.
    #[inline]
    pub fn other_end(&self, edge: EdgeId, from: NodeId) -> NodeId {
        let (a, b) = self.endpoints(edge);
        if a == from { b } else { a }
    }

    #[inline]
    pub fn length(&self, edge: EdgeId) -> f64 {
        self.edge_length[edge.index()]
    }

    #[inline]
    pub fn class_of(&self, edge: EdgeId) -> ClassId {
        self.edge_class[edge.index()]
    }

    /// Geometric segment of `edge`.
    #[inline]
    pub fn segment(&self, edge: EdgeId) -> (Point, Point) {
        let (a, b) = self.endpoints(edge);
        (self.position(a), self.position(b))
    }

    // ── Data space ────────────────────────────────────────────────────────

    /// Bounding rectangle of all node positions.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Larger side of the data space.  Speeds, footprints and route lengths
    /// scale with it; a degenerate data space reports `1.0`.
    pub fn extent(&self) -> f64 {
        let e = self.bounds.width().max(self.bounds.height());
        if e > 0.0 { e } else { 1.0 }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`; `None` only for an empty network.
    pub fn snap_to_node(&self, pos: Point) -> Option<NodeId> {
        self.node_idx.nearest_neighbor(&to_array(pos)).map(|e| e.id)
    }

    /// Up to `k` nearest nodes to `pos`, by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Point, k: usize) -> Vec<NodeId> {
        self.node_idx
            .nearest_neighbor_iter(&to_array(pos))
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// Edges whose segment touches `rect`, in ascending id order.
    pub fn edges_intersecting(&self, rect: Rect) -> Vec<EdgeId> {
        let query = AABB::from_corners(to_array(rect.min), to_array(rect.max));
        let mut hits: Vec<EdgeId> = self
            .edge_idx
            .locate_with_selection_function(TouchesBox(query))
            .map(|e| e.id)
            .filter(|&e| {
                let (a, b) = self.segment(e);
                rect.intersects_segment(a, b)
            })
            .collect();
        hits.sort_unstable();
        hits
    }
}

#[inline]
fn ordered_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`NetworkGraph`] incrementally, then call [`build`](Self::build).
///
/// Edges are validated as they are added (known endpoints, no self loops,
/// finite non-negative length).  `build()` constructs the CSR rows and
/// bulk-loads both R-trees.
///
/// # Example
///
/// ```
/// use ng_core::{ClassId, Point};
/// use ng_spatial::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0), ClassId(0)).unwrap();
/// let c = b.add_node(Point::new(3.0, 4.0), ClassId(0)).unwrap();
/// b.add_edge_auto(a, c, ClassId(0)).unwrap();
/// let net = b.build();
/// assert_eq!(net.edge_count(), 1);
/// assert_eq!(net.length(net.edge_between(c, a).unwrap()), 5.0);
/// ```
pub struct NetworkBuilder {
    nodes:      Vec<Point>,
    node_class: Vec<ClassId>,
    edges:      Vec<RawEdge>,
}

struct RawEdge {
    a:      NodeId,
    b:      NodeId,
    length: f64,
    class:  ClassId,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), node_class: Vec::new(), edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:      Vec::with_capacity(nodes),
            node_class: Vec::with_capacity(nodes),
            edges:      Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point, class: ClassId) -> SpatialResult<NodeId> {
        let id = NodeId(self.nodes.len() as u32);
        if !pos.is_finite() {
            return Err(SpatialError::InvalidPosition(id));
        }
        self.nodes.push(pos);
        self.node_class.push(class);
        Ok(id)
    }

    /// Add an undirected edge of the given length.
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        length: f64,
        class: ClassId,
    ) -> SpatialResult<EdgeId> {
        for n in [a, b] {
            if n.index() >= self.nodes.len() {
                return Err(SpatialError::NodeNotFound(n));
            }
        }
        if a == b {
            return Err(SpatialError::InvalidEdge { a, b, reason: "self loop".into() });
        }
        if !length.is_finite() || length < 0.0 {
            return Err(SpatialError::InvalidEdge {
                a,
                b,
                reason: format!("length {length} must be finite and non-negative"),
            });
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(RawEdge { a, b, length, class });
        Ok(id)
    }

    /// Add an undirected edge whose length is the Euclidean distance between
    /// its endpoints.
    pub fn add_edge_auto(&mut self, a: NodeId, b: NodeId, class: ClassId) -> SpatialResult<EdgeId> {
        let length = match (self.nodes.get(a.index()), self.nodes.get(b.index())) {
            (Some(pa), Some(pb)) => pa.distance(*pb),
            (None, _) => return Err(SpatialError::NodeNotFound(a)),
            (_, None) => return Err(SpatialError::NodeNotFound(b)),
        };
        self.add_edge(a, b, length, class)
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`NetworkGraph`].
    ///
    /// Time complexity: O(E log E) for sorting adjacency rows plus
    /// O(N log N + E log E) for the R-tree bulk loads.
    pub fn build(self) -> NetworkGraph {
        let node_count = self.nodes.len();

        // Each undirected edge contributes one slot to both endpoint rows.
        let mut slots: Vec<(NodeId, NodeId, EdgeId)> = Vec::with_capacity(self.edges.len() * 2);
        let mut pair_index = FxHashMap::default();
        for (i, e) in self.edges.iter().enumerate() {
            let id = EdgeId(i as u32);
            slots.push((e.a, e.b, id));
            slots.push((e.b, e.a, id));
            pair_index.entry(ordered_pair(e.a, e.b)).or_insert(id);
        }
        slots.sort_unstable();

        let mut adj_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &slots {
            adj_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        let adj_node: Vec<NodeId> = slots.iter().map(|s| s.1).collect();
        let adj_edge: Vec<EdgeId> = slots.iter().map(|s| s.2).collect();

        let node_entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: to_array(pos), id: NodeId(i as u32) })
            .collect();
        let edge_entries: Vec<EdgeEntry> = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| EdgeEntry {
                envelope: AABB::from_corners(
                    to_array(self.nodes[e.a.index()]),
                    to_array(self.nodes[e.b.index()]),
                ),
                id: EdgeId(i as u32),
            })
            .collect();

        let bounds = Rect::bounding(self.nodes.iter().copied())
            .unwrap_or_else(|| Rect::around(Point::default(), 0.0));

        NetworkGraph {
            edge_a:      self.edges.iter().map(|e| e.a).collect(),
            edge_b:      self.edges.iter().map(|e| e.b).collect(),
            edge_length: self.edges.iter().map(|e| e.length).collect(),
            edge_class:  self.edges.iter().map(|e| e.class).collect(),
            node_pos:    self.nodes,
            node_class:  self.node_class,
            adj_start,
            adj_node,
            adj_edge,
            pair_index,
            node_idx:    RTree::bulk_load(node_entries),
            edge_idx:    RTree::bulk_load(edge_entries),
            bounds,
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
