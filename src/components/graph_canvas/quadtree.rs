//! Quadtree over node positions for Barnes-Hut charge and collision queries.

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
	pub(super) cx: f64,
	pub(super) cy: f64,
	pub(super) half_extent: f64,
}

impl QuadBounds {
	fn from_points(points: &[(f64, f64)]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}

		if !min_x.is_finite() || !min_y.is_finite() || !max_x.is_finite() || !max_y.is_finite() {
			return None;
		}

		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			cx: (min_x + max_x) * 0.5,
			cy: (min_y + max_y) * 0.5,
			half_extent: span * 0.5 + 1.0,
		})
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let (ox, oy) = match quadrant {
			0 => (-quarter, -quarter),
			1 => (quarter, -quarter),
			2 => (-quarter, quarter),
			_ => (quarter, quarter),
		};
		Self {
			cx: self.cx + ox,
			cy: self.cy + oy,
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, (x, y): (f64, f64)) -> usize {
		match (x >= self.cx, y >= self.cy) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}

	pub(super) fn side_length(self) -> f64 {
		self.half_extent * 2.0
	}

	/// Squared distance from a point to the nearest point of the cell.
	pub(super) fn distance_sq_to(self, (x, y): (f64, f64)) -> f64 {
		let dx = ((x - self.cx).abs() - self.half_extent).max(0.0);
		let dy = ((y - self.cy).abs() - self.half_extent).max(0.0);
		dx * dx + dy * dy
	}
}

/// One cell. Leaves keep their point indices; inner cells only aggregates.
pub(super) struct QuadNode {
	pub(super) bounds: QuadBounds,
	/// Mean position of the points below this cell.
	pub(super) center_of_mass: (f64, f64),
	/// Number of points below this cell.
	pub(super) mass: f64,
	/// Largest per-point radius below this cell.
	pub(super) max_radius: f64,
	pub(super) indices: Vec<usize>,
	pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	/// Build a tree over `positions`; `radii` may be empty when unused.
	pub(super) fn build(positions: &[(f64, f64)], radii: &[f64]) -> Option<Self> {
		let bounds = QuadBounds::from_points(positions)?;
		let indices = (0..positions.len()).collect::<Vec<_>>();
		Some(Self::build_node(bounds, indices, positions, radii, 0))
	}

	fn build_node(
		bounds: QuadBounds,
		indices: Vec<usize>,
		positions: &[(f64, f64)],
		radii: &[f64],
		depth: usize,
	) -> Self {
		let (mut sx, mut sy, mut max_radius) = (0.0, 0.0, 0.0f64);
		for &index in &indices {
			sx += positions[index].0;
			sy += positions[index].1;
			max_radius = max_radius.max(radii.get(index).copied().unwrap_or(0.0));
		}
		let mass = indices.len() as f64;
		let center_of_mass = if mass > 0.0 {
			(sx / mass, sy / mass)
		} else {
			(bounds.cx, bounds.cy)
		};

		let mut node = Self {
			bounds,
			center_of_mass,
			mass,
			max_radius,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
		for &index in &node.indices {
			buckets[bounds.quadrant_for(positions[index])].push(index);
		}
		if buckets.iter().filter(|b| !b.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				radii,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub(super) fn is_leaf(&self) -> bool {
		self.children.iter().all(|child| child.is_none())
	}

	/// Depth-first walk. The callback returns `true` to skip a cell's children.
	pub(super) fn visit(&self, f: &mut impl FnMut(&QuadNode) -> bool) {
		if f(self) {
			return;
		}
		for child in self.children.iter().flatten() {
			child.visit(f);
		}
	}
}
