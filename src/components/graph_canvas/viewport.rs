//! Camera over the graph: zoom, center, zoom-to-fit and coordinate mapping.
//!
//! The camera is stored as a graph-space center plus a zoom factor, so
//! resizing the surface keeps the same point in the middle. Operations with a
//! non-zero duration animate with an eased transition advanced per frame.

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.01;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 1000.0;

/// Screen transform: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal screen offset of the graph origin.
	pub x: f64,
	/// Vertical screen offset of the graph origin.
	pub y: f64,
	/// Zoom factor, screen pixels per graph unit.
	pub k: f64,
}

/// Graph-space point at the middle of the surface, and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	/// Graph-space x in the middle of the surface.
	pub cx: f64,
	/// Graph-space y in the middle of the surface.
	pub cy: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			cx: 0.0,
			cy: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug)]
struct Transition {
	from: Camera,
	to: Camera,
	elapsed_ms: f64,
	duration_ms: f64,
}

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

fn clamp_zoom(k: f64) -> f64 {
	if k.is_finite() {
		k.clamp(MIN_ZOOM, MAX_ZOOM)
	} else {
		MAX_ZOOM
	}
}

/// Camera bound to the on-screen size of the drawing surface.
#[derive(Clone, Debug)]
pub struct Viewport {
	width: f64,
	height: f64,
	camera: Camera,
	transition: Option<Transition>,
}

impl Viewport {
	/// Unzoomed camera centered on the origin.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			camera: Camera::default(),
			transition: None,
		}
	}

	/// Surface width.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Surface height.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Change the surface size, keeping the camera.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Current camera, mid-transition included.
	pub fn camera(&self) -> Camera {
		self.camera
	}

	/// Canvas transform for the current camera.
	pub fn transform(&self) -> ViewTransform {
		let Camera { cx, cy, k } = self.camera;
		ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		}
	}

	/// Map a screen point to graph space.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		let t = self.transform();
		((sx - t.x) / t.k, (sy - t.y) / t.k)
	}

	/// Map a graph point to screen space.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		let t = self.transform();
		(gx * t.k + t.x, gy * t.k + t.y)
	}

	/// Current zoom factor.
	pub fn zoom_level(&self) -> f64 {
		self.camera.k
	}

	/// Graph-space point at the middle of the surface.
	pub fn center(&self) -> (f64, f64) {
		(self.camera.cx, self.camera.cy)
	}

	/// Set the zoom factor, keeping the current center.
	pub fn zoom(&mut self, k: f64, duration_ms: f64) {
		let target = Camera {
			k: clamp_zoom(k),
			..self.target()
		};
		self.go_to(target, duration_ms);
	}

	/// Move the camera so `(x, y)` is in the middle of the surface.
	pub fn center_at(&mut self, x: f64, y: f64, duration_ms: f64) {
		let target = Camera {
			cx: x,
			cy: y,
			..self.target()
		};
		self.go_to(target, duration_ms);
	}

	/// Zoom by `factor` around a screen point, keeping it under the cursor.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.transition = None;
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let k = clamp_zoom(self.camera.k * factor);
		self.camera = Camera {
			cx: gx - (sx - self.width / 2.0) / k,
			cy: gy - (sy - self.height / 2.0) / k,
			k,
		};
	}

	/// Shift the view by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.transition = None;
		self.camera.cx -= dx / self.camera.k;
		self.camera.cy -= dy / self.camera.k;
	}

	/// Fit the circles at `points` (graph space, radius `node_radius`) inside
	/// the surface with `padding` screen pixels on every side.
	///
	/// Returns `false` without touching the camera when the surface has no
	/// area, the padding leaves no room, or there is nothing to fit.
	pub fn zoom_to_fit(
		&mut self,
		points: impl IntoIterator<Item = (f64, f64)>,
		node_radius: f64,
		padding: f64,
		duration_ms: f64,
	) -> bool {
		let (avail_w, avail_h) = (self.width - padding * 2.0, self.height - padding * 2.0);
		if self.width <= 0.0 || self.height <= 0.0 || avail_w <= 0.0 || avail_h <= 0.0 {
			return false;
		}

		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for (x, y) in points {
			min_x = min_x.min(x - node_radius);
			min_y = min_y.min(y - node_radius);
			max_x = max_x.max(x + node_radius);
			max_y = max_y.max(y + node_radius);
		}
		if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
			return false;
		}

		let (bw, bh) = ((max_x - min_x).max(1e-12), (max_y - min_y).max(1e-12));
		let k = clamp_zoom((avail_w / bw).min(avail_h / bh));
		self.go_to(
			Camera {
				cx: (min_x + max_x) / 2.0,
				cy: (min_y + max_y) / 2.0,
				k,
			},
			duration_ms,
		);
		true
	}

	/// A zoom or center transition is in progress.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Advance a running transition by `dt_ms`.
	pub fn advance(&mut self, dt_ms: f64) {
		let Some(tr) = self.transition.as_mut() else {
			return;
		};
		tr.elapsed_ms += dt_ms;
		let t = (tr.elapsed_ms / tr.duration_ms).clamp(0.0, 1.0);
		let e = smooth_step(t);
		let (from, to) = (tr.from, tr.to);
		self.camera = Camera {
			cx: from.cx + (to.cx - from.cx) * e,
			cy: from.cy + (to.cy - from.cy) * e,
			k: from.k + (to.k - from.k) * e,
		};
		if t >= 1.0 {
			self.camera = to;
			self.transition = None;
		}
	}

	/// Where the camera is heading, or where it is when idle.
	fn target(&self) -> Camera {
		self.transition
			.as_ref()
			.map(|tr| tr.to)
			.unwrap_or(self.camera)
	}

	fn go_to(&mut self, target: Camera, duration_ms: f64) {
		if duration_ms > 0.0 {
			self.transition = Some(Transition {
				from: self.camera,
				to: target,
				elapsed_ms: 0.0,
				duration_ms,
			});
		} else {
			self.transition = None;
			self.camera = target;
		}
	}
}
