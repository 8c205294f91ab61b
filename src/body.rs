use serde::{Serialize, Deserialize};
use std::collections::HashMap;

use crate::V3;
use crate::objmodel::MeshGroup;

// tolerance for the mirror check, in meters
pub const SYM_TOL: f64 = 1e-6;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NormalizedBody {
	pub name: String,
	// recentered so the nose sits at z = 0
	pub verts: Vec<V3>,
	pub faces: Vec<Vec<usize>>,
	// original nose coordinate, meters
	pub offset: f64,
	// nose-to-tail extent, meters
	pub span: f64,
	pub symmetric: bool,
}

impl NormalizedBody {
	pub fn from_group(group: &MeshGroup) -> Self {
		if group.verts.is_empty() {
			return Self {
				name: group.name.clone(),
				verts: Vec::new(),
				faces: group.faces.clone(),
				offset: 0.0,
				span: 0.0,
				symmetric: false,
			};
		}
		let mut min_z = f64::INFINITY;
		let mut max_z = f64::NEG_INFINITY;
		for v in &group.verts {
			min_z = min_z.min(v[2]);
			max_z = max_z.max(v[2]);
		}
		let verts: Vec<V3> = group
			.verts
			.iter()
			.map(|v| V3::new(v[0], v[1], v[2] - min_z))
			.collect();
		let symmetric = mirror_symmetric_x(&verts);
		Self {
			name: group.name.clone(),
			verts,
			faces: group.faces.clone(),
			offset: min_z,
			span: max_z - min_z,
			symmetric,
		}
	}
}

// bucket by rounded (y, z); in each bucket the i-th smallest and i-th
// largest lateral values must cancel for the body to count as mirrored
pub fn mirror_symmetric_x(verts: &[V3]) -> bool {
	if verts.is_empty() {
		return false
	}
	let key = |v: f64| (v * 1e6).round() as i64;
	let mut buckets: HashMap<(i64, i64), Vec<f64>> = HashMap::new();
	for v in verts {
		buckets
			.entry((key(v[1]), key(v[2])))
			.or_insert_with(Vec::new)
			.push(v[0]);
	}
	for xs in buckets.values_mut() {
		xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
		let n = xs.len();
		for i in 0..n / 2 {
			if (xs[i] + xs[n - 1 - i]).abs() > SYM_TOL {
				return false
			}
		}
	}
	true
}
