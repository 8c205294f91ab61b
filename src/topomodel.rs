// longitudinal station discovery from face topology:
// 1. adjacency from face edges
// 2. bfs layering from the nose (reachability)
// 3. z-quantized station buckets, rings in discovery order

use serde::{Serialize, Deserialize};
use std::collections::{HashMap, VecDeque};

use crate::V3;
use crate::body::NormalizedBody;

// station bucket width, meters
pub const STATION_TOL: f64 = 1e-4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Station {
	// quantized longitudinal coordinate, meters
	pub coord: f64,
	// member vertex indices in insertion order
	pub members: Vec<usize>,
	pub tip: bool,
	pub tail: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ring {
	pub points: Vec<V3>,
	pub tip: bool,
	pub tail: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BodyDefinition {
	pub index: usize,
	pub name: String,
	// ordered nose to tail
	pub rings: Vec<Ring>,
	pub offset: f64,
	pub span: f64,
	pub symmetric: bool,
}

// undirected neighbour lists from consecutive wrap-around face edges;
// for a quad (a,b,c,d) that is (a,b),(b,c),(c,d),(d,a)
pub fn face_adjacency(faces: &[Vec<usize>]) -> HashMap<usize, Vec<usize>> {
	let mut neigh: HashMap<usize, Vec<usize>> = HashMap::new();
	for f in faces {
		if f.len() < 3 {
			continue
		}
		for i in 0..f.len() {
			let a = f[i];
			let b = f[(i + 1) % f.len()];
			neigh.entry(a).or_insert_with(Vec::new).push(b);
			neigh.entry(b).or_insert_with(Vec::new).push(a);
		}
	}
	neigh
}

// graph distance from the nose; vertices missing from the result are
// unreachable and take no part in station grouping
pub fn bfs_layers(neigh: &HashMap<usize, Vec<usize>>, nose: usize) -> HashMap<usize, usize> {
	let mut layers = HashMap::new();
	layers.insert(nose, 0);
	let mut q = VecDeque::new();
	q.push_back(nose);
	while let Some(v) = q.pop_front() {
		let layer = layers[&v];
		if let Some(ns) = neigh.get(&v) {
			for &nb in ns {
				if !layers.contains_key(&nb) {
					layers.insert(nb, layer + 1);
					q.push_back(nb);
				}
			}
		}
	}
	layers
}

pub fn build_stations(body: &NormalizedBody, tol: f64) -> Vec<Station> {
	if body.verts.is_empty() || body.faces.is_empty() {
		return Vec::new()
	}
	let mut nose = 0;
	let mut tail = 0;
	for (i, v) in body.verts.iter().enumerate() {
		if v[2] < body.verts[nose][2] {
			nose = i;
		}
		if v[2] > body.verts[tail][2] {
			tail = i;
		}
	}
	let neigh = face_adjacency(&body.faces);
	let layers = bfs_layers(&neigh, nose);
	let dropped = body.verts.len() - layers.len();
	if dropped > 0 {
		log::warn!(
			"{}: {} vertices unreachable from the nose, dropped",
			body.name,
			dropped,
		);
	}
	// bucket reachable vertices by quantized z; iterating in index order
	// makes insertion order the discovery order
	let quant = |z: f64| (z / tol).round() as i64;
	let mut buckets: HashMap<i64, Vec<usize>> = HashMap::new();
	let mut keys: Vec<i64> = Vec::new();
	for (i, v) in body.verts.iter().enumerate() {
		if !layers.contains_key(&i) {
			continue
		}
		let k = quant(v[2]);
		buckets
			.entry(k)
			.or_insert_with(|| {
				keys.push(k);
				Vec::new()
			})
			.push(i);
	}
	keys.sort_unstable();
	let nose_k = quant(body.verts[nose][2]);
	let tail_k = quant(body.verts[tail][2]);
	keys.into_iter()
		.map(|k| Station {
			coord: k as f64 * tol,
			members: buckets.remove(&k).unwrap(),
			tip: k == nose_k,
			tail: k == tail_k,
		})
		.collect()
}

pub fn build_rings(body: &NormalizedBody, tol: f64) -> Vec<Ring> {
	build_stations(body, tol)
		.into_iter()
		.map(|st| Ring {
			points: st.members.iter().map(|&i| body.verts[i]).collect(),
			tip: st.tip,
			tail: st.tail,
		})
		.collect()
}
