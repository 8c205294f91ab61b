use crate::{M3, V3};
use crate::logging::Log;
use crate::topomodel::BodyDefinition;

pub const M_TO_FT: f64 = 3.280839895013123;

// the target editor never shrinks a body grid below this
#[derive(Clone, Copy, Debug)]
pub struct GridMin {
	pub stations: usize,
	pub points: usize,
}

impl Default for GridMin {
	fn default() -> Self {
		Self { stations: 20, points: 18 }
	}
}

// rotation about the longitudinal axis, applied to cowling rings
// before unit conversion
pub fn longitudinal_rotation(deg: f64) -> M3 {
	nalgebra::Rotation3::from_axis_angle(&V3::z_axis(), deg.to_radians()).into_inner()
}

// the editor writes station 0, station 1, stations 10 and up, then 2..9;
// the same permutation selects point order inside each station
pub fn print_order(n: usize) -> Vec<usize> {
	let mut order = Vec::with_capacity(n);
	if n > 0 {
		order.push(0);
	}
	if n > 1 {
		order.push(1);
	}
	for i in 10..n {
		order.push(i);
	}
	for i in 2..n.min(10) {
		order.push(i);
	}
	order
}

fn fmt9(v: f64) -> String {
	format!("{:.9}", v)
}

// literal body block lines for all bodies, increasing index order.
// `cowlings` lists the body indices that take the dihedral rotation.
pub fn body_block_lines(
	bodies: &[BodyDefinition],
	min: GridMin,
	dihedral_deg: f64,
	cowlings: &[usize],
	log: Log,
) -> Vec<String> {
	let rot = longitudinal_rotation(dihedral_deg);
	let mut all = Vec::new();
	for b in bodies {
		if b.rings.is_empty() {
			log.line(&format!("[emit] body {} ({}) has no rings, skipped", b.index, b.name));
			continue
		}
		let tilted = dihedral_deg != 0.0 && cowlings.contains(&b.index);
		// feet conversion plus the part references in one sweep
		let mut rings_ft: Vec<Vec<V3>> = Vec::new();
		let mut max_len = 0;
		let mut max_rad = 0f64;
		let mut sum_x = 0f64;
		let mut count = 0usize;
		for ring in &b.rings {
			let mut out = Vec::with_capacity(ring.points.len());
			for p in &ring.points {
				let p = if tilted { rot * p } else { *p };
				let f = p * M_TO_FT;
				max_rad = max_rad.max(f[0].hypot(f[1]));
				sum_x += f[0];
				count += 1;
				out.push(f);
			}
			max_len = max_len.max(out.len());
			rings_ft.push(out);
		}
		let part_x = if count > 0 { sum_x / count as f64 } else { 0.0 };
		let eff_points = min.points.max(max_len);
		let eff_stations = min.stations.max(rings_ft.len());
		let bi = b.index;
		all.push(format!("P _body/{}/_part_x {}", bi, fmt9(part_x)));
		all.push(format!("P _body/{}/_part_y 0.000000000", bi));
		all.push(format!("P _body/{}/_part_z 0.000000000", bi));
		all.push(format!("P _body/{}/_part_rad {}", bi, fmt9(max_rad)));
		all.push(format!("P _body/{}/_r_dim {}", bi, eff_points));
		all.push(format!("P _body/{}/_s_dim {}", bi, eff_stations));
		all.push(String::new());
		// zero-pad short rings, then append all-zero stations
		let zero = V3::zeros();
		let mut padded = rings_ft;
		for ring in padded.iter_mut() {
			ring.resize(eff_points, zero);
		}
		while padded.len() < eff_stations {
			padded.push(vec![zero; eff_points]);
		}
		for &i in &print_order(eff_stations) {
			for &j in &print_order(eff_points) {
				let p = padded[i][j];
				for a in 0..3 {
					all.push(format!(
						"P _body/{}/_geo_xyz/{},{},{} {}",
						bi,
						i,
						j,
						a,
						fmt9(p[a]),
					));
				}
			}
		}
	}
	all
}
