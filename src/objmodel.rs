use serde::{Serialize, Deserialize};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::collections::HashMap;

use crate::V3;
use crate::error::{Error, Result};

// name of the group faces fall into before any marker line
pub const DEFAULT_GROUP: &str = "_default";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeshGroup {
	pub name: String,
	// local vertices, meters; every face index is valid in this list
	pub verts: Vec<V3>,
	pub faces: Vec<Vec<usize>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjModel {
	// groups in first-appearance order of their markers
	pub groups: Vec<MeshGroup>,
}

impl ObjModel {
	pub fn load<P: AsRef<Path>>(file: P) -> Result<Self> {
		let file = std::fs::File::open(file)?;
		let reader = BufReader::new(file);
		let mut lines = Vec::new();
		for line in reader.lines() {
			lines.push(line?);
		}
		Self::from_lines(&lines)
	}

	// two passes over the same line sequence: vertices first, then
	// groups and faces with global references remapped to local ones
	pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
		let mut all_verts: Vec<V3> = Vec::new();
		for line in lines {
			let split: Vec<_> = line.as_ref().split_whitespace().collect();
			if split.first() != Some(&"v") {
				continue
			}
			if split.len() < 4 {
				return Err(Error::MalformedGeometry(
					format!("vertex line with {} fields", split.len() - 1),
				));
			}
			let mut co = [0f64; 3];
			for (slot, tok) in co.iter_mut().zip(&split[1..4]) {
				*slot = tok.parse::<f64>().map_err(|_| {
					Error::MalformedGeometry(format!("bad vertex coordinate {:?}", tok))
				})?;
			}
			all_verts.push(V3::new(co[0], co[1], co[2]));
		}

		let mut order: Vec<String> = Vec::new();
		let mut faces_global: HashMap<String, Vec<Vec<usize>>> = HashMap::new();
		let mut current: Option<String> = None;
		for line in lines {
			let s = line.as_ref().trim();
			if s.is_empty() || s.starts_with('#') {
				continue
			}
			let mut toks = s.splitn(2, char::is_whitespace);
			match toks.next() {
				Some("o") | Some("g") => {
					let name = toks.next().unwrap_or("").trim();
					if name.is_empty() {
						return Err(Error::MalformedGeometry("group marker without a name".into()));
					}
					if !faces_global.contains_key(name) {
						order.push(name.to_string());
						faces_global.insert(name.to_string(), Vec::new());
					}
					current = Some(name.to_string());
				}
				Some("f") => {
					let name = current.get_or_insert_with(|| {
						order.push(DEFAULT_GROUP.to_string());
						faces_global.insert(DEFAULT_GROUP.to_string(), Vec::new());
						DEFAULT_GROUP.to_string()
					});
					let mut face = Vec::new();
					for tok in toks.next().unwrap_or("").split_whitespace() {
						// compound token: only the leading component is the vertex
						let v_str = tok.split('/').next().unwrap();
						let gi = v_str.parse::<usize>().map_err(|_| {
							Error::MalformedGeometry(format!("bad face reference {:?}", tok))
						})?;
						// source references are 1-based
						if gi == 0 || gi > all_verts.len() {
							return Err(Error::MalformedGeometry(format!(
								"face references vertex {} of {}",
								gi,
								all_verts.len(),
							)));
						}
						face.push(gi - 1);
					}
					faces_global.get_mut(name).unwrap().push(face);
				}
				_ => {}
			}
		}

		let mut groups = Vec::new();
		for name in order {
			let faces = faces_global.remove(&name).unwrap();
			if faces.is_empty() {
				log::debug!("group {} has no faces, dropped", name);
				continue
			}
			// referenced global indices in first-use order become the local list
			let mut used: Vec<usize> = Vec::new();
			let mut g2l: HashMap<usize, usize> = HashMap::new();
			for f in &faces {
				for &gi in f {
					if !g2l.contains_key(&gi) {
						g2l.insert(gi, used.len());
						used.push(gi);
					}
				}
			}
			let verts = used.iter().map(|&gi| all_verts[gi]).collect();
			let faces = faces
				.into_iter()
				.map(|f| f.into_iter().map(|gi| g2l[&gi]).collect())
				.collect();
			groups.push(MeshGroup { name, verts, faces });
		}
		Ok(Self { groups })
	}

	pub fn get(&self, name: &str) -> Option<&MeshGroup> {
		self.groups.iter().find(|g| g.name == name)
	}

	// json snapshot, for inspecting what ingestion produced
	pub fn save<P: AsRef<Path>>(&self, file: P) -> Result<()> {
		let string = serde_json::to_string(self)?;
		std::fs::write(file, string)?;
		Ok(())
	}

	pub fn restore<P: AsRef<Path>>(file: P) -> Result<Self> {
		let string = std::fs::read_to_string(file)?;
		Ok(serde_json::from_str(&string)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lines(text: &str) -> Vec<&str> {
		text.lines().collect()
	}

	#[test]
	fn groups_get_local_verts_in_first_use_order() {
		let src = lines(
			"# sample\n\
			v 0.0 0.0 0.0\n\
			v 1.0 0.0 0.0\n\
			v 1.0 1.0 0.0\n\
			v 0.0 1.0 0.0\n\
			v 0.0 0.0 5.0\n\
			o Fuselage\n\
			f 2 3 4 1\n\
			o Tank\n\
			f 5 1 2 3\n",
		);
		let model = ObjModel::from_lines(&src).unwrap();
		assert_eq!(model.groups.len(), 2);
		let fus = model.get("Fuselage").unwrap();
		// first-use order: global 2, 3, 4, 1
		assert_eq!(fus.verts.len(), 4);
		assert_eq!(fus.verts[0], V3::new(1.0, 0.0, 0.0));
		assert_eq!(fus.verts[3], V3::new(0.0, 0.0, 0.0));
		assert_eq!(fus.faces, vec![vec![0, 1, 2, 3]]);
		let tank = model.get("Tank").unwrap();
		assert_eq!(tank.verts[0], V3::new(0.0, 0.0, 5.0));
		assert_eq!(tank.faces, vec![vec![0, 1, 2, 3]]);
	}

	#[test]
	fn faces_before_any_marker_fall_into_default_group() {
		let src = lines(
			"v 0 0 0\n\
			v 1 0 0\n\
			v 1 1 0\n\
			f 1 2 3\n",
		);
		let model = ObjModel::from_lines(&src).unwrap();
		assert_eq!(model.groups.len(), 1);
		assert_eq!(model.groups[0].name, DEFAULT_GROUP);
	}

	#[test]
	fn compound_tokens_use_leading_component() {
		let src = lines(
			"v 0 0 0\n\
			v 1 0 0\n\
			v 1 1 0\n\
			v 0 1 0\n\
			g Quad\n\
			f 1/1/1 2/2/2 3//3 4/4\n",
		);
		let model = ObjModel::from_lines(&src).unwrap();
		assert_eq!(model.groups[0].faces, vec![vec![0, 1, 2, 3]]);
	}

	#[test]
	fn groups_without_faces_are_dropped() {
		let src = lines(
			"v 0 0 0\n\
			v 1 0 0\n\
			v 1 1 0\n\
			g Empty\n\
			g Real\n\
			f 1 2 3\n",
		);
		let model = ObjModel::from_lines(&src).unwrap();
		assert_eq!(model.groups.len(), 1);
		assert_eq!(model.groups[0].name, "Real");
	}

	#[test]
	fn snapshot_round_trips_through_json() {
		let src = lines("v 0 0 0\nv 1 0 0\nv 1 1 0\ng G\nf 1 2 3\n");
		let model = ObjModel::from_lines(&src).unwrap();
		let path = std::env::temp_dir()
			.join(format!("mesh2acf_snapshot_{}.json", std::process::id()));
		model.save(&path).unwrap();
		let back = ObjModel::restore(&path).unwrap();
		std::fs::remove_file(&path).unwrap();
		assert_eq!(back.groups.len(), 1);
		assert_eq!(back.groups[0].name, "G");
		assert_eq!(back.groups[0].verts, model.groups[0].verts);
		assert_eq!(back.groups[0].faces, model.groups[0].faces);
	}

	#[test]
	fn out_of_range_reference_aborts_ingestion() {
		let src = lines("v 0 0 0\ng G\nf 1 2 3\n");
		let err = ObjModel::from_lines(&src).unwrap_err();
		assert!(matches!(err, Error::MalformedGeometry(_)));
	}

	#[test]
	fn bad_numeric_token_aborts_ingestion() {
		let src = lines("v 0 zero 0\n");
		let err = ObjModel::from_lines(&src).unwrap_err();
		assert!(matches!(err, Error::MalformedGeometry(_)));
	}
}
