// stage sequencing: ingest -> normalize -> rings -> index -> emit -> patch.
// every stage is fully materialized before the next and the destination
// write happens last, so a failed run leaves the target untouched.

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use crate::acf::{self, Document};
use crate::body::NormalizedBody;
use crate::emit::{self, GridMin};
use crate::error::{Error, Result, Stage};
use crate::index::{self, COWLING_SLOTS};
use crate::logging::Log;
use crate::objmodel::ObjModel;
use crate::topomodel::{self, BodyDefinition};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
	// degrees, applied to the reserved cowling slots
	pub dihedral_deg: f64,
	pub min_stations: usize,
	pub min_points: usize,
	// station bucket width, meters
	pub station_tol: f64,
	// (name prefix, reserved body index) in table order
	pub priority: Vec<(String, usize)>,
	// optional block template override, accepted for compatibility;
	// emission is synthesized and does not consume it
	pub template_path: Option<PathBuf>,
}

impl Default for GenConfig {
	fn default() -> Self {
		Self {
			dihedral_deg: 0.0,
			min_stations: 20,
			min_points: 18,
			station_tol: topomodel::STATION_TOL,
			priority: index::default_priority(),
			template_path: None,
		}
	}
}

impl GenConfig {
	pub fn load<P: AsRef<Path>>(file: P) -> Result<Self> {
		let string = std::fs::read_to_string(file)?;
		Ok(serde_json::from_str(&string)?)
	}

	pub fn grid(&self) -> GridMin {
		GridMin { stations: self.min_stations, points: self.min_points }
	}
}

#[derive(Clone, Debug, Default)]
pub struct RunSummary {
	pub bodies: usize,
	pub lines: usize,
	// true when empty input turned the run into a no-op
	pub skipped: bool,
}

// normalize every group, discover its rings, bind priority indices and
// compact them to a contiguous 0.. range. the second value lists the
// compacted indices sitting in the reserved cowling slots.
pub fn build_bodies(
	model: &ObjModel,
	config: &GenConfig,
	log: Log,
) -> Result<(Vec<BodyDefinition>, Vec<usize>)> {
	let names: Vec<&str> = model.groups.iter().map(|g| g.name.as_str()).collect();
	let map = index::assign_indices(&names, &config.priority);
	let mut keyed: Vec<(usize, BodyDefinition)> = Vec::new();
	for group in &model.groups {
		let body = NormalizedBody::from_group(group);
		let rings = topomodel::build_rings(&body, config.station_tol);
		if rings.is_empty() {
			log.line(&format!("[bodies] {}: no rings discovered, dropped", group.name));
			continue
		}
		let idx = *map.get_by_left(&group.name).unwrap();
		log.line(&format!(
			"[bodies] {} -> body {} ({} rings, span {:.3} m{})",
			group.name,
			idx,
			rings.len(),
			body.span,
			if body.symmetric { ", symmetric" } else { "" },
		));
		keyed.push((
			idx,
			BodyDefinition {
				index: idx,
				name: group.name.clone(),
				rings,
				offset: body.offset,
				span: body.span,
				symmetric: body.symmetric,
			},
		));
	}
	keyed.sort_by_key(|(idx, _)| *idx);
	let mut bodies = Vec::with_capacity(keyed.len());
	let mut cowlings = Vec::new();
	for (pos, (raw, mut body)) in keyed.into_iter().enumerate() {
		if COWLING_SLOTS.contains(&raw) {
			cowlings.push(pos);
		}
		body.index = pos;
		bodies.push(body);
	}
	Ok((bodies, cowlings))
}

// body block lines only; callers combining them with wing lines patch once
pub fn build_lines(model: &ObjModel, config: &GenConfig, log: Log) -> Result<Vec<String>> {
	if model.groups.is_empty() {
		return Err(Error::EmptyInput("no mesh groups in source".into()));
	}
	let (bodies, cowlings) =
		build_bodies(model, config, log).map_err(|e| e.at(Stage::Rings))?;
	if bodies.is_empty() {
		return Err(Error::EmptyInput("no bodies with rings".into()));
	}
	if let Some(template) = &config.template_path {
		log.line(&format!("[emit] body template: {}", template.display()));
	}
	let lines = emit::body_block_lines(
		&bodies,
		config.grid(),
		config.dihedral_deg,
		&cowlings,
		log,
	);
	log.line(&format!("[emit] {} bodies, {} lines", bodies.len(), lines.len()));
	Ok(lines)
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
	obj_path: P,
	acf_path: Q,
	config: &GenConfig,
	log: Log,
) -> Result<RunSummary> {
	let model = ObjModel::load(obj_path).map_err(|e| e.at(Stage::Ingest))?;
	log.line(&format!("[ingest] {} groups", model.groups.len()));
	let lines = match build_lines(&model, config, log) {
		Ok(lines) => lines,
		Err(Error::EmptyInput(msg)) => {
			log.line(&format!("[bodies] {}; destination untouched", msg));
			return Ok(RunSummary { skipped: true, ..Default::default() });
		}
		Err(e) => return Err(e.at(Stage::Emit)),
	};
	let bodies = lines
		.iter()
		.filter(|l| l.contains("/_s_dim "))
		.count();
	let doc = Document::load(&acf_path).map_err(|e| e.at(Stage::Patch))?;
	let patched = acf::patch_document(&doc, &lines).map_err(|e| e.at(Stage::Patch))?;
	patched.store(&acf_path).map_err(|e| e.at(Stage::Patch))?;
	log.line(&format!(
		"[acf] wrote {} body lines into {}",
		lines.len(),
		acf_path.as_ref().display(),
	));
	Ok(RunSummary { bodies, lines: lines.len(), skipped: false })
}
