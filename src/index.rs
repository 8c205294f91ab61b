use bimap::BiMap;

// reserved slots for the structurally significant meshes; slots 1 and 2
// are the cowling pair that takes the dihedral adjustment
pub const DEFAULT_PRIORITY: [(&str, usize); 3] = [
	("Fuselage", 0),
	("LF_Cowling", 1),
	("RT_Cowling", 2),
];

pub const COWLING_SLOTS: [usize; 2] = [1, 2];

pub fn default_priority() -> Vec<(String, usize)> {
	DEFAULT_PRIORITY
		.iter()
		.map(|(n, i)| (n.to_string(), *i))
		.collect()
}

// bind each priority prefix to the first unused matching name, then hand
// out the remaining indices in presentation order. same input, same map.
pub fn assign_indices<S: AsRef<str>>(
	names: &[S],
	priority: &[(String, usize)],
) -> BiMap<String, usize> {
	let mut map: BiMap<String, usize> = BiMap::new();
	for (prefix, idx) in priority {
		for n in names {
			let n = n.as_ref();
			if map.contains_left(n) {
				continue
			}
			if n.starts_with(prefix.as_str()) {
				map.insert(n.to_string(), *idx);
				break
			}
		}
	}
	let mut next = priority.iter().map(|(_, i)| i + 1).max().unwrap_or(0);
	for n in names {
		let n = n.as_ref();
		if map.contains_left(n) {
			continue
		}
		map.insert(n.to_string(), next);
		next += 1;
	}
	map
}
