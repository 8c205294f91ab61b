use std::path::Path;

use crate::error::{Error, Result};

pub const PROPERTIES_BEGIN: &str = "PROPERTIES_BEGIN";
pub const PROPERTIES_END: &str = "PROPERTIES_END";
pub const BODY_PREFIX: &str = "P _body/";

// line-split document that renders back byte-identical
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
	pub lines: Vec<String>,
	pub trailing_newline: bool,
}

impl Document {
	pub fn parse(text: &str) -> Self {
		let trailing_newline = text.ends_with('\n');
		let mut lines: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
		if trailing_newline {
			lines.pop();
		}
		Self { lines, trailing_newline }
	}

	pub fn load<P: AsRef<Path>>(file: P) -> Result<Self> {
		Ok(Self::parse(&std::fs::read_to_string(file)?))
	}

	pub fn render(&self) -> String {
		let mut s = self.lines.join("\n");
		if self.trailing_newline {
			s.push('\n');
		}
		s
	}

	// write a sibling temp file and rename it over the target, so a
	// failed run never leaves a half-written destination
	pub fn store<P: AsRef<Path>>(&self, file: P) -> Result<()> {
		let file = file.as_ref();
		let tmp = file.with_extension("tmp");
		std::fs::write(&tmp, self.render())?;
		std::fs::rename(&tmp, file)?;
		Ok(())
	}
}

// replace the body-geometry span inside the marker block. the span runs
// from the first to the last recognized line so the blank separators the
// emitter writes between header and grid stay inside it; with no
// recognized line the new lines go right after the begin marker.
pub fn patch_lines(
	lines: &[String],
	new_lines: &[String],
	begin: &str,
	end: &str,
	prefix: &str,
) -> Result<Vec<String>> {
	let mut block_begin = None;
	let mut block_end = None;
	for (idx, line) in lines.iter().enumerate() {
		let t = line.trim();
		if block_begin.is_none() {
			if t == begin {
				block_begin = Some(idx);
			}
		} else if t == end {
			block_end = Some(idx);
			break
		}
	}
	let (b, e) = match (block_begin, block_end) {
		(Some(b), Some(e)) => (b, e),
		_ => {
			return Err(Error::MissingBlock(format!(
				"no {}/{} pair in document",
				begin, end,
			)))
		}
	};
	let mut first = None;
	let mut last = None;
	for (idx, line) in lines.iter().enumerate().take(e).skip(b + 1) {
		if line.trim_start().starts_with(prefix) {
			if first.is_none() {
				first = Some(idx);
			}
			last = Some(idx);
		}
	}
	let (start, stop) = match (first, last) {
		(Some(f), Some(l)) => (f, l + 1),
		_ => (b + 1, b + 1),
	};
	let mut out = Vec::with_capacity(lines.len() + new_lines.len());
	out.extend_from_slice(&lines[..start]);
	out.extend_from_slice(new_lines);
	out.extend_from_slice(&lines[stop..]);
	Ok(out)
}

// default-marker convenience over a whole document
pub fn patch_document(doc: &Document, new_lines: &[String]) -> Result<Document> {
	let lines = patch_lines(
		&doc.lines,
		new_lines,
		PROPERTIES_BEGIN,
		PROPERTIES_END,
		BODY_PREFIX,
	)?;
	Ok(Document { lines, trailing_newline: doc.trailing_newline })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn doc(lines: &[&str]) -> Vec<String> {
		lines.iter().map(|s| s.to_string()).collect()
	}

	fn body_lines() -> Vec<String> {
		doc(&[
			"P _body/0/_part_x 0.100000000",
			"",
			"P _body/0/_geo_xyz/0,0,0 1.000000000",
		])
	}

	#[test]
	fn replaces_existing_run_and_preserves_the_rest() {
		let orig = doc(&[
			"A version 1200",
			"PROPERTIES_BEGIN",
			"P acf/_name Plane",
			"P _body/0/_part_x 9.000000000",
			"P _body/0/_geo_xyz/0,0,0 9.000000000",
			"P acf/_tail ignored",
			"PROPERTIES_END",
			"trailer",
		]);
		let out = patch_lines(
			&orig,
			&body_lines(),
			PROPERTIES_BEGIN,
			PROPERTIES_END,
			BODY_PREFIX,
		)
		.unwrap();
		assert_eq!(out[0], "A version 1200");
		assert_eq!(out[1], "PROPERTIES_BEGIN");
		assert_eq!(out[2], "P acf/_name Plane");
		assert_eq!(out[3], "P _body/0/_part_x 0.100000000");
		assert_eq!(out[5], "P _body/0/_geo_xyz/0,0,0 1.000000000");
		assert_eq!(out[6], "P acf/_tail ignored");
		assert_eq!(out[7], "PROPERTIES_END");
		assert_eq!(out[8], "trailer");
	}

	#[test]
	fn blank_separators_inside_the_old_run_are_replaced_too() {
		let orig = doc(&[
			"PROPERTIES_BEGIN",
			"P _body/0/_part_x 1.000000000",
			"",
			"P _body/0/_geo_xyz/0,0,0 2.000000000",
			"P _body/1/_part_x 3.000000000",
			"PROPERTIES_END",
		]);
		let new = doc(&["P _body/0/_part_x 5.000000000"]);
		let out = patch_lines(&orig, &new, PROPERTIES_BEGIN, PROPERTIES_END, BODY_PREFIX).unwrap();
		assert_eq!(
			out,
			doc(&[
				"PROPERTIES_BEGIN",
				"P _body/0/_part_x 5.000000000",
				"PROPERTIES_END",
			]),
		);
	}

	#[test]
	fn no_run_inserts_right_after_the_begin_marker() {
		let orig = doc(&[
			"PROPERTIES_BEGIN",
			"P acf/_name Plane",
			"PROPERTIES_END",
		]);
		let new = doc(&["P _body/0/_part_x 5.000000000"]);
		let out = patch_lines(&orig, &new, PROPERTIES_BEGIN, PROPERTIES_END, BODY_PREFIX).unwrap();
		assert_eq!(
			out,
			doc(&[
				"PROPERTIES_BEGIN",
				"P _body/0/_part_x 5.000000000",
				"P acf/_name Plane",
				"PROPERTIES_END",
			]),
		);
	}

	#[test]
	fn patching_twice_is_idempotent() {
		let orig = doc(&[
			"A version 1200",
			"PROPERTIES_BEGIN",
			"P acf/_name Plane",
			"PROPERTIES_END",
		]);
		let new = body_lines();
		let once = patch_lines(&orig, &new, PROPERTIES_BEGIN, PROPERTIES_END, BODY_PREFIX).unwrap();
		let twice = patch_lines(&once, &new, PROPERTIES_BEGIN, PROPERTIES_END, BODY_PREFIX).unwrap();
		assert_eq!(once, twice);
	}

	#[test]
	fn missing_markers_fail() {
		let no_begin = doc(&["P acf/_name Plane", "PROPERTIES_END"]);
		let no_end = doc(&["PROPERTIES_BEGIN", "P acf/_name Plane"]);
		for lines in [no_begin, no_end] {
			let err = patch_lines(&lines, &[], PROPERTIES_BEGIN, PROPERTIES_END, BODY_PREFIX)
				.unwrap_err();
			assert!(matches!(err, Error::MissingBlock(_)));
		}
	}

	#[test]
	fn end_before_begin_fails() {
		let lines = doc(&["PROPERTIES_END", "PROPERTIES_BEGIN"]);
		let err = patch_lines(&lines, &[], PROPERTIES_BEGIN, PROPERTIES_END, BODY_PREFIX)
			.unwrap_err();
		assert!(matches!(err, Error::MissingBlock(_)));
	}

	#[test]
	fn document_round_trips_bytes() {
		for text in [
			"a\nb\nc\n",
			"a\nb\nc",
			"a\r\nb\r\n",
			"",
			"\n",
		] {
			assert_eq!(Document::parse(text).render(), text);
		}
	}

	#[test]
	fn document_patch_keeps_trailing_newline_flag() {
		let doc_in = Document::parse("PROPERTIES_BEGIN\nPROPERTIES_END\n");
		let out = patch_document(&doc_in, &body_lines()).unwrap();
		assert!(out.render().ends_with("PROPERTIES_END\n"));
	}
}
