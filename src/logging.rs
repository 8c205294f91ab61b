// per-run progress callback, threaded through every stage.
// no callback means silence, never a crash.
#[derive(Clone, Copy, Default)]
pub struct Log<'a>(Option<&'a dyn Fn(&str)>);

impl<'a> Log<'a> {
	pub fn new(f: &'a dyn Fn(&str)) -> Self {
		Log(Some(f))
	}

	pub fn none() -> Self {
		Log(None)
	}

	pub fn line(&self, msg: &str) {
		if let Some(f) = self.0 {
			f(msg);
		}
	}
}
