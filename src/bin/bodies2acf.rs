use mesh2acf::logging::Log;
use mesh2acf::pipeline::{self, GenConfig};

fn main() {
	let args = std::env::args().collect::<Vec<_>>();
	if args.len() < 3 {
		eprintln!("usage: bodies2acf <source.obj> <target.acf> [config.json]");
		std::process::exit(2);
	}
	let config = if args.len() > 3 {
		match GenConfig::load(&args[3]) {
			Ok(c) => c,
			Err(e) => {
				eprintln!("config error: {}", e);
				std::process::exit(2);
			}
		}
	} else {
		GenConfig::default()
	};
	let echo = |msg: &str| eprintln!("{}", msg);
	match pipeline::run(&args[1], &args[2], &config, Log::new(&echo)) {
		Ok(summary) if summary.skipped => {
			eprintln!("nothing to generate, {} untouched", args[2]);
		}
		Ok(summary) => {
			eprintln!("{} bodies, {} lines -> {}", summary.bodies, summary.lines, args[2]);
		}
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1);
		}
	}
}
