pub mod error;
pub mod logging;
pub mod objmodel;
pub mod body;
pub mod topomodel;
pub mod index;
pub mod emit;
pub mod acf;
pub mod pipeline;

pub type V3 = nalgebra::Vector3<f64>;
pub type M3 = nalgebra::Matrix3<f64>;

pub use error::{Error, Stage};
pub use logging::Log;
pub use pipeline::{GenConfig, RunSummary};
