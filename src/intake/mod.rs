pub mod chart_file;
pub mod input_source;

pub use chart_file::{ChartFile, FileContents};
pub use input_source::InputSource;
