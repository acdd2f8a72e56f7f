//! Charts module - Chart rendering

mod renderer;

pub use renderer::{ChartError, StaticChartRenderer};
