pub mod stats;

pub use stats::render_stats;
