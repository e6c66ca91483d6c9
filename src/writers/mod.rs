pub mod exporter;
pub mod log_writer;
pub mod numeric_table;
pub mod srw_writer;
pub mod summary_writer;

pub use exporter::{CityPaths, ExportSettings, ExportSummary, Exporter};
pub use log_writer::{append_block, LogBlock, LogDetails};
pub use numeric_table::{parse_table, render_table};
pub use srw_writer::{render_srw, write_srw, SrwHeader};
pub use summary_writer::{MonthlySummary, SummaryQuantity, SummaryWriter};
