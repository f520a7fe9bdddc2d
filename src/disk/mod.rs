pub mod aggregate;
pub mod exec;
pub mod output;
pub mod walk;

pub use aggregate::aggregate;
pub use exec::exec;
pub use output::{output_json, output_ndjson, output_table};
pub use walk::{dir_size, DirSize};
