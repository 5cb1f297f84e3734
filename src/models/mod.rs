pub mod record;
pub mod value;

pub use record::{load_records, parse_records, Record};
pub use value::Value;
