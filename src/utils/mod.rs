mod text;

pub use text::{escape_xml, split_csv};
