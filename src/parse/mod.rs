pub mod cursor;
pub mod task_parser;
pub mod task_serializer;

pub use task_parser::{ParseContext, ParseError, parse_entry, parse_task};
pub use task_serializer::{SerializeError, serialize_entry, serialize_task};
