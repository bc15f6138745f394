// Directory-listing wire codec shared by the client and the server.
pub mod error;
pub mod format;
pub mod parser;
pub mod types;

pub use error::ListingError;
pub use format::{list_detailed, list_short};
pub use parser::{parse_list_line, parse_listing};
pub use types::{Entry, EntryType, FileItem};
