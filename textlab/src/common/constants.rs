// segment names
pub const TOKEN_SEGMENT: &str = "token";

// pipeline constants
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_PREVIEW_LIMIT: usize = 150;
pub const SPLITTER_GROUP: &str = "splitter";

// settings constants
pub const FILTER_SETTINGS_PREFIX: &str = "filtertool:";
pub const DOCUMENT_NAME_SEPARATOR: &str = ":";
