pub mod fs_toml_util;
pub mod macros;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use regex::Regex;
    pub use scraper::Selector;
}
