//! Configuration access port trait.

/// Raw `[section] key` lookups; typed parsing happens in config validation.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
