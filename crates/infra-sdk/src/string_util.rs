/// Small string helpers shared by settings and the resource loader.
pub struct StringUtil;

impl StringUtil {
    /// Parse a boolean flag as commonly written in environment variables.
    ///
    /// True: `1`, `true`, `yes`, `on`. False: `0`, `false`, `no`, `off`.
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn convert_to_bool(value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    /// True when `value` is empty or whitespace only.
    pub fn is_blank(value: &str) -> bool {
        value.trim().is_empty()
    }
}
