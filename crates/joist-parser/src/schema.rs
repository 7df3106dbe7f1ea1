use joist_value::Value;

/// Hook invoked once per completed value during a parse.
///
/// `path` is a JSON-pointer-like location: `""` for the root, `/users/0/name`
/// below it. Children complete before their container, so a validator sees
/// leaves first. When no validator is configured the parser builds no paths
/// and calls nothing.
pub trait Validate {
    /// Judge one completed value.
    ///
    /// # Errors
    ///
    /// An `Err` aborts the parse with [`crate::Error::Schema`]; the message
    /// is carried verbatim.
    fn validate(&self, path: &str, value: &Value) -> Result<(), String>;
}
