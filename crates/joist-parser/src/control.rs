/// Leniency flags and duplicate-key policy for one parse.
///
/// The defaults accept strict RFC 8259 documents plus the always-on scanner
/// extensions (comments, radix-prefixed integers, leading zeros).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Control {
    pub dup_key: DupKey,
    /// Accept single-quoted and unquoted object keys.
    pub allow_flexible_keys: bool,
    /// Accept single-quoted string values.
    pub allow_flexible_strings: bool,
    /// Accept `true` / `false` / `null` in any case.
    pub allow_nocase_values: bool,
}

/// What to do when an object literal repeats a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DupKey {
    /// Fail the parse at the repeated key.
    #[default]
    Reject,
    /// Overwrite the previously stored value.
    Accept,
    /// Keep the previously stored value, discard the new one.
    Ignore,
    /// Keep every entry; lookups prefer the last, iteration yields all.
    Append,
}

impl core::str::FromStr for DupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "ignore" => Ok(Self::Ignore),
            "append" => Ok(Self::Append),
            "reject" => Ok(Self::Reject),
            _ => Err(format!(
                "unknown duplicate-key policy '{s}', expected: accept, ignore, append, reject"
            )),
        }
    }
}
