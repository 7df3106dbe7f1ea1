/// Serialization style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatKind {
    /// No whitespace at all.
    #[default]
    Compact,
    /// Newlines after `{` / `[`, indentation by depth.
    Pretty,
}

impl core::str::FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(format!("unknown format '{s}', expected: compact, pretty")),
        }
    }
}

/// How a [`crate::Value`] renders to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub kind: FormatKind,
    /// Spaces per nesting level in pretty mode.
    pub indent: usize,
    /// Separator between a key and its value.
    pub key_sep: String,
    /// Separator between consecutive entries or elements.
    pub item_sep: String,
}

impl Format {
    pub fn compact() -> Self {
        Self {
            kind: FormatKind::Compact,
            indent: 2,
            key_sep: ":".to_owned(),
            item_sep: ",".to_owned(),
        }
    }

    pub fn pretty() -> Self {
        Self {
            kind: FormatKind::Pretty,
            indent: 2,
            key_sep: " : ".to_owned(),
            item_sep: ",".to_owned(),
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::compact()
    }
}

impl From<FormatKind> for Format {
    fn from(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Compact => Self::compact(),
            FormatKind::Pretty => Self::pretty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_by_name() {
        assert_eq!("compact".parse(), Ok(FormatKind::Compact));
        assert_eq!("pretty".parse(), Ok(FormatKind::Pretty));
        assert!("yaml".parse::<FormatKind>().is_err());
    }

    #[test]
    fn defaults_are_compact_with_two_space_indent() {
        let fmt = Format::default();
        assert_eq!(fmt.kind, FormatKind::Compact);
        assert_eq!(fmt.indent, 2);
        assert_eq!(fmt.key_sep, ":");
        assert_eq!(fmt.item_sep, ",");
    }
}
