use core::fmt;
use core::time::Duration;

/// Counters aggregated over one parse.
///
/// Values are counted as they close, so on error the counters reflect the
/// exact prefix consumed. `ints` covers both integer carriers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub nulls: u64,
    pub bools: u64,
    pub ints: u64,
    pub doubles: u64,
    pub strings: u64,
    pub arrays: u64,
    pub objects: u64,
    /// Object entries installed; equals the sum of final object sizes.
    pub keys: u64,
    /// Deepest container nesting observed.
    pub max_depth: u64,
    /// Bytes consumed from the input.
    pub bytes: u64,
    /// Wall-clock duration of the parse (monotonic clock).
    pub duration_ns: u64,
}

impl Stats {
    pub fn total_values(&self) -> u64 {
        self.nulls
            + self.bools
            + self.ints
            + self.doubles
            + self.strings
            + self.arrays
            + self.objects
    }

    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.duration_ns)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "objects={} arrays={} strings={} ints={} doubles={} bools={} nulls={} \
             keys={} max_depth={} bytes={} duration={:?}",
            self.objects,
            self.arrays,
            self.strings,
            self.ints,
            self.doubles,
            self.bools,
            self.nulls,
            self.keys,
            self.max_depth,
            self.bytes,
            self.duration(),
        )
    }
}
