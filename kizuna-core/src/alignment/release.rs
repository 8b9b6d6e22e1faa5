use chrono::{DateTime, Utc};

/// Accumulator for monotonic release-date repair over one alignment pass.
///
/// Each step takes the accumulator by value and returns the next one along
/// with the repaired date, so the state is threaded explicitly by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseClamp {
    last: Option<DateTime<Utc>>,
}

impl ReleaseClamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the pass at `floor`; no output will be earlier.
    pub fn starting_at(floor: DateTime<Utc>) -> Self {
        Self { last: Some(floor) }
    }

    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.last
    }

    /// Moves `candidate` forward to the previous output when it is earlier.
    #[must_use]
    pub fn step(self, candidate: DateTime<Utc>) -> (Self, DateTime<Utc>) {
        let released = match self.last {
            Some(last) if last > candidate => last,
            _ => candidate,
        };
        (
            Self {
                last: Some(released),
            },
            released,
        )
    }

    /// Like [`ReleaseClamp::step`], substituting the previous output for a
    /// missing date. Returns `None` only while nothing has been seen yet.
    #[must_use]
    pub fn step_optional(
        self,
        candidate: Option<DateTime<Utc>>,
    ) -> (Self, Option<DateTime<Utc>>) {
        match candidate {
            Some(candidate) => {
                let (next, released) = self.step(candidate);
                (next, Some(released))
            }
            None => (self, self.last),
        }
    }
}
