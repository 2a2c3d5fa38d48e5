use std::fmt;

/// Outcome of a general operation such as a lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Error,
    /// Not done yet; the caller may try again.
    Again,
    /// Nothing to do; not a failure.
    Ignore,
}

/// Outcome of a whole configuration load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigStatus {
    Ok,
    Error,
}

impl Status {
    /// The numeric code exposed to callers that expect integer status values.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Error => -1,
            Self::Again => -2,
            Self::Ignore => -3,
        }
    }

    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            -1 => Some(Self::Error),
            -2 => Some(Self::Again),
            -3 => Some(Self::Ignore),
            _ => None,
        }
    }

    /// `Ok` and `Ignore` both let the caller carry on.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Ignore)
    }
}

impl ConfigStatus {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Error => -1,
        }
    }
}

impl<T, E> From<&Result<T, E>> for ConfigStatus {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() { Self::Ok } else { Self::Error }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Again => "again",
            Self::Ignore => "ignore",
        })
    }
}

impl fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "config ok",
            Self::Error => "config error",
        })
    }
}
