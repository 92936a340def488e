//! Result type of the assistant operations.

use campusnet_core::ErrorKind;

/// A genuine result, or the fallback value that replaced it.
///
/// Either way a usable `T` is available through [`Outcome::into_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Fallback { value: T, cause: ErrorKind },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Success(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_fallback(&self) -> bool {
        !self.is_success()
    }

    /// Why the fallback was used, if it was
    pub fn cause(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Fallback { cause, .. } => Some(*cause),
        }
    }
}
