use alloc::collections::TryReserveError;
use core::fmt;

/// Failure to construct a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    /// A table needs at least one slot.
    ZeroCapacity,
    /// A load factor or tombstone threshold was outside its valid range.
    InvalidThreshold,
    /// The slot store could not be allocated. No table was created.
    AllocationFailure(TryReserveError),
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateError::ZeroCapacity => write!(f, "table capacity must be non-zero"),
            CreateError::InvalidThreshold => write!(f, "threshold out of range"),
            CreateError::AllocationFailure(err) => {
                write!(f, "failed to allocate slot store: {err}")
            }
        }
    }
}

impl core::error::Error for CreateError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            CreateError::AllocationFailure(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure to insert a key. The table is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The key is already bound to a value.
    DuplicateKey,
    /// Every slot holds a live entry.
    Full,
    /// The key's probe sequence reached no vacant slot. Only non-linear
    /// probe strategies can leave vacant slots unreachable.
    ProbeExhausted,
    /// A growable table could not allocate its larger slot store.
    AllocationFailure,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => write!(f, "key already present"),
            InsertError::Full => write!(f, "table is full"),
            InsertError::ProbeExhausted => write!(f, "no vacant slot on the key's probe sequence"),
            InsertError::AllocationFailure => write!(f, "failed to allocate a larger table"),
        }
    }
}

impl core::error::Error for InsertError {}

impl From<CreateError> for InsertError {
    fn from(_: CreateError) -> Self {
        InsertError::AllocationFailure
    }
}

/// A key that is not in the table.
///
/// Both variants are ordinary negative answers rather than faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// The key's home slot has never been occupied, so the key is provably
    /// absent without probing.
    Empty,
    /// The key was not found along its probe sequence.
    NotFound,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Empty => write!(f, "home slot is empty"),
            LookupError::NotFound => write!(f, "key not found"),
        }
    }
}

impl core::error::Error for LookupError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::error::Error;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            CreateError::ZeroCapacity.to_string(),
            "table capacity must be non-zero"
        );
        assert_eq!(InsertError::DuplicateKey.to_string(), "key already present");
        assert_eq!(InsertError::Full.to_string(), "table is full");
        assert_eq!(LookupError::Empty.to_string(), "home slot is empty");
        assert_eq!(LookupError::NotFound.to_string(), "key not found");
    }

    #[test]
    fn allocation_failure_keeps_source() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve_exact(usize::MAX).unwrap_err();
        let create = CreateError::AllocationFailure(err);
        assert!(create.source().is_some());
        assert!(CreateError::ZeroCapacity.source().is_none());
        assert_eq!(InsertError::from(create), InsertError::AllocationFailure);
    }
}
