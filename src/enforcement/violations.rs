//! User-correctable validation errors.

use crate::core::Role;
use std::fmt;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single reason a borrow or return request was rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("destination unit must be selected")]
    MissingLocation,

    #[error("borrower name is required")]
    MissingBorrower,

    #[error("'{name}' is not on the {role} roster")]
    UnknownBorrower { role: Role, name: String },

    #[error("'{name}' is not on any staff roster")]
    UnknownReturner { name: String },

    #[error("body part '{0}' is not in the catalog")]
    UnknownBodyPart(String),

    #[error("destination unit '{0}' is not in the catalog")]
    UnknownLocation(String),

    #[error("equipment must be confirmed inspected and cleaned before return")]
    InspectionNotConfirmed,

    #[error("{message}")]
    Custom { message: String },
}

/// Every violation found for one request, in check order.
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(Vec<ValidationError>);

impl Violations {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<NonEmptyVec<ValidationError>> for Violations {
    fn from(errors: NonEmptyVec<ValidationError>) -> Self {
        Self(errors.iter().cloned().collect())
    }
}

impl From<ValidationError> for Violations {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}
