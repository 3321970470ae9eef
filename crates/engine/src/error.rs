//! The module contains the errors the engine can throw.
//!
//! The main groups are:
//!
//! - [`Validation`] for malformed input, carrying a field-level error list.
//! - [`UnknownItem`] / [`InvalidQuantity`] for pricing rejections.
//! - [`KeyNotFound`] / [`ExistingKey`] / [`Forbidden`] for record access.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`UnknownItem`]: EngineError::UnknownItem
//!  [`InvalidQuantity`]: EngineError::InvalidQuantity
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Forbidden`]: EngineError::Forbidden

use std::fmt;

use sea_orm::DbErr;
use thiserror::Error;

/// A single rejected field with the reason for the rejection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// Field-level validation errors, accumulated while checking an input
/// struct so the caller sees every problem at once instead of the first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a list holding a single field error.
    #[must_use]
    pub fn single(field: &'static str, reason: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, reason);
        errors
    }

    pub fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Consumes the list: `Ok(())` when no field was rejected, otherwise the
    /// whole list as an [`EngineError::Validation`].
    pub fn into_result(self) -> Result<(), EngineError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.reason)?;
            first = false;
        }
        Ok(())
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid fields: {0}")]
    Validation(FieldErrors),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::UnknownItem(a), Self::UnknownItem(b)) => a == b,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Config(a), Self::Config(b)) => a == b,
            (Self::Export(a), Self::Export(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
