//! Per-section checks and the fallback to defaults
//!
//! A section with any bad value is replaced wholesale by its defaults on
//! load; individual fields are never patched.

use crate::error::{describe, ValidationError};
use std::fmt::Display;
use std::ops::RangeInclusive;

/// A `[table]` of `config.toml`
pub trait ConfigSection: Default {
    /// Table name in the TOML file
    const SECTION: &'static str;

    /// Everything wrong with this section; empty when usable
    fn problems(&self) -> Vec<ValidationError>;

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// Keeps the section if it is usable, otherwise swaps in the defaults
    /// and appends what was wrong to `rejected`
    fn or_default(self, rejected: &mut Vec<ValidationError>) -> Self {
        let Err(problems) = self.validate() else {
            return self;
        };

        log::warn!(
            "[{}] reverted to defaults: {}",
            Self::SECTION,
            describe(&problems)
        );
        rejected.extend(problems);
        Self::default()
    }
}

pub(crate) mod check {
    use super::*;

    pub fn within<T>(field: &'static str, value: T, range: RangeInclusive<T>) -> Option<ValidationError>
    where
        T: PartialOrd + Display,
    {
        (!range.contains(&value)).then(|| {
            ValidationError::new(
                field,
                format!("must be within {}..={} (got {})", range.start(), range.end(), value),
            )
        })
    }

    pub fn non_blank(field: &'static str, value: &str) -> Option<ValidationError> {
        value
            .trim()
            .is_empty()
            .then(|| ValidationError::new(field, "must not be blank"))
    }

    /// Absolute http(s) URL with something after the scheme
    pub fn http_url(field: &'static str, value: &str) -> Option<ValidationError> {
        let ok = ["http://", "https://"]
            .iter()
            .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme));
        (!ok).then(|| ValidationError::new(field, format!("must be an http(s) URL (got '{}')", value)))
    }

    pub fn one_of(field: &'static str, value: &str, allowed: &[&str]) -> Option<ValidationError> {
        (!allowed.contains(&value)).then(|| {
            ValidationError::new(
                field,
                format!("must be one of {} (got '{}')", allowed.join(", "), value),
            )
        })
    }
}
