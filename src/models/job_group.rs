//! Job group model.
//!
//! A job group is the coarse worker classification that decides which hourly
//! rate applies to a work-log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The job group a work-log was recorded under.
///
/// # Example
///
/// ```
/// use payroll_engine::models::JobGroup;
///
/// assert_eq!(JobGroup::from_code("B"), JobGroup::B);
/// assert_eq!(JobGroup::from_code("Z"), JobGroup::A);
/// assert!("Z".parse::<JobGroup>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum JobGroup {
    /// Job group A, also the group assumed for unrecognised codes.
    #[default]
    A,
    /// Job group B.
    B,
}

impl JobGroup {
    /// Maps an uploaded job group code to a job group.
    ///
    /// Only the literal `B` selects group B; every other value, including an
    /// empty column, falls back to group A. This mapping never fails.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// Returns the code stored for this job group.
    pub fn code(&self) -> &'static str {
        match self {
            JobGroup::A => "A",
            JobGroup::B => "B",
        }
    }
}

impl FromStr for JobGroup {
    type Err = String;

    /// Strict parse used for reference data, where an unknown code must not
    /// be folded into group A.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(JobGroup::A),
            "B" => Ok(JobGroup::B),
            other => Err(format!("unknown job group '{}'", other)),
        }
    }
}

impl fmt::Display for JobGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
