use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

pub const AGE_RANGE: RangeInclusive<i32> = 6..=99;
pub const QUALITY_OF_LIFE_RANGE: RangeInclusive<i32> = 1..=10;
pub const STRESS_LEVEL_RANGE: RangeInclusive<i32> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Education {
    Primary,
    Secondary,
    Higher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum JobStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Student,
    Retired,
    Other,
}

/// Demographic fields as they arrive from a form. Every field is optional
/// here so that an absent field produces an error naming it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DemographicInput {
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub education: Option<Education>,
    pub job_status: Option<JobStatus>,
    /// Self-rated quality of life, 1 (poor) to 10 (excellent).
    pub quality_of_life: Option<i32>,
    /// Self-rated stress, 1 (none) to 5 (severe).
    pub stress_level: Option<i32>,
}

impl DemographicInput {
    /// Validate into a [`DemographicProfile`]. Never substitutes defaults.
    pub fn validate(&self) -> Result<DemographicProfile, CoreError> {
        Ok(DemographicProfile {
            age: bounded("age", self.age, AGE_RANGE)?,
            gender: required("gender", self.gender)?,
            education: required("education", self.education)?,
            job_status: required("job_status", self.job_status)?,
            quality_of_life: bounded("quality_of_life", self.quality_of_life, QUALITY_OF_LIFE_RANGE)?,
            stress_level: bounded("stress_level", self.stress_level, STRESS_LEVEL_RANGE)?,
        })
    }
}

/// A validated demographic profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DemographicProfile {
    pub age: u8,
    pub gender: Gender,
    pub education: Education,
    pub job_status: JobStatus,
    pub quality_of_life: u8,
    pub stress_level: u8,
}

impl TryFrom<&DemographicInput> for DemographicProfile {
    type Error = CoreError;

    fn try_from(input: &DemographicInput) -> Result<Self, Self::Error> {
        input.validate()
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::MissingField(field.to_string()))
}

fn bounded(field: &str, value: Option<i32>, range: RangeInclusive<i32>) -> Result<u8, CoreError> {
    let value = required(field, value)?;
    if !range.contains(&value) {
        return Err(CoreError::OutOfRange {
            field: field.to_string(),
            value: i64::from(value),
            min: i64::from(*range.start()),
            max: i64::from(*range.end()),
        });
    }
    // All ranges above sit inside u8.
    u8::try_from(value).map_err(|_| CoreError::OutOfRange {
        field: field.to_string(),
        value: i64::from(value),
        min: 0,
        max: i64::from(u8::MAX),
    })
}
