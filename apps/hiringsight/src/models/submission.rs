//! Raw candidate submissions as exported by the intake form.
//!
//! Every field is classified into one of three states while reading the JSON so
//! that extractors match on shape instead of probing `serde_json::Value`s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single raw field: well-formed, present but unusable, or missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Present(T),
    Malformed,
    Absent,
}

impl<T> Field<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Malformed | Field::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

/// A salary figure before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum SalaryValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryExpectation {
    pub full_time: Field<SalaryValue>,
    pub part_time: Field<SalaryValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    #[serde(rename = "roleName")]
    pub role_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Degree {
    pub subject: String,
    pub gpa: String,
    pub is_top50: bool,
    pub is_top25: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Education {
    pub highest_level: String,
    pub degrees: Field<Vec<Degree>>,
}

/// Which profile fields carried a non-empty raw value, judged before
/// classification. A wrong JSON type still counts as filled in; `skills` only
/// counts when it arrived as a list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilledFields {
    pub skills_list: bool,
    pub work_experiences: bool,
    pub education: bool,
    pub phone: bool,
    pub location: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSubmission {
    pub name: Field<String>,
    pub email: Field<String>,
    pub phone: Field<String>,
    pub submitted_at: Field<String>,
    pub annual_salary_expectation: Field<SalaryExpectation>,
    pub work_availability: Field<Vec<String>>,
    pub work_experiences: Field<Vec<WorkExperience>>,
    pub education: Field<Education>,
    pub skills: Field<Vec<String>>,
    pub location: Field<String>,
    pub filled: FilledFields,
}

impl CandidateSubmission {
    /// Classifies every field of a raw JSON object. Returns `None` when the value
    /// is not an object at all.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let get = |key: &str| obj.get(key).unwrap_or(&Value::Null);

        Some(Self {
            name: read_text(get("name")),
            email: read_text(get("email")),
            phone: read_text(get("phone")),
            submitted_at: read_text(get("submitted_at")),
            annual_salary_expectation: read_salary(get("annual_salary_expectation")),
            work_availability: read_string_list(get("work_availability")),
            work_experiences: read_work_experiences(get("work_experiences")),
            education: read_education(get("education")),
            skills: read_string_list(get("skills")),
            location: read_text(get("location")),
            filled: FilledFields {
                skills_list: matches!(get("skills"), Value::Array(items) if !items.is_empty()),
                work_experiences: is_filled(get("work_experiences")),
                education: is_filled(get("education")),
                phone: is_filled(get("phone")),
                location: is_filled(get("location")),
            },
        })
    }
}

/// Human-readable JSON type name, used in skip diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// False for null, `false`, zero and empty strings, arrays or objects.
fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn read_text(value: &Value) -> Field<String> {
    match value {
        Value::Null => Field::Absent,
        Value::String(s) if s.is_empty() => Field::Absent,
        Value::String(s) => Field::Present(s.clone()),
        _ => Field::Malformed,
    }
}

fn read_salary_value(value: &Value) -> Field<SalaryValue> {
    match value {
        Value::Null => Field::Absent,
        Value::String(s) if s.is_empty() => Field::Absent,
        Value::String(s) => Field::Present(SalaryValue::Text(s.clone())),
        Value::Number(n) => match n.as_f64() {
            Some(f) => Field::Present(SalaryValue::Number(f)),
            None => Field::Malformed,
        },
        _ => Field::Malformed,
    }
}

fn read_salary(value: &Value) -> Field<SalaryExpectation> {
    match value {
        Value::Null => Field::Absent,
        Value::Object(map) if map.is_empty() => Field::Absent,
        Value::Object(map) => Field::Present(SalaryExpectation {
            full_time: map.get("full-time").map(read_salary_value).unwrap_or_default(),
            part_time: map.get("part-time").map(read_salary_value).unwrap_or_default(),
        }),
        _ => Field::Malformed,
    }
}

/// Lists keep their string items; a bare string becomes a one-item list.
fn read_string_list(value: &Value) -> Field<Vec<String>> {
    match value {
        Value::Null => Field::Absent,
        Value::String(s) if s.is_empty() => Field::Absent,
        Value::String(s) => Field::Present(vec![s.clone()]),
        Value::Array(items) if items.is_empty() => Field::Absent,
        Value::Array(items) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect();
            if strings.is_empty() {
                Field::Malformed
            } else {
                Field::Present(strings)
            }
        }
        _ => Field::Malformed,
    }
}

fn string_member(map: &serde_json::Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn read_work_experiences(value: &Value) -> Field<Vec<WorkExperience>> {
    match value {
        Value::Null => Field::Absent,
        Value::Array(items) if items.is_empty() => Field::Absent,
        Value::Array(items) => {
            let roles: Vec<WorkExperience> = items
                .iter()
                .filter_map(|v| v.as_object())
                .map(|m| WorkExperience {
                    company: string_member(m, "company"),
                    role_name: string_member(m, "roleName"),
                })
                .collect();
            if roles.is_empty() {
                Field::Malformed
            } else {
                Field::Present(roles)
            }
        }
        _ => Field::Malformed,
    }
}

fn read_degrees(value: &Value) -> Field<Vec<Degree>> {
    match value {
        Value::Null => Field::Absent,
        Value::Array(items) if items.is_empty() => Field::Absent,
        Value::Array(items) => {
            let degrees: Vec<Degree> = items
                .iter()
                .filter_map(|v| v.as_object())
                .map(|m| Degree {
                    subject: string_member(m, "subject"),
                    gpa: string_member(m, "gpa"),
                    is_top50: m.get("isTop50").and_then(|v| v.as_bool()).unwrap_or(false),
                    is_top25: m.get("isTop25").and_then(|v| v.as_bool()).unwrap_or(false),
                })
                .collect();
            if degrees.is_empty() {
                Field::Malformed
            } else {
                Field::Present(degrees)
            }
        }
        _ => Field::Malformed,
    }
}

fn read_education(value: &Value) -> Field<Education> {
    match value {
        Value::Null => Field::Absent,
        Value::Object(map) if map.is_empty() => Field::Absent,
        Value::Object(map) => Field::Present(Education {
            highest_level: string_member(map, "highest_level"),
            degrees: map.get("degrees").map(read_degrees).unwrap_or_default(),
        }),
        _ => Field::Malformed,
    }
}
