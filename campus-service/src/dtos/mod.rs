//! Request bodies accepted by the operation endpoints.
//!
//! Each body knows which template fields it supplies, so the router can
//! check at startup that every template asks for exactly those fields.

use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

/// A request body that fills a prompt template.
pub trait PromptRequest: Validate + Send + 'static {
    /// Template placeholder names this body provides.
    const FIELDS: &'static [&'static str];

    fn into_fields(self) -> HashMap<&'static str, String>;
}

/// Body for `generate-lesson` and `generate-quiz`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LessonRequest {
    #[validate(length(min = 1, max = 20000, message = "topic must be 1-20000 characters"))]
    pub topic: String,
    #[validate(length(min = 1, max = 20000, message = "grade must be 1-20000 characters"))]
    pub grade: String,
}

impl PromptRequest for LessonRequest {
    const FIELDS: &'static [&'static str] = &["topic", "grade"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([("topic", self.topic), ("grade", self.grade)])
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DoubtRequest {
    #[validate(length(min = 1, max = 20000, message = "doubt must be 1-20000 characters"))]
    pub doubt: String,
    #[validate(length(min = 1, max = 20000, message = "grade must be 1-20000 characters"))]
    pub grade: String,
}

impl PromptRequest for DoubtRequest {
    const FIELDS: &'static [&'static str] = &["doubt", "grade"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([("doubt", self.doubt), ("grade", self.grade)])
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExplanationRequest {
    #[validate(length(min = 1, max = 20000, message = "question must be 1-20000 characters"))]
    pub question: String,
}

impl PromptRequest for ExplanationRequest {
    const FIELDS: &'static [&'static str] = &["question"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([("question", self.question)])
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, max = 20000, message = "report_data must be 1-20000 characters"))]
    pub report_data: String,
}

impl PromptRequest for ReportRequest {
    const FIELDS: &'static [&'static str] = &["report_data"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([("report_data", self.report_data)])
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ParentMessageRequest {
    #[validate(length(min = 1, max = 20000, message = "context must be 1-20000 characters"))]
    pub context: String,
}

impl PromptRequest for ParentMessageRequest {
    const FIELDS: &'static [&'static str] = &["context"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([("context", self.context)])
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SyllabusRequest {
    #[validate(length(min = 1, max = 20000, message = "syllabus must be 1-20000 characters"))]
    pub syllabus: String,
    #[validate(range(min = 1, max = 104, message = "weeks must be between 1 and 104"))]
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub weeks: i64,
}

impl PromptRequest for SyllabusRequest {
    const FIELDS: &'static [&'static str] = &["syllabus", "weeks"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("syllabus", self.syllabus),
            ("weeks", self.weeks.to_string()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HomeworkRequest {
    #[validate(length(min = 1, max = 20000, message = "topic must be 1-20000 characters"))]
    pub topic: String,
    #[validate(length(min = 1, max = 20000, message = "grade must be 1-20000 characters"))]
    pub grade: String,
}

impl PromptRequest for HomeworkRequest {
    const FIELDS: &'static [&'static str] = &["topic", "grade"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([("topic", self.topic), ("grade", self.grade)])
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PerformanceRequest {
    #[validate(length(
        min = 1,
        max = 20000,
        message = "performance_data must be 1-20000 characters"
    ))]
    pub performance_data: String,
}

impl PromptRequest for PerformanceRequest {
    const FIELDS: &'static [&'static str] = &["performance_data"];

    fn into_fields(self) -> HashMap<&'static str, String> {
        HashMap::from([("performance_data", self.performance_data)])
    }
}

/// Accept an integer, an integral float (`6.0`) or a numeric string (`"6"`).
fn deserialize_lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct LenientIntVisitor;

    impl<'de> de::Visitor<'de> for LenientIntVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(LenientIntVisitor)
}
