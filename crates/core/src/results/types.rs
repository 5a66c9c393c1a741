//! Results domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use schola_shared::types::{
    CourseUnitId, PageConfigId, PostHistoryId, ProgrammeId, StudentId, StudentResultId,
};

/// How per-course-unit marks on a result page are expressed and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkingScheme {
    /// Marks in `[0, 100]`.
    #[default]
    Percentage,
    /// Marks in `[0, 10]`.
    Number,
    /// Letter grades: one uppercase letter with an optional `+` or `-`.
    Letter,
}

impl MarkingScheme {
    /// Returns the string representation of the scheme.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Number => "number",
            Self::Letter => "letter",
        }
    }

    /// Parses a scheme from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "percentage" => Some(Self::Percentage),
            "number" => Some(Self::Number),
            "letter" => Some(Self::Letter),
            _ => None,
        }
    }
}

impl fmt::Display for MarkingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the page-level overall score is expressed and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallScoreSystem {
    /// Grade point average in `[0.0, 5.0]`.
    Gpa,
    /// Average mark in `[0, 100]`.
    Average,
    /// Accumulated points, unconstrained.
    Points,
    /// Free text such as "Distinction" or "Repeat Year".
    Other,
}

impl OverallScoreSystem {
    /// Returns the string representation of the system.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpa => "gpa",
            Self::Average => "average",
            Self::Points => "points",
            Self::Other => "other",
        }
    }

    /// Parses a system from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gpa" => Some(Self::Gpa),
            "average" => Some(Self::Average),
            "points" => Some(Self::Points),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for OverallScoreSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One gradable board, e.g. "Semester 1 Results, Year 2".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPageConfig {
    /// Page config ID.
    pub id: PageConfigId,
    /// Display name.
    pub name: String,
    /// Level or year of study the page covers.
    pub level: String,
    /// Programme the page belongs to.
    pub programme_id: ProgrammeId,
    /// Course units graded on this page.
    pub course_unit_ids: Vec<CourseUnitId>,
    /// Marking scheme for per-unit marks.
    pub marking_scheme: MarkingScheme,
    /// Optional pass mark under the scheme.
    pub pass_mark: Option<Decimal>,
    /// System for the page-level overall score.
    pub overall_score_system: OverallScoreSystem,
    /// Pages for previous semesters are locked absolutely, independent of
    /// the post/draft state machine.
    pub read_only: bool,
}

/// One student's mark for one course unit on one page.
///
/// At most one live record exists per (student, course unit, page);
/// absence is the canonical "not entered" representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResult {
    /// Result row ID.
    pub id: StudentResultId,
    /// Student graded.
    pub student_id: StudentId,
    /// Course unit graded.
    pub course_unit_id: CourseUnitId,
    /// Page the mark belongs to.
    pub page_config_id: PageConfigId,
    /// The mark, as entered, valid under the page's scheme.
    pub marks: String,
    /// Posted rows are locked and visible to the student.
    pub is_posted: bool,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// The page-level overall score for one student, one per (student, page).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentPageSummary {
    /// Summary identity, `summary_{student}_{page}`.
    pub id: String,
    /// Student summarized.
    pub student_id: StudentId,
    /// Page summarized.
    pub page_config_id: PageConfigId,
    /// Overall score, valid under the page's score system.
    pub overall_score: String,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl StudentPageSummary {
    /// Builds the deterministic summary identity for a (student, page) pair.
    #[must_use]
    pub fn identity(student_id: StudentId, page_config_id: PageConfigId) -> String {
        format!("summary_{student_id}_{page_config_id}")
    }
}

/// Append-only record of one posting action.
///
/// A revert unposts the referenced rows but the history item itself is
/// retained as the record that posting and reverting occurred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostHistoryItem {
    /// History entry ID.
    pub id: PostHistoryId,
    /// When the posting happened.
    pub date: DateTime<Utc>,
    /// Page the batch belongs to.
    pub page_config_id: PageConfigId,
    /// Page display name at the time of posting.
    pub page_name: String,
    /// Student display names, for the audit view.
    pub students: Vec<String>,
    /// Student ids, for addressing the batch on revert.
    pub student_ids: Vec<StudentId>,
    /// Number of students in the batch.
    pub count: usize,
}
