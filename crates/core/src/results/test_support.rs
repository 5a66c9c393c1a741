//! Shared fixtures for results tests.

use chrono::Utc;

use super::types::{
    MarkingScheme, OverallScoreSystem, ResultPageConfig, StudentResult,
};
use schola_shared::types::{
    CourseUnitId, PageConfigId, ProgrammeId, StudentId, StudentResultId,
};

pub fn page_config(
    marking_scheme: MarkingScheme,
    overall_score_system: OverallScoreSystem,
    course_units: usize,
) -> ResultPageConfig {
    ResultPageConfig {
        id: PageConfigId::new(),
        name: "Semester 1 Results".to_string(),
        level: "Year 2".to_string(),
        programme_id: ProgrammeId::new(),
        course_unit_ids: (0..course_units).map(|_| CourseUnitId::new()).collect(),
        marking_scheme,
        pass_mark: None,
        overall_score_system,
        read_only: false,
    }
}

pub fn result_row(
    page: &ResultPageConfig,
    student_id: StudentId,
    course_unit_id: CourseUnitId,
    marks: &str,
    is_posted: bool,
) -> StudentResult {
    StudentResult {
        id: StudentResultId::new(),
        student_id,
        course_unit_id,
        page_config_id: page.id,
        marks: marks.to_string(),
        is_posted,
        updated_at: Utc::now(),
    }
}
