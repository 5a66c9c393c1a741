//! Mark and overall-score validation against a page's schemes.

use rust_decimal::Decimal;

use super::error::{FieldError, ResultsError};
use super::types::{MarkingScheme, OverallScoreSystem, ResultPageConfig};
use schola_shared::types::CourseUnitId;

/// Validates one mark under a marking scheme.
///
/// An empty string is not a mark and never reaches validation: the save
/// path treats it as a deletion.
pub fn validate_mark(scheme: MarkingScheme, marks: &str) -> Result<(), String> {
    match scheme {
        MarkingScheme::Letter => validate_letter(marks),
        MarkingScheme::Number => validate_range(marks, Decimal::ZERO, Decimal::TEN),
        MarkingScheme::Percentage => {
            validate_range(marks, Decimal::ZERO, Decimal::ONE_HUNDRED)
        }
    }
}

/// Validates the page-level overall score under a score system.
///
/// `Points` and `Other` systems are unconstrained free text (the UI offers
/// a suggestion vocabulary such as "Distinction" or "Repeat Year" but does
/// not enforce it).
pub fn validate_overall_score(system: OverallScoreSystem, score: &str) -> Result<(), String> {
    match system {
        OverallScoreSystem::Gpa => validate_range(score, Decimal::ZERO, Decimal::from(5)),
        OverallScoreSystem::Average => {
            validate_range(score, Decimal::ZERO, Decimal::ONE_HUNDRED)
        }
        OverallScoreSystem::Points | OverallScoreSystem::Other => Ok(()),
    }
}

/// Validates a whole save: every course-unit mark plus the optional
/// overall score. Any invalid field rejects the save wholesale, with all
/// invalid fields listed so the caller can re-surface each one.
///
/// Empty entries are deletions and skip validation.
pub fn validate_save(
    page: &ResultPageConfig,
    entries: &[(CourseUnitId, String)],
    overall_score: Option<&str>,
) -> Result<(), ResultsError> {
    let mut fields = Vec::new();

    for (course_unit_id, marks) in entries {
        if marks.trim().is_empty() {
            continue;
        }
        if !page.course_unit_ids.contains(course_unit_id) {
            fields.push(FieldError {
                field: course_unit_id.to_string(),
                message: "course unit is not on this page".to_string(),
            });
            continue;
        }
        if let Err(message) = validate_mark(page.marking_scheme, marks) {
            fields.push(FieldError {
                field: course_unit_id.to_string(),
                message,
            });
        }
    }

    if let Some(score) = overall_score {
        if !score.trim().is_empty() {
            if let Err(message) = validate_overall_score(page.overall_score_system, score) {
                fields.push(FieldError {
                    field: "overall_score".to_string(),
                    message,
                });
            }
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ResultsError::InvalidFields { fields })
    }
}

/// Letter grades match `[A-Z][+|-]?`.
fn validate_letter(marks: &str) -> Result<(), String> {
    let trimmed = marks.trim();
    let mut chars = trimmed.chars();
    let valid = match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), None, _) => letter.is_ascii_uppercase(),
        (Some(letter), Some(sign), None) => {
            letter.is_ascii_uppercase() && (sign == '+' || sign == '-')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err("must be a letter grade like A, B+ or C-".to_string())
    }
}

fn validate_range(value: &str, min: Decimal, max: Decimal) -> Result<(), String> {
    let parsed: Decimal = value
        .trim()
        .parse()
        .map_err(|_| format!("must be a number between {min} and {max}"))?;

    if parsed >= min && parsed <= max {
        Ok(())
    } else {
        Err(format!("must be between {min} and {max}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::test_support::page_config;
    use rstest::rstest;

    #[rstest]
    #[case::zero("0", true)]
    #[case::top("100", true)]
    #[case::fraction("67.5", true)]
    #[case::over("105", false)]
    #[case::negative("-1", false)]
    #[case::words("ninety", false)]
    fn test_percentage_bounds(#[case] marks: &str, #[case] valid: bool) {
        assert_eq!(validate_mark(MarkingScheme::Percentage, marks).is_ok(), valid);
    }

    #[rstest]
    #[case::zero("0", true)]
    #[case::top("10", true)]
    #[case::just_over("10.1", false)]
    #[case::over("11", false)]
    fn test_number_bounds(#[case] marks: &str, #[case] valid: bool) {
        assert_eq!(validate_mark(MarkingScheme::Number, marks).is_ok(), valid);
    }

    #[rstest]
    #[case::plain("A", true)]
    #[case::plus("B+", true)]
    #[case::minus("C-", true)]
    #[case::lowercase("a", false)]
    #[case::two_letters("AB", false)]
    #[case::double_sign("B++", false)]
    #[case::sign_only("+", false)]
    #[case::empty("", false)]
    fn test_letter_grades(#[case] marks: &str, #[case] valid: bool) {
        assert_eq!(validate_mark(MarkingScheme::Letter, marks).is_ok(), valid);
    }

    #[test]
    fn test_overall_gpa_bounds() {
        assert!(validate_overall_score(OverallScoreSystem::Gpa, "0.0").is_ok());
        assert!(validate_overall_score(OverallScoreSystem::Gpa, "5.0").is_ok());
        assert!(validate_overall_score(OverallScoreSystem::Gpa, "4.33").is_ok());
        assert!(validate_overall_score(OverallScoreSystem::Gpa, "5.1").is_err());
    }

    #[test]
    fn test_overall_average_bounds() {
        assert!(validate_overall_score(OverallScoreSystem::Average, "72").is_ok());
        assert!(validate_overall_score(OverallScoreSystem::Average, "101").is_err());
    }

    #[test]
    fn test_overall_free_text_systems() {
        assert!(validate_overall_score(OverallScoreSystem::Points, "Distinction").is_ok());
        assert!(validate_overall_score(OverallScoreSystem::Other, "Repeat Year").is_ok());
    }

    #[test]
    fn test_wholesale_rejection_lists_all_invalid_fields() {
        let page = page_config(MarkingScheme::Percentage, OverallScoreSystem::Gpa, 3);
        let entries = vec![
            (page.course_unit_ids[0], "105".to_string()),
            (page.course_unit_ids[1], "88".to_string()),
            (page.course_unit_ids[2], "-2".to_string()),
        ];

        let err = validate_save(&page, &entries, Some("9.9")).unwrap_err();
        match err {
            ResultsError::InvalidFields { fields } => {
                assert_eq!(fields.len(), 3);
                assert!(fields.iter().any(|f| f.field == "overall_score"));
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_entries_skip_validation() {
        let page = page_config(MarkingScheme::Percentage, OverallScoreSystem::Average, 1);
        let entries = vec![(page.course_unit_ids[0], String::new())];
        assert!(validate_save(&page, &entries, Some("")).is_ok());
    }

    #[test]
    fn test_unknown_course_unit_is_rejected() {
        let page = page_config(MarkingScheme::Percentage, OverallScoreSystem::Average, 1);
        let stray = CourseUnitId::new();
        let entries = vec![(stray, "70".to_string())];
        let err = validate_save(&page, &entries, None).unwrap_err();
        assert!(matches!(err, ResultsError::InvalidFields { .. }));
    }
}
