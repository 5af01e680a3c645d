//! Input validation helpers
//!
//! Field-level rules live on the request types as `validator` derives; this
//! module holds the custom rules they reference and the helpers that turn a
//! `ValidationErrors` tree into a single client-facing message.

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Reject text containing NUL, which Postgres cannot store
pub fn no_nul_chars(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut err = ValidationError::new("nul_character");
        err.message = Some("Text cannot contain NUL characters".into());
        return Err(err);
    }
    Ok(())
}

/// The first failing field of a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path to the field, e.g. `ejercicios[1].series`
    pub field: String,
    pub message: String,
}

/// Pick a deterministic first violation out of a (possibly nested) error tree
pub fn first_violation(errors: &ValidationErrors) -> Option<FieldViolation> {
    first_violation_at(errors, None)
}

fn first_violation_at(errors: &ValidationErrors, prefix: Option<&str>) -> Option<FieldViolation> {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));

    for (name, kind) in entries {
        let name = name.to_string();
        let path = match prefix {
            Some(prefix) if name == "__all__" => prefix.to_string(),
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name,
        };

        let found = match kind {
            ValidationErrorsKind::Field(list) => list.first().map(|err| FieldViolation {
                field: path.clone(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", path)),
            }),
            ValidationErrorsKind::Struct(inner) => first_violation_at(inner, Some(&path)),
            ValidationErrorsKind::List(items) => items.iter().find_map(|(index, inner)| {
                first_violation_at(inner, Some(&format!("{}[{}]", path, index)))
            }),
        };

        if found.is_some() {
            return found;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreateRoutineRequest, ExerciseInput, UpdateRoutineRequest};
    use crate::DayOfWeek;
    use rstest::rstest;
    use validator::Validate;

    fn exercise(sets: i32) -> ExerciseInput {
        ExerciseInput {
            name: "Press banca".to_string(),
            day_of_week: DayOfWeek::Tuesday,
            sets,
            reps: 8,
            weight: Some(60.0),
            notes: None,
            order: 1,
        }
    }

    #[rstest]
    #[case("Press banca")]
    #[case("")]
    #[case("ñandú")]
    fn test_text_without_nul_accepted(#[case] value: &str) {
        assert!(no_nul_chars(value).is_ok());
    }

    #[rstest]
    #[case("\0")]
    #[case("x\0y")]
    #[case("trailing\0")]
    fn test_text_with_nul_rejected(#[case] value: &str) {
        let err = no_nul_chars(value).unwrap_err();
        assert_eq!(err.code, "nul_character");
    }

    #[test]
    fn test_update_description_counts_characters_not_bytes() {
        let req = UpdateRoutineRequest {
            description: Some(Some("ñ".repeat(500))),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_description_violation_names_field() {
        let req = UpdateRoutineRequest {
            description: Some(Some("d".repeat(501))),
            ..Default::default()
        };
        let violation = first_violation(&req.validate().unwrap_err()).unwrap();
        assert_eq!(violation.field, "descripcion");
    }

    #[test]
    fn test_first_violation_reports_nested_path() {
        let req = CreateRoutineRequest {
            name: "Torso".to_string(),
            description: None,
            exercises: vec![exercise(3), exercise(25)],
        };
        let errors = req.validate().unwrap_err();
        let violation = first_violation(&errors).unwrap();

        assert!(violation.field.contains("[1]"), "got {}", violation.field);
        assert_eq!(violation.message, "Sets must be between 1 and 20");
    }

    #[test]
    fn test_first_violation_top_level_field() {
        let req = CreateRoutineRequest {
            name: String::new(),
            description: None,
            exercises: vec![],
        };
        let errors = req.validate().unwrap_err();
        let violation = first_violation(&errors).unwrap();
        assert_eq!(
            violation.message,
            "Routine name must be between 1 and 120 characters"
        );
    }
}
