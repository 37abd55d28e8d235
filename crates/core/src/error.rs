use validator::{ValidationErrors, ValidationErrorsKind};

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for CoreError {
    /// Flatten field errors into `path: code` pairs, sorted for stable output.
    ///
    /// Nested structs and lists contribute dotted and indexed paths, e.g.
    /// `images[0].url: required`.
    fn from(errors: ValidationErrors) -> Self {
        let mut parts = Vec::new();
        collect_errors(&errors, "", &mut parts);
        parts.sort();
        CoreError::Validation(parts.join(", "))
    }
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = format!("{prefix}{}", to_camel_case(field));
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| format!("{path}: {}", e.code)));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_errors(inner, &format!("{path}."), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(inner, &format!("{path}[{index}]."), out);
                }
            }
        }
    }
}

/// `sign_start_time` -> `signStartTime`, matching the wire names of DTO fields.
fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(max = 3))]
        nick_name: Option<String>,
        #[validate(required)]
        open_id: Option<String>,
    }

    #[test]
    fn validation_errors_use_wire_field_names() {
        let probe = Probe {
            nick_name: Some("toolong".into()),
            open_id: None,
        };
        let err: CoreError = probe.validate().unwrap_err().into();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert_eq!(msg, "nickName: length, openId: required");
        });
    }

    #[derive(Validate)]
    struct Photo {
        #[validate(required)]
        image_url: Option<String>,
    }

    #[derive(Validate)]
    struct Album {
        #[validate(length(max = 3))]
        title: Option<String>,
        #[validate(nested)]
        photos: Vec<Photo>,
    }

    #[test]
    fn nested_list_errors_carry_indexed_paths() {
        let album = Album {
            title: Some("long title".into()),
            photos: vec![
                Photo {
                    image_url: Some("ok".into()),
                },
                Photo { image_url: None },
            ],
        };
        let err: CoreError = album.validate().unwrap_err().into();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert_eq!(msg, "photos[1].imageUrl: required, title: length");
        });
    }

    #[test]
    fn camel_case_leaves_single_words_alone() {
        assert_eq!(to_camel_case("title"), "title");
        assert_eq!(to_camel_case("activity_end_time"), "activityEndTime");
    }
}
