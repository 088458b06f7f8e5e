use super::*;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(AppError::NotFound("test".into()).status_code(), 404);
    assert_eq!(AppError::validation("test").status_code(), 400);
    assert_eq!(AppError::BusinessRule("test".into()).status_code(), 422);
    assert_eq!(AppError::Conflict("test".into()).status_code(), 409);
    assert_eq!(AppError::StorageFailure("test".into()).status_code(), 500);
    assert_eq!(AppError::Internal("test".into()).status_code(), 500);
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::field("code", "test").error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(
        AppError::BusinessRule("test".into()).error_code(),
        "BUSINESS_RULE_VIOLATION"
    );
    assert_eq!(AppError::Conflict("test".into()).error_code(), "CONFLICT");
    assert_eq!(
        AppError::StorageFailure("test".into()).error_code(),
        "STORAGE_FAILURE"
    );
    assert_eq!(
        AppError::Internal("test".into()).error_code(),
        "INTERNAL_ERROR"
    );
}

#[test]
fn test_app_error_field_name() {
    assert_eq!(AppError::field("lines.1.debit", "bad").field_name(), Some("lines.1.debit"));
    assert_eq!(AppError::validation("bad").field_name(), None);
    assert_eq!(AppError::Conflict("dup".into()).field_name(), None);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::NotFound("msg".into())),
        "Not found: msg"
    );
    assert_eq!(
        format!("{}", AppError::field("code", "msg")),
        "Validation error: msg"
    );
    assert_eq!(
        format!("{}", AppError::BusinessRule("msg".into())),
        "Business rule violation: msg"
    );
    assert_eq!(
        format!("{}", AppError::Conflict("msg".into())),
        "Conflict: msg"
    );
    assert_eq!(
        format!("{}", AppError::StorageFailure("msg".into())),
        "Storage failure: msg"
    );
    assert_eq!(
        format!("{}", AppError::Internal("msg".into())),
        "Internal error: msg"
    );
}
