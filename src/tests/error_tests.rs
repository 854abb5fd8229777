#[cfg(test)]
mod tests {
    use crate::error::{validation, AppError, AppResult, OptionExt};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::io;

    async fn body_json(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let error = AppError::BadRequest("library is required".to_string());
        assert_eq!(format!("{}", error), "Bad request: library is required");

        let error = AppError::NotFound("Document not found".to_string());
        assert_eq!(format!("{}", error), "Not found: Document not found");

        let error = AppError::InvalidOperation("Document cannot be its own parent".to_string());
        assert_eq!(format!("{}", error), "Invalid operation: Document cannot be its own parent");

        let error = AppError::ValidationError { field: "library".to_string(), message: "bad".to_string() };
        assert_eq!(format!("{}", error), "Validation error on field 'library': bad");
    }

    #[test]
    fn test_app_error_status_codes() {
        let cases = vec![
            (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
            (AppError::InvalidInput("x".to_string()), StatusCode::BAD_REQUEST),
            (AppError::InvalidOperation("x".to_string()), StatusCode::BAD_REQUEST),
            (
                AppError::ValidationError { field: "f".to_string(), message: "m".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".to_string()), StatusCode::CONFLICT),
            (AppError::Database("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::IoError("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) = body_json(AppError::Conflict("Library already exists".to_string())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
        assert_eq!(body["error"]["message"], "Library already exists");
        assert_eq!(body["status"], 409);
        assert!(body["timestamp"].is_string());
        assert!(body["error"].get("details").is_none());

        let (_, body) =
            body_json(AppError::ValidationError { field: "filename".to_string(), message: "bad".to_string() }).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"]["field"], "filename");

        // Internal details stay in the log; the client gets an error id
        let (_, body) = body_json(AppError::Internal(anyhow::anyhow!("secret path /srv/x"))).await;
        assert_eq!(body["error"]["message"], "An internal server error occurred");
        assert!(body["error"]["details"]["error_id"].is_string());
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::IoError(ref msg) if msg.contains("denied")));
    }

    #[test]
    fn test_from_sqlx_error() {
        let app_error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(app_error, AppError::NotFound(_)));

        let app_error: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(app_error, AppError::Database(_)));
    }

    #[test]
    fn test_option_ext() {
        let some: Option<i32> = Some(42);
        assert_eq!(some.ok_or_not_found("Document").unwrap(), 42);

        let none: Option<i32> = None;
        let result: AppResult<i32> = none.ok_or_not_found("Document");
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Document not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_require_field() {
        assert_eq!(validation::require_field(Some("  mybook "), "library").unwrap(), "mybook");
        assert!(matches!(validation::require_field(Some("   "), "library"), Err(AppError::BadRequest(_))));
        match validation::require_field(None, "id") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "id is required"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_path_segment() {
        assert!(validation::validate_path_segment("mybook", "library").is_ok());
        assert!(validation::validate_path_segment("photo_1.png", "filename").is_ok());
        assert!(validation::validate_path_segment("..hidden", "filename").is_ok());

        for bad in ["", ".", "..", "a/b", "a\\b", "nul\0byte"] {
            let res = validation::validate_path_segment(bad, "library");
            assert!(matches!(res, Err(AppError::ValidationError { .. })), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_validate_positive_id() {
        assert_eq!(validation::validate_positive_id(1, "id").unwrap(), 1);
        assert!(matches!(validation::validate_positive_id(0, "id"), Err(AppError::InvalidInput(_))));
        assert!(matches!(validation::validate_positive_id(-7, "id"), Err(AppError::InvalidInput(_))));
    }
}
