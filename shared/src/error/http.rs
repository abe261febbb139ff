//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::WhiskeyNotFound => StatusCode::NOT_FOUND,

            Self::InternalError | Self::DatabaseError | Self::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation, enumeration, paging, upload errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::WhiskeyNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_bad_request_status() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::RequiredField,
            ErrorCode::InvalidCategory,
            ErrorCode::InvalidSubCategory,
            ErrorCode::InvalidSort,
            ErrorCode::InvalidRequest,
            ErrorCode::ImageEmpty,
            ErrorCode::NoImageProvided,
        ] {
            assert_eq!(code.http_status(), StatusCode::BAD_REQUEST, "{code:?}");
        }
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::StorageError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
