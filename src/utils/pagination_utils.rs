use crate::error::ApiError;
use crate::models::pagination_models::Pagination;

/// Validate pagination parameters
pub fn validate_pagination(p: &Pagination) -> Result<(i64, i64), ApiError> {
    let limit = p.limit();
    if limit < 1 {
        return Err(ApiError::BadRequest(
            "Limit must be at least 1".to_string(),
        ));
    }
    if limit > Pagination::MAX_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "Limit too high: maximum allowed is {}",
            Pagination::MAX_LIMIT
        )));
    }
    let offset = p.offset();
    if offset < 0 {
        return Err(ApiError::BadRequest(
            "Offset cannot be negative".to_string(),
        ));
    }
    Ok((limit, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(limit: Option<i64>, offset: Option<i64>) -> Pagination {
        Pagination { limit, offset }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let (limit, offset) = validate_pagination(&page(None, None)).unwrap();
        assert_eq!(limit, Pagination::DEFAULT_LIMIT);
        assert_eq!(offset, 0);
    }

    #[test]
    fn rejects_limit_over_max() {
        assert!(validate_pagination(&page(Some(Pagination::MAX_LIMIT + 1), None)).is_err());
    }

    #[test]
    fn rejects_zero_limit_and_negative_offset() {
        assert!(validate_pagination(&page(Some(0), None)).is_err());
        assert!(validate_pagination(&page(None, Some(-5))).is_err());
    }

    #[test]
    fn accepts_explicit_values() {
        let (limit, offset) = validate_pagination(&page(Some(25), Some(50))).unwrap();
        assert_eq!((limit, offset), (25, 50));
    }
}
