//! Seat label normalization and validation helpers.

use crate::utils::errors::{AppError, AppResult};

/// Maximum label length allowed by the seats schema.
pub const MAX_SEAT_LABEL_LEN: usize = 10;

/// Normalizes a requested seat label list: trims whitespace, uppercases,
/// rejects empty/oversized labels and duplicates. Returns the labels in
/// request order, which is also the order recorded in the seat log.
pub fn normalize_seat_labels(labels: &[String]) -> AppResult<Vec<String>> {
    if labels.is_empty() {
        return Err(AppError::BadRequest("At least one seat must be selected".to_string()));
    }

    let mut normalized = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim().to_uppercase();
        if label.is_empty() {
            return Err(AppError::BadRequest("Seat labels must not be empty".to_string()));
        }
        if label.len() > MAX_SEAT_LABEL_LEN {
            return Err(AppError::BadRequest(format!(
                "Seat label '{}' exceeds {} characters",
                label, MAX_SEAT_LABEL_LEN
            )));
        }
        if normalized.contains(&label) {
            return Err(AppError::BadRequest(format!("Duplicate seat label '{}'", label)));
        }
        normalized.push(label);
    }

    Ok(normalized)
}

/// Joins seat labels for the audit log, preserving request order.
pub fn join_seat_labels(labels: &[String]) -> String {
    labels.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_uppercases() {
        let labels = vec![" a1 ".to_string(), "b2".to_string()];
        let normalized = normalize_seat_labels(&labels).unwrap();
        assert_eq!(normalized, vec!["A1".to_string(), "B2".to_string()]);
    }

    #[test]
    fn test_normalize_rejects_empty_list() {
        let err = normalize_seat_labels(&[]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_normalize_rejects_blank_label() {
        let labels = vec!["A1".to_string(), "   ".to_string()];
        assert!(normalize_seat_labels(&labels).is_err());
    }

    #[test]
    fn test_normalize_rejects_duplicates() {
        // "a1" and "A1" collide after normalization
        let labels = vec!["a1".to_string(), "A1".to_string()];
        assert!(normalize_seat_labels(&labels).is_err());
    }

    #[test]
    fn test_normalize_rejects_oversized_label() {
        let labels = vec!["ABCDEFGHIJK".to_string()];
        assert!(normalize_seat_labels(&labels).is_err());
    }

    #[test]
    fn test_join_preserves_order() {
        let labels = vec!["A1".to_string(), "A2".to_string(), "B1".to_string()];
        assert_eq!(join_seat_labels(&labels), "A1,A2,B1");
    }
}
