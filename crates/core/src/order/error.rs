use thiserror::Error;

/// Errors raised while interpreting stored order data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),
    #[error("Unknown delivery status: {0}")]
    UnknownDeliveryStatus(String),
    #[error("Not enough stock for item {item_id}: requested {requested}, available {available}")]
    NotEnoughStock {
        item_id: i64,
        requested: i64,
        available: i64,
    },
    #[error("Order count must be positive, got {0}")]
    InvalidCount(i64),
    #[error("{entity_type} {id} is not part of the dataset")]
    UnknownReference { entity_type: &'static str, id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_display() {
        assert_eq!(
            OrderError::UnknownOrderStatus("X".to_string()).to_string(),
            "Unknown order status: X"
        );
        assert_eq!(
            OrderError::UnknownDeliveryStatus("Y".to_string()).to_string(),
            "Unknown delivery status: Y"
        );
    }
}
