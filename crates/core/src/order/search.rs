use serde::{Deserialize, Serialize};

use super::types::OrderStatus;

/// Upper bound on rows returned by a search.
pub const MAX_SEARCH_RESULTS: usize = 1000;

/// Filter for root order lookups. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSearch {
    /// Substring of the member name.
    pub member_name: Option<String>,
    pub order_status: Option<OrderStatus>,
}

impl OrderSearch {
    pub fn with_member_name(mut self, member_name: impl Into<String>) -> Self {
        self.member_name = Some(member_name.into());
        self
    }

    pub fn with_status(mut self, order_status: OrderStatus) -> Self {
        self.order_status = Some(order_status);
        self
    }

    /// Member name filter, ignoring blank input.
    pub fn member_name_filter(&self) -> Option<&str> {
        self.member_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Returns true if an order with this member name and status passes the filter.
    pub fn matches(&self, member_name: &str, status: OrderStatus) -> bool {
        let status_ok = self.order_status.is_none_or(|wanted| wanted == status);
        let name_ok = self
            .member_name_filter()
            .is_none_or(|needle| member_name.contains(needle));
        status_ok && name_ok
    }
}
