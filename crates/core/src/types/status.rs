//! Status enums for submitted orders.

use serde::{Deserialize, Serialize};

/// Order financial status set at submission time.
///
/// Shopify's full enum has more states (authorized, partially paid,
/// refunded, ...) but an intake order is only ever created as already-paid
/// or awaiting payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Paid,
}

impl FinancialStatus {
    /// The REST Admin API string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}
