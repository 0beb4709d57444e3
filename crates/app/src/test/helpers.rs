//! Test Helpers

use crate::domain::orders::data::ShippingInfo;

pub(crate) fn shipping() -> ShippingInfo {
    ShippingInfo::new("Ann Baker", "1 Mill Lane, Flourton", "01234 567890")
}
