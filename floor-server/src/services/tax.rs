//! Tax computation service
//!
//! Table orders defer tax to consolidation; pickup orders and the
//! closure path compute it here. The deferred mode must be validated
//! before an order is allowed to postpone tax.

use crate::orders::money::{to_decimal, to_f64};
use crate::orders::traits::OrderError;
use rust_decimal::Decimal;
use shared::order::types::CommandErrorCode;

pub trait TaxService: Send + Sync {
    /// Whether tax is realized at all; when false, total = subtotal
    fn is_enabled(&self) -> bool;

    /// Tax amount for a pre-tax subtotal (0 when disabled)
    fn compute(&self, subtotal: f64) -> f64;

    /// Confirm that deferring tax to consolidation is permitted
    fn validate_deferral(&self) -> Result<(), OrderError>;
}

/// Flat-rate tax service
pub struct RateTaxService {
    rate_percent: Decimal,
    enabled: bool,
    /// Tax-isolation mode: deferred child orders carry tax = 0 until
    /// consolidation realizes it once per visit
    allow_deferral: bool,
}

impl RateTaxService {
    pub fn new(rate_percent: f64, enabled: bool) -> Self {
        Self {
            rate_percent: to_decimal(rate_percent),
            enabled,
            allow_deferral: true,
        }
    }

    pub fn without_deferral(mut self) -> Self {
        self.allow_deferral = false;
        self
    }
}

impl TaxService for RateTaxService {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn compute(&self, subtotal: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        to_f64(to_decimal(subtotal) * self.rate_percent / Decimal::ONE_HUNDRED)
    }

    fn validate_deferral(&self) -> Result<(), OrderError> {
        if self.enabled && !self.allow_deferral {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                "tax service does not permit deferred (tax-isolation) mode".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_rounds_to_cents() {
        let tax = RateTaxService::new(10.0, true);
        assert_eq!(tax.compute(23.0), 2.3);
        // 21% of 9.99 = 2.0979 -> 2.10
        let iva = RateTaxService::new(21.0, true);
        assert_eq!(iva.compute(9.99), 2.1);
    }

    #[test]
    fn test_disabled_tax_is_zero() {
        let tax = RateTaxService::new(10.0, false);
        assert!(!tax.is_enabled());
        assert_eq!(tax.compute(100.0), 0.0);
    }

    #[test]
    fn test_deferral_validation() {
        assert!(RateTaxService::new(10.0, true).validate_deferral().is_ok());
        assert!(
            RateTaxService::new(10.0, true)
                .without_deferral()
                .validate_deferral()
                .is_err()
        );
        // Disabled tax has nothing to defer
        assert!(
            RateTaxService::new(10.0, false)
                .without_deferral()
                .validate_deferral()
                .is_ok()
        );
    }
}
