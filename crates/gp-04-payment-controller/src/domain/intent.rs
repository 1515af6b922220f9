//! What the UI asks the controller to buy.

use gp_01_error_taxonomy::{classify, ClassifiedError, RawFailure};
use gp_02_purchase_ledger::{PurchaseRecord, PurchaseStatus};
use gp_03_payment_engine::{PaymentRequest, ProductInfo, TransactionOutcome};
use serde::{Deserialize, Serialize};
use shared_types::ChainAddress;

/// A product purchase paid to the configured merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseIntent {
    pub product_id: String,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Price in native units.
    #[serde(rename = "price")]
    pub price_native: f64,
}

impl PurchaseIntent {
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>, price_native: f64) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            brand: None,
            price_native,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Reject intents that do not identify a product. The price is checked
    /// by the engine.
    pub fn check(&self) -> Result<(), ClassifiedError> {
        if self.product_id.trim().is_empty() || self.product_name.trim().is_empty() {
            return Err(classify(&RawFailure::coded("INVALID_PRODUCT", "Invalid product")));
        }
        Ok(())
    }

    pub fn product_info(&self) -> ProductInfo {
        ProductInfo {
            id: self.product_id.clone(),
            name: self.product_name.clone(),
            brand: self.brand.clone(),
        }
    }

    pub fn to_request(&self) -> PaymentRequest {
        PaymentRequest::to_merchant(self.price_native).with_memo(self.product_info())
    }

    /// Ledger record for a settled payment of this intent.
    pub fn to_record(
        &self,
        outcome: &TransactionOutcome,
        wallet: Option<&ChainAddress>,
    ) -> PurchaseRecord {
        let status = if outcome.confirmed {
            PurchaseStatus::Confirmed
        } else {
            PurchaseStatus::Pending
        };
        let record = PurchaseRecord::new_for_product(
            self.product_id.clone(),
            self.product_name.clone(),
            self.price_native,
            outcome.signature.as_str(),
            outcome.explorer_url.clone(),
        )
        .with_status(status);

        match wallet {
            Some(address) => record.with_wallet_address(address.to_string()),
            None => record,
        }
    }
}
