//! # Quote Handler
//!
//! Runs a parsed request against the engine.
//!
//! ## Request Lifecycle
//! ```text
//! JSON body
//!    │  QuoteRequest::from_json     (INVALID_REQUEST / INVALID_QUANTITY / INVALID_SHAPE)
//!    ▼
//! QuoteRequest
//!    │  classify                    (NOT_A_STICKER)
//!    ▼
//! PricingEngine                     (MOQ_NOT_MET / UNKNOWN_VARIANT / CONFIGURATION_ERROR)
//!    │
//!    ▼
//! QuoteResponse  → { "pricing" | "cartPricing" | "shapePricing": ... }
//! ```

use serde::Serialize;
use sticker_config::{build_engine, CatalogClassifier, CatalogStore, ConfigResult, PricingSettings};
use sticker_core::{
    CartPricingResult, ConfigProvider, PricingEngine, PricingResult, ShapePricingResult,
    VariantClassifier,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::ApiError;
use crate::request::QuoteRequest;

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum QuoteResponse {
    Pricing(PricingResult),
    CartPricing(CartPricingResult),
    ShapePricing(ShapePricingResult),
}

/// Stateless request handler; safe to share across threads.
pub struct QuoteHandler<P, C> {
    engine: PricingEngine<P, C>,
}

impl QuoteHandler<Arc<CatalogStore>, CatalogClassifier> {
    /// Builds a handler over the catalog described by `settings`.
    pub fn from_settings(settings: &PricingSettings) -> ConfigResult<(Arc<CatalogStore>, Self)> {
        let (store, engine) = build_engine(settings)?;
        Ok((store, QuoteHandler::new(engine)))
    }
}

impl<P, C> QuoteHandler<P, C>
where
    P: ConfigProvider,
    C: VariantClassifier,
{
    pub fn new(engine: PricingEngine<P, C>) -> Self {
        QuoteHandler { engine }
    }

    pub fn engine(&self) -> &PricingEngine<P, C> {
        &self.engine
    }

    /// Parses and handles a JSON body.
    pub fn handle_json(&self, body: &str) -> Result<QuoteResponse, ApiError> {
        let request = QuoteRequest::from_json(body).map_err(|e| {
            warn!(code = ?e.code, "Rejected quote request: {}", e.message);
            e
        })?;
        self.handle(request)
    }

    /// Handles a parsed request.
    pub fn handle(&self, request: QuoteRequest) -> Result<QuoteResponse, ApiError> {
        let kind = request.kind();
        debug!(kind, "Handling quote request");

        let result = self.dispatch(request);
        match &result {
            Ok(_) => info!(kind, "Quote served"),
            Err(e) => warn!(kind, code = ?e.code, "Quote failed: {}", e.message),
        }
        result
    }

    fn dispatch(&self, request: QuoteRequest) -> Result<QuoteResponse, ApiError> {
        match request {
            QuoteRequest::Variant {
                variant_id,
                quantity,
            } => {
                self.ensure_sticker(&variant_id)?;
                let pricing = self.engine.quote_variant(&variant_id, quantity)?;
                Ok(QuoteResponse::Pricing(pricing))
            }
            QuoteRequest::Cart { lines } => {
                let pricing = self.engine.calculate_cart_pricing(&lines)?;
                Ok(QuoteResponse::CartPricing(pricing))
            }
            QuoteRequest::Shape {
                variant_id,
                quantity,
                shape,
            } => {
                if let Some(id) = &variant_id {
                    self.ensure_sticker(id)?;
                }
                let pricing = self
                    .engine
                    .quote_shape(variant_id.as_deref(), quantity, &shape)?;
                Ok(QuoteResponse::ShapePricing(pricing))
            }
        }
    }

    fn ensure_sticker(&self, variant_id: &str) -> Result<(), ApiError> {
        if self.engine.is_sticker_variant(variant_id) {
            Ok(())
        } else {
            Err(ApiError::not_a_sticker(variant_id))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
