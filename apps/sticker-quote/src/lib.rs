//! # sticker-quote: Request Boundary
//!
//! JSON in, JSON out. Transport agnostic: the binary reads a request from a
//! file or stdin, but [`QuoteHandler`] can sit behind any server.
//!
//! ```rust
//! use sticker_config::PricingSettings;
//! use sticker_core::{Money, StickerConfig};
//! use sticker_quote::QuoteHandler;
//!
//! let mut settings = PricingSettings::default();
//! settings.products.push(StickerConfig::new("STICKER-DIECUT", Money::from_cents(100)));
//! let (_store, handler) = QuoteHandler::from_settings(&settings).unwrap();
//!
//! let response = handler
//!     .handle_json(r#"{"variantId":"STICKER-DIECUT","quantity":20}"#)
//!     .unwrap_err();
//! assert_eq!(response.message, "Minimum order quantity is 500, requested 20");
//! ```

pub mod error;
pub mod handler;
pub mod request;

pub use error::{ApiError, ErrorCode};
pub use handler::{QuoteHandler, QuoteResponse};
pub use request::QuoteRequest;
