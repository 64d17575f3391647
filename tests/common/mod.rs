//! Shared fixtures: a storefront pricing pipeline.
//!
//! The cart seed feeds a gross-price builder, the gross price feeds a
//! discount builder, and both feed the final response. Prices are in
//! cents; the response converts to the major unit.
#![allow(dead_code)]

use typeweave::builders::{BuilderCtx, BuilderError};
use typeweave::graphs::GraphBuilder;

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    pub price_in_cents: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppRequest {
    pub cart: Vec<Item>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GrossPrice {
    pub in_cents: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceAdjustment {
    pub discount_in_cents: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppResponse {
    pub price_in_dollars: f64,
}

pub fn cart(prices_in_cents: &[i64]) -> AppRequest {
    AppRequest {
        cart: prices_in_cents
            .iter()
            .enumerate()
            .map(|(i, price)| Item {
                name: format!("item{}", i + 1),
                price_in_cents: *price,
            })
            .collect(),
    }
}

pub async fn build_gross_price(
    _: BuilderCtx,
    req: AppRequest,
) -> Result<GrossPrice, BuilderError> {
    if req.cart.is_empty() {
        return Err(BuilderError::ValidationFailed("cart is empty".into()));
    }
    Ok(GrossPrice {
        in_cents: req.cart.iter().map(|item| item.price_in_cents).sum(),
    })
}

pub async fn build_price_adjustment(
    _: BuilderCtx,
    gross: GrossPrice,
) -> Result<PriceAdjustment, BuilderError> {
    let discount = if gross.in_cents > 10_000 { 1_000 } else { 0 };
    Ok(PriceAdjustment {
        discount_in_cents: discount,
    })
}

pub async fn build_app_response(
    _: BuilderCtx,
    gross: GrossPrice,
    adjustment: PriceAdjustment,
) -> Result<AppResponse, BuilderError> {
    Ok(AppResponse {
        price_in_dollars: (gross.in_cents - adjustment.discount_in_cents) as f64 / 100.0,
    })
}

/// The full pricing registry, ready to compile against `(AppRequest,)`.
pub fn pricing_graph() -> GraphBuilder {
    GraphBuilder::new()
        .add_builder(build_gross_price)
        .add_builder(build_price_adjustment)
        .add_builder(build_app_response)
}
