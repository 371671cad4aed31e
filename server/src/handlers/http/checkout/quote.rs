use anyhow::Result;
use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, StatusCode};
use tracing::{error, info, warn};

use promo_shared::promo::{PromoClaims, now_ms};
use promo_shared::types::{QuoteError, QuoteItem, QuoteRequest, QuoteResponse, QuotedItem};

use crate::AppState;
use crate::database;
use crate::handlers::http::promo::record_rejection;
use crate::handlers::http::utils::{
    HttpResponse, deliver_error_json, deliver_serialized_json, read_json, status_from_u16,
};
use crate::pricing::price_item;

/// `POST /api/checkout/quote`
///
/// Prices a cart from the database. Client-supplied prices are never
/// trusted; only the product ids, quantities and promo tokens are read.
pub async fn handle_quote<B>(req: Request<B>, state: AppState) -> Result<HttpResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let request: QuoteRequest = match read_json(req).await {
        Ok(request) => request,
        Err(e) => {
            warn!("Quote request body rejected: {:#}", e);
            return deliver_quote_error(&QuoteError::InvalidBody);
        }
    };

    match quote_cart(&request, &state, now_ms()).await {
        Ok(quote) => {
            info!(
                "Quoted {} line(s), subtotal {} cents",
                quote.items.len(),
                quote.subtotal_cents
            );
            deliver_serialized_json(&quote, StatusCode::OK)
        }
        Err(err) => {
            warn!("Quote refused: {}", err.to_message());
            deliver_quote_error(&err)
        }
    }
}

pub async fn quote_cart(
    request: &QuoteRequest,
    state: &AppState,
    now: i64,
) -> Result<QuoteResponse, QuoteError> {
    if request.items.is_empty() {
        return Err(QuoteError::EmptyCart);
    }

    let ids: Vec<String> = request.items.iter().map(|i| i.id.clone()).collect();
    let products = database::find_products(&state.db, &ids)
        .await
        .map_err(|e| {
            error!("Product lookup failed: {}", e);
            QuoteError::DatabaseError
        })?;

    let mut quoted = Vec::with_capacity(request.items.len());
    for item in &request.items {
        let product = products
            .get(&item.id)
            .ok_or_else(|| QuoteError::ProductNotFound(item.id.clone()))?;

        let claims = item_promo(state, item, now);
        let (unit_price_cents, promo_applied) = price_item(product, claims.as_ref());

        quoted.push(QuotedItem {
            id: item.id.clone(),
            quantity: item.quantity,
            unit_price_cents,
            promo_applied,
        });
    }

    Ok(QuoteResponse::from_items(quoted))
}

/// Authenticated claims for the item's promo token, if it carries one.
/// Invalid tokens are counted and dropped; the item is then priced without
/// a promo.
fn item_promo(state: &AppState, item: &QuoteItem, now: i64) -> Option<PromoClaims> {
    let token = item.promo_token.as_deref().filter(|t| !t.is_empty())?;

    match state.codec.authenticate_at(token, now) {
        Ok(claims) => {
            if !claims.applies_to(&item.id) {
                state.metrics.record_product_mismatch();
            }
            Some(claims)
        }
        Err(err) => {
            record_rejection(state, err, "checkout");
            None
        }
    }
}

fn deliver_quote_error(err: &QuoteError) -> Result<HttpResponse> {
    deliver_error_json(&err.to_response(), status_from_u16(err.status()))
}
