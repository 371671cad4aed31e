use anyhow::Result;
use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, StatusCode};
use tracing::{error, info, warn};

use promo_shared::promo::{PromoClaims, now_ms};
use promo_shared::types::{MintRequest, MintRequestError, MintResponse};

use crate::AppState;
use crate::database;
use crate::handlers::http::utils::{
    HttpResponse, deliver_error_json, deliver_serialized_json, read_json, status_from_u16,
};

/// `POST /api/promo/mint`
///
/// Mints a promo token for a product once the referenced order is found,
/// paid and still inside the mint window.
pub async fn handle_mint<B>(req: Request<B>, state: AppState) -> Result<HttpResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    info!("Processing promo mint request");

    let request: MintRequest = match read_json(req).await {
        Ok(request) => request,
        Err(e) => {
            warn!("Mint request body rejected: {:#}", e);
            return deliver_mint_error(&MintRequestError::InvalidBody);
        }
    };

    match mint_for_order(&request, &state, now_ms()).await {
        Ok(response) => {
            state.metrics.record_minted();
            deliver_serialized_json(&response, StatusCode::OK)
        }
        Err(err) => {
            warn!("Promo mint refused: {}", err.to_code());
            deliver_mint_error(&err)
        }
    }
}

/// Gate on the order, then mint `{pid, pct, exp = now + ttl, oid, iat = now}`.
pub async fn mint_for_order(
    request: &MintRequest,
    state: &AppState,
    now: i64,
) -> Result<MintResponse, MintRequestError> {
    let payment_intent_id = request.payment_intent_id()?;
    let product_id = request.product_id()?;

    let order = database::find_order_by_payment_intent(&state.db, payment_intent_id)
        .await
        .map_err(|e| {
            error!("Order lookup failed for {}: {}", payment_intent_id, e);
            MintRequestError::DatabaseError
        })?
        .ok_or(MintRequestError::OrderNotFound)?;

    if !order.is_paid() {
        return Err(MintRequestError::OrderNotPaid);
    }

    let promo = &state.config.promo;
    if order.age_ms(now) > promo.mint_window_ms() {
        return Err(MintRequestError::PromoWindowExpired);
    }

    let percent = request
        .pct
        .unwrap_or(promo.default_percent)
        .clamp(0.0, 100.0);
    let exp = now + promo.token_ttl_ms();

    let claims = PromoClaims::new(product_id, percent, exp, now).with_order_id(order.id.as_str());

    let token = state.codec.mint(&claims).map_err(|e| {
        error!("Failed to mint promo token: {}", e);
        MintRequestError::InternalError
    })?;

    info!("Minted promo token: {}", claims);

    Ok(MintResponse { token, exp })
}

fn deliver_mint_error(err: &MintRequestError) -> Result<HttpResponse> {
    deliver_error_json(&err.to_response(), status_from_u16(err.status()))
}
