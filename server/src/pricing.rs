//! Server-side cart pricing.
//!
//! Prices are integer cents. Percentages are clamped to `[0, 100]` before
//! use, and each reduction rounds half away from zero.

use promo_shared::promo::PromoClaims;

use crate::database::Product;

/// `price_cents` reduced by `pct` percent.
pub fn apply_percent(price_cents: i64, pct: f64) -> i64 {
    let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
    (price_cents as f64 * (1.0 - pct / 100.0)).round() as i64
}

/// Unit price for `product`: product-level discount first, then the promo
/// when it was issued for this product. Returns the price and whether a
/// promo was applied.
pub fn price_item(product: &Product, promo: Option<&PromoClaims>) -> (i64, bool) {
    let mut price = product.price_cents;

    if let Some(discount) = product.discount.filter(|d| *d > 0.0) {
        price = apply_percent(price, discount);
    }

    match promo {
        Some(claims) if claims.applies_to(&product.id) => {
            (apply_percent(price, claims.clamped_percent()), true)
        }
        _ => (price, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(discount: Option<f64>) -> Product {
        Product {
            id: "P1".into(),
            name: "Program".into(),
            price_cents: 4_999,
            discount,
        }
    }

    #[test]
    fn ten_percent_rounds_to_nearest_cent() {
        // 4999 * 0.9 = 4499.1
        assert_eq!(apply_percent(4_999, 10.0), 4_499);
        // 15 * 0.9 = 13.5
        assert_eq!(apply_percent(15, 10.0), 14);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(apply_percent(1_000, 150.0), 0);
        assert_eq!(apply_percent(1_000, -20.0), 1_000);
        assert_eq!(apply_percent(1_000, f64::NAN), 1_000);
    }

    #[test]
    fn no_discount_no_promo_is_list_price() {
        assert_eq!(price_item(&product(None), None), (4_999, false));
    }

    #[test]
    fn product_discount_applies_before_promo() {
        let claims = PromoClaims::new("P1", 10.0, i64::MAX, 0);
        // 4999 * 0.8 = 3999.2 -> 3999; 3999 * 0.9 = 3599.1 -> 3599
        assert_eq!(
            price_item(&product(Some(20.0)), Some(&claims)),
            (3_599, true)
        );
    }

    #[test]
    fn promo_for_another_product_is_ignored() {
        let claims = PromoClaims::new("P2", 50.0, i64::MAX, 0);
        assert_eq!(price_item(&product(None), Some(&claims)), (4_999, false));
    }

    #[test]
    fn oversized_promo_percent_is_clamped() {
        let claims = PromoClaims::new("P1", 250.0, i64::MAX, 0);
        assert_eq!(price_item(&product(None), Some(&claims)), (0, true));
    }
}
