//! crates/pdf_shala_core/src/cart.rs
//!
//! The cart & pricing engine: line items, quantity management, promo codes,
//! and the conversion of purchased lines into library entries.
//!
//! A cart moves `Empty -> Populated -> (CheckedOut -> Empty)`. All derived
//! amounts (items total, discount, grand total) are computed on demand and
//! never stored.

use chrono::NaiveDate;
use uuid::Uuid;

/// The fixed promo-code table: code -> discount fraction off the items total.
pub const PROMO_CODES: [(&str, f64); 6] = [
    ("OFFER69", 0.69),
    ("BINOD", 1.00),
    ("WELCOME50", 0.50),
    ("SUMMER25", 0.25),
    ("FLASH15", 0.15),
    ("NEWUSER", 0.30),
];

/// One product entry in the cart with a quantity.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: Uuid,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub qty: u32,
}

/// A record of a completed purchase, granting access to the underlying pdf.
#[derive(Debug, Clone)]
pub struct LibraryItem {
    pub product_id: Uuid,
    pub title: String,
    pub image: String,
    pub download_date: NaiveDate,
}

/// The single promo selection currently applied, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    pub code: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Invalid or expired promo code")]
    UnknownPromo,
    #[error("Cannot apply a 100% discount to an empty cart")]
    FreeCheckoutOnEmptyCart,
    #[error("Item not in cart")]
    LineNotFound,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    promo: Option<AppliedPromo>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn promo(&self) -> Option<&AppliedPromo> {
        self.promo.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds a product to the cart. A repeat add of the same product
    /// increments its quantity.
    pub fn add_line(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.qty += line.qty.max(1);
        } else {
            let mut line = line;
            line.qty = line.qty.max(1);
            self.lines.push(line);
        }
    }

    /// Removes the line item unconditionally.
    pub fn remove_line(&mut self, product_id: Uuid) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Applies `delta` to a line's quantity, clamping the result to a
    /// minimum of 1.
    pub fn adjust_qty(&mut self, product_id: Uuid, delta: i32) -> Result<u32, CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CartError::LineNotFound)?;
        let adjusted = line.qty as i64 + delta as i64;
        line.qty = adjusted.clamp(1, u32::MAX as i64) as u32;
        Ok(line.qty)
    }

    /// Normalizes the code (trim + uppercase) and looks it up in the fixed
    /// table. An unknown code leaves the cart unchanged. A 100%-off code is
    /// rejected while the items total is zero, which guards the degenerate
    /// free-checkout case. Applying a new promo replaces the prior one.
    pub fn apply_promo(&mut self, code: &str) -> Result<AppliedPromo, CartError> {
        let normalized = code.trim().to_uppercase();
        let fraction = PROMO_CODES
            .iter()
            .find(|(c, _)| *c == normalized)
            .map(|(_, f)| *f)
            .ok_or(CartError::UnknownPromo)?;

        if fraction >= 1.0 && self.items_total() == 0.0 {
            return Err(CartError::FreeCheckoutOnEmptyCart);
        }

        let applied = AppliedPromo {
            code: normalized,
            fraction,
        };
        self.promo = Some(applied.clone());
        Ok(applied)
    }

    pub fn remove_promo(&mut self) {
        self.promo = None;
    }

    pub fn items_total(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.price * f64::from(l.qty))
            .sum()
    }

    pub fn discount(&self) -> f64 {
        match &self.promo {
            Some(promo) => self.items_total() * promo.fraction,
            None => 0.0,
        }
    }

    pub fn grand_total(&self) -> f64 {
        (self.items_total() - self.discount()).max(0.0)
    }

    /// Converts every current line into a library item stamped with `date`
    /// and resets the cart to empty.
    pub fn complete_purchase(&mut self, date: NaiveDate) -> Vec<LibraryItem> {
        self.promo = None;
        self.lines
            .drain(..)
            .map(|l| LibraryItem {
                product_id: l.product_id,
                title: l.title,
                image: l.image,
                download_date: date,
            })
            .collect()
    }
}
