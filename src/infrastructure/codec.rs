//! Serialized form of the persisted cart, shared by every cart repository.

use crate::domain::cart::Cart;
use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};

/// Name of the single record the cart is stored under.
pub const CART_RECORD_NAME: &str = "cart-storage";
pub const CART_RECORD_VERSION: u32 = 1;

#[derive(Serialize)]
struct CartRecordRef<'a> {
    name: &'a str,
    version: u32,
    state: &'a Cart,
}

#[derive(Deserialize)]
struct CartRecord {
    version: u32,
    state: Cart,
}

pub fn encode_cart(cart: &Cart) -> Result<Vec<u8>> {
    let record = CartRecordRef {
        name: CART_RECORD_NAME,
        version: CART_RECORD_VERSION,
        state: cart,
    };
    Ok(serde_json::to_vec(&record)?)
}

/// Decodes a stored record, dropping empty lines and merging duplicates.
pub fn decode_cart(bytes: &[u8]) -> Result<Cart> {
    let record: CartRecord = serde_json::from_slice(bytes)?;
    if record.version != CART_RECORD_VERSION {
        return Err(StoreError::Storage(format!(
            "Unsupported cart record version {}",
            record.version
        )));
    }
    Ok(Cart::from_lines(record.state.lines().iter().cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::Amount;
    use crate::domain::product::fixtures::product;
    use primitive_types::U256;

    #[test]
    fn test_round_trip_preserves_exact_prices() {
        let mut expensive = product(2, 0, 0);
        expensive.price_native = Amount::new(U256::MAX);
        expensive.price_credit = "50000000000000000000".parse().unwrap();

        let mut cart = Cart::default();
        cart.add(&product(1, 100, 50));
        cart.add(&expensive);
        cart.update(2, 4);

        let bytes = encode_cart(&cart).unwrap();
        assert_eq!(decode_cart(&bytes).unwrap(), cart);
    }

    #[test]
    fn test_prices_are_decimal_strings() {
        let mut cart = Cart::default();
        cart.add(&product(1, 100, 50));
        let json: serde_json::Value = serde_json::from_slice(&encode_cart(&cart).unwrap()).unwrap();

        assert_eq!(json["name"], "cart-storage");
        assert_eq!(json["state"]["items"][0]["product"]["price_native"], "100");
        assert_eq!(json["state"]["items"][0]["quantity"], 1);
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let raw = br#"{"name":"cart-storage","version":9,"state":{"items":[]}}"#;
        assert!(matches!(decode_cart(raw), Err(StoreError::Storage(_))));
    }

    #[test]
    fn test_decode_rejects_float_prices() {
        let raw = br#"{"name":"cart-storage","version":1,"state":{"items":[{"product":{
            "id":1,"title":"t","description":"d","price_native":1.5,"price_credit":"0",
            "seller":"0x0000000000000000000000000000000000000000","is_active":true,"stock":1
        },"quantity":1}]}}"#;
        assert!(matches!(decode_cart(raw), Err(StoreError::Serialization(_))));
    }
}
