//! Records the API trades in.

use serde::{Deserialize, Serialize};

/// A tracked token holding within a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "portfolio")]
    pub portfolio_id: i64,
    pub token: String,
    #[serde(rename = "symbol")]
    pub token_symbol: String,
}

/// An open position under an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "investment")]
    pub investment_id: i64,
    pub amount: f64,
    #[serde(rename = "averagePrice")]
    pub average_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_wire_format() {
        let position = Position {
            id: 1,
            investment_id: 2,
            amount: 1.0,
            average_price: 1.681,
            profit: None,
        };
        let encoded = serde_json::to_value(&position).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"id": 1, "investment": 2, "amount": 1.0, "averagePrice": 1.681})
        );
    }

    #[test]
    fn body_without_an_id_decodes() {
        let position: Position =
            serde_json::from_str(r#"{"investment": 1, "amount": 2.5, "averagePrice": 0.5}"#)
                .unwrap();
        assert_eq!(position.id, 0);
        assert_eq!(position.investment_id, 1);
    }
}
