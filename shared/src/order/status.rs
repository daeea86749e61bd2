use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, awaiting supplier confirmation
    Pendente,
    /// Confirmed by the purchasing entity
    Confirmado,
    /// Receiving in progress (legacy value, normalized by the deriver)
    Recebimento,
    /// Every line item fully received
    Recebido,
    /// Meals being prepared from received goods
    EmPreparacao,
    /// Dispatched to schools
    Enviado,
    /// Delivered to schools
    Entregue,
    /// Invoiced (terminal)
    Faturado,
    /// Cancelled (terminal)
    Cancelado,
}

impl OrderStatus {
    /// All defined states, in lifecycle order
    pub const ALL: [OrderStatus; 9] = [
        OrderStatus::Pendente,
        OrderStatus::Confirmado,
        OrderStatus::Recebimento,
        OrderStatus::Recebido,
        OrderStatus::EmPreparacao,
        OrderStatus::Enviado,
        OrderStatus::Entregue,
        OrderStatus::Faturado,
        OrderStatus::Cancelado,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendente => "PENDENTE",
            OrderStatus::Confirmado => "CONFIRMADO",
            OrderStatus::Recebimento => "RECEBIMENTO",
            OrderStatus::Recebido => "RECEBIDO",
            OrderStatus::EmPreparacao => "EM_PREPARACAO",
            OrderStatus::Enviado => "ENVIADO",
            OrderStatus::Entregue => "ENTREGUE",
            OrderStatus::Faturado => "FATURADO",
            OrderStatus::Cancelado => "CANCELADO",
        }
    }

    /// Terminal states accept no further transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Faturado | OrderStatus::Cancelado)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// 明细/供应商分组的收货状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// Nothing received yet
    #[default]
    Pendente,
    /// Partially received
    Parcial,
    /// Fully received
    Recebido,
}

impl ItemStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pendente => "PENDENTE",
            ItemStatus::Parcial => "PARCIAL",
            ItemStatus::Recebido => "RECEBIDO",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDENTE" => Ok(ItemStatus::Pendente),
            "PARCIAL" => Ok(ItemStatus::Parcial),
            "RECEBIDO" => Ok(ItemStatus::Recebido),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Raised when a persisted status string is not one of the defined values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status value: {0:?}")]
pub struct ParseStatusError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_order_status_rejects_unknown_and_lowercase() {
        assert!("ARQUIVADO".parse::<OrderStatus>().is_err());
        assert!("pendente".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&OrderStatus::EmPreparacao).unwrap();
        assert_eq!(json, "\"EM_PREPARACAO\"");
        let parsed: ItemStatus = serde_json::from_str("\"PARCIAL\"").unwrap();
        assert_eq!(parsed, ItemStatus::Parcial);
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(OrderStatus::is_terminal)
            .collect();
        assert_eq!(terminal, vec![OrderStatus::Faturado, OrderStatus::Cancelado]);
    }

    #[test]
    fn test_parse_error_message() {
        let err = "X".parse::<ItemStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown status value: \"X\"");
    }
}
