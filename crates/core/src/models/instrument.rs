use serde::{Deserialize, Serialize};

/// The kind of product an instrument represents.
/// Decides how holdings are merged and whether weekend quotes are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Stock,
    Etf,
    Fund,
    Bond,
    /// Cryptocurrencies: quotes exist 7 days a week
    Crypto,
    /// Cash positions: fungible across brokers in the same currency
    Cash,
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductType::Stock => write!(f, "STOCK"),
            ProductType::Etf => write!(f, "ETF"),
            ProductType::Fund => write!(f, "FUND"),
            ProductType::Bond => write!(f, "BOND"),
            ProductType::Crypto => write!(f, "CRYPTO"),
            ProductType::Cash => write!(f, "CASH"),
        }
    }
}

/// A tradable instrument as reported by one broker.
///
/// `id` is the broker's own identifier (used to fetch transactions and
/// quotes). `symbol` is the cross-broker merge key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,
    /// Ticker symbol, uppercased (e.g., "AAPL", "BTC")
    pub symbol: String,
    pub name: String,
    /// ISO currency code the instrument trades and is quoted in
    pub currency: String,
    pub product_type: ProductType,
}

impl Instrument {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        product_type: ProductType,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            currency: currency.into().to_uppercase(),
            product_type,
        }
    }

    #[must_use]
    pub fn is_crypto(&self) -> bool {
        self.product_type == ProductType::Crypto
    }
}
