//! Account balances and live prices.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Asset whose available balance funds new pipelines.
pub const QUOTE_ASSET: &str = "USDT";

/// Latest known price per symbol.
pub type PriceMap = BTreeMap<String, Decimal>;

/// Trading account a pipeline runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Account {
    Live,
    Test,
}

impl Account {
    /// Paper-trading pipelines run against the test account.
    pub fn for_paper_trading(paper_trading: bool) -> Self {
        if paper_trading {
            Self::Test
        } else {
            Self::Live
        }
    }
}

/// Balance of a single asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    #[serde(default)]
    pub total_balance: Decimal,
    #[serde(default)]
    pub available_balance: Decimal,
}

/// Futures account balances, per account and asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Balances {
    #[serde(default)]
    pub live: HashMap<String, AssetBalance>,
    #[serde(default)]
    pub test: HashMap<String, AssetBalance>,
}

impl Balances {
    pub fn account(&self, account: Account) -> &HashMap<String, AssetBalance> {
        match account {
            Account::Live => &self.live,
            Account::Test => &self.test,
        }
    }

    /// Available quote-asset balance of an account, if reported.
    pub fn available_quote(&self, account: Account) -> Option<Decimal> {
        self.account(account)
            .get(QUOTE_ASSET)
            .map(|b| b.available_balance)
    }
}
