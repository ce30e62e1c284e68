//! Organization metadata and market trading parameters.
//!
//! Updates are partial: absent fields keep their current value.

use serde::{Deserialize, Serialize};

use decree_types::{UpdateMetadata, UpdateTradingParams};

use crate::error::ResourceError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingParams {
    pub min_liquidity: u64,
    pub review_period_ms: u64,
    pub trading_period_ms: u64,
    pub twap_start_delay_ms: u64,
}

impl Default for TradingParams {
    fn default() -> Self {
        Self {
            min_liquidity: 1_000,
            review_period_ms: 86_400_000,
            trading_period_ms: 259_200_000,
            twap_start_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaoSettings {
    pub metadata: Metadata,
    pub trading: TradingParams,
}

impl DaoSettings {
    pub fn update_metadata(&mut self, update: UpdateMetadata) -> Result<(), ResourceError> {
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ResourceError::InvalidSetting("name must not be empty"));
        }
        if let Some(name) = update.name {
            self.metadata.name = name;
        }
        if let Some(description) = update.description {
            self.metadata.description = description;
        }
        if let Some(icon_url) = update.icon_url {
            self.metadata.icon_url = Some(icon_url);
        }
        Ok(())
    }

    pub fn update_trading_params(
        &mut self,
        update: &UpdateTradingParams,
    ) -> Result<(), ResourceError> {
        let current = &self.trading;
        let next = TradingParams {
            min_liquidity: update.min_liquidity.unwrap_or(current.min_liquidity),
            review_period_ms: update.review_period_ms.unwrap_or(current.review_period_ms),
            trading_period_ms: update.trading_period_ms.unwrap_or(current.trading_period_ms),
            twap_start_delay_ms: update
                .twap_start_delay_ms
                .unwrap_or(current.twap_start_delay_ms),
        };
        if next.trading_period_ms == 0 {
            return Err(ResourceError::InvalidSetting(
                "trading period must be non-zero",
            ));
        }
        if next.twap_start_delay_ms >= next.trading_period_ms {
            return Err(ResourceError::InvalidSetting(
                "twap start delay must be shorter than the trading period",
            ));
        }
        self.trading = next;
        Ok(())
    }
}
