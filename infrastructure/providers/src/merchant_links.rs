use std::str::FromStr;

use url::Url;

use business::domain::search::model::{ProductMatch, Provenance};
use business::domain::search::services::FallbackLinkService;

/// Merchants the static fallback tier can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Merchant {
    Amazon,
    Ebay,
    GoogleShopping,
    Etsy,
    Walmart,
}

impl Merchant {
    fn display_name(&self) -> &'static str {
        match self {
            Merchant::Amazon => "Amazon",
            Merchant::Ebay => "eBay",
            Merchant::GoogleShopping => "Google Shopping",
            Merchant::Etsy => "Etsy",
            Merchant::Walmart => "Walmart",
        }
    }

    fn search_url(&self, query: &str) -> String {
        let (base, param) = match self {
            Merchant::Amazon => ("https://www.amazon.com/s", "k"),
            Merchant::Ebay => ("https://www.ebay.com/sch/i.html", "_nkw"),
            Merchant::GoogleShopping => ("https://www.google.com/search?tbm=shop", "q"),
            Merchant::Etsy => ("https://www.etsy.com/search", "q"),
            Merchant::Walmart => ("https://www.walmart.com/search", "q"),
        };

        Url::parse_with_params(base, &[(param, query)])
            .map(|url| url.to_string())
            .unwrap_or_else(|_| base.to_string())
    }
}

/// The last search tier: one deterministic search link per configured
/// merchant. Pure, never touches the network, never fails.
pub struct MerchantLinksFallback {
    merchants: Vec<Merchant>,
}

impl MerchantLinksFallback {
    pub fn new(merchants: Vec<Merchant>) -> Self {
        Self { merchants }
    }

    pub fn default_set() -> Self {
        Self::new(vec![
            Merchant::Amazon,
            Merchant::Ebay,
            Merchant::GoogleShopping,
            Merchant::Etsy,
        ])
    }

    /// Parses a configured merchant list, ignoring unknown names.
    pub fn from_names(names: &[String]) -> Self {
        Self::new(
            names
                .iter()
                .filter_map(|name| Merchant::from_str(name).ok())
                .collect(),
        )
    }
}

impl FallbackLinkService for MerchantLinksFallback {
    fn links(&self, query: &str) -> Vec<ProductMatch> {
        self.merchants
            .iter()
            .map(|merchant| {
                let mut link = ProductMatch::bare(
                    format!("Search {} for \"{}\"", merchant.display_name(), query),
                    merchant.search_url(query),
                    Provenance::Fallback,
                );
                link.merchant = Some(merchant.display_name().to_string());
                link
            })
            .collect()
    }
}
