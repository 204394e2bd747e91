use serde::Serialize;

/// One supported base currency, with the label and locale the client uses
/// for display formatting.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub value: &'static str,
    pub label: &'static str,
    pub locale: &'static str,
}

pub const CURRENCIES: &[Currency] = &[
    Currency {
        value: "USD",
        label: "$ Dollar",
        locale: "en-US",
    },
    Currency {
        value: "EUR",
        label: "€ Euro",
        locale: "de-DE",
    },
    Currency {
        value: "JPY",
        label: "¥ Yen",
        locale: "ja-JP",
    },
    Currency {
        value: "GBP",
        label: "£ Pound",
        locale: "en-GB",
    },
    Currency {
        value: "INR",
        label: "₹ Rupee",
        locale: "en-IN",
    },
];

pub fn find_currency(value: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.value == value)
}
