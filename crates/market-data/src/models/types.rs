/// ISO 4217 currency code
pub type Currency = String;
