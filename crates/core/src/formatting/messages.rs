//! Fixed user-facing texts.

/// Reply for a zero amount, whatever the currency.
pub const ZERO_AMOUNT_MESSAGE: &str = "Ноль в любой валюте остаётся нулём";

/// Reply for amounts at or above the plausibility ceiling.
pub const IMPLAUSIBLE_AMOUNT_MESSAGE: &str = "Откуда у тебя такие деньги, сынок?";

/// Reply when the chosen targets hold nothing but the mention's own currency.
pub const NO_OTHER_CURRENCIES_MESSAGE: &str = "Не настроено ни одной другой валюты для конвертации";

/// Appended when no target rate is known.
pub const NO_RATES_SUFFIX: &str = "(нет доступных курсов конвертации)";

/// Replaces any outbound text longer than the transport allows.
pub const OVERSIZED_OUTPUT_NOTICE: &str = "Ответ получился слишком длинным, попробуй сообщение покороче";

/// Kilogram unit label.
pub const KG_LABEL: &str = "кг";

pub fn truncation_notice(hidden: usize) -> String {
    format!("…и ещё {} (слишком много сумм в одном сообщении)", hidden)
}
