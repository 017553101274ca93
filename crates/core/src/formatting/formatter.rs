use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::messages::{
    truncation_notice, IMPLAUSIBLE_AMOUNT_MESSAGE, KG_LABEL, NO_OTHER_CURRENCIES_MESSAGE,
    NO_RATES_SUFFIX, ZERO_AMOUNT_MESSAGE,
};
use crate::currencies::registry;
use crate::fx::Conversion;
use crate::mentions::CurrencyMention;

/// Values above this are shown as whole numbers.
const WHOLE_NUMBER_THRESHOLD: i64 = 20;

/// Whole numbers above this get thousands grouping.
const GROUPING_THRESHOLD: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// `100 шекелей (🇮🇱) это 🇺🇸 $28, 🇪🇺 €26`
    Reply,
    /// `100 шекелей (🇺🇸 $28, 🇪🇺 €26)`
    Preview,
}

pub struct Formatter;

impl Formatter {
    /// Renders one converted mention.
    pub fn format(mention: &CurrencyMention, conversion: &Conversion, mode: DisplayMode) -> String {
        let (mass_kg, amounts) = match conversion {
            Conversion::ZeroAmount => return ZERO_AMOUNT_MESSAGE.to_string(),
            Conversion::ImplausibleAmount => return IMPLAUSIBLE_AMOUNT_MESSAGE.to_string(),
            Conversion::NoOtherCurrencies => return NO_OTHER_CURRENCIES_MESSAGE.to_string(),
            Conversion::Converted { mass_kg, amounts } => (mass_kg, amounts),
        };

        let converted = amounts
            .iter()
            .map(|(code, amount)| Self::format_money(code, *amount))
            .collect::<Vec<_>>()
            .join(", ");

        let mut message = match (mode, mass_kg) {
            (DisplayMode::Reply, Some(kg)) => format!(
                "{} ({}) это {} {}, а также",
                mention.original_text,
                Self::flag(&mention.currency),
                Self::format_mass(*kg),
                KG_LABEL
            ),
            (DisplayMode::Reply, None) => format!(
                "{} ({}) это",
                mention.original_text,
                Self::flag(&mention.currency)
            ),
            (DisplayMode::Preview, Some(kg)) => format!(
                "{} ({} {})",
                mention.original_text,
                Self::format_mass(*kg),
                KG_LABEL
            ),
            (DisplayMode::Preview, None) => mention.original_text.clone(),
        };

        if amounts.is_empty() {
            message.push(' ');
            message.push_str(NO_RATES_SUFFIX);
        } else {
            match mode {
                DisplayMode::Reply => {
                    message.push(' ');
                    message.push_str(&converted);
                }
                DisplayMode::Preview => {
                    message.push_str(" (");
                    message.push_str(&converted);
                    message.push(')');
                }
            }
        }
        message
    }

    /// `🇺🇸 $28` or `🇷🇺 2 932 ₽` depending on the currency's symbol placement.
    pub fn format_money(code: &str, amount: Decimal) -> String {
        let number = Self::format_amount(amount);
        match registry().get(code) {
            Some(descriptor) if descriptor.symbol_before_amount => {
                format!("{} {}{}", descriptor.flag, descriptor.symbol, number)
            }
            Some(descriptor) => format!("{} {} {}", descriptor.flag, number, descriptor.symbol),
            None => format!("{} {}", number, code),
        }
    }

    /// Rounds for display.
    ///
    /// Above 20 the value is a whole number, grouped by thousands with
    /// spaces above 10 000. Otherwise one decimal, or two when the first
    /// decimal would be a zero; trailing zeros are dropped.
    pub fn format_amount(amount: Decimal) -> String {
        if amount.abs() > Decimal::from(WHOLE_NUMBER_THRESHOLD) {
            let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let digits = whole.normalize().to_string();
            if whole.abs() > Decimal::from(GROUPING_THRESHOLD) {
                return group_thousands(&digits);
            }
            return digits;
        }

        let one = amount.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        let rounded = if one.fract().is_zero() {
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        } else {
            one
        };
        rounded.normalize().to_string()
    }

    pub fn format_mass(kg: Decimal) -> String {
        kg.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
    }

    fn flag(code: &str) -> String {
        registry()
            .get(code)
            .map(|d| d.flag.clone())
            .unwrap_or_else(|| code.to_string())
    }

    /// Drops repeated `(amount, currency)` pairs and keeps at most `limit`.
    ///
    /// Returns the kept mentions in first-seen order and how many distinct
    /// mentions were cut off.
    pub fn select_mentions(mentions: &[CurrencyMention], limit: usize) -> (Vec<&CurrencyMention>, usize) {
        let mut seen = HashSet::new();
        let distinct: Vec<&CurrencyMention> = mentions
            .iter()
            .filter(|m| seen.insert((m.amount.normalize(), m.currency.clone())))
            .collect();
        let hidden = distinct.len().saturating_sub(limit);
        (distinct.into_iter().take(limit).collect(), hidden)
    }

    /// One line per mention, plus a notice when some were cut off.
    pub fn join_lines(lines: Vec<String>, hidden: usize) -> String {
        let mut lines = lines;
        if hidden > 0 {
            lines.push(truncation_notice(hidden));
        }
        lines.join("\n")
    }

    /// Replaces each mention span of `text` with its rendering.
    ///
    /// Spans must not overlap. A `None` rendering keeps the original span.
    pub fn annotate(text: &str, spans: &[(&CurrencyMention, Option<String>)]) -> String {
        let mut ordered: Vec<&(&CurrencyMention, Option<String>)> = spans.iter().collect();
        ordered.sort_by_key(|(mention, _)| std::cmp::Reverse(mention.start));

        let mut annotated = text.to_string();
        for (mention, rendering) in ordered {
            let Some(rendering) = rendering else {
                continue;
            };
            let in_bounds = mention.start <= mention.end
                && mention.end <= annotated.len()
                && annotated.is_char_boundary(mention.start)
                && annotated.is_char_boundary(mention.end);
            if !in_bounds {
                log::warn!(
                    "Skipping annotation for '{}' at {}..{}",
                    mention.original_text,
                    mention.start,
                    mention.end
                );
                continue;
            }
            annotated.replace_range(mention.start..mention.end, rendering);
        }
        annotated
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mention(amount: Decimal, currency: &str, text: &str, start: usize) -> CurrencyMention {
        CurrencyMention {
            amount,
            currency: currency.to_string(),
            original_text: text.to_string(),
            start,
            end: start + text.len(),
        }
    }

    fn converted(amounts: &[(&str, Decimal)]) -> Conversion {
        Conversion::Converted {
            mass_kg: None,
            amounts: amounts.iter().map(|(c, a)| (c.to_string(), *a)).collect(),
        }
    }

    #[test]
    fn test_format_amount_rules() {
        assert_eq!(Formatter::format_amount(dec!(28.00)), "28");
        assert_eq!(Formatter::format_amount(dec!(20.5)), "21");
        assert_eq!(Formatter::format_amount(dec!(2932.4)), "2932");
        assert_eq!(Formatter::format_amount(dec!(10868.2)), "10 868");
        assert_eq!(Formatter::format_amount(dec!(1234567.5)), "1 234 568");
        assert_eq!(Formatter::format_amount(dec!(10000)), "10000");
        assert_eq!(Formatter::format_amount(dec!(20)), "20");
        assert_eq!(Formatter::format_amount(dec!(2.80)), "2.8");
        assert_eq!(Formatter::format_amount(dec!(2.25)), "2.3");
        assert_eq!(Formatter::format_amount(dec!(5.0)), "5");
        assert_eq!(Formatter::format_amount(dec!(5.04)), "5.04");
        assert_eq!(Formatter::format_amount(dec!(0.047)), "0.05");
        assert_eq!(Formatter::format_amount(dec!(0.001)), "0");
    }

    #[test]
    fn test_symbol_placement() {
        assert_eq!(Formatter::format_money("USD", dec!(28)), "🇺🇸 $28");
        assert_eq!(Formatter::format_money("RUB", dec!(2932)), "🇷🇺 2932 ₽");
        assert_eq!(Formatter::format_money("AMD", dec!(10868)), "🇦🇲 10 868 ֏");
    }

    #[test]
    fn test_reply_mode() {
        let m = mention(dec!(100), "ILS", "100 шекелей", 0);
        let text = Formatter::format(
            &m,
            &converted(&[("USD", dec!(28)), ("EUR", dec!(26))]),
            DisplayMode::Reply,
        );
        assert_eq!(text, "100 шекелей (🇮🇱) это 🇺🇸 $28, 🇪🇺 €26");
    }

    #[test]
    fn test_preview_mode() {
        let m = mention(dec!(100), "ILS", "100 шекелей", 0);
        let text = Formatter::format(
            &m,
            &converted(&[("USD", dec!(28)), ("EUR", dec!(26))]),
            DisplayMode::Preview,
        );
        assert_eq!(text, "100 шекелей (🇺🇸 $28, 🇪🇺 €26)");
    }

    #[test]
    fn test_mass_rendering() {
        let m = mention(dec!(5), "GBP", "5 фунтов", 0);
        let conversion = Conversion::Converted {
            mass_kg: Some(dec!(2.26796185)),
            amounts: vec![("USD".to_string(), dec!(6.25))],
        };
        assert_eq!(
            Formatter::format(&m, &conversion, DisplayMode::Reply),
            "5 фунтов (🇬🇧) это 2.3 кг, а также 🇺🇸 $6.3"
        );
        assert_eq!(
            Formatter::format(&m, &conversion, DisplayMode::Preview),
            "5 фунтов (2.3 кг) (🇺🇸 $6.3)"
        );
    }

    #[test]
    fn test_no_rates() {
        let m = mention(dec!(100), "ILS", "100 шекелей", 0);
        assert_eq!(
            Formatter::format(&m, &converted(&[]), DisplayMode::Reply),
            "100 шекелей (🇮🇱) это (нет доступных курсов конвертации)"
        );
        assert_eq!(
            Formatter::format(&m, &converted(&[]), DisplayMode::Preview),
            "100 шекелей (нет доступных курсов конвертации)"
        );
    }

    #[test]
    fn test_sentinels_in_both_modes() {
        let m = mention(Decimal::ZERO, "USD", "0 долларов", 0);
        for mode in [DisplayMode::Reply, DisplayMode::Preview] {
            assert_eq!(Formatter::format(&m, &Conversion::ZeroAmount, mode), ZERO_AMOUNT_MESSAGE);
            assert_eq!(
                Formatter::format(&m, &Conversion::ImplausibleAmount, mode),
                IMPLAUSIBLE_AMOUNT_MESSAGE
            );
            assert_eq!(
                Formatter::format(&m, &Conversion::NoOtherCurrencies, mode),
                NO_OTHER_CURRENCIES_MESSAGE
            );
        }
    }

    #[test]
    fn test_select_mentions_dedupes_and_caps() {
        let mentions = vec![
            mention(dec!(5), "USD", "5$", 0),
            mention(dec!(5.0), "USD", "5 долларов", 10),
            mention(dec!(5), "EUR", "5€", 30),
            mention(dec!(7), "EUR", "7€", 40),
        ];
        let (kept, hidden) = Formatter::select_mentions(&mentions, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].original_text, "5$");
        assert_eq!(kept[1].original_text, "5€");
        assert_eq!(hidden, 1);

        let (all, none_hidden) = Formatter::select_mentions(&mentions, 10);
        assert_eq!(all.len(), 3);
        assert_eq!(none_hidden, 0);
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(Formatter::join_lines(vec!["a".into(), "b".into()], 0), "a\nb");
        let joined = Formatter::join_lines(vec!["a".into()], 2);
        assert!(joined.starts_with("a\n"));
        assert!(joined.contains('2'));
    }

    #[test]
    fn test_annotate_replaces_right_to_left() {
        let text = "взял за 100 шекелей и 5$ сдачи";
        let first = mention(dec!(100), "ILS", "100 шекелей", text.find("100").unwrap());
        let second = mention(dec!(5), "USD", "5$", text.find("5$").unwrap());
        let annotated = Formatter::annotate(
            text,
            &[
                (&first, Some("100 шекелей (🇺🇸 $28)".to_string())),
                (&second, Some("5$ (🇪🇺 €4.6)".to_string())),
            ],
        );
        assert_eq!(annotated, "взял за 100 шекелей (🇺🇸 $28) и 5$ (🇪🇺 €4.6) сдачи");
    }

    #[test]
    fn test_annotate_keeps_span_without_rendering() {
        let text = "0 долларов";
        let m = mention(Decimal::ZERO, "USD", text, 0);
        assert_eq!(Formatter::annotate(text, &[(&m, None)]), text);
    }
}
