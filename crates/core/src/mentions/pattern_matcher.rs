//! Regex scanning for currency tokens.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::amount_normalizer::AmountNormalizer;
use super::mentions_model::{CurrencyMention, CurrencyTag, RawMatch};
use super::mentions_rules::{default_rules, CurrencyRule};
use super::overlap_resolver::OverlapResolver;
use crate::currencies::registry;
use crate::errors::{Error, Result};

/// Digits with optional grouping, decimal part and a trailing `к`/`k`.
const NUMBER: &str = r"(?P<amount>(?:[0-9]{1,3}(?:[., \u{a0}\u{202f}][0-9]{3})+|[0-9]+)(?:[.,][0-9]+)?[кk]?)";

/// A match directly after one of these is not a money mention:
/// `#100usd`, `%5$`, `@20руб`, `a/5€`, `2*3$`.
const NON_SEPARATORS: &[char] = &['#', '%', '^', '@', '_', '/', '\\', '&', '*', '=', '~'];

/// Rejects a match only when a digit precedes them, as in the tail of
/// `1.500₪`; `5 евро,10 долларов` is still a list.
const NUMERIC_SEPARATORS: &[char] = &['.', ','];

struct CompiledRule {
    tag: CurrencyTag,
    patterns: Vec<Regex>,
}

/// Finds every currency token in a text.
///
/// Rules are scanned in registration order and each rule yields all of its
/// occurrences; overlaps between rules are left to [`OverlapResolver`].
pub struct PatternMatcher {
    rules: Vec<CompiledRule>,
}

lazy_static! {
    static ref DEFAULT_MATCHER: PatternMatcher =
        PatternMatcher::from_rules(default_rules()).expect("built-in currency rules must compile");
}

/// Matcher for the built-in rule table, compiled on first use.
pub fn default_matcher() -> &'static PatternMatcher {
    &DEFAULT_MATCHER
}

impl PatternMatcher {
    pub fn from_rules(rules: &[CurrencyRule]) -> Result<Self> {
        let compiled = rules
            .iter()
            .map(Self::compile_rule)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules: compiled })
    }

    fn compile_rule(rule: &CurrencyRule) -> Result<CompiledRule> {
        let tag = rule.tag();
        if !registry().contains(&tag.currency) {
            return Err(Error::UnsupportedCurrency(tag.currency));
        }

        let escaped = |symbols: &[String]| {
            symbols
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
        };

        let mut sources = Vec::new();

        let prefixes = escaped(&rule.prefix_symbols);
        if !prefixes.is_empty() {
            sources.push(format!(r"(?i)(?:{})\s?{}", prefixes.join("|"), NUMBER));
        }

        let suffixes: Vec<String> = rule
            .suffix_terms
            .iter()
            .cloned()
            .chain(escaped(&rule.suffix_symbols))
            .collect();
        if !suffixes.is_empty() {
            sources.push(format!(r"(?i){}\s*(?:{})", NUMBER, suffixes.join("|")));
        }

        if !rule.bare_terms.is_empty() {
            if tag.unit.implicit_amount().is_none() {
                return Err(Error::InvalidRule {
                    currency: tag.currency,
                    message: "bare terms need a unit with an implicit amount".to_string(),
                });
            }
            sources.push(format!(r"(?i)(?P<amount>)(?:{})", rule.bare_terms.join("|")));
        }

        if sources.is_empty() {
            return Err(Error::InvalidRule {
                currency: tag.currency,
                message: "rule has no tokens".to_string(),
            });
        }

        let patterns = sources
            .iter()
            .map(|source| {
                Regex::new(source).map_err(|e| Error::InvalidRule {
                    currency: tag.currency.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledRule { tag, patterns })
    }

    /// All accepted candidates, grouped by rule in registration order.
    pub fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        for rule in &self.rules {
            for pattern in &rule.patterns {
                Self::scan(&rule.tag, pattern, text, &mut matches);
            }
        }
        matches
    }

    /// Matches, resolves overlaps and normalizes amounts in one pass.
    pub fn extract_mentions(&self, text: &str) -> Vec<CurrencyMention> {
        OverlapResolver::resolve(self.find_matches(text))
            .into_iter()
            .map(|raw| {
                let (amount, currency) = AmountNormalizer::normalize(&raw.captured, &raw.tag);
                CurrencyMention {
                    amount,
                    currency,
                    original_text: raw.text,
                    start: raw.start,
                    end: raw.end,
                }
            })
            .collect()
    }

    fn scan(tag: &CurrencyTag, pattern: &Regex, text: &str, out: &mut Vec<RawMatch>) {
        let mut pos = 0;
        while pos <= text.len() {
            let Some(caps) = pattern.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            if is_bounded(text, whole.start(), whole.end()) {
                out.push(Self::raw_match(tag, &caps, whole.start(), whole.end()));
                pos = if whole.end() > whole.start() {
                    whole.end()
                } else {
                    next_char(text, whole.end())
                };
            } else {
                // A rejected span may still contain a valid match.
                pos = next_char(text, whole.start());
            }
        }
    }

    fn raw_match(tag: &CurrencyTag, caps: &Captures<'_>, start: usize, end: usize) -> RawMatch {
        RawMatch {
            tag: tag.clone(),
            captured: caps
                .name("amount")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            start,
            end,
            text: caps
                .get(0)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

fn next_char(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| pos + c.len_utf8())
}

fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let mut preceding = text[..start].chars().rev();
    let before = preceding.next();
    let after = text[end..].chars().next();

    let clean_before = before.map_or(true, |c| {
        if NUMERIC_SEPARATORS.contains(&c) {
            return !preceding.next().is_some_and(|p| p.is_ascii_digit());
        }
        !c.is_alphanumeric() && !NON_SEPARATORS.contains(&c)
    });
    let clean_after = after.map_or(true, |c| !c.is_alphanumeric() && c != '_');

    clean_before && clean_after
}
