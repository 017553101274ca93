use rust_decimal::Decimal;
use serde::Serialize;

use crate::constants::{DEFAULT_IMPLAUSIBLE_CEILING, DEFAULT_MAX_MENTIONS};
use crate::currencies::registry;
use crate::errors::{Error, Result};
use crate::formatting::{DisplayMode, Formatter};
use crate::fx::{Conversion, ConversionEngine, RateCache, RateLookup};
use crate::mentions::{default_matcher, CurrencyMention, PatternMatcher};
use crate::settings::TargetCurrencies;

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Distinct mentions rendered per message
    pub max_mentions: usize,
    /// USD value at or above which an amount is not converted
    pub implausible_ceiling: Decimal,
    /// Targets for callers that do not pass their own
    pub default_targets: TargetCurrencies,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_mentions: DEFAULT_MAX_MENTIONS,
            implausible_ceiling: Decimal::from(DEFAULT_IMPLAUSIBLE_CEILING),
            default_targets: TargetCurrencies::default(),
        }
    }
}

/// Everything produced for one message that mentions money.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedReply {
    pub mentions: Vec<CurrencyMention>,
    /// One line per distinct mention, reply wording
    pub reply: String,
    /// Same lines in preview wording
    pub preview: String,
    /// The message with every converted mention expanded in place
    pub annotated: String,
}

pub struct MessageProcessor {
    matcher: &'static PatternMatcher,
    engine: ConversionEngine,
    config: ProcessorConfig,
}

impl Default for MessageProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl MessageProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            matcher: default_matcher(),
            engine: ConversionEngine::new(config.implausible_ceiling),
            config,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Mentions found in `text`, in text order.
    pub fn extract(&self, text: &str) -> Vec<CurrencyMention> {
        self.matcher.extract_mentions(text)
    }

    /// Runs the pipeline against one consistent snapshot of the cache.
    pub fn process_with_cache(
        &self,
        text: &str,
        targets: &TargetCurrencies,
        cache: &RateCache,
    ) -> Result<Option<RenderedReply>> {
        let snapshot = cache.snapshot();
        self.process(text, targets, snapshot.as_ref())
    }

    /// Finds, converts and renders every mention in `text`.
    ///
    /// Returns `Ok(None)` when the text mentions no money.
    pub fn process(
        &self,
        text: &str,
        targets: &TargetCurrencies,
        rates: &dyn RateLookup,
    ) -> Result<Option<RenderedReply>> {
        let mentions = self.extract(text);
        if mentions.is_empty() {
            return Ok(None);
        }
        if let Some(unknown) = mentions.iter().find(|m| !registry().contains(&m.currency)) {
            return Err(Error::UnsupportedCurrency(unknown.currency.clone()));
        }

        let (shown, hidden) = Formatter::select_mentions(&mentions, self.config.max_mentions);
        if hidden > 0 {
            log::debug!("Rendering {} of {} mentions", shown.len(), shown.len() + hidden);
        }

        let targets = targets.as_slice();
        let converted: Vec<(&CurrencyMention, Conversion)> = shown
            .into_iter()
            .map(|mention| (mention, self.engine.convert(mention, targets, rates)))
            .collect();

        let render = |mode: DisplayMode| {
            let lines = converted
                .iter()
                .map(|(mention, conversion)| Formatter::format(mention, conversion, mode))
                .collect();
            Formatter::join_lines(lines, hidden)
        };
        let reply = render(DisplayMode::Reply);
        let preview = render(DisplayMode::Preview);

        let spans: Vec<(&CurrencyMention, Option<String>)> = mentions
            .iter()
            .map(|mention| {
                let conversion = self.engine.convert(mention, targets, rates);
                let rendering = matches!(conversion, Conversion::Converted { .. })
                    .then(|| Formatter::format(mention, &conversion, DisplayMode::Preview));
                (mention, rendering)
            })
            .collect();
        let annotated = Formatter::annotate(text, &spans);

        Ok(Some(RenderedReply {
            mentions,
            reply,
            preview,
            annotated,
        }))
    }
}
