//! Page configuration: timings, counts and copy.
//!
//! Defaults reproduce the shipped card. With the `serde_json` feature a page can
//! override any subset of fields through an inline
//! `<script type="application/json" id="greeting-config">` block.

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::GreetingError;

/// Deployment prefix for static assets, fixed at build time.
pub const DEFAULT_BASE_PATH: &str = match option_env!("GREETING_BASE_PATH") {
    Some(p) => p,
    None => "/fomybest/",
};

pub const REVEAL_DELAY_MS: u32 = 800;
pub const TYPING_TICK_MS: u32 = 40;
pub const CELEBRATION_MS: u32 = 6_000;
pub const PETAL_COUNT: usize = 8;
pub const CONFETTI_PIECES: usize = 200;

// Upper bounds applied by `sanitized()`; decorative layers past this only cost frames.
const MAX_PETALS: usize = 64;
const MAX_CONFETTI: usize = 1_000;

/// Element id of the optional JSON override block.
pub const CONFIG_ELEMENT_ID: &str = "greeting-config";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreetingConfig {
    pub reveal_delay_ms: u32,
    pub typing_tick_ms: u32,
    pub celebration_ms: u32,
    pub petal_count: usize,
    pub confetti_pieces: usize,
    pub headline: String,
    pub message: String,
    pub surprise_text: String,
    pub celebrate_label: String,
    pub surprise_label: String,
    pub footer: String,
    pub base_path: String,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: REVEAL_DELAY_MS,
            typing_tick_ms: TYPING_TICK_MS,
            celebration_ms: CELEBRATION_MS,
            petal_count: PETAL_COUNT,
            confetti_pieces: CONFETTI_PIECES,
            headline: "Для самой любимой ❤️".to_string(),
            message: "Ты — моё вдохновение. Спасибо, что ты есть рядом.".to_string(),
            surprise_text: "Подарок внутри — ты можешь вставить фото, Lottie-анимацию или ссылку на плейлист."
                .to_string(),
            celebrate_label: "Запустить конфетти".to_string(),
            surprise_label: "Открыть сюрприз".to_string(),
            footer: "Сделано с ❤️".to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl GreetingConfig {
    /// Parse a JSON override; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(raw: &str) -> Result<Self, GreetingError> {
        serde_json::from_str::<Self>(raw)
            .map(Self::sanitized)
            .map_err(|e| GreetingError::Config(e.to_string()))
    }

    /// Without JSON support an override can never be applied.
    #[cfg(not(feature = "serde_json"))]
    pub fn from_json(_raw: &str) -> Result<Self, GreetingError> {
        Err(GreetingError::Config("built without the `serde_json` feature".into()))
    }

    /// Clamp values a host timer or layout loop cannot use as-is.
    pub fn sanitized(mut self) -> Self {
        self.reveal_delay_ms = self.reveal_delay_ms.max(1);
        self.typing_tick_ms = self.typing_tick_ms.max(1);
        self.celebration_ms = self.celebration_ms.max(1);
        self.petal_count = self.petal_count.min(MAX_PETALS);
        self.confetti_pieces = self.confetti_pieces.min(MAX_CONFETTI);
        if !self.base_path.ends_with('/') {
            self.base_path.push('/');
        }
        self
    }

    /// Target of the "open surprise" link. An in-page fragment, so following
    /// it never leaves the card wherever the page is served from.
    pub fn surprise_href(&self) -> &'static str {
        "#surprise"
    }
}

/// Read the inline override block, falling back to defaults on any problem.
pub fn load_from_document(doc: &web_sys::Document) -> GreetingConfig {
    let Some(raw) = doc
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return GreetingConfig::default();
    };
    match GreetingConfig::from_json(&raw) {
        Ok(cfg) => {
            log::debug!("applied inline greeting config");
            cfg
        }
        Err(e) => {
            log::warn!("ignoring greeting config override: {e}");
            GreetingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_card_timings() {
        let cfg = GreetingConfig::default();
        assert_eq!(cfg.reveal_delay_ms, 800);
        assert_eq!(cfg.typing_tick_ms, 40);
        assert_eq!(cfg.celebration_ms, 6_000);
        assert_eq!(cfg.petal_count, 8);
        assert!(cfg.base_path.ends_with('/'));
    }

    #[test]
    fn sanitized_clamps_zero_durations_and_counts() {
        let cfg = GreetingConfig {
            reveal_delay_ms: 0,
            typing_tick_ms: 0,
            celebration_ms: 0,
            petal_count: 10_000,
            confetti_pieces: 10_000,
            base_path: "/card".into(),
            ..GreetingConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.reveal_delay_ms, 1);
        assert_eq!(cfg.typing_tick_ms, 1);
        assert_eq!(cfg.celebration_ms, 1);
        assert_eq!(cfg.petal_count, MAX_PETALS);
        assert_eq!(cfg.confetti_pieces, MAX_CONFETTI);
        assert_eq!(cfg.base_path, "/card/");
    }

    #[test]
    fn surprise_link_stays_on_the_page() {
        assert_eq!(GreetingConfig::default().surprise_href(), "#surprise");
        let moved = GreetingConfig {
            base_path: "/elsewhere/".into(),
            ..GreetingConfig::default()
        };
        assert_eq!(moved.surprise_href(), "#surprise");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_override_keeps_missing_fields() {
        let cfg = GreetingConfig::from_json(r#"{"message":"Hi","typing_tick_ms":10}"#).unwrap();
        assert_eq!(cfg.message, "Hi");
        assert_eq!(cfg.typing_tick_ms, 10);
        assert_eq!(cfg.reveal_delay_ms, REVEAL_DELAY_MS);
        assert_eq!(cfg.headline, GreetingConfig::default().headline);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn malformed_json_is_a_config_error() {
        let err = GreetingConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, GreetingError::Config(_)));
    }
}
