//! Dominant-language detection for CV content.
//!
//! Each work experience's responsibilities are detected on their own and the
//! most frequent language wins. Ties go to the language seen first.

use serde_json::Value;

/// Detects the language of a single piece of text as an ISO 639-1 code.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}

/// [`LanguageDetector`] backed by `whatlang`. Guesses whatlang itself
/// marks unreliable count as undetected.
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text).filter(|info| info.is_reliable())?;
        iso_639_1(info.lang().code()).map(str::to_string)
    }
}

/// Maps the ISO 639-3 codes whatlang reports onto ISO 639-1.
fn iso_639_1(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "eng" => "en",
        "fra" => "fr",
        "deu" => "de",
        "spa" => "es",
        "por" => "pt",
        "ita" => "it",
        "nld" => "nl",
        "cat" => "ca",
        "lat" => "la",
        "epo" => "eo",
        "rus" => "ru",
        "ukr" => "uk",
        "bel" => "be",
        "pol" => "pl",
        "ces" => "cs",
        "slk" => "sk",
        "slv" => "sl",
        "hrv" => "hr",
        "srp" => "sr",
        "bul" => "bg",
        "mkd" => "mk",
        "ron" => "ro",
        "hun" => "hu",
        "fin" => "fi",
        "est" => "et",
        "lav" => "lv",
        "lit" => "lt",
        "swe" => "sv",
        "dan" => "da",
        "nob" => "nb",
        "tur" => "tr",
        "aze" => "az",
        "uzb" => "uz",
        "tuk" => "tk",
        "ell" => "el",
        "ara" => "ar",
        "heb" => "he",
        "yid" => "yi",
        "pes" => "fa",
        "hin" => "hi",
        "ben" => "bn",
        "mar" => "mr",
        "guj" => "gu",
        "pan" => "pa",
        "tam" => "ta",
        "tel" => "te",
        "kan" => "kn",
        "mal" => "ml",
        "ori" => "or",
        "urd" => "ur",
        "nep" => "ne",
        "sin" => "si",
        "cmn" => "zh",
        "jpn" => "ja",
        "kor" => "ko",
        "vie" => "vi",
        "tha" => "th",
        "khm" => "km",
        "mya" => "my",
        "ind" => "id",
        "jav" => "jv",
        "tgl" => "tl",
        "kat" => "ka",
        "hye" => "hy",
        "amh" => "am",
        "aka" => "ak",
        "zul" => "zu",
        "sna" => "sn",
        "afr" => "af",
        _ => return None,
    };
    Some(mapped)
}

/// Collects the non-empty responsibilities texts of a `work` JSON list.
/// Responsibilities given as a list of lines are joined.
fn responsibilities(work: &Value) -> Vec<String> {
    let Some(entries) = work.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry.get("responsibilities")? {
            Value::String(text) => Some(text.clone()),
            Value::Array(lines) => Some(
                lines
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Majority vote over per-experience detections. `None` when nothing is detected.
pub fn detect_cv_language(detector: &dyn LanguageDetector, work: Option<&Value>) -> Option<String> {
    let texts = work.map(responsibilities).unwrap_or_default();

    // (language, votes) in first-seen order
    let mut tally: Vec<(String, usize)> = Vec::new();
    for text in &texts {
        let Some(lang) = detector.detect(text) else {
            continue;
        };
        match tally.iter_mut().find(|(l, _)| *l == lang) {
            Some((_, votes)) => *votes += 1,
            None => tally.push((lang, 1)),
        }
    }

    let mut winner: Option<(String, usize)> = None;
    for (lang, votes) in tally {
        if winner.as_ref().map_or(true, |(_, best)| votes > *best) {
            winner = Some((lang, votes));
        }
    }
    winner.map(|(lang, _)| lang)
}


#[cfg(test)]
mod tests {
    use super::testing::PrefixDetector;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_majority_language_wins() {
        let work = json!([
            {"responsibilities": "fr Gestion d'équipe"},
            {"responsibilities": "en Led the team"},
            {"responsibilities": "fr Développement"}
        ]);
        assert_eq!(
            detect_cv_language(&PrefixDetector, Some(&work)),
            Some("fr".to_string())
        );
    }

    #[test]
    fn test_tie_goes_to_first_seen_language() {
        let work = json!([
            {"responsibilities": "en Built APIs"},
            {"responsibilities": "fr Conception"},
            {"responsibilities": "fr Tests"},
            {"responsibilities": "en Code review"}
        ]);
        assert_eq!(
            detect_cv_language(&PrefixDetector, Some(&work)),
            Some("en".to_string())
        );
    }

    #[test]
    fn test_no_detectable_text_yields_none() {
        let work = json!([
            {"responsibilities": "? 12345"},
            {"responsibilities": ""},
            {"company": "Acme"}
        ]);
        assert_eq!(detect_cv_language(&PrefixDetector, Some(&work)), None);
        assert_eq!(detect_cv_language(&PrefixDetector, None), None);
        assert_eq!(
            detect_cv_language(&PrefixDetector, Some(&json!({"not": "a list"}))),
            None
        );
    }

    #[test]
    fn test_responsibility_lines_are_joined() {
        let work = json!([{"responsibilities": ["de Leitung", "Planung"]}]);
        assert_eq!(
            detect_cv_language(&PrefixDetector, Some(&work)),
            Some("de".to_string())
        );
    }

    #[test]
    fn test_whatlang_detects_english_and_french() {
        let detector = WhatlangDetector;
        let english = "Designed and maintained the payment services used by millions \
                       of customers every day across the world.";
        let french = "Responsable de la conception et de la maintenance des services \
                      de paiement utilisés chaque jour par des millions de clients.";
        assert_eq!(detector.detect(english).as_deref(), Some("en"));
        assert_eq!(detector.detect(french).as_deref(), Some("fr"));
    }

    #[test]
    fn test_short_lines_without_reliable_signal_yield_none() {
        let work = json!([
            {"responsibilities": "Managed budgets"},
            {"responsibilities": "Built APIs"}
        ]);
        assert_eq!(WhatlangDetector.detect("Managed budgets"), None);
        assert_eq!(detect_cv_language(&WhatlangDetector, Some(&work)), None);
    }

    #[test]
    fn test_iso_mapping_covers_template_languages() {
        assert_eq!(iso_639_1("eng"), Some("en"));
        assert_eq!(iso_639_1("fra"), Some("fr"));
        assert_eq!(iso_639_1("xyz"), None);
    }
}
