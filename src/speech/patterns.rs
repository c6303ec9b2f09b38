//! Randomized speech decoration
//!
//! Makes a canned reply sound human: stutters, filler words, breathing,
//! interruptions, repetition, apologies and emotional outbursts, each gated
//! by the speaker's habits and current emotion.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Emotion;

pub const FILLER_WORDS: &[&str] = &["um", "uh", "you know", "like", "well", "I mean"];
pub const BREATHING_MARKERS: &[&str] = &["*takes a deep breath*", "*sighs*", "*exhales*"];
pub const INTERRUPTION_STARTERS: &[&str] = &["Wait, wait,", "Hold on,", "But,", "No, no,"];
pub const APOLOGIES: &[&str] = &["I'm sorry,", "Sorry,", "I apologize,"];

const STUTTER_CHANCE: f64 = 0.3;
const FILLER_CHANCE: f64 = 0.4;
const INTERRUPTION_CHANCE: f64 = 0.3;
const REPEAT_LAST_WORD_CHANCE: f64 = 0.2;
const APOLOGY_CHANCE: f64 = 0.3;
const MARKER_CHANCE: f64 = 0.2;

static ACTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*[^*]+\*").expect("valid regex"));

/// Verbal habits of a simulated speaker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SpeechPatterns {
    pub interrupts_frequently: bool,
    pub speaks_quickly: bool,
    pub speaks_slowly: bool,
    pub uses_slang: bool,
    pub uses_polite_language: bool,
    pub uses_filler_words: bool,
    pub stutters_when_stressed: bool,
    pub stutters_when_confused: bool,
    pub breathes_heavily: bool,
    pub asks_for_clarification: bool,
    pub repeats_concerns: bool,
    pub repeats_information: bool,
    pub repeats_questions: bool,
    pub apologizes_often: bool,
}

/// What the decorator needs to know about the moment
#[derive(Debug, Clone, Copy)]
pub struct DecorationContext<'a> {
    pub patterns: &'a SpeechPatterns,
    pub emotion: Emotion,
    /// The other side just used jargon
    pub heard_jargon: bool,
    /// The speaker has little patience
    pub impatient: bool,
}

/// Apply every habit that fits the context, then maybe an emotional marker
pub fn decorate<R: Rng + ?Sized>(base: &str, ctx: &DecorationContext<'_>, rng: &mut R) -> String {
    let p = ctx.patterns;
    let mut response = base.to_string();

    if (p.stutters_when_stressed && ctx.emotion == Emotion::Worried)
        || (p.stutters_when_confused && ctx.heard_jargon)
    {
        response = stutter(&response, rng);
    }

    if p.uses_filler_words && matches!(ctx.emotion, Emotion::Worried | Emotion::Frustrated) {
        response = fillers(&response, rng);
    }

    if p.breathes_heavily && ctx.emotion == Emotion::Angry {
        response = breathing(&response, rng);
    }

    if p.interrupts_frequently && ctx.impatient {
        response = interruption(&response, rng);
    }

    if p.repeats_information || p.repeats_questions {
        response = repetition(&response, rng);
    }

    if p.apologizes_often {
        response = apology(&response, rng);
    }

    emotional_marker(&response, ctx.emotion, rng)
}

/// Stutter on some words starting with `w`, `c` or `i`
pub fn stutter<R: Rng + ?Sized>(response: &str, rng: &mut R) -> String {
    response
        .split(' ')
        .map(|word| {
            let Some(first) = word.chars().next().map(|c| c.to_ascii_lowercase()) else {
                return word.to_string();
            };
            if word.chars().count() > 2
                && matches!(first, 'w' | 'c' | 'i')
                && rng.gen_bool(STUTTER_CHANCE)
            {
                format!("{first}-{word}")
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Open some sentences with a filler word
pub fn fillers<R: Rng + ?Sized>(response: &str, rng: &mut R) -> String {
    response
        .split(". ")
        .map(|sentence| {
            if rng.gen_bool(FILLER_CHANCE) {
                let filler = FILLER_WORDS.choose(rng).copied().unwrap_or("um");
                format!("{filler}, {sentence}")
            } else {
                sentence.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(". ")
}

/// Start with an audible breath
pub fn breathing<R: Rng + ?Sized>(response: &str, rng: &mut R) -> String {
    let marker = BREATHING_MARKERS.choose(rng).copied().unwrap_or("*sighs*");
    format!("{marker} {response}")
}

/// Sometimes cut in with an interruption starter
pub fn interruption<R: Rng + ?Sized>(response: &str, rng: &mut R) -> String {
    if !rng.gen_bool(INTERRUPTION_CHANCE) {
        return response.to_string();
    }
    let starter = INTERRUPTION_STARTERS.choose(rng).copied().unwrap_or("Hold on,");
    format!("{starter} {response}")
}

/// Repeat a question, or sometimes the last word
pub fn repetition<R: Rng + ?Sized>(response: &str, rng: &mut R) -> String {
    if response.contains('?') {
        return format!("{response} I mean, {}", response.to_lowercase());
    }
    if rng.gen_bool(REPEAT_LAST_WORD_CHANCE) {
        if let Some(last) = response.split(' ').next_back() {
            return format!("{response} {last}");
        }
    }
    response.to_string()
}

/// Sometimes open with an apology
pub fn apology<R: Rng + ?Sized>(response: &str, rng: &mut R) -> String {
    if !rng.gen_bool(APOLOGY_CHANCE) {
        return response.to_string();
    }
    let apology = APOLOGIES.choose(rng).copied().unwrap_or("Sorry,");
    format!("{apology} {response}")
}

/// Sometimes blurt out an emotional marker first
pub fn emotional_marker<R: Rng + ?Sized>(response: &str, emotion: Emotion, rng: &mut R) -> String {
    let markers = emotion.markers();
    if markers.is_empty() || !rng.gen_bool(MARKER_CHANCE) {
        return response.to_string();
    }
    match markers.choose(rng) {
        Some(marker) => format!("{marker}... {response}"),
        None => response.to_string(),
    }
}

/// Strip action markers and hesitations before handing text to a voice
#[must_use]
pub fn clean_for_speech(text: &str) -> String {
    ACTION_MARKER.replace_all(text, "").replace("...", "")
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;

    use super::*;

    /// Every chance succeeds and every choice picks the first option
    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    /// No chance ever succeeds
    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn stutter_only_hits_matching_words() {
        let out = stutter("I want a cup of water", &mut always());
        assert_eq!(out, "I w-want a c-cup of w-water");
    }

    #[test]
    fn stutter_lowercases_prefix() {
        assert_eq!(stutter("Can it", &mut always()), "c-Can it");
        assert_eq!(stutter("Can it", &mut never()), "Can it");
    }

    #[test]
    fn fillers_prefix_sentences() {
        let out = fillers("I lost it. Help me", &mut always());
        assert_eq!(out, "um, I lost it. um, Help me");
    }

    #[test]
    fn breathing_always_prefixes() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = breathing("This is bad.", &mut rng);
        assert!(BREATHING_MARKERS.iter().any(|m| out.starts_with(m)));
        assert!(out.ends_with(" This is bad."));
    }

    #[test]
    fn repetition_repeats_questions() {
        let out = repetition("Is it safe?", &mut never());
        assert_eq!(out, "Is it safe? I mean, is it safe?");
    }

    #[test]
    fn repetition_repeats_last_word() {
        assert_eq!(repetition("help me", &mut always()), "help me me");
        assert_eq!(repetition("help me", &mut never()), "help me");
    }

    #[test]
    fn marker_needs_known_emotion() {
        assert_eq!(emotional_marker("Okay.", Emotion::Neutral, &mut always()), "Okay.");
        assert_eq!(
            emotional_marker("Okay.", Emotion::Worried, &mut always()),
            "oh no... Okay."
        );
    }

    #[test]
    fn decorate_without_habits_changes_nothing_when_calm() {
        let patterns = SpeechPatterns::default();
        let ctx = DecorationContext {
            patterns: &patterns,
            emotion: Emotion::Neutral,
            heard_jargon: true,
            impatient: true,
        };
        assert_eq!(decorate("Hello there.", &ctx, &mut always()), "Hello there.");
    }

    #[test]
    fn decorate_anxious_speaker() {
        let patterns = SpeechPatterns {
            uses_filler_words: true,
            apologizes_often: true,
            ..SpeechPatterns::default()
        };
        let ctx = DecorationContext {
            patterns: &patterns,
            emotion: Emotion::Worried,
            heard_jargon: false,
            impatient: false,
        };

        let out = decorate("Okay", &ctx, &mut always());
        assert_eq!(out, "oh no... I'm sorry, um, Okay");
    }

    #[test]
    fn clean_strips_markers_and_dots() {
        assert_eq!(clean_for_speech("*sighs* Oh no... fine"), " Oh no fine");
    }
}
