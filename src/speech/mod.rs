//! Simulated speech: emotional state and human-sounding decoration

mod emotion;
mod patterns;

pub use emotion::{Emotion, EmotionShift, VoiceSettings};
pub use patterns::{
    APOLOGIES, BREATHING_MARKERS, DecorationContext, FILLER_WORDS, INTERRUPTION_STARTERS,
    SpeechPatterns, apology, breathing, clean_for_speech, decorate, emotional_marker, fillers,
    interruption, repetition, stutter,
};
