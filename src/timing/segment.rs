//! Cadence chunking
//!
//! Splits text into sentences, then into breath-sized chunks, and assigns
//! each chunk the pause that should follow it. Clause boundaries come from
//! commas, conjunctions and a maximum clause length; sentence pauses are
//! stretched for questions, exclamations, topic transitions and paragraph
//! breaks.

use std::time::Duration;

use super::TimingConfig;

/// Words that naturally end a clause
const BREATHING_WORDS: &[&str] = &[
    "and",
    "but",
    "or",
    "so",
    "because",
    "however",
    "therefore",
    "meanwhile",
    "additionally",
    "furthermore",
    "moreover",
    "nevertheless",
];

/// Words that end a spoken clause
const VOICE_BREATHING_WORDS: &[&str] = &[
    "and",
    "but",
    "or",
    "so",
    "because",
    "however",
    "therefore",
];

/// Spoken clauses are broken after this many words
pub const VOICE_CLAUSE_WORDS: usize = 6;

/// Sentence openers that introduce a new topic
const TRANSITION_PHRASES: &[&str] = &[
    "So",
    "Now",
    "Next",
    "Then",
    "However",
    "Additionally",
    "Furthermore",
    "Meanwhile",
    "On the other hand",
    "In contrast",
    "For example",
    "Let me explain",
    "Here's the thing",
];

/// Sentence openers that start a new paragraph
const PARAGRAPH_STARTERS: &[&str] = &[
    "So",
    "Now",
    "Next",
    "Then",
    "However",
    "Additionally",
    "Furthermore",
];

/// A piece of text followed by a pause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub pause_after: Duration,
}

/// Split text after `.`, `!` or `?` when followed by whitespace
///
/// Pieces are trimmed and empty pieces dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(next_idx, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        let end = idx + c.len_utf8();
        push_trimmed(&mut sentences, &text[start..end]);

        // Skip the whitespace run separating the sentences
        start = next_idx;
        while let Some(&(ws_idx, ws)) = chars.peek() {
            if !ws.is_whitespace() {
                break;
            }
            start = ws_idx + ws.len_utf8();
            chars.next();
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece);
    }
}

/// Break text into timed chunks
#[must_use]
pub fn plan_chunks(text: &str, config: &TimingConfig) -> Vec<Chunk> {
    let sentences = split_sentences(text);
    let mut chunks = Vec::new();

    for (i, sentence) in sentences.iter().enumerate() {
        let mut current = String::new();

        for (j, word) in sentence.split_whitespace().enumerate() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);

            if is_breathing_point(word, j, config.clause_words) {
                chunks.push(Chunk {
                    text: std::mem::take(&mut current),
                    pause_after: config.breath,
                });
            }
        }

        if current.is_empty() {
            continue;
        }

        let next = sentences.get(i + 1).copied();
        chunks.push(Chunk {
            text: current,
            pause_after: sentence_pause(sentence, next, config),
        });
    }

    chunks
}

/// Break text into chunks sized for speech
///
/// Clauses run shorter than in [`plan_chunks`]. Breaths last 70% of the
/// configured breath, sentence ends 80% of the sentence pause, and
/// questions or exclamations 120% of it.
#[must_use]
pub fn plan_voice_chunks(text: &str, config: &TimingConfig) -> Vec<Chunk> {
    let breath = percent_of(config.breath, 70);
    let mut chunks = Vec::new();

    for sentence in split_sentences(text) {
        let mut current = String::new();

        for (j, word) in sentence.split_whitespace().enumerate() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);

            if ends_clause(word, j, VOICE_CLAUSE_WORDS, VOICE_BREATHING_WORDS) {
                chunks.push(Chunk {
                    text: std::mem::take(&mut current),
                    pause_after: breath,
                });
            }
        }

        if current.is_empty() {
            continue;
        }

        let percent = if sentence.ends_with('?') || sentence.ends_with('!') {
            120
        } else {
            80
        };
        chunks.push(Chunk {
            text: current,
            pause_after: percent_of(config.sentence, percent),
        });
    }

    chunks
}

/// `percent`% of `duration`, truncated to whole milliseconds
fn percent_of(duration: Duration, percent: u32) -> Duration {
    let scaled = duration * percent / 100;
    Duration::from_millis(u64::try_from(scaled.as_millis()).unwrap_or(u64::MAX))
}

/// Sum of all pauses in a plan
#[must_use]
pub fn total_pause(chunks: &[Chunk]) -> Duration {
    chunks.iter().map(|c| c.pause_after).sum()
}

fn sentence_pause(sentence: &str, next: Option<&str>, config: &TimingConfig) -> Duration {
    if next.is_some_and(is_paragraph_break) {
        return config.paragraph;
    }
    if is_topic_transition(sentence) {
        return config.emphasis.mul_f64(1.5);
    }
    if sentence.ends_with('?') || sentence.ends_with('!') {
        return config.emphasis;
    }
    config.sentence
}

/// Whether a clause should end after `word`
///
/// `index` is the word's position in its sentence.
#[must_use]
pub fn is_breathing_point(word: &str, index: usize, clause_words: usize) -> bool {
    ends_clause(word, index, clause_words, BREATHING_WORDS)
}

fn ends_clause(word: &str, index: usize, clause_words: usize, breathing_words: &[&str]) -> bool {
    if word.ends_with(',') {
        return true;
    }

    let lower = word.to_lowercase();
    let clean = match lower.find([',', '.', '!', '?', ';', ':']) {
        Some(pos) => {
            let mut s = lower.clone();
            s.remove(pos);
            s
        }
        None => lower,
    };
    if breathing_words.contains(&clean.as_str()) {
        return true;
    }

    clause_words > 0 && index > 0 && index % clause_words == 0
}

/// Whether a sentence opens with a topic-transition phrase
#[must_use]
pub fn is_topic_transition(sentence: &str) -> bool {
    TRANSITION_PHRASES.iter().any(|p| sentence.starts_with(p))
}

/// Whether a sentence opens a new paragraph
#[must_use]
pub fn is_paragraph_break(sentence: &str) -> bool {
    PARAGRAPH_STARTERS.iter().any(|p| sentence.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::Pace;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn splits_on_terminal_punctuation_followed_by_space() {
        let s = split_sentences("Hello there. How are you?  Fine!\nGood.");
        assert_eq!(s, vec!["Hello there.", "How are you?", "Fine!", "Good."]);
    }

    #[test]
    fn keeps_inline_punctuation_together() {
        let s = split_sentences("Version 1.2 is out... really");
        assert_eq!(s, vec!["Version 1.2 is out...", "really"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(plan_chunks("", &TimingConfig::default()).is_empty());
        assert!(plan_chunks("   ", &TimingConfig::default()).is_empty());
    }

    #[test]
    fn comma_gets_breath_pause() {
        let config = Pace::Normal.timing();
        let chunks = plan_chunks("Well, that works.", &config);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "Well,");
        assert_eq!(chunks[0].pause_after, ms(500));
        assert_eq!(chunks[1].text, "that works.");
        assert_eq!(chunks[1].pause_after, ms(800));
    }

    #[test]
    fn conjunction_ends_clause() {
        let config = Pace::Normal.timing();
        let chunks = plan_chunks("I tried it and it failed.", &config);

        assert_eq!(chunks[0].text, "I tried it and");
        assert_eq!(chunks[0].pause_after, config.breath);
        assert_eq!(chunks[1].text, "it failed.");
    }

    #[test]
    fn long_clauses_are_broken_every_n_words() {
        let config = Pace::Fast.timing();
        let text = "one two three four five six seven eight nine ten eleven.";
        let chunks = plan_chunks(text, &config);

        // index 8 ("nine") closes the first clause
        assert_eq!(chunks[0].text, "one two three four five six seven eight nine");
        assert_eq!(chunks[1].text, "ten eleven.");
    }

    #[test]
    fn questions_get_emphasis() {
        let config = Pace::Slow.timing();
        let chunks = plan_chunks("Is it working?", &config);
        assert_eq!(chunks.last().unwrap().pause_after, config.emphasis);
    }

    #[test]
    fn transitions_get_stretched_emphasis() {
        let config = Pace::Normal.timing();
        let chunks = plan_chunks("Let me explain the idea.", &config);
        assert_eq!(chunks.last().unwrap().pause_after, ms(1500));
    }

    #[test]
    fn paragraph_break_before_starter_sentence() {
        let config = Pace::Normal.timing();
        let chunks = plan_chunks("That is the setup. Next we build it.", &config);

        assert_eq!(chunks[0].text, "That is the setup.");
        assert_eq!(chunks[0].pause_after, config.paragraph);
    }

    #[test]
    fn breathing_word_punctuation_is_ignored() {
        assert!(is_breathing_point("However;", 1, 8));
        assert!(is_breathing_point("BUT", 1, 8));
        assert!(!is_breathing_point("butter", 1, 8));
        assert!(!is_breathing_point("word", 0, 8));
        assert!(is_breathing_point("word", 16, 8));
    }

    #[test]
    fn total_pause_sums_chunks() {
        let config = Pace::Normal.timing();
        let chunks = plan_chunks("Well, fine.", &config);
        assert_eq!(total_pause(&chunks), ms(1300));
    }

    #[test]
    fn voice_chunks_use_scaled_pauses() {
        let config = Pace::Normal.timing();
        let chunks = plan_voice_chunks("Hello there, friend. How are you?", &config);

        let plan: Vec<(&str, Duration)> =
            chunks.iter().map(|c| (c.text.as_str(), c.pause_after)).collect();
        assert_eq!(
            plan,
            [
                ("Hello there,", ms(350)),
                ("friend.", ms(640)),
                ("How are you?", ms(960)),
            ]
        );
    }

    #[test]
    fn voice_clauses_break_every_six_words() {
        let config = Pace::Fast.timing();
        let chunks = plan_voice_chunks("one two three four five six seven eight.", &config);

        assert_eq!(chunks[0].text, "one two three four five six seven");
        assert_eq!(chunks[0].pause_after, ms(175));
        assert_eq!(chunks[1].text, "eight.");
    }

    #[test]
    fn voice_breathing_words_are_the_short_list() {
        let config = Pace::Normal.timing();
        assert_eq!(plan_voice_chunks("It ran meanwhile nothing broke.", &config).len(), 1);
        assert_eq!(plan_voice_chunks("It ran however nothing broke.", &config).len(), 2);
    }
}
