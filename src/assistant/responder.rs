//! Canned replies for the coding-assistant demo

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const DEBUG_KEYWORDS: &[&str] = &[
    "error",
    "bug",
    "issue",
    "problem",
    "not working",
    "broken",
    "exception",
    "crash",
    "fail",
    "debug",
    "trace",
    "stack trace",
];

const CODE_KEYWORDS: &[&str] = &[
    "function",
    "variable",
    "class",
    "method",
    "array",
    "object",
    "loop",
    "if",
    "else",
    "return",
    "import",
    "export",
    "async",
    "await",
    "promise",
    "callback",
    "api",
    "database",
    "query",
    "algorithm",
    "data structure",
    "recursion",
    "iteration",
];

/// What the user is talking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Debugging,
    Code,
    Question,
    General,
}

impl Topic {
    /// Classify by keyword; debugging beats code beats questions
    #[must_use]
    pub fn classify(input: &str) -> Self {
        let lower = input.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if mentions(DEBUG_KEYWORDS) {
            Self::Debugging
        } else if mentions(CODE_KEYWORDS) {
            Self::Code
        } else if input.contains('?') {
            Self::Question
        } else {
            Self::General
        }
    }

    /// Every canned reply for this topic
    #[must_use]
    pub const fn responses(self) -> &'static [&'static str] {
        match self {
            Self::Debugging => &[
                "I see you're dealing with a debugging challenge... Let me think through this systematically. \
                 When I encounter errors like this, I usually start by checking the most common culprits. \
                 Can you share the specific error message you're seeing? That'll help me pinpoint what's going wrong.",
                "Ah, debugging time! This is where we put on our detective hats... \
                 The key to effective debugging is being methodical and patient. \
                 First, let's isolate the problem. Where exactly does the issue occur? \
                 Is it consistent or intermittent?",
                "Debugging can be frustrating, but it's also a great learning opportunity... \
                 I find that walking through the code step by step often reveals the issue. \
                 Have you tried adding log statements or a debugger to trace the execution flow?",
                "Let's tackle this bug together! In my experience, most bugs fall into a few categories... \
                 Could this be a logic error, a syntax issue, or maybe a problem with data types? \
                 Sometimes the solution is simpler than we initially think.",
            ],
            Self::Code => &[
                "That's a great programming question! Let me break this down for you... \
                 When working with code like this, I always consider both the immediate solution and the long-term maintainability. \
                 The approach I'd recommend depends on your specific use case. What are you trying to achieve?",
                "Interesting coding challenge! This reminds me of a pattern I've seen many times... \
                 The elegant solution here involves thinking about the problem from a different angle. \
                 Let me walk you through the key concepts step by step.",
                "Good question about programming! This is actually a fundamental concept that's worth understanding deeply... \
                 I think the best way to explain this is with a practical example. \
                 Have you worked with similar patterns before, or should we start with the basics?",
                "Ah, this touches on some important programming principles... \
                 The key thing to remember is that clean, readable code is often more valuable than clever code. \
                 Let me explain the most straightforward approach first, then we can explore optimizations.",
            ],
            Self::Question => &[
                "That's a thoughtful question! Let me consider this carefully... \
                 There are actually several ways to approach this topic, and each has its merits. \
                 What specific aspect are you most curious about?",
                "Great question! This is something I find quite interesting to discuss... \
                 The answer depends on several factors, but I can give you a comprehensive overview. \
                 Are you looking for a theoretical explanation or practical guidance?",
                "Excellent question! You've touched on something that's worth exploring in detail... \
                 I think the most helpful approach is to break this down into smaller, manageable pieces. \
                 Let me start with the fundamentals and build up from there.",
                "That's exactly the kind of question that leads to deeper understanding... \
                 I appreciate that you're thinking critically about this topic. \
                 The answer involves several interconnected concepts. Shall we dive in?",
            ],
            Self::General => &[
                "I find that topic quite fascinating! Let me share my thoughts on this... \
                 There's actually more depth to this than might appear on the surface. \
                 What sparked your interest in this particular area?",
                "That's an interesting point you've raised... \
                 I think there are multiple perspectives worth considering here. \
                 From my experience, the key is finding the right balance. What's your take on it?",
                "Thanks for bringing that up! It's a topic that connects to many other areas... \
                 I've been thinking about similar concepts recently, and I'm curious about your perspective. \
                 How does this relate to what you're working on?",
                "That's a really insightful observation... \
                 You've highlighted something that I think deserves more attention. \
                 The implications of this extend beyond what we might initially consider.",
            ],
        }
    }
}

/// Picks a random canned reply for the input's topic
#[derive(Debug)]
pub struct CannedResponder<R> {
    rng: R,
}

impl CannedResponder<StdRng> {
    /// Responder seeded from OS entropy
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl Default for CannedResponder<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> CannedResponder<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Reply to `input`
    pub fn respond(&mut self, input: &str) -> &'static str {
        let topic = Topic::classify(input);
        tracing::debug!(?topic, "picking canned reply");
        topic
            .responses()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("I see. Tell me more.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debugging_wins_over_code() {
        assert_eq!(Topic::classify("my function throws an error"), Topic::Debugging);
        assert_eq!(Topic::classify("How do I write a loop?"), Topic::Code);
        assert_eq!(Topic::classify("Why is the sky blue?"), Topic::Question);
        assert_eq!(Topic::classify("Nice weather today."), Topic::General);
    }

    #[test]
    fn multi_word_keywords() {
        assert_eq!(Topic::classify("It's NOT WORKING"), Topic::Debugging);
        assert_eq!(Topic::classify("pick a data structure"), Topic::Code);
    }

    #[test]
    fn four_replies_per_topic() {
        for topic in [Topic::Debugging, Topic::Code, Topic::Question, Topic::General] {
            assert_eq!(topic.responses().len(), 4);
        }
    }

    #[test]
    fn reply_comes_from_topic() {
        let mut responder = CannedResponder::new(StdRng::seed_from_u64(9));
        let reply = responder.respond("there's a bug here");
        assert!(Topic::Debugging.responses().contains(&reply));
    }
}
