//! Training and chat session integration tests
//!
//! Sessions write into a buffer and wait on a recording pacer, so nothing
//! here sleeps.

use std::time::Duration;

use cadence::Pace;
use cadence::assistant::{CannedResponder, ChatSession, Role};
use cadence::config::Config;
use cadence::input::spawn_line_reader;
use cadence::speech::Emotion;
use cadence::timing::{RecordingPacer, Typist};
use cadence::training::{NO_CUSTOMER_REPLY, TrainingSession, find_customer};
use cadence::voice::Voice;
use rand::SeedableRng;
use rand::rngs::StdRng;

mod common;

type TestTypist = Typist<Vec<u8>, RecordingPacer>;

fn typist() -> (TestTypist, RecordingPacer) {
    let pacer = RecordingPacer::new();
    (Typist::new(Vec::new(), pacer.clone()).with_seed(9), pacer)
}

fn output(typist: &TestTypist) -> String {
    String::from_utf8_lossy(typist.writer()).into_owned()
}

#[tokio::test]
async fn test_training_session_end_to_end() {
    let (typist, pacer) = typist();
    let mut session = TrainingSession::new(typist).with_seed(42);

    let input = b"/customer frustrated_sarah_1234\n\
        Hello, thank you for calling\n\
        I understand your concern, let me verify your identity\n\
        /analysis\n\
        /quit\n";
    session
        .run(&input[..], std::future::pending())
        .await
        .unwrap();

    let out = output(session.typist());
    assert!(out.contains("Selected customer: Sarah Johnson"));
    assert!(out.contains("📱 Customer: "));
    assert!(out.contains("Training Session Complete"));

    assert_eq!(session.history().len(), 2);
    assert!(session.history().iter().all(|i| !i.reply.is_empty()));
    assert_eq!(session.report().total_interactions, 2);
    assert_eq!(session.metrics().emotion_history.len(), 2);
    assert!(!pacer.pauses().is_empty());
}

#[tokio::test]
async fn test_without_customer_reply_is_generic() {
    let (typist, _pacer) = typist();
    let mut session = TrainingSession::new(typist);

    let reply = session
        .respond("Hello, how can I help?", Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(reply, NO_CUSTOMER_REPLY);
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_emotion_command_changes_state() {
    let (typist, _pacer) = typist();
    let customer = find_customer("anxious_maria_9012").unwrap();
    let mut session = TrainingSession::new(typist).with_customer(customer);

    session.handle_line("/emotion angry").await.unwrap();
    assert_eq!(session.state().emotion, Emotion::Angry);

    session.handle_line("/emotion sleepy").await.unwrap();
    assert_eq!(session.state().emotion, Emotion::Angry);
    assert!(output(session.typist()).contains("Invalid emotion"));
}

#[tokio::test]
async fn test_voice_reply_is_shown() {
    let (typist, _pacer) = typist();
    let customer = find_customer("elderly_robert_5678").unwrap();
    let mut session = TrainingSession::new(typist)
        .with_customer(customer)
        .with_voice(Voice::console())
        .with_seed(1);

    session
        .respond("Good morning, thank you for calling", Duration::from_secs(3))
        .await
        .unwrap();
    assert!(output(session.typist()).contains("🔊 [VOICE]: "));

    session.handle_line("/voice off").await.unwrap();
    assert!(!session.voice_enabled());
}

#[tokio::test]
async fn test_shutdown_ends_session() {
    let (typist, _pacer) = typist();
    let mut session = TrainingSession::new(typist);

    // Input that never arrives
    let (_client, server) = tokio::io::duplex(64);
    session
        .run(tokio::io::BufReader::new(server), async {})
        .await
        .unwrap();

    assert!(output(session.typist()).contains("Training Session Complete"));
}

#[tokio::test]
async fn test_chat_session_pace_and_reply() {
    let (typist, pacer) = typist();
    let mut chat = ChatSession::new(typist, Pace::Fast)
        .with_responder(CannedResponder::new(StdRng::seed_from_u64(4)));

    let input = b"/pace slow\nI hit a weird bug\n/status\n/quit\n";
    chat.run(&input[..], std::future::pending()).await.unwrap();

    assert_eq!(chat.pace(), Pace::Slow);
    assert_eq!(chat.history().len(), 2);
    assert_eq!(chat.history()[0].role, Role::User);
    assert_eq!(chat.history()[1].role, Role::Assistant);
    assert!(!chat.is_active());

    let out = output(chat.typist());
    assert!(out.contains("Conversation pace changed to: SLOW"));
    assert!(out.contains("Messages exchanged: 2"));
    // slow thinking pause is spent somewhere in the recorded waits
    assert!(pacer.total() >= Duration::from_millis(3000));
}

#[tokio::test]
async fn test_scripted_call_end_to_end() {
    let (typist, pacer) = typist();
    let mut session = TrainingSession::new(typist).with_seed(7);

    let input = b"/scenario fraud_detection\n\
        Hello, thank you for calling. Can you confirm your name?\n\
        /transactions\n\
        /notes Flagged charge disputed\n\
        /resolve\n\
        /end\n";
    session
        .run(&input[..], std::future::pending())
        .await
        .unwrap();

    assert_eq!(session.customer().map(|c| c.name.as_str()), Some("Sarah Johnson"));
    assert!(session.call().resolved);
    assert_eq!(session.call().notes().len(), 1);
    assert!(pacer.pauses().contains(&Duration::from_millis(1500)));

    let out = output(session.typist());
    assert!(out.contains("📞 CALL INCOMING..."));
    assert!(out.contains("🚩 2025-06-14"));
    assert!(out.contains("✅ Call Marked as Resolved"));
    assert!(out.contains("Notes: 1"));
    assert!(out.contains("Training Session Complete"));
}

/// A line source that never yields
struct Silent;

impl std::io::Read for Silent {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            std::thread::park();
        }
    }
}

#[tokio::test]
async fn test_shutdown_ends_session_blocked_on_input_thread() {
    let (typist, _pacer) = typist();
    let mut session = TrainingSession::new(typist);
    let input = spawn_line_reader(std::io::BufReader::new(Silent)).unwrap();

    tokio::time::timeout(Duration::from_secs(5), session.run(input, async {}))
        .await
        .expect("session ignored shutdown")
        .unwrap();

    assert!(output(session.typist()).contains("Training Session Complete"));
}

#[tokio::test]
async fn test_chat_speaks_replies_when_voice_is_on() {
    let (typist, _pacer) = typist();
    let mut chat = ChatSession::new(typist, Pace::Fast)
        .with_responder(CannedResponder::new(StdRng::seed_from_u64(4)))
        .with_voice(Config::default());

    let input = b"/voice rate 1.2\nHow do I fix this?\n/voice off\n/quit\n";
    chat.run(&input[..], std::future::pending()).await.unwrap();

    assert!(!chat.voice_enabled());
    assert!((chat.voice_settings().rate - 1.2).abs() < f32::EPSILON);
    let out = output(chat.typist());
    assert!(out.contains("🔊 Voice: CONSOLE"));
    assert_eq!(out.matches("🔊 Speaking response...").count(), 2);
    assert!(out.contains("🔇 Voice output disabled"));
}
