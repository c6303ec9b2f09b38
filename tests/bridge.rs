//! Editor bridge integration tests

use std::time::Duration;

use cadence::Pace;
use cadence::assistant::CannedResponder;
use cadence::bridge::{self, BridgeEvent};
use cadence::timing::{Pacer, RecordingPacer, TimingConfig, TokioPacer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};

mod common;

async fn run_bridge(input: &'static [u8]) -> Vec<BridgeEvent> {
    let out = bridge::serve(
        input,
        Vec::new(),
        Pace::Fast.timing(),
        RecordingPacer::new(),
        CannedResponder::new(StdRng::seed_from_u64(5)),
    )
    .await
    .unwrap();

    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// A bridge fed and read through in-memory pipes
struct LiveBridge {
    input: DuplexStream,
    events: Lines<BufReader<DuplexStream>>,
}

impl LiveBridge {
    fn spawn<P: Pacer + 'static>(timing: TimingConfig, pacer: P) -> Self {
        let (input, bridge_in) = tokio::io::duplex(4096);
        let (bridge_out, events) = tokio::io::duplex(4096);
        tokio::spawn(bridge::serve(
            BufReader::new(bridge_in),
            bridge_out,
            timing,
            pacer,
            CannedResponder::new(StdRng::seed_from_u64(9)),
        ));
        Self {
            input,
            events: BufReader::new(events).lines(),
        }
    }

    async fn send(&mut self, lines: &str) {
        self.input.write_all(lines.as_bytes()).await.unwrap();
    }

    async fn next(&mut self) -> Option<BridgeEvent> {
        let line = tokio::time::timeout(Duration::from_secs(5), self.events.next_line())
            .await
            .expect("bridge event within five seconds")
            .unwrap()?;
        Some(serde_json::from_str(&line).unwrap())
    }

    async fn rest(&mut self) -> Vec<BridgeEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next().await {
            events.push(event);
        }
        events
    }
}

#[tokio::test]
async fn test_bridge_answers_input_queued_with_stop() {
    let mut bridge = LiveBridge::spawn(Pace::Fast.timing(), RecordingPacer::new());
    bridge.send("{\"command\":\"start\"}\n").await;
    assert_eq!(bridge.next().await, Some(BridgeEvent::Started));

    bridge
        .send("{\"command\":\"input\",\"text\":\"Why is my loop slow?\"}\n{\"command\":\"stop\"}\n")
        .await;
    let events = bridge.rest().await;

    assert_eq!(events[0], BridgeEvent::Thinking);
    assert!(!events.iter().any(|e| matches!(e, BridgeEvent::Error { .. })), "{events:?}");
    assert!(matches!(events[events.len() - 2], BridgeEvent::Response { .. }));
    assert_eq!(events.last(), Some(&BridgeEvent::Stopped));
}

#[tokio::test]
async fn test_bridge_pause_cuts_a_long_thinking_pause() {
    let timing = TimingConfig {
        thinking: Duration::from_secs(60),
        ..Pace::Fast.timing()
    };
    let mut bridge = LiveBridge::spawn(timing, TokioPacer);
    bridge.send("{\"command\":\"start\"}\n").await;
    assert_eq!(bridge.next().await, Some(BridgeEvent::Started));

    bridge
        .send("{\"command\":\"input\",\"text\":\"hello\"}\n")
        .await;
    assert_eq!(bridge.next().await, Some(BridgeEvent::Thinking));

    bridge.send("{\"command\":\"pause\"}\n").await;
    assert!(matches!(bridge.next().await, Some(BridgeEvent::Response { .. })));
    assert_eq!(bridge.next().await, Some(BridgeEvent::Paused));

    bridge
        .send("{\"command\":\"input\",\"text\":\"still there?\"}\n{\"command\":\"stop\"}\n")
        .await;
    assert_eq!(
        bridge.next().await,
        Some(BridgeEvent::error("conversation is paused"))
    );
    assert_eq!(bridge.next().await, Some(BridgeEvent::Stopped));
}

#[tokio::test]
async fn test_bridge_full_conversation() {
    let events = run_bridge(
        b"{\"command\":\"start\"}\n\
          {\"command\":\"input\",\"text\":\"How do I write a loop?\"}\n\
          {\"command\":\"stop\"}\n",
    )
    .await;

    assert_eq!(events[0], BridgeEvent::Started);
    assert_eq!(events[1], BridgeEvent::Thinking);
    assert!(matches!(events[2], BridgeEvent::Chunk { .. }));
    assert_eq!(events.last(), Some(&BridgeEvent::Stopped));

    let Some(BridgeEvent::Response { text }) = events.iter().rev().nth(1) else {
        panic!("expected response before stop: {events:?}");
    };
    let spoken: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            BridgeEvent::Chunk { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(spoken.join(" ").split_whitespace().count(), text.split_whitespace().count());
}

#[tokio::test]
async fn test_bridge_reports_bad_lines_and_keeps_going() {
    let events = run_bridge(
        b"not json\n\
          {\"command\":\"start\"}\n\
          \n\
          {\"command\":\"configure\",\"breath_pause_ms\":50}\n",
    )
    .await;

    assert!(matches!(&events[0], BridgeEvent::Error { message } if message.contains("bad request")));
    assert_eq!(events[1], BridgeEvent::Started);
    assert_eq!(events[2], BridgeEvent::Configured);
    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn test_bridge_pause_and_resume() {
    let events = run_bridge(
        b"{\"command\":\"start\"}\n\
          {\"command\":\"pause\"}\n\
          {\"command\":\"resume\"}\n\
          {\"command\":\"input\",\"text\":\"hello\"}\n",
    )
    .await;

    assert_eq!(events[1], BridgeEvent::Paused);
    assert_eq!(events[2], BridgeEvent::Resumed);
    assert_eq!(events[3], BridgeEvent::Thinking);
    assert!(matches!(events.last(), Some(BridgeEvent::Response { .. })));
}
