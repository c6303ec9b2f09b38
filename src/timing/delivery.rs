//! Timed delivery of chunk and segment plans

use std::io::Write;
use std::time::Duration;

use super::{Chunk, Pacer, Segment, Typist};
use crate::Result;

/// Spinner frames shown while "thinking"
pub const THINKING_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Type each chunk, resting for its pause afterwards
///
/// Returns `false` if delivery was deactivated before the end.
///
/// # Errors
///
/// Returns error if the writer fails
pub async fn deliver_chunks<W: Write + Send, P: Pacer>(
    typist: &mut Typist<W, P>,
    chunks: &[Chunk],
    typing_delay: Duration,
) -> Result<bool> {
    for (i, chunk) in chunks.iter().enumerate() {
        if !typist.is_active() {
            return Ok(false);
        }

        if i > 0 {
            typist.write_now(" ")?;
        }
        if !typist.type_text(&chunk.text, typing_delay).await? {
            return Ok(false);
        }
        typist.pause(chunk.pause_after).await;
    }

    Ok(typist.is_active())
}

/// Play a marker plan: pause, type at the emotion's speed, pause
///
/// # Errors
///
/// Returns error if the writer fails
pub async fn deliver_segments<W: Write + Send, P: Pacer>(
    typist: &mut Typist<W, P>,
    segments: &[Segment],
) -> Result<bool> {
    for segment in segments {
        if !typist.is_active() {
            return Ok(false);
        }

        typist.pause(segment.pause_before).await;
        if !segment.text.is_empty()
            && !typist
                .type_text(&segment.text, segment.emotion.typing_delay())
                .await?
        {
            return Ok(false);
        }
        typist.pause(segment.pause_after).await;
    }

    Ok(typist.is_active())
}

/// Animate a spinner for the thinking pause, then clear the line
///
/// # Errors
///
/// Returns error if the writer fails
pub async fn thinking_indicator<W: Write + Send, P: Pacer>(
    typist: &mut Typist<W, P>,
    duration: Duration,
) -> Result<()> {
    if !typist.is_active() {
        return Ok(());
    }

    let mut elapsed = Duration::ZERO;
    let mut frame = 0;

    while elapsed < duration {
        let step = FRAME_INTERVAL.min(duration - elapsed);
        typist.write_now(&format!("\r🧠 {} Thinking...", THINKING_FRAMES[frame]))?;
        typist.pause(step).await;
        elapsed += step;
        frame = (frame + 1) % THINKING_FRAMES.len();
    }

    typist.write_now(&format!("\r{}\r", " ".repeat(30)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::Emotion;
    use crate::timing::{Pace, RecordingPacer, plan_chunks, plan_segments};

    #[tokio::test]
    async fn chunks_are_joined_with_spaces() {
        let pacer = RecordingPacer::new();
        let mut typist = Typist::new(Vec::new(), pacer.clone()).with_jitter(0.0);
        let config = Pace::Fast.timing();
        let chunks = plan_chunks("Well, this works. Right?", &config);

        assert!(deliver_chunks(&mut typist, &chunks, config.typing_delay).await.unwrap());

        let out = String::from_utf8(typist.into_inner()).unwrap();
        assert_eq!(out, "Well, this works. Right?");
        assert!(pacer.pauses().contains(&config.breath));
        assert!(pacer.pauses().contains(&config.emphasis));
    }

    #[tokio::test]
    async fn action_markers_are_not_typed() {
        let mut typist = Typist::new(Vec::new(), RecordingPacer::new());
        let segments = plan_segments("*sighs* Fine.", Emotion::Frustrated);

        deliver_segments(&mut typist, &segments).await.unwrap();

        let out = String::from_utf8(typist.into_inner()).unwrap();
        assert_eq!(out, " Fine.");
    }

    #[tokio::test]
    async fn thinking_spans_the_whole_pause() {
        let pacer = RecordingPacer::new();
        let mut typist = Typist::new(Vec::new(), pacer.clone());

        thinking_indicator(&mut typist, Duration::from_millis(250)).await.unwrap();

        assert_eq!(pacer.total(), Duration::from_millis(250));
        assert_eq!(pacer.pauses().len(), 3);
        let out = String::from_utf8(typist.into_inner()).unwrap();
        assert!(out.contains("⠋ Thinking..."));
    }
}
