use pretty_assertions::assert_eq;
use sanjaya_core::Event;
use sanjaya_engine::{FrameError, FrameParser};

fn feed_all(parser: &mut FrameParser, chunk: &[u8]) -> Vec<Result<Event, FrameError>> {
    parser.feed(chunk).collect()
}

fn started(agent: &str) -> Event {
    Event::AgentStarted {
        agent_name: agent.to_string(),
    }
}

#[test]
fn line_split_across_chunks_decodes_once() {
    let mut parser = FrameParser::default();

    let first = feed_all(&mut parser, b"data: {\"typ");
    assert!(first.is_empty());
    assert_eq!(parser.pending_bytes(), 11);

    let second = feed_all(&mut parser, b"e\":\"agent_started\",\"agent_name\":\"Market Agent\"}\n");
    assert_eq!(second, vec![Ok(started("Market Agent"))]);
    assert_eq!(parser.pending_bytes(), 0);

    let third = feed_all(&mut parser, b"\n");
    assert!(third.is_empty());
}

#[test]
fn byte_at_a_time_yields_every_event_once() {
    let stream = concat!(
        "data: {\"type\":\"agents_selected\",\"selected_agents\":[\"Market Agent\"]}\n\n",
        "data: {\"type\":\"agent_started\",\"agent_name\":\"Market Agent\"}\n\n",
        "data: {\"type\":\"report_completed\"}\n\n",
    );
    let mut parser = FrameParser::default();
    let mut events = Vec::new();
    for byte in stream.as_bytes() {
        for frame in parser.feed(std::slice::from_ref(byte)) {
            events.push(frame.unwrap());
        }
    }
    assert_eq!(
        events,
        vec![
            Event::AgentsSelected {
                selected_agents: vec!["Market Agent".to_string()]
            },
            started("Market Agent"),
            Event::ReportCompleted,
        ]
    );
}

#[test]
fn malformed_line_does_not_stop_neighbours() {
    let mut parser = FrameParser::default();
    let frames = feed_all(
        &mut parser,
        concat!(
            "data: {\"type\":\"agent_started\",\"agent_name\":\"A\"}\n",
            "data: {not json\n",
            "data: {\"type\":\"agent_started\",\"agent_name\":\"B\"}\n",
        )
        .as_bytes(),
    );

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], Ok(started("A")));
    assert!(matches!(frames[1], Err(FrameError::InvalidJson { .. })));
    assert_eq!(frames[2], Ok(started("B")));
}

#[test]
fn missing_type_and_bad_payload_are_reported_per_line() {
    let mut parser = FrameParser::default();
    let frames = feed_all(
        &mut parser,
        concat!(
            "data: {\"agent_name\":\"A\"}\n",
            "data: \"just a string\"\n",
            "data: {\"type\":\"agent_started\"}\n",
            "data: {\"type\":\"synthesis_completed\"}\n",
        )
        .as_bytes(),
    );

    assert_eq!(frames[0], Err(FrameError::MissingType));
    assert_eq!(frames[1], Err(FrameError::MissingType));
    assert!(matches!(
        &frames[2],
        Err(FrameError::InvalidPayload { kind, .. }) if kind == "agent_started"
    ));
    assert_eq!(frames[3], Ok(Event::SynthesisCompleted));
}

#[test]
fn non_data_lines_are_ignored() {
    let mut parser = FrameParser::default();
    let frames = feed_all(
        &mut parser,
        b": keep-alive\nevent: progress\nid: 4\nretry: 100\n\ndata:{\"type\":\"report_completed\"}\ndata: {\"type\":\"report_completed\"}\n",
    );
    assert_eq!(frames, vec![Ok(Event::ReportCompleted)]);
}

#[test]
fn crlf_line_endings_are_accepted() {
    let mut parser = FrameParser::default();
    let frames = feed_all(&mut parser, b"data: {\"type\":\"synthesis_completed\"}\r\n\r\n");
    assert_eq!(frames, vec![Ok(Event::SynthesisCompleted)]);
}

#[test]
fn unknown_kind_is_not_an_error() {
    let mut parser = FrameParser::default();
    let frames = feed_all(&mut parser, b"data: {\"type\":\"heartbeat\"}\n");
    assert_eq!(frames, vec![Ok(Event::Unknown)]);
}

#[test]
fn multibyte_character_split_across_chunks() {
    let line = "data: {\"type\":\"error\",\"message\":\"échec 📉\"}\n".as_bytes();
    let split = line.iter().position(|b| *b == 0xF0).unwrap() + 2;
    let mut parser = FrameParser::default();

    assert!(feed_all(&mut parser, &line[..split]).is_empty());
    let frames = feed_all(&mut parser, &line[split..]);
    assert_eq!(
        frames,
        vec![Ok(Event::Error {
            message: "échec 📉".to_string()
        })]
    );
}

#[test]
fn invalid_utf8_is_reported() {
    let mut parser = FrameParser::default();
    let frames = feed_all(&mut parser, b"data: {\"type\":\"error\",\"message\":\"\xff\"}\n");
    assert_eq!(frames, vec![Err(FrameError::InvalidUtf8)]);
}

#[test]
fn finish_discards_unterminated_tail() {
    let mut parser = FrameParser::default();
    let frames = feed_all(&mut parser, b"data: {\"type\":\"report_completed\"}\ndata: {\"type\":\"comp");
    assert_eq!(frames, vec![Ok(Event::ReportCompleted)]);

    assert_eq!(parser.finish(), 19);
    assert_eq!(parser.pending_bytes(), 0);
    assert!(feed_all(&mut parser, b"leted\"}\n").is_empty());
}

#[test]
fn unread_frames_survive_an_early_drop() {
    let mut parser = FrameParser::default();
    {
        let mut frames = parser.feed(
            b"data: {\"type\":\"synthesis_completed\"}\ndata: {\"type\":\"report_completed\"}\n",
        );
        assert_eq!(frames.next(), Some(Ok(Event::SynthesisCompleted)));
    }
    let rest = feed_all(&mut parser, b"");
    assert_eq!(rest, vec![Ok(Event::ReportCompleted)]);
}

#[test]
fn oversized_partial_line_is_dropped_once() {
    let mut parser = FrameParser::new(48);

    let frames = feed_all(&mut parser, &[b'x'; 60]);
    assert_eq!(frames, vec![Err(FrameError::LineTooLong { max: 48 })]);
    assert_eq!(parser.pending_bytes(), 0);

    // The tail of the same line is skipped silently.
    let frames = feed_all(&mut parser, &[b'x'; 60]);
    assert!(frames.is_empty());
    let frames = feed_all(&mut parser, b"xx\ndata: {\"type\":\"report_completed\"}\n");
    assert_eq!(frames, vec![Ok(Event::ReportCompleted)]);
}

#[test]
fn oversized_complete_line_is_reported() {
    let mut parser = FrameParser::new(16);
    let frames = feed_all(&mut parser, b"data: {\"type\":\"synthesis_completed\"}\n");
    assert_eq!(frames, vec![Err(FrameError::LineTooLong { max: 16 })]);
}
