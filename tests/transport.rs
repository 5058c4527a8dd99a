mod tests {
    use flower_light_engine::{Duration, Instant, MessageAssembler, TransportError};

    const LIFETIME: Duration = Duration::from_secs(120);

    fn assembler<const N: usize>() -> MessageAssembler<N> {
        MessageAssembler::new("\n", LIFETIME, Instant::from_secs(0))
    }

    #[test]
    fn test_message_split_across_chunks() {
        let mut assembler = assembler::<64>();
        let now = Instant::from_secs(1);

        assembler.push(br#"{"co":"#).unwrap();
        assert_eq!(assembler.next_message(now), None);

        assembler.push(br##""#ff0000"}"##).unwrap();
        assert_eq!(assembler.next_message(now), None);

        assembler.push(b"\n").unwrap();
        assert_eq!(
            assembler.next_message(now),
            Some(Ok(r##"{"co":"#ff0000"}"##.to_string()))
        );
        assert!(assembler.pending().is_empty());
    }

    #[test]
    fn test_remainder_is_kept_for_the_next_message() {
        let mut assembler = assembler::<64>();
        let now = Instant::from_secs(1);

        assembler.push(b"{\"sp\":1}\n{\"br\":").unwrap();
        assert_eq!(
            assembler.next_message(now),
            Some(Ok("{\"sp\":1}".to_string()))
        );
        assert_eq!(assembler.pending(), b"{\"br\":");

        assembler.push(b"20}\n{\"ur\":2}\n").unwrap();
        assert_eq!(
            assembler.next_message(now),
            Some(Ok("{\"br\":20}".to_string()))
        );
        assert_eq!(
            assembler.next_message(now),
            Some(Ok("{\"ur\":2}".to_string()))
        );
        assert_eq!(assembler.next_message(now), None);
    }

    #[test]
    fn test_blank_messages_are_skipped() {
        let mut assembler = assembler::<64>();
        assembler.push(b"\n \r\n{}\n").unwrap();
        assert_eq!(
            assembler.next_message(Instant::from_secs(1)),
            Some(Ok("{}".to_string()))
        );
    }

    #[test]
    fn test_custom_terminator() {
        let mut assembler: MessageAssembler<64> =
            MessageAssembler::new("<END>", LIFETIME, Instant::from_secs(0));
        assembler.push(b"{\"sp\":0}<EN").unwrap();
        assert_eq!(assembler.next_message(Instant::from_secs(1)), None);

        assembler.push(b"D>").unwrap();
        assert_eq!(
            assembler.next_message(Instant::from_secs(1)),
            Some(Ok("{\"sp\":0}".to_string()))
        );
    }

    #[test]
    fn test_overflow_drops_partial_message() {
        let mut assembler = assembler::<8>();
        assembler.push(b"{\"co\":").unwrap();
        assert_eq!(
            assembler.push(b"\"rainbow\"}\n"),
            Err(TransportError::MessageTooLong { capacity: 8 })
        );
        assert!(assembler.pending().is_empty());

        assembler.push(b"{}\n").unwrap();
        assert_eq!(
            assembler.next_message(Instant::from_secs(1)),
            Some(Ok("{}".to_string()))
        );
    }

    #[test]
    fn test_invalid_utf8_is_reported_and_consumed() {
        let mut assembler = assembler::<16>();
        assembler.push(&[0xc3, 0x28, b'\n', b'{', b'}', b'\n']).unwrap();
        assert_eq!(
            assembler.next_message(Instant::from_secs(1)),
            Some(Err(TransportError::InvalidUtf8))
        );
        assert_eq!(
            assembler.next_message(Instant::from_secs(1)),
            Some(Ok("{}".to_string()))
        );
    }

    #[test]
    fn test_inactivity_window() {
        let mut assembler = assembler::<64>();
        assert_eq!(assembler.check_inactivity(Instant::from_secs(120)), Ok(()));
        assert_eq!(
            assembler.check_inactivity(Instant::from_secs(121)),
            Err(TransportError::Inactive)
        );

        assembler.push(b"{}\n").unwrap();
        assert!(assembler.next_message(Instant::from_secs(100)).is_some());
        assert_eq!(assembler.check_inactivity(Instant::from_secs(200)), Ok(()));

        // A partial message does not count as activity.
        assembler.push(b"{\"co\"").unwrap();
        assert_eq!(
            assembler.check_inactivity(Instant::from_secs(221)),
            Err(TransportError::Inactive)
        );

        assembler.reset(Instant::from_secs(221));
        assert!(assembler.pending().is_empty());
        assert_eq!(assembler.check_inactivity(Instant::from_secs(300)), Ok(()));
    }
}
