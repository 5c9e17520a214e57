use helpdesk_core::logs::{LOG_BUFFER_CAPACITY, LogFeed, RollingLogBuffer, ScriptedLogSource};
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn buffer_holds_the_last_min_n_cap_entries(n in 0usize..200) {
        let mut buffer = RollingLogBuffer::default();
        for i in 0..n {
            buffer.push(i);
            prop_assert!(buffer.len() <= LOG_BUFFER_CAPACITY);
        }

        let kept = n.min(LOG_BUFFER_CAPACITY);
        prop_assert_eq!(buffer.len(), kept);
        let expected: Vec<usize> = (n - kept..n).collect();
        let actual: Vec<usize> = buffer.iter().copied().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn push_on_full_buffer_evicts_exactly_the_oldest(extra in 1usize..100) {
        let mut buffer = RollingLogBuffer::default();
        for i in 0..LOG_BUFFER_CAPACITY {
            buffer.push(i);
        }
        for i in 0..extra {
            let newest = LOG_BUFFER_CAPACITY + i;
            let evicted = buffer.push(newest);
            prop_assert_eq!(evicted, Some(i));
            prop_assert_eq!(buffer.len(), LOG_BUFFER_CAPACITY);
            prop_assert_eq!(buffer.newest(), Some(&newest));
        }
    }

    #[test]
    fn any_capacity_keeps_its_bound(capacity in 0usize..20, n in 0usize..60) {
        let mut buffer = RollingLogBuffer::with_capacity(capacity);
        for i in 0..n {
            buffer.push(i);
            prop_assert!(buffer.len() <= capacity);
        }
        prop_assert_eq!(buffer.len(), n.min(capacity));
    }

    #[test]
    fn feed_matches_the_emitted_tail(lines in proptest::collection::vec("[a-z]{1,8}", 0..120)) {
        let source = ScriptedLogSource::new();
        let mut feed = LogFeed::new();
        feed.start(&source);
        for line in &lines {
            source.emit(line);
        }
        feed.pump();

        let kept = lines.len().min(LOG_BUFFER_CAPACITY);
        let expected = &lines[lines.len() - kept..];
        let actual: Vec<String> = feed.entries().iter().cloned().collect();
        prop_assert_eq!(actual.as_slice(), expected);
    }
}
