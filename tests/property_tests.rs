//! Property-based tests for rust_contextual_logger using proptest

use proptest::prelude::*;
use rust_contextual_logger::prelude::*;
use rust_contextual_logger::MISSING_VALUE;

fn capture(threshold: i32) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let logger = Logger::builder()
        .verbosity(threshold)
        .appender(WriterAppender::new(buffer.clone()))
        .build();
    (logger, buffer)
}

/// Keys and values that render bare (no quoting), so the expected text is easy to build
fn bare_token() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

#[derive(Debug, Clone)]
enum Derivation {
    Name(String),
    Values(Vec<(String, String)>),
}

fn derivation() -> impl Strategy<Value = Derivation> {
    prop_oneof![
        bare_token().prop_map(Derivation::Name),
        prop::collection::vec((bare_token(), bare_token()), 0..4).prop_map(Derivation::Values),
    ]
}

// ============================================================================
// Verbosity gating
// ============================================================================

#[test]
fn test_verbosity_gate_exhaustive() {
    for threshold in 0..=5 {
        for level in 0..=5 {
            let (logger, buffer) = capture(threshold);
            logger.v(level).info("gated", ());

            let visible = !buffer.contents().is_empty();
            assert_eq!(
                visible,
                level <= threshold,
                "threshold={} level={}",
                threshold,
                level
            );
            assert_eq!(logger.v(level).enabled(), level <= threshold);
        }
    }
}

proptest! {
    /// Enabled() agrees with the comparison for arbitrary integers
    #[test]
    fn test_enabled_matches_comparison(threshold in -50i32..50, level in -50i32..50) {
        let verbosity = Verbosity::new(threshold);
        prop_assert_eq!(verbosity.enabled(level), level <= threshold);
    }

    /// Info and Error are never gated
    #[test]
    fn test_ungated_calls_always_emit(threshold in -10i32..=100) {
        let (logger, buffer) = capture(threshold);
        logger.info("info", ());
        logger.error(None, "error", ());
        prop_assert_eq!(buffer.lines().len(), 2);
    }
}

// ============================================================================
// Immutability and ordering
// ============================================================================

proptest! {
    /// A parent's output does not change no matter what is derived from it
    #[test]
    fn test_parent_output_unaffected(steps in prop::collection::vec(derivation(), 0..8)) {
        let (logger, buffer) = capture(0);
        let parent = logger.with_name("parent").with_values([("p", "1")]);

        parent.info("probe", ());
        let before = buffer.lines()[0].split(" - ").nth(1).map(String::from);

        let mut derived = parent.clone();
        for step in &steps {
            derived = match step {
                Derivation::Name(name) => derived.with_name(name.clone()),
                Derivation::Values(pairs) => derived.with_values(pairs.clone()),
            };
            derived.info("derived", ());
        }

        buffer.clear();
        parent.info("probe", ());
        let after = buffer.lines()[0].split(" - ").nth(1).map(String::from);

        prop_assert_eq!(before, after);
        prop_assert_eq!(parent.name(), Some("parent".to_string()));
        prop_assert_eq!(parent.context().values().len(), 1);
    }

    /// Bound pairs come first, call-site pairs second, duplicates kept
    #[test]
    fn test_pair_order_is_insertion_order(
        bound in prop::collection::vec((bare_token(), bare_token()), 0..6),
        site in prop::collection::vec((bare_token(), bare_token()), 0..6),
    ) {
        let (logger, buffer) = capture(0);
        logger.with_values(bound.clone()).info("ORDERED", site.clone());

        let expected: Vec<String> = bound
            .iter()
            .chain(site.iter())
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();

        let line = buffer.lines()[0].clone();
        let rendered: Vec<&str> = line
            .split_once(" ORDERED")
            .map(|(_, fields)| fields)
            .unwrap_or("")
            .split_whitespace()
            .collect();
        prop_assert_eq!(rendered, expected);
    }

    /// Name segments are joined in derivation order
    #[test]
    fn test_hierarchical_names(segments in prop::collection::vec(bare_token(), 1..6)) {
        let (logger, _buffer) = capture(0);
        let named = segments
            .iter()
            .fold(logger.clone(), |log, segment| log.with_name(segment.clone()));

        prop_assert_eq!(named.name(), Some(segments.join(".")));
        prop_assert!(logger.name().is_none());
    }
}

// ============================================================================
// Flat key/value lists
// ============================================================================

proptest! {
    /// Lenient conversion never drops a key; odd lists end with the sentinel
    #[test]
    fn test_from_flat_pairs_up(items in prop::collection::vec(bare_token(), 0..12)) {
        let kvs = KeyValues::from_flat(items.clone());
        prop_assert_eq!(kvs.len(), items.len().div_ceil(2));

        if items.len() % 2 == 1 {
            let (_, last) = kvs.iter().last().expect("non-empty");
            prop_assert_eq!(last, &FieldValue::from(MISSING_VALUE));
        }
    }

    /// Strict conversion accepts exactly the even lists
    #[test]
    fn test_try_from_flat_parity(items in prop::collection::vec(bare_token(), 0..12)) {
        let result = KeyValues::try_from_flat(items.clone());
        prop_assert_eq!(result.is_ok(), items.len() % 2 == 0);
    }
}

// ============================================================================
// Text rendering
// ============================================================================

proptest! {
    /// Any name, message, key or value renders on a single line
    #[test]
    fn test_values_never_break_lines(
        names in prop::collection::vec(any::<String>(), 0..4),
        key in any::<String>(),
        value in any::<String>(),
        message in any::<String>(),
    ) {
        let (logger, buffer) = capture(0);
        let named = names
            .iter()
            .fold(logger.clone(), |log, segment| log.with_name(segment.clone()));

        named.info(message.clone(), kv![key.clone() => value.clone()]);
        named.error(None, message, kv![key => value]);
        prop_assert_eq!(buffer.contents().matches('\n').count(), 2);
    }
}
