use bbuffer_rs::{
    run, run_concurrent, run_sequential, BlockingBuffer, Buffer, BufferError, BufferKind,
    ByteCountReducer, Config, IterGenerator, MinMaxReducer, RandomGenerator, SequentialBuffer,
    Slot, SpinBuffer, TokenGenerator,
};
use std::io::{Cursor, Write};
use std::thread;
use std::time::Duration;

/// Generator emitting `10 20 30` and discovering exhaustion on the next read.
fn ten_twenty_thirty() -> TokenGenerator<Cursor<&'static str>, i64> {
    TokenGenerator::new(Cursor::new("10 20 30"))
}

// =============================================================================
// Short stream through a small ring
// =============================================================================

#[test]
fn test_three_values_reach_reducer_in_order() {
    for kind in BufferKind::ALL {
        let mut seen = Vec::new();
        let report = run(
            kind,
            Config::new(4, false),
            &mut ten_twenty_thirty(),
            &mut |v: i64| seen.push(v),
        )
        .unwrap();

        assert_eq!(seen, vec![10, 20, 30], "{kind}");
        assert_eq!(report.produced, 3, "{kind}");
        assert_eq!(report.reduced, 3, "{kind}");
    }
}

#[test]
fn test_three_values_min_max() {
    for kind in BufferKind::ALL {
        let mut reducer = MinMaxReducer::new();
        run(kind, Config::new(4, false), &mut ten_twenty_thirty(), &mut reducer).unwrap();
        assert_eq!((reducer.min(), reducer.max()), (10, 30), "{kind}");
    }
}

#[test]
fn test_terminal_slot_follows_data() {
    // The `10 20 30` stream, put by hand so every slot can be inspected.
    let buf = BlockingBuffer::<i64>::with_capacity(4).unwrap();
    buf.put(10, false).unwrap();
    buf.put(20, false).unwrap();
    buf.put(30, false).unwrap();
    assert!(buf.is_full());
    assert_eq!(buf.get().unwrap(), Slot::new(10, false));
    buf.put(0, true).unwrap();
    assert_eq!(buf.get().unwrap(), Slot::new(20, false));
    assert_eq!(buf.get().unwrap(), Slot::new(30, false));
    assert!(buf.get().unwrap().is_last);
    assert!(buf.is_empty());
}

// =============================================================================
// Minimum capacity, single value closing the stream
// =============================================================================

#[test]
fn test_minimum_capacity_single_value() {
    for kind in BufferKind::ALL {
        let mut generator = IterGenerator::new(vec![5i64]);
        let mut reducer = MinMaxReducer::new();
        let report = run(kind, Config::new(2, true), &mut generator, &mut reducer).unwrap();

        // One put carried the value and the end marker together.
        assert_eq!(report.metrics.puts, 1, "{kind}");
        assert_eq!(report.metrics.gets, 1, "{kind}");
        assert_eq!(report.produced, 0, "{kind}");
        assert_eq!(report.reduced, 0, "{kind}");
    }
}

#[test]
fn test_minimum_capacity_slot_carries_value_and_marker() {
    let buf = SpinBuffer::<i64>::with_capacity(2).unwrap();
    buf.put(5, true).unwrap();
    assert!(buf.is_full());
    assert_eq!(buf.get().unwrap().into_parts(), (true, 5));
}

// =============================================================================
// Empty source
// =============================================================================

#[test]
fn test_empty_source_never_invokes_reducer() {
    for kind in BufferKind::ALL {
        let mut generator = IterGenerator::new(Vec::<i64>::new());
        let mut reducer = MinMaxReducer::new();
        let report = run(kind, Config::new(4, true), &mut generator, &mut reducer).unwrap();

        assert_eq!(reducer, MinMaxReducer::new(), "{kind}");
        assert_eq!(report.reduced, 0, "{kind}");
        assert_eq!(report.metrics.puts, 1, "{kind}");
    }
}

#[test]
fn test_empty_file_keeps_count_at_zero() {
    for kind in BufferKind::ALL {
        let mut generator = TokenGenerator::<_, String>::new(Cursor::new(""));
        let mut reducer = ByteCountReducer::new();
        run(kind, Config::new(4, false), &mut generator, &mut reducer).unwrap();
        assert_eq!(reducer.count(), 0, "{kind}");
    }
}

#[test]
fn test_missing_file_terminates() {
    for kind in BufferKind::ALL {
        let mut generator = TokenGenerator::<_, String>::open("/nonexistent/bbuffer/words.txt");
        let mut reducer = ByteCountReducer::new();
        let report = run(kind, Config::new(4, false), &mut generator, &mut reducer).unwrap();
        assert_eq!(report.reduced, 0, "{kind}");
    }
}

// =============================================================================
// Byte count over a token file
// =============================================================================

#[test]
fn test_byte_count_of_file_tokens() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "a bb ccc").unwrap();

    for kind in BufferKind::ALL {
        let mut generator = TokenGenerator::<_, String>::open(file.path());
        let mut reducer = ByteCountReducer::new();
        run(kind, Config::new(2, false), &mut generator, &mut reducer).unwrap();
        assert_eq!(reducer.count(), 6, "{kind}");
    }
}

// =============================================================================
// Slow consumer on a small ring
// =============================================================================

#[test]
fn test_slow_consumer_suspends_producer() {
    const N: i64 = 40;
    let buf = BlockingBuffer::<i64>::new(Config::new(3, true)).unwrap();
    let mut generator = IterGenerator::new(0..=N);
    let mut seen = Vec::new();

    let report = run_concurrent(
        &mut generator,
        &mut |v: i64| {
            thread::sleep(Duration::from_millis(1));
            seen.push(v);
        },
        &buf,
    )
    .unwrap();

    assert_eq!(seen, (0..N).collect::<Vec<_>>());
    assert!(report.metrics.producer_waits > 0, "producer never waited");
    assert_eq!(report.metrics.puts, report.metrics.gets);
    assert!(buf.is_empty());
}

#[test]
fn test_slow_consumer_spin_buffer_keeps_order() {
    const N: i64 = 40;
    let buf = SpinBuffer::<i64>::new(Config::new(3, true)).unwrap();
    let mut seen = Vec::new();

    run_concurrent(
        &mut IterGenerator::new(0..=N),
        &mut |v: i64| {
            thread::sleep(Duration::from_millis(1));
            seen.push(v);
        },
        &buf,
    )
    .unwrap();

    assert_eq!(seen, (0..N).collect::<Vec<_>>());
    assert!(buf.metrics().producer_waits > 0);
}

// =============================================================================
// Termination and draining
// =============================================================================

#[test]
fn test_draining_after_termination() {
    fn drained<B: Buffer<i64>>(buf: &B) {
        let mut generator = IterGenerator::new(vec![1i64, 2, 3]);
        let mut reducer = MinMaxReducer::new();
        run_sequential(&mut generator, &mut reducer, buf).unwrap();

        for _ in 0..3 {
            assert_eq!(buf.try_get(), Err(BufferError::Empty));
        }
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    drained(&SequentialBuffer::<i64>::with_capacity(2).unwrap());
    drained(&BlockingBuffer::<i64>::with_capacity(2).unwrap());
    drained(&SpinBuffer::<i64>::with_capacity(2).unwrap());
}

#[test]
fn test_exactly_one_terminal_slot() {
    let buf = BlockingBuffer::<u64>::with_capacity(8).unwrap();
    let mut terminals = 0;
    let mut values = 0;

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..1_000u64 {
                buf.put(i, i == 999).unwrap();
            }
        });
        loop {
            let slot = buf.get().unwrap();
            if slot.is_last {
                terminals += 1;
                break;
            }
            values += 1;
        }
    });

    assert_eq!(terminals, 1);
    assert_eq!(values, 999);
    assert_eq!(buf.try_get(), Err(BufferError::Empty));
}

// =============================================================================
// Large concurrent runs
// =============================================================================

#[test]
fn test_random_stream_agrees_across_variants() {
    // Same stream for every variant, so sized for the spinning one.
    let items = spin_items(50_000);
    let mut expected = None;
    for kind in BufferKind::ALL {
        let mut generator = RandomGenerator::seeded(items, 1234);
        let mut reducer = MinMaxReducer::new();
        let report = run(kind, Config::new(64, false), &mut generator, &mut reducer).unwrap();
        assert_eq!(report.reduced, items - 1, "{kind}");

        let result = (reducer.min(), reducer.max());
        assert_eq!(*expected.get_or_insert(result), result, "{kind}");
    }
}

/// Stream length for runs through a `SpinBuffer`.
///
/// A spinning side never yields, so on a single CPU every hand-off costs a
/// scheduler timeslice; keep those runs short there.
fn spin_items(items: u64) -> u64 {
    let cpus = thread::available_parallelism().map_or(1, |n| n.get());
    if cpus > 1 {
        items
    } else {
        (items / 1_000).max(100)
    }
}

fn check_fifo<B: Buffer<u64> + Sync>(buf: &B, items: u64) {
    let mut generator = IterGenerator::new(0..items);
    let mut expected = 0u64;
    let report = run_concurrent(
        &mut generator,
        &mut |v: u64| {
            assert_eq!(v, expected, "FIFO violation");
            expected += 1;
        },
        buf,
    )
    .unwrap();
    assert_eq!(report.reduced, items - 1);
}

#[test]
fn test_concurrent_fifo_large_stream() {
    check_fifo(&BlockingBuffer::<u64>::with_capacity(16).unwrap(), 200_000);
    check_fifo(&SpinBuffer::<u64>::with_capacity(16).unwrap(), spin_items(200_000));
    check_fifo(&SpinBuffer::<u64>::with_capacity(2).unwrap(), spin_items(20_000));
}

#[test]
fn test_owned_values_are_moved_not_shared() {
    let buf = SpinBuffer::<String>::with_capacity(4).unwrap();
    let mut total = ByteCountReducer::new();
    let mut generator = TokenGenerator::<_, String>::new(Cursor::new("alpha beta\ngamma"));

    run_concurrent(&mut generator, &mut total, &buf).unwrap();
    assert_eq!(total.count(), 5 + 4 + 5);
}
