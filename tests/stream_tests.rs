use lazy_seq::{Step, StreamSequence, VecChunkSource};

fn chunks(parts: &[&str]) -> StreamSequence<VecChunkSource<String>> {
    StreamSequence::new(VecChunkSource::new(
        parts.iter().map(|s| s.to_string()).collect(),
    ))
}

#[test]
fn test_chunks_arrive_in_order() {
    let seq = chunks(&["one", "two", "three"]);
    assert_eq!(seq.to_vec().unwrap(), vec!["one", "two", "three"]);
}

#[test]
fn test_stop_aborts_the_pump() {
    let seq = chunks(&["one", "two", "three"]);
    let mut seen = Vec::new();
    let step = seq
        .each(&mut |chunk, _| {
            seen.push(chunk);
            Step::Stop
        })
        .unwrap();
    assert_eq!(step, Step::Stop);
    assert_eq!(seen, vec!["one"]);
}

#[test]
fn test_lines_splits_each_chunk() {
    let lines = chunks(&["alpha\nbeta", "gamma"]).lines();
    assert_eq!(lines.to_vec().unwrap(), vec!["alpha", "beta", "gamma"]);
}

#[test]
fn test_lines_do_not_rejoin_across_chunk_boundaries() {
    // a line spanning two chunks comes out as two lines; per-chunk
    // splitting is the documented behavior
    let lines = chunks(&["hel", "lo\nworld"]).lines();
    assert_eq!(lines.to_vec().unwrap(), vec!["hel", "lo", "world"]);
}

#[test]
fn test_trailing_newline_yields_an_empty_segment() {
    let lines = chunks(&["a\n"]).lines();
    assert_eq!(lines.to_vec().unwrap(), vec!["a", ""]);
}

#[test]
fn test_stop_propagates_out_of_lines() {
    let lines = chunks(&["a\nb\nc", "d"]).lines();
    let mut seen = Vec::new();
    let step = lines
        .each(&mut |line, _| {
            seen.push(line);
            if seen.len() == 2 {
                Step::Stop
            } else {
                Step::Continue
            }
        })
        .unwrap();
    assert_eq!(step, Step::Stop);
    assert_eq!(seen, vec!["a", "b"]);
}

#[test]
fn test_line_indexes_run_across_chunks() {
    let lines = chunks(&["a\nb", "c\nd"]).lines();
    let mut indexed = Vec::new();
    lines
        .each(&mut |line, i| {
            indexed.push((i, line));
            Step::Continue
        })
        .unwrap();
    assert_eq!(
        indexed,
        vec![
            (0, "a".to_string()),
            (1, "b".to_string()),
            (2, "c".to_string()),
            (3, "d".to_string())
        ]
    );
}
