pub mod arrange;
pub mod perf;
pub mod replay;

/// `--cards a,b,c` wins over `--count N`, which names cards `card-000`...
pub fn resolve_card_ids(cards: Option<&str>, count: usize) -> Vec<String> {
    match cards {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => (0..count).map(|i| format!("card-{:03}", i)).collect(),
    }
}
