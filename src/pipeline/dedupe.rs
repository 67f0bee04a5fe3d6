use std::collections::HashSet;

use crate::models::Event;

/// Keeps the first event seen for each id and drops later ones whole.
///
/// Sources are concatenated primary-first, so the richer primary record wins
/// over its featured copy. Two distinct records whose ids collide lose the
/// second one; there is no secondary key.
pub fn dedupe(events: Vec<Event>) -> Vec<Event> {
    let mut seen: HashSet<String> = HashSet::with_capacity(events.len());
    events
        .into_iter()
        .filter(|event| seen.insert(event.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::event;

    #[test]
    fn first_occurrence_wins() {
        let mut a = event("1", "");
        a.title = "A".to_string();
        let mut b = event("1", "");
        b.title = "B".to_string();

        let out = dedupe(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "A");
    }

    #[test]
    fn preserves_input_order() {
        let out = dedupe(vec![
            event("3", ""),
            event("1", ""),
            event("3", ""),
            event("2", ""),
            event("1", ""),
        ]);
        let ids: Vec<_> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn empty_input() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
