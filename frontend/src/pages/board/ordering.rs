use crate::api::{BoardList, Card};

/// A list that moved, with the position to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMove {
    pub list_id: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardMove {
    WithinList {
        card_id: String,
        list_id: String,
        order: usize,
    },
    AcrossLists {
        card_id: String,
        source_list_id: String,
        dest_list_id: String,
        order: usize,
    },
}

/// Lists render by ascending `order`; ties keep the backend's sequence.
pub fn sort_lists(lists: &mut [BoardList]) {
    lists.sort_by_key(|list| list.order);
}

pub fn renumber_lists(lists: &mut [BoardList]) {
    for (index, list) in lists.iter_mut().enumerate() {
        list.order = index as i64;
    }
}

pub fn renumber_cards(cards: &mut [Card]) {
    for (index, card) in cards.iter_mut().enumerate() {
        card.order = index as i64;
    }
}

/// Moves the list at `source` to `dest` and renumbers every list. Returns
/// `None`, leaving `lists` untouched, when nothing moves or an index is out
/// of range.
pub fn move_list(lists: &mut Vec<BoardList>, source: usize, dest: usize) -> Option<ListMove> {
    if source == dest {
        return None;
    }
    if source >= lists.len() || dest >= lists.len() {
        log::warn!(
            "Ignoring list move {} -> {} on a board with {} lists",
            source,
            dest,
            lists.len()
        );
        return None;
    }

    let list = lists.remove(source);
    let list_id = list.id.clone();
    lists.insert(dest, list);
    renumber_lists(lists);
    Some(ListMove {
        list_id,
        order: dest,
    })
}

/// Moves a card inside one list or between two lists, renumbering every list
/// it touched. Unknown lists and out-of-range indices leave `lists` untouched.
pub fn move_card(
    lists: &mut [BoardList],
    source_list_id: &str,
    source_index: usize,
    dest_list_id: &str,
    dest_index: usize,
) -> Option<CardMove> {
    if source_list_id == dest_list_id && source_index == dest_index {
        return None;
    }
    let Some(source_pos) = lists.iter().position(|l| l.id == source_list_id) else {
        log::warn!("Ignoring card move from unknown list {}", source_list_id);
        return None;
    };
    let Some(dest_pos) = lists.iter().position(|l| l.id == dest_list_id) else {
        log::warn!("Ignoring card move to unknown list {}", dest_list_id);
        return None;
    };
    if source_index >= lists[source_pos].cards.len() {
        log::warn!(
            "Ignoring card move from index {} of list {} with {} cards",
            source_index,
            source_list_id,
            lists[source_pos].cards.len()
        );
        return None;
    }

    if source_pos == dest_pos {
        let cards = &mut lists[source_pos].cards;
        if dest_index >= cards.len() {
            log::warn!(
                "Ignoring card move to index {} of list {} with {} cards",
                dest_index,
                dest_list_id,
                cards.len()
            );
            return None;
        }
        let card = cards.remove(source_index);
        let card_id = card.id.clone();
        cards.insert(dest_index, card);
        renumber_cards(cards);
        return Some(CardMove::WithinList {
            card_id,
            list_id: dest_list_id.to_string(),
            order: dest_index,
        });
    }

    // Appending at the very end of the destination is allowed.
    if dest_index > lists[dest_pos].cards.len() {
        log::warn!(
            "Ignoring card move to index {} of list {} with {} cards",
            dest_index,
            dest_list_id,
            lists[dest_pos].cards.len()
        );
        return None;
    }
    let mut card = lists[source_pos].cards.remove(source_index);
    renumber_cards(&mut lists[source_pos].cards);
    let card_id = card.id.clone();
    card.list_id = Some(dest_list_id.to_string());
    let dest_cards = &mut lists[dest_pos].cards;
    dest_cards.insert(dest_index, card);
    renumber_cards(dest_cards);
    Some(CardMove::AcrossLists {
        card_id,
        source_list_id: source_list_id.to_string(),
        dest_list_id: dest_list_id.to_string(),
        order: dest_index,
    })
}

pub fn remove_list(lists: &mut Vec<BoardList>, list_id: &str) -> Option<BoardList> {
    let pos = lists.iter().position(|l| l.id == list_id)?;
    let removed = lists.remove(pos);
    renumber_lists(lists);
    Some(removed)
}

pub fn remove_card(lists: &mut [BoardList], list_id: &str, card_id: &str) -> Option<Card> {
    let list = lists.iter_mut().find(|l| l.id == list_id)?;
    let pos = list.cards.iter().position(|c| c.id == card_id)?;
    let removed = list.cards.remove(pos);
    renumber_cards(&mut list.cards);
    Some(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn card(id: &str, list_id: &str, order: i64) -> Card {
        Card {
            id: id.into(),
            list_id: Some(list_id.into()),
            title: format!("Card {id}"),
            description: None,
            order,
        }
    }

    fn list(id: &str, order: i64, card_ids: &[&str]) -> BoardList {
        BoardList {
            id: id.into(),
            board_id: Some("b1".into()),
            title: format!("List {id}"),
            order,
            cards: card_ids
                .iter()
                .enumerate()
                .map(|(i, c)| card(c, id, i as i64))
                .collect(),
        }
    }

    fn list_orders(lists: &[BoardList]) -> Vec<(&str, i64)> {
        lists.iter().map(|l| (l.id.as_str(), l.order)).collect()
    }

    fn card_orders(list: &BoardList) -> Vec<(&str, i64)> {
        list.cards.iter().map(|c| (c.id.as_str(), c.order)).collect()
    }

    #[wasm_bindgen_test]
    fn sort_lists_is_stable_on_ties() {
        let mut lists = vec![list("c", 2, &[]), list("a", 0, &[]), list("b", 0, &[])];
        sort_lists(&mut lists);
        assert_eq!(list_orders(&lists), vec![("a", 0), ("b", 0), ("c", 2)]);
    }

    #[wasm_bindgen_test]
    fn moving_first_list_last_renumbers_both() {
        let mut lists = vec![list("L1", 0, &[]), list("L2", 1, &[])];
        let change = move_list(&mut lists, 0, 1).unwrap();
        assert_eq!(
            change,
            ListMove {
                list_id: "L1".into(),
                order: 1
            }
        );
        assert_eq!(list_orders(&lists), vec![("L2", 0), ("L1", 1)]);
    }

    #[wasm_bindgen_test]
    fn list_moves_to_same_slot_or_out_of_range_change_nothing() {
        let mut lists = vec![list("L1", 5, &[]), list("L2", 9, &[])];
        assert_eq!(move_list(&mut lists, 1, 1), None);
        assert_eq!(move_list(&mut lists, 2, 0), None);
        assert_eq!(move_list(&mut lists, 0, 2), None);
        assert_eq!(list_orders(&lists), vec![("L1", 5), ("L2", 9)]);
    }

    #[wasm_bindgen_test]
    fn card_moves_within_a_list() {
        let mut lists = vec![list("L1", 0, &["a", "b", "c", "d"])];
        let change = move_card(&mut lists, "L1", 0, "L1", 2).unwrap();
        assert_eq!(
            change,
            CardMove::WithinList {
                card_id: "a".into(),
                list_id: "L1".into(),
                order: 2
            }
        );
        assert_eq!(
            card_orders(&lists[0]),
            vec![("b", 0), ("c", 1), ("a", 2), ("d", 3)]
        );
    }

    #[wasm_bindgen_test]
    fn card_moves_across_lists() {
        let mut lists = vec![list("L1", 0, &["a", "b", "c"]), list("L2", 1, &["x", "y"])];
        let change = move_card(&mut lists, "L1", 1, "L2", 2).unwrap();
        assert_eq!(
            change,
            CardMove::AcrossLists {
                card_id: "b".into(),
                source_list_id: "L1".into(),
                dest_list_id: "L2".into(),
                order: 2
            }
        );
        assert_eq!(card_orders(&lists[0]), vec![("a", 0), ("c", 1)]);
        assert_eq!(card_orders(&lists[1]), vec![("x", 0), ("y", 1), ("b", 2)]);
        assert_eq!(lists[1].cards[2].list_id.as_deref(), Some("L2"));
    }

    #[wasm_bindgen_test]
    fn card_moves_into_an_empty_list() {
        let mut lists = vec![list("L1", 0, &["a"]), list("L2", 1, &[])];
        assert!(move_card(&mut lists, "L1", 0, "L2", 0).is_some());
        assert!(lists[0].cards.is_empty());
        assert_eq!(card_orders(&lists[1]), vec![("a", 0)]);
    }

    #[wasm_bindgen_test]
    fn invalid_card_moves_change_nothing() {
        let original = vec![list("L1", 0, &["a", "b"]), list("L2", 1, &["x"])];
        let mut lists = original.clone();

        assert_eq!(move_card(&mut lists, "L1", 1, "L1", 1), None);
        assert_eq!(move_card(&mut lists, "L9", 0, "L1", 0), None);
        assert_eq!(move_card(&mut lists, "L1", 0, "L9", 0), None);
        assert_eq!(move_card(&mut lists, "L1", 2, "L2", 0), None);
        assert_eq!(move_card(&mut lists, "L1", 0, "L1", 2), None);
        assert_eq!(move_card(&mut lists, "L1", 0, "L2", 2), None);
        assert_eq!(lists, original);
    }

    #[wasm_bindgen_test]
    fn removals_renumber_what_is_left() {
        let mut lists = vec![
            list("L1", 0, &["a", "b", "c"]),
            list("L2", 1, &[]),
            list("L3", 2, &[]),
        ];
        assert_eq!(remove_card(&mut lists, "L1", "a").unwrap().id, "a");
        assert_eq!(card_orders(&lists[0]), vec![("b", 0), ("c", 1)]);
        assert!(remove_card(&mut lists, "L1", "zzz").is_none());

        assert_eq!(remove_list(&mut lists, "L2").unwrap().id, "L2");
        assert_eq!(list_orders(&lists), vec![("L1", 0), ("L3", 1)]);
        assert!(remove_list(&mut lists, "L2").is_none());
    }
}
