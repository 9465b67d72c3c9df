//! Item operations: add, check and uncheck against a named list.
//!
//! Every operation is a full read-modify-write of the list file. There is no
//! concurrency check, so two invocations racing on the same list can lose an
//! update.

use crate::current::ListContext;
use crate::models::TodoItem;
use crate::storage::ListStore;
use crate::{Error, Result};
use chrono::{Local, NaiveDateTime};

/// Append an open item to a list and return it.
pub fn add(store: &ListStore, list: &ListContext, text: &str) -> Result<TodoItem> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidInput("todo text cannot be empty".to_string()));
    }
    if text.contains('\n') || text.contains('\r') {
        return Err(Error::InvalidInput(
            "todo text must be a single line".to_string(),
        ));
    }

    let mut todo = store.read(list.name())?;
    let item = todo.push(text).clone();
    store.write(list.name(), &todo)?;

    tracing::info!(list = list.name(), id = item.id, "added item");
    Ok(item)
}

/// Mark an item completed (stamped with the current local time) or reopen it.
pub fn set_completed(
    store: &ListStore,
    list: &ListContext,
    id: usize,
    value: bool,
) -> Result<TodoItem> {
    set_completed_at(store, list, id, value, Local::now().naive_local())
}

/// Like [`set_completed`], with an explicit clock value.
///
/// An out-of-range `id` fails with `InvalidId` before anything is written.
pub fn set_completed_at(
    store: &ListStore,
    list: &ListContext,
    id: usize,
    value: bool,
    now: NaiveDateTime,
) -> Result<TodoItem> {
    let mut todo = store.read(list.name())?;
    let count = todo.len();

    let item = todo.get_mut(id).ok_or_else(|| {
        Error::InvalidId(format!("{} (list '{}' has {} items)", id, list.name(), count))
    })?;
    item.set_completed(value, now);
    let item = item.clone();

    store.write(list.name(), &todo)?;
    tracing::info!(list = list.name(), id, completed = value, "updated item");
    Ok(item)
}

/// Parse a user-supplied item number.
pub fn parse_item_id(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| Error::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;
    use chrono::{Duration, NaiveDate};
    use std::fs;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_add_to_empty_list() {
        let env = TestEnv::new();
        let store = env.store();
        let list = ListContext::new("demo");

        let item = add(&store, &list, "X").unwrap();
        assert_eq!(item.id, 1);
        assert!(!item.completed);
        assert_eq!(item.completed_at, None);

        let todo = store.read("demo").unwrap();
        assert_eq!(todo.items, vec![item]);
    }

    #[test]
    fn test_add_appends_in_order() {
        let env = TestEnv::new();
        let store = env.store();
        let list = ListContext::new("demo");

        add(&store, &list, "first").unwrap();
        let second = add(&store, &list, "second").unwrap();
        assert_eq!(second.id, 2);

        let texts: Vec<String> = store
            .read("demo")
            .unwrap()
            .items
            .into_iter()
            .map(|i| i.text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_add_rejects_empty_and_multiline() {
        let env = TestEnv::new();
        let store = env.store();
        let list = ListContext::new("demo");

        assert!(matches!(add(&store, &list, "   "), Err(Error::InvalidInput(_))));
        assert!(matches!(
            add(&store, &list, "two\nlines"),
            Err(Error::InvalidInput(_))
        ));
        assert!(!store.exists("demo"));
    }

    #[test]
    fn test_check_uncheck_check() {
        let env = TestEnv::new();
        let store = env.store();
        let list = ListContext::new("demo");
        add(&store, &list, "task").unwrap();

        let first = set_completed_at(&store, &list, 1, true, at(9, 0)).unwrap();
        assert!(first.completed);
        assert_eq!(first.completed_at, Some(at(9, 0)));

        let reopened = set_completed_at(&store, &list, 1, false, at(9, 30)).unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.completed_at, None);
        assert_eq!(store.read("demo").unwrap().items[0].completed_at, None);

        let again = set_completed_at(&store, &list, 1, true, at(10, 15)).unwrap();
        assert!(again.completed_at.unwrap() > first.completed_at.unwrap());
        assert_eq!(
            store.read("demo").unwrap().items[0].completed_at,
            Some(at(10, 15))
        );
    }

    #[test]
    fn test_set_completed_uses_local_clock() {
        let env = TestEnv::new();
        let store = env.store();
        let list = ListContext::new("demo");
        add(&store, &list, "task").unwrap();

        let before = Local::now().naive_local() - Duration::minutes(1);
        let item = set_completed(&store, &list, 1, true).unwrap();
        let stamped = item.completed_at.unwrap();
        assert!(stamped >= before);
        assert!(stamped <= Local::now().naive_local());
    }

    #[test]
    fn test_invalid_ids_leave_file_unchanged() {
        let env = TestEnv::new();
        let store = env.store();
        let list = ListContext::new("demo");
        add(&store, &list, "A").unwrap();
        add(&store, &list, "B").unwrap();
        let before = fs::read_to_string(store.path_for("demo")).unwrap();

        for id in [0, 3, 999] {
            let result = set_completed(&store, &list, id, true);
            assert!(matches!(result, Err(Error::InvalidId(_))), "id {}", id);
        }

        assert_eq!(fs::read_to_string(store.path_for("demo")).unwrap(), before);
    }

    #[test]
    fn test_set_completed_on_missing_list() {
        let env = TestEnv::new();
        let store = env.store();
        let list = ListContext::new("ghost");
        assert!(matches!(
            set_completed(&store, &list, 1, true),
            Err(Error::InvalidId(_))
        ));
        assert!(!store.exists("ghost"));
    }

    #[test]
    fn test_parse_item_id() {
        assert_eq!(parse_item_id("3").unwrap(), 3);
        assert_eq!(parse_item_id(" 12 ").unwrap(), 12);
        assert!(matches!(parse_item_id("abc"), Err(Error::InvalidId(_))));
        assert!(matches!(parse_item_id("-1"), Err(Error::InvalidId(_))));
    }
}
