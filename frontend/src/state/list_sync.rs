//! 列表合并模块
//!
//! “加载更多”时把新一页追加到已有列表：按 id 去重，保持首次出现的顺序，
//! 已存在的条目既不移动也不替换。

use std::collections::HashSet;
use std::hash::Hash;

use booky_shared::{AdminUser, Book, CartItem};

/// 带唯一标识的列表条目
pub trait Identified {
    type Id: Eq + Hash + Clone;

    fn id(&self) -> Self::Id;
}

impl Identified for Book {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Identified for CartItem {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Identified for AdminUser {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// 合并两页数据（纯函数）
///
/// `incoming` 内部的重复 id 也只保留第一个。
pub fn merge<T: Identified + Clone>(existing: &[T], incoming: &[T]) -> Vec<T> {
    let mut seen: HashSet<T::Id> = existing.iter().map(Identified::id).collect();
    let mut merged = existing.to_vec();
    merged.extend(
        incoming
            .iter()
            .filter(|item| seen.insert(item.id()))
            .cloned(),
    );
    merged
}

/// 按 id 去重的有序集合
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCollection<T> {
    items: Vec<T>,
}

impl<T> Default for MergedCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified + Clone> MergedCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 整体替换（新查询的第一页）
    pub fn reset(&mut self, items: Vec<T>) {
        self.items = merge(&[], &items);
    }

    /// 追加下一页
    pub fn append(&mut self, items: &[T]) {
        self.items = merge(&self.items, items);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(Identified::id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    impl Identified for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    fn items(ids: &[u32], label: &'static str) -> Vec<Item> {
        ids.iter().map(|&id| Item { id, label }).collect()
    }

    #[test]
    fn test_merge_keeps_existing_position_and_value() {
        let existing = items(&[1, 2, 3], "old");
        let incoming = items(&[3, 4, 1, 5], "new");

        let merged = merge(&existing, &incoming);

        let ids: Vec<u32> = merged.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        // 已存在的条目不被新数据替换
        assert_eq!(merged[0].label, "old");
        assert_eq!(merged[2].label, "old");
        assert_eq!(merged[3].label, "new");
    }

    #[test]
    fn test_merge_dedupes_within_incoming_page() {
        let merged = merge(&items(&[1], "a"), &items(&[2, 2, 1, 3, 3], "b"));
        let ids: Vec<u32> = merged.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_remerging_same_page_is_noop() {
        let existing = items(&[10, 20, 30], "e");
        let page = items(&[30, 40, 10, 50], "n");

        let once = merge(&existing, &page);
        let twice = merge(&once, &page);
        assert_eq!(once, twice);

        let mut unique = HashSet::new();
        assert!(once.iter().all(|i| unique.insert(i.id)));
    }

    #[test]
    fn test_collection_reset_then_append() {
        let mut collection = MergedCollection::new();
        collection.append(&items(&[1, 2], "x"));
        collection.reset(items(&[7, 8, 7], "y"));
        assert_eq!(collection.ids(), vec![7, 8]);

        collection.append(&items(&[8, 9], "z"));
        assert_eq!(collection.ids(), vec![7, 8, 9]);
        assert_eq!(collection.len(), 3);

        collection.clear();
        assert!(collection.is_empty());
    }
}
