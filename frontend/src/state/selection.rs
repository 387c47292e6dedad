//! 筛选与选择状态模块
//!
//! - `CriteriaFilter`: 评分档位等非标识属性的多选筛选
//! - `EntitySelection`: 购物车条目等实体 id 的勾选集合，始终是已加载 id 的子集

use std::collections::BTreeSet;

use booky_shared::Book;

/// 带评分的条目
pub trait Rated {
    fn rating(&self) -> f64;
}

impl Rated for Book {
    fn rating(&self) -> f64 {
        self.rating
    }
}

// =========================================================
// 条件筛选 (Criteria Filter)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaFilter {
    selected: BTreeSet<u8>,
}

impl CriteriaFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 存在则移除，不存在则加入
    pub fn toggle(&mut self, value: u8) {
        if !self.selected.remove(&value) {
            self.selected.insert(value);
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        self.selected.contains(&value)
    }

    pub fn criteria(&self) -> &BTreeSet<u8> {
        &self.selected
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn apply<T: Rated + Clone>(&self, items: &[T]) -> Vec<T> {
        apply_criteria_filter(items, &self.selected)
    }
}

/// 按评分档位筛选
///
/// - 空集合：不筛选
/// - 单个档位 `r`：评分向下取整后等于 `r`
/// - 多个档位：原始评分落在 `[min, max]` 闭区间内（取两端，不是各档位的并集）
pub fn apply_criteria_filter<T: Rated + Clone>(items: &[T], criteria: &BTreeSet<u8>) -> Vec<T> {
    let (Some(&min), Some(&max)) = (criteria.first(), criteria.last()) else {
        return items.to_vec();
    };

    if min == max {
        let band = f64::from(min);
        items
            .iter()
            .filter(|item| item.rating().floor() == band)
            .cloned()
            .collect()
    } else {
        let (low, high) = (f64::from(min), f64::from(max));
        items
            .iter()
            .filter(|item| (low..=high).contains(&item.rating()))
            .cloned()
            .collect()
    }
}

// =========================================================
// 实体选择 (Entity Selection)
// =========================================================

/// 实体勾选集合
///
/// “全选”以当前已加载的条目为准，而不是服务端的总数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySelection<Id: Ord + Clone> {
    /// 已加载条目的 id，保持列表顺序
    loaded: Vec<Id>,
    selected: BTreeSet<Id>,
}

impl<Id: Ord + Clone> Default for EntitySelection<Id> {
    fn default() -> Self {
        Self {
            loaded: Vec::new(),
            selected: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> EntitySelection<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 集合重新加载后调用，丢弃已不存在的勾选项
    pub fn sync_loaded(&mut self, ids: impl IntoIterator<Item = Id>) {
        self.loaded = ids.into_iter().collect();
        let loaded: BTreeSet<&Id> = self.loaded.iter().collect();
        self.selected.retain(|id| loaded.contains(id));
    }

    /// 切换单个条目；未加载的 id 会被忽略
    pub fn toggle(&mut self, id: Id) {
        if self.selected.remove(&id) {
            return;
        }
        if self.loaded.contains(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.loaded.iter().cloned().collect();
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// “全选”复选框：数量相等时清空，否则全选
    pub fn toggle_all(&mut self) {
        if self.selected.len() == self.loaded.len() {
            self.clear_all();
        } else {
            self.select_all();
        }
    }

    /// 复选框是否显示为已勾选
    pub fn is_all_selected(&self) -> bool {
        !self.loaded.is_empty() && self.selected.len() == self.loaded.len()
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// 已勾选的 id，按列表顺序
    pub fn selected_ids(&self) -> Vec<Id> {
        self.loaded
            .iter()
            .filter(|id| self.selected.contains(id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rating(f64);

    impl Rated for Rating {
        fn rating(&self) -> f64 {
            self.0
        }
    }

    fn ratings() -> Vec<Rating> {
        [1.2, 2.8, 3.0, 4.9].into_iter().map(Rating).collect()
    }

    fn filter(criteria: &[u8]) -> Vec<f64> {
        let criteria: BTreeSet<u8> = criteria.iter().copied().collect();
        apply_criteria_filter(&ratings(), &criteria)
            .into_iter()
            .map(|r| r.0)
            .collect()
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        assert_eq!(filter(&[]), vec![1.2, 2.8, 3.0, 4.9]);
    }

    #[test]
    fn test_single_criterion_uses_floor() {
        assert_eq!(filter(&[3]), vec![3.0]);
        assert_eq!(filter(&[2]), vec![2.8]);
        assert_eq!(filter(&[4]), vec![4.9]);
        assert_eq!(filter(&[5]), Vec::<f64>::new());
    }

    #[test]
    fn test_multiple_criteria_use_inclusive_range() {
        assert_eq!(filter(&[2, 4]), vec![2.8, 3.0]);
        // 只选两端时中间档位也会被包含
        assert_eq!(filter(&[1, 5]), vec![1.2, 2.8, 3.0, 4.9]);
    }

    #[test]
    fn test_toggle_twice_is_noop() {
        let mut criteria = CriteriaFilter::new();
        criteria.toggle(4);
        assert!(criteria.contains(4));
        criteria.toggle(4);
        assert_eq!(criteria, CriteriaFilter::new());
    }

    #[test]
    fn test_selection_toggle_ignores_unloaded_ids() {
        let mut selection = EntitySelection::new();
        selection.sync_loaded([1, 2, 3]);
        selection.toggle(2);
        selection.toggle(99);
        assert_eq!(selection.selected_ids(), vec![2]);
        selection.toggle(2);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_alternates() {
        let mut selection = EntitySelection::new();
        selection.sync_loaded([5, 6, 7]);
        selection.toggle(6);

        selection.toggle_all();
        assert!(selection.is_all_selected());
        assert_eq!(selection.selected_ids(), vec![5, 6, 7]);

        selection.toggle_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_empty_collection_is_never_all_selected() {
        let mut selection: EntitySelection<u64> = EntitySelection::new();
        selection.toggle_all();
        assert!(!selection.is_all_selected());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_reload_drops_removed_ids() {
        let mut selection = EntitySelection::new();
        selection.sync_loaded([1, 2, 3, 4]);
        selection.select_all();

        // 借阅成功后 2 和 4 从购物车中消失
        selection.sync_loaded([1, 3, 5]);
        assert_eq!(selection.selected_ids(), vec![1, 3]);
        assert!(!selection.is_selected(&5));
        assert!(!selection.is_all_selected());
    }

    #[test]
    fn test_selection_stays_subset_of_loaded() {
        let mut selection = EntitySelection::new();
        let reloads: [&[u32]; 4] = [&[1, 2, 3], &[2, 3, 4], &[], &[4, 9]];

        for (round, loaded) in reloads.iter().enumerate() {
            selection.sync_loaded(loaded.iter().copied());
            selection.toggle(4);
            if round % 2 == 0 {
                selection.select_all();
            }
            selection.toggle(3);
            selection.toggle(9);

            let allowed: BTreeSet<u32> = loaded.iter().copied().collect();
            assert!(
                selection.selected_ids().iter().all(|id| allowed.contains(id)),
                "round {}: selection escaped loaded ids",
                round
            );
            assert!(selection.len() <= loaded.len());
        }
    }
}
