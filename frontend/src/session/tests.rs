use super::*;
use crate::web::storage::memory::MemoryStorage;
use booky_shared::Role;
use std::sync::{Arc, Mutex};

// =========================================================
// 辅助函数
// =========================================================

fn user(id: u64, role: &str) -> UserProfile {
    UserProfile {
        id,
        name: format!("User {}", id),
        email: None,
        role: Role::from(role),
        profile_photo: None,
    }
}

/// 两个槽位要么都在，要么都不在
fn assert_slots_coupled(storage: &MemoryStorage) {
    assert_eq!(
        storage.contains(STORAGE_TOKEN_KEY),
        storage.contains(STORAGE_USER_KEY),
        "token and user slots diverged"
    );
}

fn recording_store(storage: MemoryStorage) -> (SessionStore<MemoryStorage>, Arc<Mutex<Vec<Session>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut store = SessionStore::new(storage);
    let sink = seen.clone();
    store.subscribe(move |s| sink.lock().unwrap().push(s.clone()));
    (store, seen)
}

// =========================================================
// 读取
// =========================================================

#[test]
fn test_current_is_anonymous_when_never_logged_in() {
    let store = SessionStore::new(MemoryStorage::new());
    let session = store.current();
    assert!(!session.is_authenticated());
    assert_eq!(session.token(), None);
    assert_eq!(session.user(), None);
}

#[test]
fn test_malformed_user_reads_as_logged_out() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_TOKEN_KEY, "abc");
    storage.set(STORAGE_USER_KEY, "{not json");
    let store = SessionStore::new(storage);
    assert_eq!(store.current(), Session::anonymous());
}

#[test]
fn test_token_without_user_reads_as_logged_out() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_TOKEN_KEY, "abc");
    let store = SessionStore::new(storage);
    assert!(!store.current().is_authenticated());
}

#[test]
fn test_empty_token_reads_as_logged_out() {
    let storage = MemoryStorage::new();
    storage.set(STORAGE_TOKEN_KEY, "");
    storage.set(STORAGE_USER_KEY, &serde_json::to_string(&user(1, "user")).unwrap());
    let store = SessionStore::new(storage);
    assert!(!store.current().is_authenticated());
}

// =========================================================
// 登录 / 注销
// =========================================================

#[test]
fn test_login_persists_both_slots() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());

    let session = store.login("tok-1", &user(1, "Admin")).unwrap();
    assert_eq!(session.token(), Some("tok-1"));
    assert!(session.is_admin());

    // 新的 store 实例（例如页面刷新后）读到同一个会话
    let reread = SessionStore::new(storage.clone()).current();
    assert_eq!(reread, session);
    assert_slots_coupled(&storage);
}

#[test]
fn test_logout_clears_both_slots() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.login("tok-1", &user(1, "user")).unwrap();

    store.logout();

    assert!(!storage.contains(STORAGE_TOKEN_KEY));
    assert!(!storage.contains(STORAGE_USER_KEY));
    assert_eq!(store.current(), Session::anonymous());
}

#[test]
fn test_login_rejects_empty_token() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    assert_eq!(
        store.login("", &user(1, "user")),
        Err(SessionError::EmptyToken)
    );
    assert_slots_coupled(&storage);
}

#[test]
fn test_failed_user_write_leaves_previous_session() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.login("old", &user(1, "user")).unwrap();

    storage.fail_writes_to(STORAGE_USER_KEY);
    let result = store.login("new", &user(2, "admin"));

    assert_eq!(result, Err(SessionError::WriteFailed(STORAGE_USER_KEY)));
    assert_eq!(store.current().token(), Some("old"));
    assert_eq!(store.current().user().map(|u| u.id), Some(1));
}

#[test]
fn test_failed_token_write_rolls_back_to_logged_out() {
    let storage = MemoryStorage::new();
    let (mut store, seen) = recording_store(storage.clone());
    store.login("old", &user(1, "user")).unwrap();

    storage.fail_writes_to(STORAGE_TOKEN_KEY);
    let result = store.login("new", &user(2, "admin"));

    assert_eq!(result, Err(SessionError::WriteFailed(STORAGE_TOKEN_KEY)));
    assert_slots_coupled(&storage);
    assert_eq!(store.current(), Session::anonymous());
    assert_eq!(seen.lock().unwrap().last(), Some(&Session::anonymous()));
}

#[test]
fn test_session_slots_stay_coupled_over_any_sequence() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());

    // 登录、重复登录、注销、重复注销的交错序列
    let steps: [Option<(&str, u64, &str)>; 8] = [
        Some(("a", 1, "user")),
        Some(("b", 2, "ADMIN")),
        None,
        None,
        Some(("c", 3, "user")),
        None,
        Some(("d", 4, "admin")),
        Some(("e", 5, "user")),
    ];

    for step in steps {
        match step {
            Some((token, id, role)) => {
                store.login(token, &user(id, role)).unwrap();
                let session = store.current();
                assert_eq!(session.token(), Some(token));
                assert_eq!(session.user().map(|u| u.id), Some(id));
            }
            None => {
                store.logout();
                assert_eq!(store.current(), Session::anonymous());
            }
        }
        assert_slots_coupled(&storage);
        let session = store.current();
        assert_eq!(session.token().is_some(), session.user().is_some());
    }
}

// =========================================================
// 订阅
// =========================================================

#[test]
fn test_listeners_receive_login_and_logout() {
    let (mut store, seen) = recording_store(MemoryStorage::new());

    store.login("tok", &user(9, "user")).unwrap();
    store.logout();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].user().map(|u| u.id), Some(9));
    assert!(!seen[1].is_authenticated());
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let seen = Arc::new(Mutex::new(0usize));
    let mut store = SessionStore::new(MemoryStorage::new());
    let counter = seen.clone();
    let id = store.subscribe(move |_| *counter.lock().unwrap() += 1);

    store.login("tok", &user(1, "user")).unwrap();
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.logout();

    assert_eq!(*seen.lock().unwrap(), 1);
}

#[test]
fn test_refresh_publishes_changes_made_elsewhere() {
    let storage = MemoryStorage::new();
    let (store, seen) = recording_store(storage.clone());

    // 模拟另一个标签页直接写入存储
    let mut other_tab = SessionStore::new(storage.clone());
    other_tab.login("from-other-tab", &user(5, "user")).unwrap();

    let session = store.refresh();
    assert_eq!(session.token(), Some("from-other-tab"));
    assert_eq!(seen.lock().unwrap().as_slice(), &[session]);
}
