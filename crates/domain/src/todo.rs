use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ToDo の識別子（ULID 文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// 新しい ULID を採番する
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// 外部から受け取った ID をそのまま包む。形式は検証しない
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ULID として解釈できる場合のみ採番時刻（ミリ秒）を返す
    pub fn timestamp_ms(&self) -> Option<u64> {
        ulid::Ulid::from_string(&self.0)
            .ok()
            .map(|ulid| ulid.timestamp_ms())
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ToDo レコード
///
/// `id` と `created_at` は作成後に変更されない。`updated_at` は更新のたびに
/// 書き換わり、常に `created_at` 以上となる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// 未完了の新規 ToDo を組み立てる。作成日時と更新日時は同じ値になる
    pub fn new(title: String, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: TodoId::new(),
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// パッチを適用する。`id` と `created_at` は保持される
    pub fn apply(&mut self, patch: TodoPatch) {
        self.title = patch.title;
        self.description = patch.description;
        self.completed = patch.completed;
        self.updated_at = patch.updated_at;
    }
}

/// 更新時にストレージへ渡す変更内容。可変フィールドをすべて含む
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}
