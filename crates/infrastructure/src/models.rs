use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{StorageError, Todo, TodoId, TodoPatch, User, UserId};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

/// テーブルのパーティションキー属性名
pub const KEY_ATTRIBUTE: &str = "id";

pub fn key_for(id: &str) -> (String, AttributeValue) {
    (KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))
}

/// ToDo を DynamoDB アイテムに変換
pub fn todo_to_item(todo: &Todo) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), AttributeValue::S(todo.id.as_str().to_string()));
    item.insert("title".to_string(), AttributeValue::S(todo.title.clone()));
    item.insert(
        "description".to_string(),
        AttributeValue::S(todo.description.clone()),
    );
    item.insert("completed".to_string(), AttributeValue::Bool(todo.completed));
    item.insert(
        "createdAt".to_string(),
        AttributeValue::S(todo.created_at.to_rfc3339()),
    );
    item.insert(
        "updatedAt".to_string(),
        AttributeValue::S(todo.updated_at.to_rfc3339()),
    );
    item
}

/// DynamoDB アイテムから ToDo を復元
///
/// `description` が欠けている古いアイテムは空文字として扱う。
pub fn item_to_todo(item: &Item) -> Result<Todo, StorageError> {
    Ok(Todo {
        id: TodoId::from_string(required_s(item, "id")?),
        title: required_s(item, "title")?,
        description: item
            .get("description")
            .and_then(|v| v.as_s().ok())
            .cloned()
            .unwrap_or_default(),
        completed: item
            .get("completed")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        created_at: required_timestamp(item, "createdAt")?,
        updated_at: required_timestamp(item, "updatedAt")?,
    })
}

/// UpdateItem の `SET` 式と値を組み立てる
pub fn patch_update_expression(patch: &TodoPatch) -> (String, Item) {
    let mut values = HashMap::new();
    values.insert(":title".to_string(), AttributeValue::S(patch.title.clone()));
    values.insert(
        ":description".to_string(),
        AttributeValue::S(patch.description.clone()),
    );
    values.insert(":completed".to_string(), AttributeValue::Bool(patch.completed));
    values.insert(
        ":updated_at".to_string(),
        AttributeValue::S(patch.updated_at.to_rfc3339()),
    );

    let expression =
        "SET title = :title, description = :description, completed = :completed, updatedAt = :updated_at"
            .to_string();

    (expression, values)
}

/// DynamoDB アイテムからユーザーを復元。`id` 以外はプロフィールとして JSON に変換する
pub fn item_to_user(item: &Item) -> Result<User, StorageError> {
    let id = UserId::from_string(required_s(item, "id")?);

    let mut profile = Map::new();
    for (name, value) in item {
        if name == KEY_ATTRIBUTE {
            continue;
        }
        profile.insert(name.clone(), attribute_to_json(value));
    }

    Ok(User { id, profile })
}

/// AttributeValue を JSON 値に変換する
pub fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(list.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), attribute_to_json(v)))
                .collect(),
        ),
        AttributeValue::Ss(set) => {
            Value::Array(set.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(set) => Value::Array(set.iter().map(|n| parse_number(n)).collect()),
        // バイナリ属性は JSON で表現しない
        _ => Value::Null,
    }
}

fn parse_number(n: &str) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::Number(i.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n.to_string()))
}

fn required_s(item: &Item, name: &str) -> Result<String, StorageError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StorageError::Corrupt(format!("missing string attribute {name}")))
}

fn required_timestamp(item: &Item, name: &str) -> Result<DateTime<Utc>, StorageError> {
    let raw = required_s(item, name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("invalid timestamp in {name}: {e}")))
}
