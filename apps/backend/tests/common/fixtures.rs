//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// A handful of Quranic vocabulary entries.
pub fn vocabulary() -> Vec<(&'static str, &'static str)> {
    vec![
        ("رَحْمَة", "mercy"),
        ("صَبْر", "patience"),
        ("نُور", "light"),
        ("قَلْب", "heart"),
    ]
}

pub fn grade_request(item_id: i64, quality: i32) -> Value {
    json!({ "item_id": item_id, "quality": quality })
}

pub fn start_session_request(mode: &str) -> Value {
    json!({ "mode": mode })
}

pub fn session_grade_request(quality: i32) -> Value {
    json!({ "quality": quality })
}

pub fn quiz_answer_request(option_index: usize) -> Value {
    json!({ "option_index": option_index })
}
