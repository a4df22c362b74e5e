//! Small helpers for pulling typed fields out of DynamoDB items.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

pub fn string_attr(item: &Item, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

pub fn opt_string_attr(item: &Item, name: &str) -> Option<String> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

pub fn bool_attr(item: &Item, name: &str) -> bool {
    item.get(name)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false)
}

pub fn string_list_attr(item: &Item, name: &str) -> Vec<String> {
    item.get(name)
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

pub fn string_list_value(values: &[String]) -> AttributeValue {
    AttributeValue::L(
        values
            .iter()
            .map(|s| AttributeValue::S(s.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_attr_falls_back_to_empty() {
        let mut item = Item::new();
        item.insert("title".to_string(), AttributeValue::S("hello".to_string()));
        assert_eq!(string_attr(&item, "title"), "hello");
        assert_eq!(string_attr(&item, "missing"), "");
        assert_eq!(opt_string_attr(&item, "missing"), None);
    }

    #[test]
    fn string_list_round_trips() {
        let skills = vec!["rust".to_string(), "dynamodb".to_string()];
        let mut item = Item::new();
        item.insert("skills".to_string(), string_list_value(&skills));
        assert_eq!(string_list_attr(&item, "skills"), skills);
        assert!(string_list_attr(&item, "missing").is_empty());
    }

    #[test]
    fn bool_attr_defaults_false() {
        let mut item = Item::new();
        item.insert("is_approved".to_string(), AttributeValue::Bool(true));
        assert!(bool_attr(&item, "is_approved"));
        assert!(!bool_attr(&item, "missing"));
    }
}
