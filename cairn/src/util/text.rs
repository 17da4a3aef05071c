//! Helpers for `KEY=VALUE` lists.

use indexmap::IndexMap;

/// Value of the first `key=...` entry in `kv_pairs`.
pub fn get_value<'a>(kv_pairs: &'a [String], key: &str) -> Option<&'a str> {
    let prefix = format!("{key}=");
    kv_pairs
        .iter()
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
}

/// Render a map as `KEY=VALUE` entries, in map order.
pub fn map_to_kv_pairs(map: &IndexMap<String, String>) -> Vec<String> {
    map.iter().map(|(k, v)| format!("{k}={v}")).collect()
}

/// Parse `KEY=VALUE` entries. An entry without `=` maps to an empty value;
/// a repeated key keeps the last value.
pub fn kv_pairs_to_map(kv_pairs: &[String]) -> IndexMap<String, String> {
    kv_pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.clone(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_value() {
        let env = pairs(&["PATH=/bin", "AUTOFORMAT=/dev/sda /dev/vda", "EMPTY="]);
        assert_eq!(get_value(&env, "AUTOFORMAT"), Some("/dev/sda /dev/vda"));
        assert_eq!(get_value(&env, "EMPTY"), Some(""));
        assert_eq!(get_value(&env, "PAT"), None);
        assert_eq!(get_value(&[], "PATH"), None);
    }

    #[test]
    fn test_kv_pairs_to_map() {
        let map = kv_pairs_to_map(&pairs(&["A=1", "B=x=y", "FLAG", "A=2"]));
        assert_eq!(map.get("A").map(String::as_str), Some("2"));
        assert_eq!(map.get("B").map(String::as_str), Some("x=y"));
        assert_eq!(map.get("FLAG").map(String::as_str), Some(""));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_map_to_kv_pairs_keeps_order() {
        let mut map = IndexMap::new();
        map.insert("Z".to_string(), "last".to_string());
        map.insert("A".to_string(), "first".to_string());
        assert_eq!(map_to_kv_pairs(&map), vec!["Z=last", "A=first"]);
    }
}
