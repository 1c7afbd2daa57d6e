//! Recursive deep merge for configuration documents
//!
//! A remote document is always partial: every field is optional and a
//! complete default exists for each. Merging overlays the remote document
//! over the defaults so the result is always fully populated. Objects merge
//! key-by-key to any depth; arrays and scalars in the overlay replace the
//! default wholesale, and an explicit `null` in the overlay wins.

use serde_json::Value;

/// Merge `overlay` over `defaults`, returning a new value graph.
///
/// Neither input is mutated. No type validation or coercion happens here;
/// typed decoding at the schema boundary is responsible for rejecting
/// malformed values.
pub fn deep_merge(defaults: &Value, overlay: &Value) -> Value {
    match (defaults, overlay) {
        (Value::Object(base), Value::Object(over)) => {
            let mut merged = base.clone();
            for (key, value) in over {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_overlay_preserves_defaults() {
        let defaults = json!({"hero": {"title": "Welcome", "visible": true}});
        let merged = deep_merge(&defaults, &json!({}));
        assert_eq!(merged, defaults);
    }

    #[test]
    fn merged_result_covers_every_default_key() {
        let defaults = json!({
            "hero": {"title": "Welcome", "subtitle": "Hi", "visible": true},
            "cta": {"title": "Talk to us", "buttonLabel": "Contact"}
        });
        let overlay = json!({"hero": {"title": "Hola"}});

        let merged = deep_merge(&defaults, &overlay);

        assert_eq!(merged["hero"]["title"], json!("Hola"));
        assert_eq!(merged["hero"]["subtitle"], json!("Hi"));
        assert_eq!(merged["hero"]["visible"], json!(true));
        assert_eq!(merged["cta"], defaults["cta"]);
    }

    #[test]
    fn nested_theme_fields_survive_partial_overlay() {
        let defaults = json!({"section": {"dark": {"a": 1, "b": 2}}});
        let overlay = json!({"section": {"dark": {"a": 9}}});

        let merged = deep_merge(&defaults, &overlay);

        assert_eq!(merged["section"]["dark"], json!({"a": 9, "b": 2}));
    }

    #[test]
    fn merge_recurses_past_one_level() {
        let defaults = json!({"sidebar": {"tagActive": {"dark": {"bg": "#000", "fg": "#fff"}}}});
        let overlay = json!({"sidebar": {"tagActive": {"dark": {"bg": "#111"}}}});

        let merged = deep_merge(&defaults, &overlay);

        assert_eq!(
            merged["sidebar"]["tagActive"]["dark"],
            json!({"bg": "#111", "fg": "#fff"})
        );
    }

    #[test]
    fn arrays_replace_wholesale() {
        let defaults = json!({"nav": {"items": ["home", "about"]}});
        let overlay = json!({"nav": {"items": ["blog"]}});

        let merged = deep_merge(&defaults, &overlay);

        assert_eq!(merged["nav"]["items"], json!(["blog"]));
    }

    #[test]
    fn explicit_null_wins() {
        let defaults = json!({"hero": {"badge": "New"}});
        let overlay = json!({"hero": {"badge": null}});

        let merged = deep_merge(&defaults, &overlay);

        assert_eq!(merged["hero"]["badge"], Value::Null);
    }

    #[test]
    fn overlay_keys_absent_from_defaults_are_kept() {
        let defaults = json!({"hero": {"title": "Welcome"}});
        let overlay = json!({"hero": {"experiment": "b"}});

        let merged = deep_merge(&defaults, &overlay);

        assert_eq!(merged["hero"]["title"], json!("Welcome"));
        assert_eq!(merged["hero"]["experiment"], json!("b"));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let defaults = json!({"a": {"b": 1}});
        let overlay = json!({"a": {"b": 2}});
        let defaults_before = defaults.clone();
        let overlay_before = overlay.clone();

        let _ = deep_merge(&defaults, &overlay);

        assert_eq!(defaults, defaults_before);
        assert_eq!(overlay, overlay_before);
    }
}
