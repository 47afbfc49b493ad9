#[cfg(test)]
mod tests {
    use crate::prompts::{PromptError, PromptStore};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_load_json_template() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("generator.json"),
            r#"{"name": "generator", "template": "Build a {kind} store", "description": "test"}"#,
        )
        .unwrap();

        let store = PromptStore::new(tmp.path());
        let prompts = store.load_all();
        assert_eq!(prompts["generator"].template, "Build a {kind} store");
    }

    #[test]
    fn test_load_yaml_template() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("generator.yaml"),
            "name: generator\ntemplate: Build a shop\n",
        )
        .unwrap();

        let store = PromptStore::new(tmp.path());
        let prompts = store.load_all();
        assert_eq!(prompts["generator"].template, "Build a shop");
    }

    #[test]
    fn test_txt_file_becomes_template_named_after_stem() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("flexible_website_generator.txt"), "You build sites.\n")
            .unwrap();

        let store = PromptStore::new(tmp.path());
        let prompts = store.load_all();

        let template = &prompts["flexible_website_generator"];
        assert_eq!(template.template, "You build sites.");
        assert_eq!(
            template.description.as_deref(),
            Some("Prompt from flexible_website_generator.txt")
        );
    }

    #[test]
    fn test_malformed_file_skipped_not_fatal() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("bad.json"), "{not json").unwrap();
        std::fs::write(
            tmp.path().join("good.json"),
            r#"{"name": "good", "template": "ok"}"#,
        )
        .unwrap();

        let store = PromptStore::new(tmp.path());
        let prompts = store.load_all();
        assert_eq!(prompts.len(), 1);
        assert!(prompts.contains_key("good"));
    }

    #[test]
    fn test_missing_directory_yields_empty_map() {
        let store = PromptStore::new("/nonexistent/prompts/dir");
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_get_unknown_prompt_reports_available() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("known.json"),
            r#"{"name": "known", "template": "x"}"#,
        )
        .unwrap();

        let store = PromptStore::new(tmp.path());
        let result = store.get("unknown", None);
        match result {
            Err(PromptError::NotFound { name, available }) => {
                assert_eq!(name, "unknown");
                assert_eq!(available, vec!["known"]);
            }
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_substitution_with_explicit_variables() {
        let rendered = PromptStore::substitute(
            "Build a {kind} store with {style} styling",
            &vars(&[("kind", "book"), ("style", "minimal")]),
        )
        .unwrap();
        assert_eq!(rendered, "Build a book store with minimal styling");
    }

    #[test]
    fn test_substitution_missing_variable_errors() {
        let result = PromptStore::substitute("Build a {kind} store", &vars(&[("other", "x")]));
        assert!(matches!(result, Err(PromptError::MissingVariable(v)) if v == "kind"));
    }

    #[test]
    fn test_get_without_variables_returns_template_verbatim() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("raw.json"),
            r#"{"name": "raw", "template": "body {color: red} and {placeholder}"}"#,
        )
        .unwrap();

        let store = PromptStore::new(tmp.path());
        // No variables in play: brace-heavy templates pass through.
        let rendered = store.get("raw", None).unwrap();
        assert_eq!(rendered, "body {color: red} and {placeholder}");
    }

    #[test]
    fn test_save_round_trips_through_load_all() {
        use crate::prompts::PromptTemplate;

        let tmp = TempDir::new().unwrap();
        let store = PromptStore::new(tmp.path().join("prompts"));

        let template = PromptTemplate {
            name: "custom_generator".to_string(),
            description: Some("hand-made".to_string()),
            template: "Build a {kind} shop".to_string(),
            variables: Some(vars(&[("kind", "record")])),
            metadata: None,
        };

        let path = store.save(&template).unwrap();
        assert!(path.ends_with("custom_generator.json"));

        let prompts = store.load_all();
        assert_eq!(prompts["custom_generator"].template, "Build a {kind} shop");
        assert_eq!(store.get("custom_generator", None).unwrap(), "Build a record shop");
    }

    #[test]
    fn test_get_applies_template_default_variables() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("defaults.json"),
            r#"{"name": "defaults", "template": "a {kind} shop", "variables": {"kind": "toy"}}"#,
        )
        .unwrap();

        let store = PromptStore::new(tmp.path());
        assert_eq!(store.get("defaults", None).unwrap(), "a toy shop");
    }
}
