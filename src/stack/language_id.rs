crate::define_id_enum! {
    /// Language identifier; catalog-defined languages map to `Custom`
    LanguageId {
        NodeJs => "nodejs" : "Node.js" | "node" | "javascript",
        Python => "python" : "Python",
        Go => "go" : "Go" | "golang",
        Java => "java" : "Java",
        Php => "php" : "PHP",
        Ruby => "ruby" : "Ruby",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_id_serialization() {
        assert_eq!(
            serde_json::to_string(&LanguageId::NodeJs).unwrap(),
            "\"nodejs\""
        );
        assert_eq!(serde_json::to_string(&LanguageId::Php).unwrap(), "\"php\"");
    }

    #[test]
    fn test_language_id_name() {
        assert_eq!(LanguageId::NodeJs.name(), "Node.js");
        assert_eq!(LanguageId::Php.to_string(), "PHP");
    }

    #[test]
    fn test_from_name_accepts_keys_names_and_aliases() {
        assert_eq!(LanguageId::from_name("Node.js"), Some(LanguageId::NodeJs));
        assert_eq!(LanguageId::from_name("nodejs"), Some(LanguageId::NodeJs));
        assert_eq!(LanguageId::from_name("golang"), Some(LanguageId::Go));
        assert_eq!(LanguageId::from_name("PHP"), Some(LanguageId::Php));
        assert_eq!(LanguageId::from_name("Elixir"), None);
    }

    #[test]
    fn test_custom_language_roundtrip() {
        let deserialized: LanguageId = serde_json::from_str("\"Elixir\"").unwrap();
        assert_eq!(deserialized, LanguageId::Custom("Elixir".to_string()));
        assert!(deserialized.is_custom());
        assert_eq!(serde_json::to_string(&deserialized).unwrap(), "\"Elixir\"");
    }
}
