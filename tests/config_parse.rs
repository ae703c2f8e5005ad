use paper_grill::config::Config;
use paper_grill::questions::QuestionSet;

#[test]
fn parse_example_config() {
    let raw = include_str!("../paper-grill.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.model.name, "gemini-2.5-flash");
    assert_eq!(cfg.retry.max_retries, 2);
    assert!(!cfg.paths.pdf_dir.is_empty());
}

#[test]
fn empty_config_uses_defaults() {
    let cfg: Config = toml::from_str("").expect("parse TOML");
    assert_eq!(cfg.model.api_key_env, "GEMINI_API_KEY");
    assert!(cfg.options.resume);
    assert!(cfg.options.confirm_before_processing);
    assert_eq!(cfg.retry.max_retries, 2);
}

#[test]
fn parse_example_questions() {
    let raw = include_str!("../questions.example.toml");
    let set = QuestionSet::parse(raw).expect("parse questions");
    assert_eq!(set.len(), 4);
    assert!(set.instructions().is_some());
    assert!(set.questions[0].contains("research question"));
}
