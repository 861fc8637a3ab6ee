#![allow(clippy::unwrap_used, clippy::expect_used)]

use ambienco_assistant::*;
use std::io::Write;

#[test]
fn test_quick_questions_hit_expected_categories() {
    let assistant = Assistant::builtin();
    let expectations = [
        ("What are the benefits of LED lighting?", "LED Benefits"),
        ("Best LED solutions for Saudi climate?", "Saudi Climate"),
        ("Smart lighting options available?", "Smart Lighting"),
        ("Installation services offered?", "Installation"),
        ("Commercial lighting solutions?", "Commercial Lighting"),
    ];

    for (question, category) in expectations {
        let reply = assistant.reply(question);
        assert!(reply.matched, "Expected a match for '{question}'");
        assert_eq!(
            reply.category.as_deref(),
            Some(category),
            "Wrong category for '{question}'"
        );
        assert_eq!(reply.follow_ups.len(), 3);
    }
}

#[test]
fn test_builtin_tie_resolves_to_earlier_entry() {
    // "led" scores 1 for LED Benefits, "strip" scores 1 for LED Strips.
    let reply = Assistant::builtin().reply("LEd STRip");
    assert_eq!(reply.category.as_deref(), Some("LED Benefits"));
}

#[test]
fn test_blank_questions_fall_back_to_default() {
    let assistant = Assistant::builtin();
    for question in ["", "   ", "\n"] {
        let reply = assistant.reply(question);
        assert!(!reply.matched);
        assert_eq!(reply.response, assistant.default_response());
        assert!(reply.follow_ups.is_empty());
    }
}

#[test]
fn test_builtin_order_and_size() {
    let corpus = Corpus::builtin();
    assert_eq!(corpus.len(), 12);
    assert_eq!(corpus.entries()[0].category, "LED Benefits");
    assert_eq!(corpus.entries()[11].category, "Energy Efficiency");
    assert_eq!(Assistant::builtin().quick_questions().len(), 6);
}

#[test]
fn test_load_toml_corpus_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[[entries]]
keywords = ["chandelier", "pendant"]
category = "Decor"
response = "Our chandeliers ship within a week."
follow_ups = ["Do you install chandeliers?"]
"#
    )
    .unwrap();

    let corpus = Corpus::load(file.path()).unwrap();
    let assistant = Assistant::new(corpus);
    let reply = assistant.reply("A crystal CHANDELIER for the hall");
    assert_eq!(reply.response, "Our chandeliers ship within a week.");
    assert_eq!(reply.follow_ups, vec!["Do you install chandeliers?"]);
}

#[test]
fn test_load_json_corpus_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[{{"keywords": ["socket"], "category": "Electrical", "response": "Sockets in stock."}}]"#
    )
    .unwrap();

    let corpus = Corpus::load(file.path()).unwrap();
    assert_eq!(corpus.len(), 1);
    assert!(corpus.best_match("wall socket").is_match());
}

#[test]
fn test_invalid_corpus_file_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[[entries]]
keywords = []
category = "Broken"
response = "never"
"#
    )
    .unwrap();

    assert!(Corpus::load(file.path()).is_err());
}

#[test]
fn test_concurrent_replies_share_corpus() {
    let assistant = Assistant::builtin();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let assistant = assistant.clone();
            std::thread::spawn(move || assistant.reply("outdoor garden flood lights"))
        })
        .collect();

    for handle in handles {
        let reply = handle.join().unwrap();
        assert_eq!(reply.category.as_deref(), Some("Outdoor Lighting"));
    }
}
