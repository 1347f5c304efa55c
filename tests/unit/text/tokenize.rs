use super::*;

#[test]
fn tokenize_splits_on_whitespace_runs() {
    let toks = tokenize("  Romeo loves\n\tJuliet.  Juliet\r\nloves Romeo. ");
    let raw: Vec<&str> = toks.iter().map(Token::raw).collect();
    assert_eq!(
        raw,
        vec!["Romeo", "loves", "Juliet.", "Juliet", "loves", "Romeo."]
    );
}

#[test]
fn tokenize_empty_and_blank_inputs() {
    assert!(tokenize("").is_empty());
    assert!(tokenize(" \n\t  ").is_empty());
}

#[test]
fn normalize_strips_punctuation_and_lowercases() {
    assert_eq!(normalize("Romeo's"), "romeos");
    assert_eq!(normalize("JULIET,"), "juliet");
    assert_eq!(normalize("--"), "");
    assert_eq!(normalize("snake_case42!"), "snake_case42");
}

#[test]
fn normalize_is_total_over_non_ascii() {
    assert_eq!(normalize("Roméo"), "romo");
    assert_eq!(normalize("«Juliet»"), "juliet");
    assert_eq!(normalize("日本"), "");
}

#[test]
fn marker_match_is_prefix_based() {
    assert!(matches_marker("Romeo", "romeo"));
    assert!(matches_marker("Romeo's", "romeo"));
    assert!(matches_marker("Romeos", "romeo"));
    assert!(matches_marker("Romeoville", "romeo"));
    assert!(matches_marker("Juliet,", "juliet"));
    assert!(!matches_marker("Rome", "romeo"));
    assert!(!matches_marker("ROMEO", "juliet"));
}

#[test]
fn token_caches_normalized_form() {
    let t = Token::new("Juliet!");
    assert_eq!(t.raw(), "Juliet!");
    assert_eq!(t.normalized(), "juliet");
    assert!(t.matches_marker("juliet"));
    assert!(!t.matches_marker("romeo"));
}
