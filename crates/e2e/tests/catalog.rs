//! Checks over the built-in case table and the bundled YAML cases

use std::collections::HashSet;
use std::path::PathBuf;

use singlish_e2e::catalog::{REPLACEMENT_CHAR, SINHALA_LETTER};
use singlish_e2e::{CaseFilter, CaseSet, Category, Expectation, Pattern, TestCase};
use test_case::test_case;

fn builtin() -> CaseSet {
    CaseSet::builtin().expect("built-in table is valid")
}

fn case(id: &str) -> TestCase {
    builtin().get(id).cloned().unwrap_or_else(|| panic!("missing case {}", id))
}

#[test]
fn builtin_ids_are_unique_and_prefixed() {
    let set = builtin();
    let mut seen = HashSet::new();
    for case in set.iter() {
        assert!(seen.insert(case.id.clone()), "duplicate {}", case.id);

        let prefix = match case.category {
            Category::Ui => "Pos_UI_",
            Category::PositiveFunctional => "Pos_Fun_",
            Category::NegativeFunctional => "Neg_Fun_",
        };
        assert!(case.id.starts_with(prefix), "{} is not {}", case.id, prefix);
    }
}

#[test]
fn builtin_categories_match_expectations() {
    for case in builtin().iter() {
        let positive = case.category != Category::NegativeFunctional;
        assert_eq!(case.expectation.is_positive(), positive, "{}", case.id);
    }
}

#[test]
fn builtin_has_every_category() {
    let set = builtin();
    for category in [Category::Ui, Category::PositiveFunctional, Category::NegativeFunctional] {
        let selected = set
            .select(&CaseFilter {
                category: Some(category),
                ..Default::default()
            })
            .unwrap();
        assert!(!selected.is_empty(), "no {} cases", category);
    }
}

#[test]
fn greeting_expects_ayubowan() {
    let greeting = case("Pos_Fun_0002");
    assert_eq!(greeting.input, "aayuboovan");
    match &greeting.expectation {
        Expectation::Matches(p) => assert!(p.is_match("ආයුබෝවන්")),
        other => panic!("expected positive expectation, got {:?}", other),
    }
}

#[test]
fn symbols_forbid_sinhala_letters() {
    let symbols = case("Neg_Fun_0001");
    assert_eq!(symbols.input, "%%%%%#####@@@@@");
    match &symbols.expectation {
        Expectation::NotMatches(p) => {
            assert!(p.is_match("අ"));
            assert!(p.is_match("ෆ"));
            assert!(!p.is_match("%%%%%#####@@@@@"));
        }
        other => panic!("expected negative expectation, got {:?}", other),
    }
}

#[test_case("Neg_Fun_0002", |s: &str| !s.is_empty() && s.trim().is_empty() ; "whitespace only")]
#[test_case("Neg_Fun_0003", |s: &str| s.chars().all(|c| c.is_ascii_digit()) ; "numeric only")]
#[test_case("Neg_Fun_0005", |s: &str| s.len() >= 50 && s.chars().all(|c| c == 'a') ; "long repeated")]
#[test_case("Neg_Fun_0006", |s: &str| s.chars().all(|c| c as u32 >= 0x1F600) ; "emoji")]
#[test_case("Neg_Fun_0007", |s: &str| s.contains('\n') ; "embedded newlines")]
#[test_case("Neg_Fun_0010", |s: &str| s.contains("http://") ; "url mixed")]
#[test_case("Neg_Fun_0011", |s: &str| s.chars().any(|c| c.is_control() && c != '\n') ; "control characters")]
#[test_case("Neg_Fun_0012", |s: &str| s.is_empty() ; "empty")]
fn edge_case_inputs_are_covered(id: &str, shape: fn(&str) -> bool) {
    let case = case(id);
    assert!(shape(&case.input), "{} input {:?}", id, case.input);
}

#[test_case("Pos_Fun_0001", "මම ගෙදර යනවා")]
#[test_case("Pos_Fun_0003", "ඔයාට කොහොමද?")]
#[test_case("Pos_Fun_0004", "මට බත් කන්න ඕනෙ")]
#[test_case("Pos_Fun_0005", "වැහි නිසා")]
#[test_case("Pos_Fun_0010", "මම\nඔයා")]
fn positive_patterns_accept_sample_output(id: &str, output: &str) {
    assert!(case(id).expectation.pattern().is_match(output));
}

#[test]
fn forbidden_patterns_ignore_latin_output() {
    let letter = Pattern::new(SINHALA_LETTER).unwrap();
    let replacement = Pattern::new(REPLACEMENT_CHAR).unwrap();
    assert!(!letter.is_match("http://example.com 1234567890 😀"));
    assert!(!replacement.is_match("මචං එල සුපිරි"));
    assert!(replacement.is_match("broken \u{FFFD} text"));
}

#[test]
fn only_latin_word_negatives_forbid_replacement_char() {
    let robustness_only = ["Neg_Fun_0004", "Neg_Fun_0005", "Neg_Fun_0009", "Neg_Fun_0010"];
    for case in builtin().iter() {
        let Expectation::NotMatches(pattern) = &case.expectation else {
            continue;
        };
        let expected = if robustness_only.contains(&case.id.as_str()) {
            REPLACEMENT_CHAR
        } else {
            SINHALA_LETTER
        };
        assert_eq!(pattern.as_str(), expected, "{}", case.id);
    }
}

#[test]
fn bundled_yaml_cases_extend_builtin() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cases");
    let extra = CaseSet::load_dir(&dir).expect("bundled cases load");
    assert!(!extra.is_empty());

    let mut set = builtin();
    let before = set.len();
    set.extend(extra.clone()).expect("bundled ids do not clash");
    assert_eq!(set.len(), before + extra.len());
}

#[test]
fn case_dir_is_walked_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        dir.path().join("a.yaml"),
        "cases:\n  - id: A\n    input: amma\n    matches: \"අම්මා\"\n",
    )
    .unwrap();
    std::fs::write(
        nested.join("b.yml"),
        "cases:\n  - id: B\n    input: \"###\"\n    not_matches: \"[අ-ෆ]\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let set = CaseSet::load_dir(dir.path()).unwrap();
    let ids: Vec<_> = set.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[test]
fn duplicate_across_files_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["one.yaml", "two.yaml"] {
        std::fs::write(
            dir.path().join(name),
            "cases:\n  - id: Same\n    input: x\n    matches: x\n",
        )
        .unwrap();
    }
    assert!(matches!(
        CaseSet::load_dir(dir.path()),
        Err(singlish_e2e::E2eError::DuplicateCase(_))
    ));
}
