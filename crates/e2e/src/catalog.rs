//! Built-in case table for swifttranslator.com

use crate::case::{CaseDef, Category};

/// Any Sinhala vowel or consonant letter
pub const SINHALA_LETTER: &str = r"[\u{0D85}-\u{0DC6}]";

/// U+FFFD, what a broken transliteration leaves behind
pub const REPLACEMENT_CHAR: &str = r"\u{FFFD}";

pub fn builtin() -> Vec<CaseDef> {
    let mut cases = vec![
        CaseDef::positive("Pos_UI_0001", "mama gedhara yanavaa", "මම|මන්")
            .named("Output updates automatically")
            .in_category(Category::Ui),
    ];
    cases.extend(positive());
    cases.extend(negative());
    cases
}

fn positive() -> Vec<CaseDef> {
    vec![
        CaseDef::positive("Pos_Fun_0001", "mama gedhara yanavaa", "මම|මන්")
            .named("Simple present sentence"),
        CaseDef::positive("Pos_Fun_0002", "aayuboovan", "ආයුබෝවන්").named("Greeting"),
        CaseDef::positive("Pos_Fun_0003", "oyaata kohomadha?", "ඔයා|ඔබ")
            .named("Question with punctuation"),
        CaseDef::positive("Pos_Fun_0004", "mata bath kanna one", "මට|බත්|කන්න")
            .named("Need statement"),
        CaseDef::positive(
            "Pos_Fun_0005",
            "mama gedhara yanavaa, haebaeyi vahina nisaa dhaenma yannee naee.",
            "වැහි|වැසි|නෑ|යන්න",
        )
        .named("Compound sentence with negation"),
        CaseDef::positive("Pos_Fun_0006", "amma", "අම්මා|අම්ම").named("Single word"),
        CaseDef::positive("Pos_Fun_0007", "api heta paasal yanavaa", "අපි|හෙට|පාසල්")
            .named("Future plan"),
        CaseDef::positive("Pos_Fun_0008", "vathura bonna", "වතුර").named("Imperative"),
        CaseDef::positive("Pos_Fun_0009", "sthuthiyi", "ස්තුතියි|ස්තූතියි").named("Thanks"),
        CaseDef::positive("Pos_Fun_0010", "mama\noyaa", "මම[\\s\\S]*ඔයා")
            .named("Multi-line input"),
        CaseDef::positive("Pos_Fun_0011", "mama 2025 dhi gedhara aavaa", "මම|ගෙදර")
            .named("Digits mixed with words"),
        CaseDef::positive("Pos_Fun_0012", "oyaa Zoom meeting ekata enavadha?", "ඔයා|එනවද")
            .named("English brand name in sentence"),
    ]
}

/// Noise inputs forbid any Sinhala letter. Neg_Fun_0004, 0005, 0009 and 0010
/// contain real Latin words that may legitimately transliterate, so they forbid
/// only U+FFFD. Those four check robustness only: the page keeps its origin,
/// the input is retained and no broken output appears. They do not assert that
/// the site rejects the input.
fn negative() -> Vec<CaseDef> {
    vec![
        CaseDef::negative("Neg_Fun_0001", "%%%%%#####@@@@@", SINHALA_LETTER).named("Symbols only"),
        CaseDef::negative("Neg_Fun_0002", "     ", SINHALA_LETTER).named("Spaces only"),
        CaseDef::negative("Neg_Fun_0003", "1234567890", SINHALA_LETTER).named("Digits only"),
        CaseDef::negative("Neg_Fun_0004", "m@ma g3dh@ra y@n@v@", REPLACEMENT_CHAR)
            .named("Leetspeak"),
        CaseDef::negative("Neg_Fun_0005", &"a".repeat(60), REPLACEMENT_CHAR)
            .named("Long repeated character"),
        CaseDef::negative("Neg_Fun_0006", "😀😀😀😀😀", SINHALA_LETTER).named("Emoji only"),
        CaseDef::negative("Neg_Fun_0007", "\n\n\n\n", SINHALA_LETTER).named("Newlines only"),
        CaseDef::negative("Neg_Fun_0008", "[]{}()<>/\\|~`", SINHALA_LETTER).named("Brackets"),
        CaseDef::negative("Neg_Fun_0009", "machan ela supiri kiyala dapan", REPLACEMENT_CHAR)
            .named("Slang"),
        CaseDef::negative(
            "Neg_Fun_0010",
            "http://example.com test email zoom whatsapp",
            REPLACEMENT_CHAR,
        )
        .named("URL mixed with English"),
        CaseDef::negative("Neg_Fun_0011", "\t\u{7}\u{1b}[0m\u{8}", SINHALA_LETTER)
            .named("Control characters"),
        CaseDef::negative("Neg_Fun_0012", "", SINHALA_LETTER).named("Empty input"),
    ]
}
